//! Asynchronous BLAS on device buffers through the registered backend.
//!
//! Every kernel is enqueued on a [`Queue`] and returns once submitted;
//! results are observable after [`Queue::sync`] or a
//! [`device_copy_from`]. Sizes are `i64` and are narrowed to
//! [`DeviceInt`](unblas_accelerate_api::DeviceInt) before dispatch.

mod level1;
mod level2;
mod level3;
mod memory;
mod queue;

pub use level1::*;
pub use level2::*;
pub use level3::*;
pub use memory::{
    device_copy, device_copy_from, device_copy_to, device_free, device_malloc, host_free_pinned,
    host_malloc_pinned, DeviceBuffer, Residency,
};
pub use queue::{get_device_count, set_device, Queue};

use crate::error::Result;
use unblas_accelerate_api::{DeviceBlasProvider, StreamHandle};

/// Submit one kernel on `queue` under a dispatch span.
fn launch<F>(queue: &Queue, func: &'static str, submit: F) -> Result<()>
where
    F: FnOnce(&dyn DeviceBlasProvider, &StreamHandle) -> anyhow::Result<()>,
{
    queue.bind(func)?;
    let provider = queue.provider();
    let _span = unblas_logging::dispatch_span(func, provider.name()).entered();
    log::debug!(
        "unblas: {func} on {} device {} stream {}",
        provider.name(),
        queue.device(),
        queue.stream().id
    );
    submit(provider, queue.stream()).map_err(|e| queue.error(func, func, e))
}
