//! Device BLAS backends.
//!
//! One backend is compiled in per build (`cuda`, `rocm` or `inprocess`);
//! [`initialize`] registers it as the process-wide
//! [`DeviceBlasProvider`](unblas_accelerate_api::DeviceBlasProvider). A build
//! with none of the features is CPU-only and registers nothing.

#[cfg(any(
    all(feature = "cuda", feature = "rocm"),
    all(feature = "cuda", feature = "inprocess"),
    all(feature = "rocm", feature = "inprocess"),
))]
compile_error!("features `cuda`, `rocm` and `inprocess` are mutually exclusive");

pub mod backend;
mod reference;
pub mod simple_provider;

pub use simple_provider::{register_inprocess_provider, InProcessProvider, INPROCESS_DEVICES};

use unblas_accelerate_api::{DeviceBlasProvider, DeviceKind};

/// Options for [`initialize_with`].
#[derive(Debug, Clone)]
pub struct AccelerateInitOptions {
    pub enabled: bool,
}

impl Default for AccelerateInitOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Backend selected by cargo features, if any.
pub fn compiled_backend() -> Option<DeviceKind> {
    if cfg!(feature = "cuda") {
        Some(DeviceKind::Cuda)
    } else if cfg!(feature = "rocm") {
        Some(DeviceKind::Rocm)
    } else if cfg!(feature = "inprocess") {
        Some(DeviceKind::InProcess)
    } else {
        None
    }
}

/// Register the compiled-in backend unless a provider is already present.
///
/// A backend whose runtime cannot be loaded is logged and left unregistered;
/// device calls then fail with `Unavailable` and the device count is 0.
#[allow(unreachable_code)]
pub fn initialize_with(options: &AccelerateInitOptions) -> Option<&'static dyn DeviceBlasProvider> {
    if let Some(existing) = unblas_accelerate_api::provider() {
        return Some(existing);
    }
    if !options.enabled {
        log::info!("unblas accelerate: disabled by configuration; no provider registered");
        return None;
    }

    #[cfg(feature = "cuda")]
    {
        match backend::cuda::register_cuda_provider() {
            Ok(()) => log::info!("unblas accelerate: using CUDA/cuBLAS provider"),
            Err(err) => log::warn!("unblas accelerate: CUDA provider unavailable: {err:#}"),
        }
        return unblas_accelerate_api::provider();
    }

    #[cfg(feature = "rocm")]
    {
        match backend::rocm::register_rocm_provider() {
            Ok(()) => log::info!("unblas accelerate: using HIP/rocBLAS provider"),
            Err(err) => log::warn!("unblas accelerate: ROCm provider unavailable: {err:#}"),
        }
        return unblas_accelerate_api::provider();
    }

    #[cfg(feature = "inprocess")]
    {
        register_inprocess_provider();
        log::info!("unblas accelerate: using in-process provider");
        return unblas_accelerate_api::provider();
    }

    log::debug!("unblas accelerate: built without a device backend");
    None
}

pub fn initialize() -> Option<&'static dyn DeviceBlasProvider> {
    initialize_with(&AccelerateInitOptions::default())
}
