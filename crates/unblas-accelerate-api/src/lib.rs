//! Provider contract for device BLAS backends.
//!
//! A provider wraps one accelerator runtime (CUDA/cuBLAS, HIP/rocBLAS, or the
//! in-process test backend) behind [`DeviceBlasProvider`]. Exactly one
//! provider is registered per process; callers reach it through
//! [`provider()`]. Kernel methods enqueue work on a stream and return; the
//! stream executes in submission order.

pub mod args;

pub use args::*;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::os::raw::c_void;
use std::sync::RwLock;

/// Native integer of device BLAS entry points.
pub type DeviceInt = i32;

/// Index of a physical accelerator, as the runtime numbers them.
pub type DeviceId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    Cuda,
    Rocm,
    InProcess,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDeviceInfo {
    pub device_id: DeviceId,
    pub name: String,
    pub vendor: String,
    pub memory_bytes: Option<u64>,
    pub backend: Option<String>,
}

/// A stream created by a provider; bound to one device for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle {
    pub device: DeviceId,
    pub id: u64,
}

/// An address in device memory or pinned host memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct DevicePtr(pub *mut c_void);

// Device addresses are plain integers to the host; providers move them to
// their execution threads.
unsafe impl Send for DevicePtr {}
unsafe impl Sync for DevicePtr {}

impl DevicePtr {
    pub const fn null() -> Self {
        DevicePtr(std::ptr::null_mut())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }

    pub fn cast<T>(self) -> *mut T {
        self.0.cast()
    }

    /// Address `bytes` past this one.
    pub fn byte_add(self, bytes: usize) -> Self {
        DevicePtr(self.0.cast::<u8>().wrapping_add(bytes).cast())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemcpyKind {
    /// Host source is fully read before `memcpy` returns.
    HostToDevice,
    /// Host destination is fully written before `memcpy` returns.
    DeviceToHost,
    /// Enqueued on the stream.
    DeviceToDevice,
}

/// Error returned by default trait methods for operations a provider lacks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0} not supported by provider")]
pub struct Unsupported(pub &'static str);

pub fn unsupported<T>(what: &'static str) -> anyhow::Result<T> {
    Err(Unsupported(what).into())
}

/// Device BLAS backend.
///
/// Device selection in the underlying runtimes is global (per host thread);
/// callers invoke [`set_device`](Self::set_device) with the stream's device
/// before every call that touches a stream or device memory.
pub trait DeviceBlasProvider: Send + Sync {
    fn kind(&self) -> DeviceKind;

    fn name(&self) -> &str;

    /// Number of visible devices; 0 when the runtime is missing or fails.
    fn device_count(&self) -> usize;

    fn device_info(&self, device: DeviceId) -> ApiDeviceInfo {
        ApiDeviceInfo {
            device_id: device,
            name: self.name().to_string(),
            vendor: String::new(),
            memory_bytes: None,
            backend: Some(format!("{:?}", self.kind())),
        }
    }

    /// Make `device` current for the calling thread. Backends whose streams
    /// carry their device keep the default no-op.
    fn set_device(&self, _device: DeviceId) -> anyhow::Result<()> {
        Ok(())
    }

    fn create_stream(&self, device: DeviceId) -> anyhow::Result<StreamHandle>;

    /// Release the stream after its queued work finishes.
    fn destroy_stream(&self, stream: StreamHandle) -> anyhow::Result<()>;

    /// Block until all work queued on `stream` has completed.
    fn synchronize(&self, stream: &StreamHandle) -> anyhow::Result<()>;

    fn malloc(&self, device: DeviceId, bytes: usize) -> anyhow::Result<DevicePtr>;

    fn free(&self, device: DeviceId, ptr: DevicePtr) -> anyhow::Result<()>;

    fn malloc_pinned(&self, _bytes: usize) -> anyhow::Result<DevicePtr> {
        unsupported("pinned host allocation")
    }

    fn free_pinned(&self, _ptr: DevicePtr) -> anyhow::Result<()> {
        unsupported("pinned host free")
    }

    fn memcpy(
        &self,
        stream: &StreamHandle,
        dst: DevicePtr,
        src: DevicePtr,
        bytes: usize,
        kind: MemcpyKind,
    ) -> anyhow::Result<()>;

    fn axpy(&self, _stream: &StreamHandle, _args: &AxpyArgs) -> anyhow::Result<()> {
        unsupported("axpy")
    }

    fn scal(&self, _stream: &StreamHandle, _args: &ScalArgs) -> anyhow::Result<()> {
        unsupported("scal")
    }

    fn copy(&self, _stream: &StreamHandle, _args: &VectorPairArgs) -> anyhow::Result<()> {
        unsupported("copy")
    }

    fn swap(&self, _stream: &StreamHandle, _args: &VectorPairArgs) -> anyhow::Result<()> {
        unsupported("swap")
    }

    /// Writes the result to `args.result`; valid after the stream synchronizes.
    fn dot(&self, _stream: &StreamHandle, _args: &DotArgs) -> anyhow::Result<()> {
        unsupported("dot")
    }

    fn nrm2(&self, _stream: &StreamHandle, _args: &ReductionArgs) -> anyhow::Result<()> {
        unsupported("nrm2")
    }

    fn asum(&self, _stream: &StreamHandle, _args: &ReductionArgs) -> anyhow::Result<()> {
        unsupported("asum")
    }

    fn iamax(&self, _stream: &StreamHandle, _args: &ReductionArgs) -> anyhow::Result<()> {
        unsupported("iamax")
    }

    fn gemv(&self, _stream: &StreamHandle, _args: &GemvArgs) -> anyhow::Result<()> {
        unsupported("gemv")
    }

    fn ger(&self, _stream: &StreamHandle, _args: &GerArgs) -> anyhow::Result<()> {
        unsupported("ger")
    }

    fn gemm(&self, _stream: &StreamHandle, _args: &GemmArgs) -> anyhow::Result<()> {
        unsupported("gemm")
    }

    fn symm(&self, _stream: &StreamHandle, _args: &SymmArgs) -> anyhow::Result<()> {
        unsupported("symm")
    }

    fn syrk(&self, _stream: &StreamHandle, _args: &RankKArgs) -> anyhow::Result<()> {
        unsupported("syrk")
    }

    fn syr2k(&self, _stream: &StreamHandle, _args: &Rank2KArgs) -> anyhow::Result<()> {
        unsupported("syr2k")
    }

    fn trmm(&self, _stream: &StreamHandle, _args: &TriangularArgs) -> anyhow::Result<()> {
        unsupported("trmm")
    }

    fn trsm(&self, _stream: &StreamHandle, _args: &TriangularArgs) -> anyhow::Result<()> {
        unsupported("trsm")
    }
}

static GLOBAL_PROVIDER: Lazy<RwLock<Option<&'static dyn DeviceBlasProvider>>> =
    Lazy::new(|| RwLock::new(None));

/// Register the process-wide provider, replacing any previous one.
pub fn register_provider(p: &'static dyn DeviceBlasProvider) {
    if let Ok(mut guard) = GLOBAL_PROVIDER.write() {
        if let Some(prev) = guard.as_ref() {
            log::warn!(
                "unblas: replacing device provider '{}' with '{}'",
                prev.name(),
                p.name()
            );
        }
        *guard = Some(p);
    }
}

pub fn provider() -> Option<&'static dyn DeviceBlasProvider> {
    GLOBAL_PROVIDER
        .read()
        .ok()
        .and_then(|guard| guard.as_ref().copied())
}

pub fn clear_provider() {
    if let Ok(mut guard) = GLOBAL_PROVIDER.write() {
        *guard = None;
    }
}

/// Visible device count; 0 when no provider is registered.
pub fn device_count() -> usize {
    provider().map(|p| p.device_count()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullProvider;

    impl DeviceBlasProvider for NullProvider {
        fn kind(&self) -> DeviceKind {
            DeviceKind::InProcess
        }
        fn name(&self) -> &str {
            "null"
        }
        fn device_count(&self) -> usize {
            3
        }
        fn create_stream(&self, device: DeviceId) -> anyhow::Result<StreamHandle> {
            Ok(StreamHandle { device, id: 1 })
        }
        fn destroy_stream(&self, _stream: StreamHandle) -> anyhow::Result<()> {
            Ok(())
        }
        fn synchronize(&self, _stream: &StreamHandle) -> anyhow::Result<()> {
            Ok(())
        }
        fn malloc(&self, _device: DeviceId, _bytes: usize) -> anyhow::Result<DevicePtr> {
            Ok(DevicePtr::null())
        }
        fn free(&self, _device: DeviceId, _ptr: DevicePtr) -> anyhow::Result<()> {
            Ok(())
        }
        fn memcpy(
            &self,
            _stream: &StreamHandle,
            _dst: DevicePtr,
            _src: DevicePtr,
            _bytes: usize,
            _kind: MemcpyKind,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    static NULL: NullProvider = NullProvider;

    #[test]
    fn registry_round_trip() {
        clear_provider();
        assert_eq!(device_count(), 0);
        register_provider(&NULL);
        assert_eq!(device_count(), 3);
        assert_eq!(provider().map(|p| p.name().to_string()).as_deref(), Some("null"));
        clear_provider();
        assert!(provider().is_none());
    }

    #[test]
    fn default_kernels_report_unsupported() {
        let stream = StreamHandle { device: 0, id: 1 };
        let args = ScalArgs {
            precision: unblas_abi::Precision::Double,
            n: 0,
            alpha: unblas_abi::ScalarValue::Double(1.0),
            x: DevicePtr::null(),
            incx: 1,
        };
        let err = NULL.scal(&stream, &args).unwrap_err();
        assert_eq!(err.downcast_ref::<Unsupported>(), Some(&Unsupported("scal")));
        assert_eq!(err.to_string(), "scal not supported by provider");
    }

    #[test]
    fn device_ptr_offsets_by_bytes() {
        let base = DevicePtr(16usize as *mut c_void);
        assert_eq!(base.byte_add(8).0 as usize, 24);
        assert!(DevicePtr::null().is_null());
    }
}
