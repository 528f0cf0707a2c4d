use crate::reference;
use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use std::alloc::{alloc_zeroed, dealloc, Layout};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;
use unblas_abi::{Complex32, Complex64, FortranScalar, Precision, ScalarValue};
use unblas_accelerate_api::{
    ApiDeviceInfo, AxpyArgs, DeviceBlasProvider, DeviceId, DeviceInt, DeviceKind, DevicePtr,
    DotArgs, GemmArgs, GemvArgs, GerArgs, MemcpyKind, ReductionArgs, ScalArgs, StreamHandle,
    VectorPairArgs,
};

/// Number of simulated devices.
pub const INPROCESS_DEVICES: usize = 2;

const ALIGNMENT: usize = 64;

type Job = Box<dyn FnOnce() + Send + 'static>;

thread_local! {
    // Mirrors the per-thread current device of GPU runtimes.
    static CURRENT_DEVICE: Cell<DeviceId> = Cell::new(0);
}

/// Device the calling thread last selected with `set_device`.
pub fn current_device() -> DeviceId {
    CURRENT_DEVICE.with(|d| d.get())
}

/// Expands `$body` once per precision with `$t` bound to the element type.
macro_rules! with_precision {
    ($precision:expr, $t:ident => $body:expr) => {
        match $precision {
            Precision::Single => {
                type $t = f32;
                $body
            }
            Precision::Double => {
                type $t = f64;
                $body
            }
            Precision::ComplexSingle => {
                type $t = Complex32;
                $body
            }
            Precision::ComplexDouble => {
                type $t = Complex64;
                $body
            }
        }
    };
}

struct StreamWorker {
    device: DeviceId,
    sender: Sender<Job>,
    handle: JoinHandle<()>,
}

struct Allocation {
    layout: Layout,
    /// `None` for pinned host memory.
    device: Option<DeviceId>,
}

/// Device BLAS provider that executes on the host.
///
/// Device memory is host heap memory and each stream is a worker thread
/// draining a FIFO of jobs, so asynchronous ordering, synchronization and
/// device binding behave like a GPU runtime without one.
pub struct InProcessProvider {
    devices: usize,
    next_id: AtomicU64,
    streams: Mutex<HashMap<u64, StreamWorker>>,
    allocations: Mutex<HashMap<usize, Allocation>>,
}

impl InProcessProvider {
    pub fn new() -> Self {
        Self::with_devices(INPROCESS_DEVICES)
    }

    pub fn with_devices(devices: usize) -> Self {
        Self {
            devices,
            next_id: AtomicU64::new(1),
            streams: Mutex::new(HashMap::new()),
            allocations: Mutex::new(HashMap::new()),
        }
    }

    fn check_device(&self, device: DeviceId) -> Result<()> {
        if device < 0 || device as usize >= self.devices {
            return Err(anyhow!(
                "invalid device ordinal {device} ({} devices)",
                self.devices
            ));
        }
        Ok(())
    }

    fn check_current(&self, device: DeviceId) -> Result<()> {
        let current = current_device();
        if current != device {
            return Err(anyhow!(
                "device {device} addressed while device {current} is current"
            ));
        }
        Ok(())
    }

    fn sender(&self, stream: &StreamHandle) -> Result<Sender<Job>> {
        let streams = self
            .streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?;
        let worker = streams
            .get(&stream.id)
            .ok_or_else(|| anyhow!("unknown stream {}", stream.id))?;
        Ok(worker.sender.clone())
    }

    /// Queue `job` behind all earlier work on `stream`.
    fn enqueue<F>(&self, stream: &StreamHandle, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.check_current(stream.device)?;
        self.sender(stream)?
            .send(Box::new(job))
            .map_err(|_| anyhow!("stream {} worker terminated", stream.id))
    }

    fn drain(sender: &Sender<Job>, id: u64) -> Result<()> {
        let (tx, rx) = mpsc::channel::<()>();
        sender
            .send(Box::new(move || {
                let _ = tx.send(());
            }))
            .map_err(|_| anyhow!("stream {id} worker terminated"))?;
        rx.recv()
            .map_err(|_| anyhow!("stream {id} worker terminated before synchronizing"))
    }

    fn drain_device(&self, device: Option<DeviceId>) -> Result<()> {
        let senders: Vec<(u64, Sender<Job>)> = self
            .streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?
            .iter()
            .filter(|(_, w)| device.map_or(true, |d| w.device == d))
            .map(|(id, w)| (*id, w.sender.clone()))
            .collect();
        for (id, sender) in senders {
            Self::drain(&sender, id)?;
        }
        Ok(())
    }

    fn allocate(&self, bytes: usize, device: Option<DeviceId>) -> Result<DevicePtr> {
        let layout = Layout::from_size_align(bytes.max(1), ALIGNMENT)
            .map_err(|e| anyhow!("invalid allocation of {bytes} bytes: {e}"))?;
        let ptr = unsafe { alloc_zeroed(layout) };
        if ptr.is_null() {
            return Err(anyhow!("out of memory allocating {bytes} bytes"));
        }
        self.allocations
            .lock()
            .map_err(|_| anyhow!("allocation registry poisoned"))?
            .insert(ptr as usize, Allocation { layout, device });
        Ok(DevicePtr(ptr.cast()))
    }

    fn release(&self, ptr: DevicePtr, device: Option<DeviceId>) -> Result<()> {
        if ptr.is_null() {
            return Ok(());
        }
        // Frees wait for in-flight work, as GPU runtimes do.
        self.drain_device(device)?;
        let mut allocations = self
            .allocations
            .lock()
            .map_err(|_| anyhow!("allocation registry poisoned"))?;
        let key = ptr.0 as usize;
        match allocations.get(&key) {
            Some(a) if a.device == device => {}
            Some(_) => return Err(anyhow!("pointer {key:#x} freed through the wrong space")),
            None => return Err(anyhow!("pointer {key:#x} was not allocated by this provider")),
        }
        if let Some(a) = allocations.remove(&key) {
            unsafe { dealloc(ptr.cast(), a.layout) };
        }
        Ok(())
    }
}

impl Default for InProcessProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn scalar<T: FortranScalar>(value: ScalarValue) -> Result<T> {
    T::from_value(value).ok_or_else(|| {
        anyhow!(
            "scalar of precision {:?} passed to a {:?} kernel",
            value.precision(),
            T::PRECISION
        )
    })
}

impl DeviceBlasProvider for InProcessProvider {
    fn kind(&self) -> DeviceKind {
        DeviceKind::InProcess
    }

    fn name(&self) -> &str {
        "in-process"
    }

    fn device_count(&self) -> usize {
        self.devices
    }

    fn device_info(&self, device: DeviceId) -> ApiDeviceInfo {
        ApiDeviceInfo {
            device_id: device,
            name: format!("in-process device {device}"),
            vendor: "unblas".to_string(),
            memory_bytes: None,
            backend: Some("in-process".to_string()),
        }
    }

    fn set_device(&self, device: DeviceId) -> Result<()> {
        self.check_device(device)?;
        CURRENT_DEVICE.with(|d| d.set(device));
        Ok(())
    }

    fn create_stream(&self, device: DeviceId) -> Result<StreamHandle> {
        self.check_device(device)?;
        self.check_current(device)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel::<Job>();
        let handle = std::thread::Builder::new()
            .name(format!("unblas-stream-{id}"))
            .spawn(move || {
                for job in receiver {
                    job();
                }
            })
            .map_err(|e| anyhow!("failed to spawn stream worker: {e}"))?;
        self.streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?
            .insert(
                id,
                StreamWorker {
                    device,
                    sender,
                    handle,
                },
            );
        log::debug!("in-process provider: stream {id} created on device {device}");
        Ok(StreamHandle { device, id })
    }

    fn destroy_stream(&self, stream: StreamHandle) -> Result<()> {
        let worker = self
            .streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?
            .remove(&stream.id)
            .ok_or_else(|| anyhow!("unknown stream {}", stream.id))?;
        // Closing the channel lets the worker finish queued jobs and exit.
        drop(worker.sender);
        worker
            .handle
            .join()
            .map_err(|_| anyhow!("stream {} worker panicked", stream.id))
    }

    fn synchronize(&self, stream: &StreamHandle) -> Result<()> {
        let sender = self.sender(stream)?;
        Self::drain(&sender, stream.id)
    }

    fn malloc(&self, device: DeviceId, bytes: usize) -> Result<DevicePtr> {
        self.check_device(device)?;
        self.check_current(device)?;
        self.allocate(bytes, Some(device))
    }

    fn free(&self, device: DeviceId, ptr: DevicePtr) -> Result<()> {
        self.check_current(device)?;
        self.release(ptr, Some(device))
    }

    fn malloc_pinned(&self, bytes: usize) -> Result<DevicePtr> {
        self.allocate(bytes, None)
    }

    fn free_pinned(&self, ptr: DevicePtr) -> Result<()> {
        self.release(ptr, None)
    }

    fn memcpy(
        &self,
        stream: &StreamHandle,
        dst: DevicePtr,
        src: DevicePtr,
        bytes: usize,
        kind: MemcpyKind,
    ) -> Result<()> {
        if bytes == 0 {
            return Ok(());
        }
        match kind {
            MemcpyKind::HostToDevice => {
                let staged =
                    unsafe { std::slice::from_raw_parts(src.cast::<u8>() as *const u8, bytes) }
                        .to_vec();
                self.enqueue(stream, move || unsafe {
                    std::ptr::copy_nonoverlapping(staged.as_ptr(), dst.cast::<u8>(), bytes);
                })
            }
            MemcpyKind::DeviceToHost => {
                self.check_current(stream.device)?;
                self.synchronize(stream)?;
                unsafe {
                    std::ptr::copy_nonoverlapping(
                        src.cast::<u8>() as *const u8,
                        dst.cast::<u8>(),
                        bytes,
                    )
                };
                Ok(())
            }
            MemcpyKind::DeviceToDevice => self.enqueue(stream, move || unsafe {
                std::ptr::copy(src.cast::<u8>() as *const u8, dst.cast::<u8>(), bytes);
            }),
        }
    }

    fn axpy(&self, stream: &StreamHandle, args: &AxpyArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            let alpha = scalar::<T>(a.alpha)?;
            self.enqueue(stream, move || unsafe {
                reference::axpy::<T>(a.n, alpha, a.x.cast(), a.incx, a.y.cast(), a.incy)
            })
        })
    }

    fn scal(&self, stream: &StreamHandle, args: &ScalArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            let alpha = scalar::<T>(a.alpha)?;
            self.enqueue(stream, move || unsafe {
                reference::scal::<T>(a.n, alpha, a.x.cast(), a.incx)
            })
        })
    }

    fn copy(&self, stream: &StreamHandle, args: &VectorPairArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            self.enqueue(stream, move || unsafe {
                reference::copy::<T>(a.n, a.x.cast(), a.incx, a.y.cast(), a.incy)
            })
        })
    }

    fn swap(&self, stream: &StreamHandle, args: &VectorPairArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            self.enqueue(stream, move || unsafe {
                reference::swap::<T>(a.n, a.x.cast(), a.incx, a.y.cast(), a.incy)
            })
        })
    }

    fn dot(&self, stream: &StreamHandle, args: &DotArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            self.enqueue(stream, move || unsafe {
                let r = reference::dot::<T>(a.conjugate, a.n, a.x.cast(), a.incx, a.y.cast(), a.incy);
                *a.result.cast::<T>() = r;
            })
        })
    }

    fn nrm2(&self, stream: &StreamHandle, args: &ReductionArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            self.enqueue(stream, move || unsafe {
                let r = reference::nrm2::<T>(a.n, a.x.cast(), a.incx);
                *a.result.cast::<<T as FortranScalar>::Real>() = r;
            })
        })
    }

    fn asum(&self, stream: &StreamHandle, args: &ReductionArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            self.enqueue(stream, move || unsafe {
                let r = reference::asum::<T>(a.n, a.x.cast(), a.incx);
                *a.result.cast::<<T as FortranScalar>::Real>() = r;
            })
        })
    }

    fn iamax(&self, stream: &StreamHandle, args: &ReductionArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            self.enqueue(stream, move || unsafe {
                let r = reference::iamax::<T>(a.n, a.x.cast(), a.incx);
                *a.result.cast::<DeviceInt>() = r;
            })
        })
    }

    fn gemv(&self, stream: &StreamHandle, args: &GemvArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            let alpha = scalar::<T>(a.alpha)?;
            let beta = scalar::<T>(a.beta)?;
            self.enqueue(stream, move || unsafe {
                reference::gemv::<T>(
                    a.trans, a.m, a.n, alpha, a.a.cast(), a.lda, a.x.cast(), a.incx, beta,
                    a.y.cast(), a.incy,
                )
            })
        })
    }

    fn ger(&self, stream: &StreamHandle, args: &GerArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            let alpha = scalar::<T>(a.alpha)?;
            self.enqueue(stream, move || unsafe {
                reference::ger::<T>(
                    a.conjugate, a.m, a.n, alpha, a.x.cast(), a.incx, a.y.cast(), a.incy,
                    a.a.cast(), a.lda,
                )
            })
        })
    }

    fn gemm(&self, stream: &StreamHandle, args: &GemmArgs) -> Result<()> {
        let a = *args;
        with_precision!(a.precision, T => {
            let alpha = scalar::<T>(a.alpha)?;
            let beta = scalar::<T>(a.beta)?;
            self.enqueue(stream, move || unsafe {
                reference::gemm::<T>(
                    a.transa, a.transb, a.m, a.n, a.k, alpha, a.a.cast(), a.lda, a.b.cast(),
                    a.ldb, beta, a.c.cast(), a.ldc,
                )
            })
        })
    }
}

static INSTANCE: OnceCell<InProcessProvider> = OnceCell::new();

/// Register the in-process provider as the global device provider.
/// Every call (re)installs the same process-wide instance.
pub fn register_inprocess_provider() {
    let provider: &'static InProcessProvider = INSTANCE.get_or_init(InProcessProvider::new);
    let installed = unblas_accelerate_api::provider()
        .map(|p| p as *const dyn DeviceBlasProvider as *const ())
        == Some(provider as *const InProcessProvider as *const ());
    if !installed {
        unblas_accelerate_api::register_provider(provider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> InProcessProvider {
        InProcessProvider::with_devices(2)
    }

    #[test]
    fn stream_runs_jobs_in_order() {
        let p = provider();
        p.set_device(0).unwrap();
        let stream = p.create_stream(0).unwrap();
        let x = p.malloc(0, 3 * 8).unwrap();
        let host = [1.0f64, 2.0, 3.0];
        p.memcpy(&stream, x, DevicePtr(host.as_ptr() as *mut _), 24, MemcpyKind::HostToDevice)
            .unwrap();
        p.scal(
            &stream,
            &ScalArgs {
                precision: Precision::Double,
                n: 3,
                alpha: ScalarValue::Double(2.0),
                x,
                incx: 1,
            },
        )
        .unwrap();
        let mut out = [0.0f64; 3];
        p.memcpy(&stream, DevicePtr(out.as_mut_ptr().cast()), x, 24, MemcpyKind::DeviceToHost)
            .unwrap();
        assert_eq!(out, [2.0, 4.0, 6.0]);
        p.free(0, x).unwrap();
        p.destroy_stream(stream).unwrap();
    }

    #[test]
    fn launch_requires_bound_device() {
        let p = provider();
        p.set_device(1).unwrap();
        let stream = p.create_stream(1).unwrap();
        p.set_device(0).unwrap();
        let err = p.synchronize(&stream).and_then(|_| {
            p.copy(
                &stream,
                &VectorPairArgs {
                    precision: Precision::Single,
                    n: 0,
                    x: DevicePtr::null(),
                    incx: 1,
                    y: DevicePtr::null(),
                    incy: 1,
                },
            )
        });
        assert!(err.unwrap_err().to_string().contains("device 1 addressed"));
        p.destroy_stream(stream).unwrap();
    }

    #[test]
    fn scalar_precision_mismatch_is_rejected_before_enqueue() {
        let p = provider();
        p.set_device(0).unwrap();
        let stream = p.create_stream(0).unwrap();
        let err = p
            .scal(
                &stream,
                &ScalArgs {
                    precision: Precision::Single,
                    n: 0,
                    alpha: ScalarValue::Double(1.0),
                    x: DevicePtr::null(),
                    incx: 1,
                },
            )
            .unwrap_err();
        assert!(err.to_string().contains("precision"));
        p.destroy_stream(stream).unwrap();
    }

    #[test]
    fn invalid_device_and_foreign_free() {
        let p = provider();
        assert!(p.set_device(2).is_err());
        assert!(p.create_stream(-1).is_err());
        p.set_device(0).unwrap();
        let bogus = DevicePtr(0x1000 as *mut _);
        assert!(p.free(0, bogus).is_err());
        let pinned = p.malloc_pinned(16).unwrap();
        assert!(p.free(0, pinned).is_err());
        p.free_pinned(pinned).unwrap();
    }
}
