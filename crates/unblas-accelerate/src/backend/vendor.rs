//! Shared provider over a CUDA-style runtime and its BLAS library.
//!
//! cuBLAS and rocBLAS expose the same call shapes (handle first, enums and
//! `int` sizes by value, scalars by pointer), as do the CUDA and HIP runtime
//! APIs. A [`VendorSpec`] supplies the symbol names and enum values; the
//! provider resolves everything through `libloading`.

use anyhow::{anyhow, Context, Result};
use libloading::Library;
use std::collections::HashMap;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int, c_uint, c_void};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use unblas_abi::{Diag, KernelDescriptor, Operation, Precision, ScalarValue, Side, Transpose, Uplo};
use unblas_accelerate_api::{
    ApiDeviceInfo, AxpyArgs, DeviceBlasProvider, DeviceId, DeviceKind, DevicePtr, DotArgs,
    GemmArgs, GemvArgs, GerArgs, MemcpyKind, Rank2KArgs, RankKArgs, ReductionArgs, ScalArgs,
    StreamHandle, SymmArgs, TriangularArgs, VectorPairArgs,
};

type Handle = *mut c_void;
type Ptr = *const c_void;
type MutPtr = *mut c_void;

type CountFn = unsafe extern "C" fn(*mut c_int) -> c_int;
type SetDeviceFn = unsafe extern "C" fn(c_int) -> c_int;
type CreateFn = unsafe extern "C" fn(*mut Handle) -> c_int;
type HandleFn = unsafe extern "C" fn(Handle) -> c_int;
type MallocFn = unsafe extern "C" fn(*mut MutPtr, usize) -> c_int;
type HostMallocFlagsFn = unsafe extern "C" fn(*mut MutPtr, usize, c_uint) -> c_int;
type FreeFn = unsafe extern "C" fn(MutPtr) -> c_int;
type MemcpyAsyncFn = unsafe extern "C" fn(MutPtr, Ptr, usize, c_int, Handle) -> c_int;
type ErrorStringFn = unsafe extern "C" fn(c_int) -> *const c_char;
type SetStreamFn = unsafe extern "C" fn(Handle, Handle) -> c_int;
type PointerModeFn = unsafe extern "C" fn(Handle, c_int) -> c_int;

type AxpyFn = unsafe extern "C" fn(Handle, c_int, Ptr, Ptr, c_int, MutPtr, c_int) -> c_int;
type ScalFn = unsafe extern "C" fn(Handle, c_int, Ptr, MutPtr, c_int) -> c_int;
type PairFn = unsafe extern "C" fn(Handle, c_int, MutPtr, c_int, MutPtr, c_int) -> c_int;
type DotFn = unsafe extern "C" fn(Handle, c_int, Ptr, c_int, Ptr, c_int, MutPtr) -> c_int;
type ReduceFn = unsafe extern "C" fn(Handle, c_int, Ptr, c_int, MutPtr) -> c_int;
type GemvFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    Ptr,
    c_int,
    Ptr,
    MutPtr,
    c_int,
) -> c_int;
type GerFn =
    unsafe extern "C" fn(Handle, c_int, c_int, Ptr, Ptr, c_int, Ptr, c_int, MutPtr, c_int) -> c_int;
type GemmFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    Ptr,
    c_int,
    Ptr,
    MutPtr,
    c_int,
) -> c_int;
type SymmFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    Ptr,
    c_int,
    Ptr,
    MutPtr,
    c_int,
) -> c_int;
type SyrkFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    Ptr,
    MutPtr,
    c_int,
) -> c_int;
type Syr2kFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    Ptr,
    c_int,
    Ptr,
    MutPtr,
    c_int,
) -> c_int;
/// Out-of-place triangular multiply; called with `C == B`.
type TrmmFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    Ptr,
    c_int,
    MutPtr,
    c_int,
) -> c_int;
type TrsmFn = unsafe extern "C" fn(
    Handle,
    c_int,
    c_int,
    c_int,
    c_int,
    c_int,
    c_int,
    Ptr,
    Ptr,
    c_int,
    MutPtr,
    c_int,
) -> c_int;

/// Runtime API symbol names.
pub struct RuntimeSymbols {
    pub get_device_count: &'static str,
    pub set_device: &'static str,
    pub stream_create: &'static str,
    pub stream_destroy: &'static str,
    pub stream_synchronize: &'static str,
    pub malloc: &'static str,
    pub free: &'static str,
    pub malloc_host: &'static str,
    /// `hipHostMalloc` takes a trailing flags argument, `cudaMallocHost` does not.
    pub malloc_host_takes_flags: bool,
    pub free_host: &'static str,
    pub memcpy_async: &'static str,
    pub error_string: &'static str,
}

/// BLAS library symbol names and enum encodings.
pub struct BlasSymbols {
    pub create: &'static str,
    pub destroy: &'static str,
    pub set_stream: &'static str,
    pub set_pointer_mode: &'static str,
    pub pointer_mode_host: c_int,
    pub pointer_mode_device: c_int,
    /// `[N, T, C]`
    pub op: [c_int; 3],
    /// `[upper, lower]`
    pub fill: [c_int; 2],
    /// `[non-unit, unit]`
    pub diag: [c_int; 2],
    /// `[left, right]`
    pub side: [c_int; 2],
    pub kernel_symbol: fn(&KernelDescriptor) -> String,
}

pub struct VendorSpec {
    pub kind: DeviceKind,
    pub name: &'static str,
    pub vendor: &'static str,
    pub runtime_libraries: &'static [&'static str],
    pub blas_libraries: &'static [&'static str],
    pub runtime: RuntimeSymbols,
    pub blas: BlasSymbols,
}

/// `cudaMemcpyKind` / `hipMemcpyKind`; both runtimes use the same values.
fn memcpy_kind(kind: MemcpyKind) -> c_int {
    match kind {
        MemcpyKind::HostToDevice => 1,
        MemcpyKind::DeviceToHost => 2,
        MemcpyKind::DeviceToDevice => 3,
    }
}

struct Runtime {
    _library: Library,
    get_device_count: CountFn,
    set_device: SetDeviceFn,
    stream_create: CreateFn,
    stream_destroy: HandleFn,
    stream_synchronize: HandleFn,
    malloc: MallocFn,
    free: FreeFn,
    malloc_host: MutPtr,
    free_host: FreeFn,
    memcpy_async: MemcpyAsyncFn,
    error_string: ErrorStringFn,
}

struct NativeStream {
    stream: Handle,
    blas: Handle,
}

/// Provider over one runtime + BLAS pair.
pub struct VendorProvider {
    spec: &'static VendorSpec,
    runtime: Runtime,
    blas: Library,
    blas_path: String,
    devices: usize,
    next_id: AtomicU64,
    streams: Mutex<HashMap<u64, NativeStream>>,
}

// Raw runtime handles are only used through the runtime's thread-safe API.
unsafe impl Send for VendorProvider {}
unsafe impl Sync for VendorProvider {}

fn open_first(candidates: &[&str]) -> Result<(Library, String)> {
    let mut errors = Vec::new();
    for name in candidates {
        match unsafe { Library::new(name) } {
            Ok(lib) => return Ok((lib, name.to_string())),
            Err(e) => errors.push(format!("{name}: {e}")),
        }
    }
    Err(anyhow!("no library could be loaded ({})", errors.join("; ")))
}

unsafe fn symbol<F: Copy>(library: &Library, name: &str) -> Result<F> {
    let sym = library
        .get::<F>(name.as_bytes())
        .with_context(|| format!("symbol '{name}' not found"))?;
    Ok(*sym)
}

impl VendorProvider {
    pub fn load(spec: &'static VendorSpec) -> Result<Self> {
        let (rt_lib, rt_path) = open_first(spec.runtime_libraries)
            .with_context(|| format!("{} runtime unavailable", spec.name))?;
        let (blas, blas_path) = open_first(spec.blas_libraries)
            .with_context(|| format!("{} BLAS library unavailable", spec.name))?;
        let s = &spec.runtime;
        let runtime = unsafe {
            Runtime {
                get_device_count: symbol(&rt_lib, s.get_device_count)?,
                set_device: symbol(&rt_lib, s.set_device)?,
                stream_create: symbol(&rt_lib, s.stream_create)?,
                stream_destroy: symbol(&rt_lib, s.stream_destroy)?,
                stream_synchronize: symbol(&rt_lib, s.stream_synchronize)?,
                malloc: symbol(&rt_lib, s.malloc)?,
                free: symbol(&rt_lib, s.free)?,
                malloc_host: symbol::<MutPtr>(&rt_lib, s.malloc_host)?,
                free_host: symbol(&rt_lib, s.free_host)?,
                memcpy_async: symbol(&rt_lib, s.memcpy_async)?,
                error_string: symbol(&rt_lib, s.error_string)?,
                _library: rt_lib,
            }
        };
        let mut count: c_int = 0;
        let status = unsafe { (runtime.get_device_count)(&mut count) };
        let devices = if status == 0 { count.max(0) as usize } else { 0 };
        log::debug!(
            "{}: runtime '{}', BLAS '{}', {} device(s)",
            spec.name,
            rt_path,
            blas_path,
            devices
        );
        Ok(Self {
            spec,
            runtime,
            blas,
            blas_path,
            devices,
            next_id: AtomicU64::new(1),
            streams: Mutex::new(HashMap::new()),
        })
    }

    fn runtime_error(&self, call: &str, status: c_int) -> anyhow::Error {
        let text = unsafe {
            let ptr = (self.runtime.error_string)(status);
            if ptr.is_null() {
                String::new()
            } else {
                CStr::from_ptr(ptr).to_string_lossy().into_owned()
            }
        };
        anyhow!("{call} failed with status {status}: {text}")
    }

    fn check_rt(&self, call: &str, status: c_int) -> Result<()> {
        if status == 0 {
            Ok(())
        } else {
            Err(self.runtime_error(call, status))
        }
    }

    fn check_blas(call: &str, status: c_int) -> Result<()> {
        if status == 0 {
            Ok(())
        } else {
            Err(anyhow!("{call} failed with status {status}"))
        }
    }

    fn native(&self, stream: &StreamHandle) -> Result<(Handle, Handle)> {
        let streams = self
            .streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?;
        let s = streams
            .get(&stream.id)
            .ok_or_else(|| anyhow!("unknown stream {}", stream.id))?;
        Ok((s.stream, s.blas))
    }

    fn kernel<F: Copy>(&self, op: Operation, precision: Precision) -> Result<(F, String)> {
        let desc = KernelDescriptor::new(op, precision)
            .ok_or_else(|| anyhow!("{op:?} has no {precision:?} kernel"))?;
        let name = (self.spec.blas.kernel_symbol)(&desc);
        let f = unsafe { symbol::<F>(&self.blas, &name) }
            .with_context(|| format!("in '{}'", self.blas_path))?;
        Ok((f, name))
    }

    fn op(&self, t: Transpose) -> c_int {
        self.spec.blas.op[match t {
            Transpose::NoTrans => 0,
            Transpose::Trans => 1,
            Transpose::ConjTrans => 2,
        }]
    }

    fn fill(&self, u: Uplo) -> c_int {
        self.spec.blas.fill[match u {
            Uplo::Upper => 0,
            Uplo::Lower => 1,
        }]
    }

    fn diag(&self, d: Diag) -> c_int {
        self.spec.blas.diag[match d {
            Diag::NonUnit => 0,
            Diag::Unit => 1,
        }]
    }

    fn side(&self, s: Side) -> c_int {
        self.spec.blas.side[match s {
            Side::Left => 0,
            Side::Right => 1,
        }]
    }

    /// Run a reduction whose result pointer is device memory.
    fn with_device_pointer_mode(&self, blas: Handle, call: impl FnOnce() -> Result<()>) -> Result<()> {
        let b = &self.spec.blas;
        let set: PointerModeFn = unsafe { symbol(&self.blas, b.set_pointer_mode)? };
        Self::check_blas(b.set_pointer_mode, unsafe { set(blas, b.pointer_mode_device) })?;
        let result = call();
        Self::check_blas(b.set_pointer_mode, unsafe { set(blas, b.pointer_mode_host) })?;
        result
    }

    fn reduction(&self, stream: &StreamHandle, op: Operation, args: &ReductionArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<ReduceFn>(op, args.precision)?;
        self.with_device_pointer_mode(blas, || {
            Self::check_blas(&name, unsafe {
                f(blas, args.n, args.x.0, args.incx, args.result.0)
            })
        })
    }
}

/// Host address of a scalar argument's payload.
fn scalar_ptr(value: &ScalarValue) -> Ptr {
    match value {
        ScalarValue::Single(v) => v as *const f32 as Ptr,
        ScalarValue::Double(v) => v as *const f64 as Ptr,
        ScalarValue::ComplexSingle(v) => v as *const _ as Ptr,
        ScalarValue::ComplexDouble(v) => v as *const _ as Ptr,
    }
}

impl DeviceBlasProvider for VendorProvider {
    fn kind(&self) -> DeviceKind {
        self.spec.kind
    }

    fn name(&self) -> &str {
        self.spec.name
    }

    fn device_count(&self) -> usize {
        self.devices
    }

    fn device_info(&self, device: DeviceId) -> ApiDeviceInfo {
        ApiDeviceInfo {
            device_id: device,
            name: format!("{} device {device}", self.spec.name),
            vendor: self.spec.vendor.to_string(),
            memory_bytes: None,
            backend: Some(self.spec.name.to_string()),
        }
    }

    fn set_device(&self, device: DeviceId) -> Result<()> {
        let status = unsafe { (self.runtime.set_device)(device) };
        self.check_rt(self.spec.runtime.set_device, status)
    }

    fn create_stream(&self, device: DeviceId) -> Result<StreamHandle> {
        let mut stream: Handle = std::ptr::null_mut();
        let status = unsafe { (self.runtime.stream_create)(&mut stream) };
        self.check_rt(self.spec.runtime.stream_create, status)?;

        let b = &self.spec.blas;
        let mut blas: Handle = std::ptr::null_mut();
        let setup = unsafe {
            let create: CreateFn = symbol(&self.blas, b.create)?;
            let set_stream: SetStreamFn = symbol(&self.blas, b.set_stream)?;
            Self::check_blas(b.create, create(&mut blas))
                .and_then(|_| Self::check_blas(b.set_stream, set_stream(blas, stream)))
        };
        if let Err(e) = setup {
            unsafe { (self.runtime.stream_destroy)(stream) };
            return Err(e);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?
            .insert(id, NativeStream { stream, blas });
        Ok(StreamHandle { device, id })
    }

    fn destroy_stream(&self, stream: StreamHandle) -> Result<()> {
        let native = self
            .streams
            .lock()
            .map_err(|_| anyhow!("stream registry poisoned"))?
            .remove(&stream.id)
            .ok_or_else(|| anyhow!("unknown stream {}", stream.id))?;
        let b = &self.spec.blas;
        let destroy: HandleFn = unsafe { symbol(&self.blas, b.destroy)? };
        Self::check_blas(b.destroy, unsafe { destroy(native.blas) })?;
        let status = unsafe { (self.runtime.stream_destroy)(native.stream) };
        self.check_rt(self.spec.runtime.stream_destroy, status)
    }

    fn synchronize(&self, stream: &StreamHandle) -> Result<()> {
        let (native, _) = self.native(stream)?;
        let status = unsafe { (self.runtime.stream_synchronize)(native) };
        self.check_rt(self.spec.runtime.stream_synchronize, status)
    }

    fn malloc(&self, _device: DeviceId, bytes: usize) -> Result<DevicePtr> {
        let mut ptr: MutPtr = std::ptr::null_mut();
        let status = unsafe { (self.runtime.malloc)(&mut ptr, bytes) };
        self.check_rt(self.spec.runtime.malloc, status)?;
        Ok(DevicePtr(ptr))
    }

    fn free(&self, _device: DeviceId, ptr: DevicePtr) -> Result<()> {
        let status = unsafe { (self.runtime.free)(ptr.0) };
        self.check_rt(self.spec.runtime.free, status)
    }

    fn malloc_pinned(&self, bytes: usize) -> Result<DevicePtr> {
        let mut ptr: MutPtr = std::ptr::null_mut();
        let status = unsafe {
            if self.spec.runtime.malloc_host_takes_flags {
                let f: HostMallocFlagsFn = std::mem::transmute(self.runtime.malloc_host);
                f(&mut ptr, bytes, 0)
            } else {
                let f: MallocFn = std::mem::transmute(self.runtime.malloc_host);
                f(&mut ptr, bytes)
            }
        };
        self.check_rt(self.spec.runtime.malloc_host, status)?;
        Ok(DevicePtr(ptr))
    }

    fn free_pinned(&self, ptr: DevicePtr) -> Result<()> {
        let status = unsafe { (self.runtime.free_host)(ptr.0) };
        self.check_rt(self.spec.runtime.free_host, status)
    }

    fn memcpy(
        &self,
        stream: &StreamHandle,
        dst: DevicePtr,
        src: DevicePtr,
        bytes: usize,
        kind: MemcpyKind,
    ) -> Result<()> {
        let (native, _) = self.native(stream)?;
        let status =
            unsafe { (self.runtime.memcpy_async)(dst.0, src.0, bytes, memcpy_kind(kind), native) };
        self.check_rt(self.spec.runtime.memcpy_async, status)?;
        match kind {
            // Host memory must not be touched by the copy after return.
            MemcpyKind::HostToDevice | MemcpyKind::DeviceToHost => self.synchronize(stream),
            MemcpyKind::DeviceToDevice => Ok(()),
        }
    }

    fn axpy(&self, stream: &StreamHandle, a: &AxpyArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<AxpyFn>(Operation::Axpy, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(blas, a.n, scalar_ptr(&a.alpha), a.x.0, a.incx, a.y.0, a.incy)
        })
    }

    fn scal(&self, stream: &StreamHandle, a: &ScalArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<ScalFn>(Operation::Scal, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(blas, a.n, scalar_ptr(&a.alpha), a.x.0, a.incx)
        })
    }

    fn copy(&self, stream: &StreamHandle, a: &VectorPairArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<PairFn>(Operation::Copy, a.precision)?;
        Self::check_blas(&name, unsafe { f(blas, a.n, a.x.0, a.incx, a.y.0, a.incy) })
    }

    fn swap(&self, stream: &StreamHandle, a: &VectorPairArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<PairFn>(Operation::Swap, a.precision)?;
        Self::check_blas(&name, unsafe { f(blas, a.n, a.x.0, a.incx, a.y.0, a.incy) })
    }

    fn dot(&self, stream: &StreamHandle, a: &DotArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let op = if a.conjugate {
            Operation::Dot
        } else {
            Operation::Dotu
        };
        let (f, name) = self.kernel::<DotFn>(op, a.precision)?;
        self.with_device_pointer_mode(blas, || {
            Self::check_blas(&name, unsafe {
                f(blas, a.n, a.x.0, a.incx, a.y.0, a.incy, a.result.0)
            })
        })
    }

    fn nrm2(&self, stream: &StreamHandle, args: &ReductionArgs) -> Result<()> {
        self.reduction(stream, Operation::Nrm2, args)
    }

    fn asum(&self, stream: &StreamHandle, args: &ReductionArgs) -> Result<()> {
        self.reduction(stream, Operation::Asum, args)
    }

    fn iamax(&self, stream: &StreamHandle, args: &ReductionArgs) -> Result<()> {
        self.reduction(stream, Operation::Iamax, args)
    }

    fn gemv(&self, stream: &StreamHandle, a: &GemvArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<GemvFn>(Operation::Gemv, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.op(a.trans),
                a.m,
                a.n,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                a.x.0,
                a.incx,
                scalar_ptr(&a.beta),
                a.y.0,
                a.incy,
            )
        })
    }

    fn ger(&self, stream: &StreamHandle, a: &GerArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let op = if a.conjugate {
            Operation::Ger
        } else {
            Operation::Geru
        };
        let (f, name) = self.kernel::<GerFn>(op, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                a.m,
                a.n,
                scalar_ptr(&a.alpha),
                a.x.0,
                a.incx,
                a.y.0,
                a.incy,
                a.a.0,
                a.lda,
            )
        })
    }

    fn gemm(&self, stream: &StreamHandle, a: &GemmArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<GemmFn>(Operation::Gemm, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.op(a.transa),
                self.op(a.transb),
                a.m,
                a.n,
                a.k,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                a.b.0,
                a.ldb,
                scalar_ptr(&a.beta),
                a.c.0,
                a.ldc,
            )
        })
    }

    fn symm(&self, stream: &StreamHandle, a: &SymmArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let op = if a.hermitian {
            Operation::Hemm
        } else {
            Operation::Symm
        };
        let (f, name) = self.kernel::<SymmFn>(op, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.side(a.side),
                self.fill(a.uplo),
                a.m,
                a.n,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                a.b.0,
                a.ldb,
                scalar_ptr(&a.beta),
                a.c.0,
                a.ldc,
            )
        })
    }

    fn syrk(&self, stream: &StreamHandle, a: &RankKArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let op = if a.hermitian {
            Operation::Herk
        } else {
            Operation::Syrk
        };
        let (f, name) = self.kernel::<SyrkFn>(op, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.fill(a.uplo),
                self.op(a.trans),
                a.n,
                a.k,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                scalar_ptr(&a.beta),
                a.c.0,
                a.ldc,
            )
        })
    }

    fn syr2k(&self, stream: &StreamHandle, a: &Rank2KArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let op = if a.hermitian {
            Operation::Her2k
        } else {
            Operation::Syr2k
        };
        let (f, name) = self.kernel::<Syr2kFn>(op, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.fill(a.uplo),
                self.op(a.trans),
                a.n,
                a.k,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                a.b.0,
                a.ldb,
                scalar_ptr(&a.beta),
                a.c.0,
                a.ldc,
            )
        })
    }

    fn trmm(&self, stream: &StreamHandle, a: &TriangularArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<TrmmFn>(Operation::Trmm, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.side(a.side),
                self.fill(a.uplo),
                self.op(a.trans),
                self.diag(a.diag),
                a.m,
                a.n,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                a.b.0,
                a.ldb,
                a.b.0,
                a.ldb,
            )
        })
    }

    fn trsm(&self, stream: &StreamHandle, a: &TriangularArgs) -> Result<()> {
        let (_, blas) = self.native(stream)?;
        let (f, name) = self.kernel::<TrsmFn>(Operation::Trsm, a.precision)?;
        Self::check_blas(&name, unsafe {
            f(
                blas,
                self.side(a.side),
                self.fill(a.uplo),
                self.op(a.trans),
                self.diag(a.diag),
                a.m,
                a.n,
                scalar_ptr(&a.alpha),
                a.a.0,
                a.lda,
                a.b.0,
                a.ldb,
            )
        })
    }
}

/// Capitalize the first letter: `sgemm` -> `Sgemm`.
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
