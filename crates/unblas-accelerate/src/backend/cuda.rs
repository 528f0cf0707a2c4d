//! CUDA runtime + cuBLAS.

use super::vendor::{capitalize, BlasSymbols, RuntimeSymbols, VendorProvider, VendorSpec};
use anyhow::Result;
use once_cell::sync::OnceCell;
use unblas_abi::KernelDescriptor;
use unblas_accelerate_api::DeviceKind;

fn cublas_symbol(desc: &KernelDescriptor) -> String {
    format!("cublas{}_v2", capitalize(&desc.name()))
}

pub static CUDA: VendorSpec = VendorSpec {
    kind: DeviceKind::Cuda,
    name: "cuda",
    vendor: "NVIDIA",
    runtime_libraries: &[
        "libcudart.so",
        "libcudart.so.12",
        "libcudart.so.11.0",
        "cudart64_12.dll",
    ],
    blas_libraries: &[
        "libcublas.so",
        "libcublas.so.12",
        "libcublas.so.11",
        "cublas64_12.dll",
    ],
    runtime: RuntimeSymbols {
        get_device_count: "cudaGetDeviceCount",
        set_device: "cudaSetDevice",
        stream_create: "cudaStreamCreate",
        stream_destroy: "cudaStreamDestroy",
        stream_synchronize: "cudaStreamSynchronize",
        malloc: "cudaMalloc",
        free: "cudaFree",
        malloc_host: "cudaMallocHost",
        malloc_host_takes_flags: false,
        free_host: "cudaFreeHost",
        memcpy_async: "cudaMemcpyAsync",
        error_string: "cudaGetErrorString",
    },
    blas: BlasSymbols {
        create: "cublasCreate_v2",
        destroy: "cublasDestroy_v2",
        set_stream: "cublasSetStream_v2",
        set_pointer_mode: "cublasSetPointerMode_v2",
        pointer_mode_host: 0,
        pointer_mode_device: 1,
        op: [0, 1, 2],
        fill: [1, 0],
        diag: [0, 1],
        side: [0, 1],
        kernel_symbol: cublas_symbol,
    },
};

static INSTANCE: OnceCell<VendorProvider> = OnceCell::new();

/// Load the CUDA runtime and cuBLAS and register them as the device provider.
pub fn register_cuda_provider() -> Result<()> {
    let provider = INSTANCE.get_or_try_init(|| VendorProvider::load(&CUDA))?;
    unblas_accelerate_api::register_provider(provider);
    Ok(())
}
