//! HIP runtime + rocBLAS.

use super::vendor::{BlasSymbols, RuntimeSymbols, VendorProvider, VendorSpec};
use anyhow::Result;
use once_cell::sync::OnceCell;
use unblas_abi::KernelDescriptor;
use unblas_accelerate_api::DeviceKind;

fn rocblas_symbol(desc: &KernelDescriptor) -> String {
    format!("rocblas_{}", desc.name())
}

pub static ROCM: VendorSpec = VendorSpec {
    kind: DeviceKind::Rocm,
    name: "rocm",
    vendor: "AMD",
    runtime_libraries: &["libamdhip64.so", "libamdhip64.so.6", "libamdhip64.so.5"],
    blas_libraries: &["librocblas.so", "librocblas.so.4", "librocblas.so.3"],
    runtime: RuntimeSymbols {
        get_device_count: "hipGetDeviceCount",
        set_device: "hipSetDevice",
        stream_create: "hipStreamCreate",
        stream_destroy: "hipStreamDestroy",
        stream_synchronize: "hipStreamSynchronize",
        malloc: "hipMalloc",
        free: "hipFree",
        malloc_host: "hipHostMalloc",
        malloc_host_takes_flags: true,
        free_host: "hipHostFree",
        memcpy_async: "hipMemcpyAsync",
        error_string: "hipGetErrorString",
    },
    blas: BlasSymbols {
        create: "rocblas_create_handle",
        destroy: "rocblas_destroy_handle",
        set_stream: "rocblas_set_stream",
        set_pointer_mode: "rocblas_set_pointer_mode",
        pointer_mode_host: 0,
        pointer_mode_device: 1,
        op: [111, 112, 113],
        fill: [121, 122],
        diag: [131, 132],
        side: [141, 142],
        kernel_symbol: rocblas_symbol,
    },
};

static INSTANCE: OnceCell<VendorProvider> = OnceCell::new();

/// Load HIP and rocBLAS and register them as the device provider.
pub fn register_rocm_provider() -> Result<()> {
    let provider = INSTANCE.get_or_try_init(|| VendorProvider::load(&ROCM))?;
    unblas_accelerate_api::register_provider(provider);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use unblas_abi::{Operation, Precision};

    #[test]
    fn kernel_symbols() {
        let desc = KernelDescriptor::new(Operation::Asum, Precision::ComplexDouble).unwrap();
        assert_eq!(rocblas_symbol(&desc), "rocblas_dzasum");
        let desc = KernelDescriptor::new(Operation::Ger, Precision::ComplexSingle).unwrap();
        assert_eq!(rocblas_symbol(&desc), "rocblas_cgerc");
    }
}
