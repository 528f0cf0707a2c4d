//! Typed adapters over the Fortran symbols.
//!
//! Each adapter looks up the kernel's [`CallShape`](crate::CallShape) under
//! the library's profile, declares the matching function-pointer type (with or
//! without trailing hidden lengths, value or hidden-argument complex return,
//! `float` or `double` single-precision return) and performs the call.
//!
//! All adapters are `unsafe`: pointers must be valid for the extents implied
//! by the sizes, strides and leading dimensions passed, and those must already
//! satisfy the reference BLAS argument rules.

pub mod level1;
pub mod level2;
pub mod level3;

pub use level1::*;
pub use level2::*;
pub use level3::*;

use crate::error::AbiError;
use crate::kernel::{KernelDescriptor, Operation, Precision};
use crate::library::NativeBlas;
use crate::shape::CallShape;

pub(crate) fn descriptor(op: Operation, precision: Precision) -> Result<KernelDescriptor, AbiError> {
    KernelDescriptor::new(op, precision).ok_or(AbiError::NoKernel { op, precision })
}

/// Copy the function pointer out of the library symbol.
///
/// # Safety
///
/// `F` must match the symbol's real signature under `lib`'s profile.
pub(crate) unsafe fn function<F: Copy>(
    lib: &NativeBlas,
    desc: &KernelDescriptor,
) -> Result<F, AbiError> {
    let symbol = lib.resolve::<F>(desc)?;
    let f: F = *symbol;
    log::trace!("unblas: resolved {}", lib.profile().symbol(desc));
    Ok(f)
}

pub(crate) fn shape_of(lib: &NativeBlas, desc: &KernelDescriptor) -> CallShape {
    lib.profile().call_shape(desc)
}

/// Whether the call appends hidden lengths; `declared` is how many the
/// adapter's `*LenFn` signature carries.
pub(crate) fn takes_lengths(lib: &NativeBlas, desc: &KernelDescriptor, declared: usize) -> bool {
    let hidden = shape_of(lib, desc).hidden_lengths;
    debug_assert!(
        hidden == 0 || hidden == declared,
        "{} takes {hidden} hidden lengths, adapter declares {declared}",
        desc.name()
    );
    hidden > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AbiProfile;

    // Trailing `usize` parameters in each adapter's length-carrying signature.
    const DECLARED: &[(Operation, usize)] = &[
        (Operation::Gemv, 1),
        (Operation::Symv, 1),
        (Operation::Hemv, 1),
        (Operation::Syr, 1),
        (Operation::Her, 1),
        (Operation::Syr2, 1),
        (Operation::Her2, 1),
        (Operation::Trmv, 3),
        (Operation::Trsv, 3),
        (Operation::Gemm, 2),
        (Operation::Symm, 2),
        (Operation::Hemm, 2),
        (Operation::Syrk, 2),
        (Operation::Herk, 2),
        (Operation::Syr2k, 2),
        (Operation::Her2k, 2),
        (Operation::Trmm, 4),
        (Operation::Trsm, 4),
    ];

    #[test]
    fn adapter_arity_matches_call_shape() {
        let gnu = AbiProfile::gnu();
        for &(op, declared) in DECLARED {
            for p in [
                Precision::Single,
                Precision::Double,
                Precision::ComplexSingle,
                Precision::ComplexDouble,
            ] {
                let Some(desc) = KernelDescriptor::new(op, p) else {
                    continue;
                };
                assert_eq!(gnu.call_shape(&desc).hidden_lengths, declared, "{op:?} {p:?}");
            }
        }
    }
}
