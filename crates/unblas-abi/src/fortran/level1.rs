//! Level 1: vector-vector kernels.

use super::{descriptor, function, shape_of};
use crate::error::AbiError;
use crate::kernel::Operation;
use crate::library::NativeBlas;
use crate::scalar::{BlasInt, FortranScalar, RealScalar};
use crate::shape::{ComplexResult, RealResult};

type Int = *const BlasInt;

type AxpyFn<T> = unsafe extern "C" fn(Int, *const T, *const T, Int, *mut T, Int);
type ScalFn<T> = unsafe extern "C" fn(Int, *const T, *mut T, Int);
type CopyFn<T> = unsafe extern "C" fn(Int, *const T, Int, *mut T, Int);
type SwapFn<T> = unsafe extern "C" fn(Int, *mut T, Int, *mut T, Int);
type DotFn<T, R> = unsafe extern "C" fn(Int, *const T, Int, *const T, Int) -> R;
type DotOutFn<T> = unsafe extern "C" fn(*mut T, Int, *const T, Int, *const T, Int);
type ReduceFn<T, R> = unsafe extern "C" fn(Int, *const T, Int) -> R;
type RotFn<T, R> = unsafe extern "C" fn(Int, *mut T, Int, *mut T, Int, *const R, *const R);
type RotgFn<T, R> = unsafe extern "C" fn(*mut T, *mut T, *mut R, *mut T);
type RotmFn<T> = unsafe extern "C" fn(Int, *mut T, Int, *mut T, Int, *const T);
type RotmgFn<T> = unsafe extern "C" fn(*mut T, *mut T, *mut T, *const T, *mut T);

/// `y := alpha*x + y`
pub unsafe fn axpy<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    alpha: T,
    x: *const T,
    incx: BlasInt,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Axpy, T::PRECISION)?;
    let f = function::<AxpyFn<T>>(lib, &desc)?;
    f(&n, &alpha, x, &incx, y, &incy);
    Ok(())
}

/// `x := alpha*x`
pub unsafe fn scal<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    alpha: T,
    x: *mut T,
    incx: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Scal, T::PRECISION)?;
    let f = function::<ScalFn<T>>(lib, &desc)?;
    f(&n, &alpha, x, &incx);
    Ok(())
}

pub unsafe fn copy<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *const T,
    incx: BlasInt,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Copy, T::PRECISION)?;
    let f = function::<CopyFn<T>>(lib, &desc)?;
    f(&n, x, &incx, y, &incy);
    Ok(())
}

pub unsafe fn swap<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *mut T,
    incx: BlasInt,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Swap, T::PRECISION)?;
    let f = function::<SwapFn<T>>(lib, &desc)?;
    f(&n, x, &incx, y, &incy);
    Ok(())
}

/// Dot product; `conjugate` selects `xdotc` over `xdotu` for complex types.
///
/// The result comes back by value, through a hidden first argument or as a
/// widened `double`, depending on the profile.
pub unsafe fn dot<T: FortranScalar>(
    lib: &NativeBlas,
    conjugate: bool,
    n: BlasInt,
    x: *const T,
    incx: BlasInt,
    y: *const T,
    incy: BlasInt,
) -> Result<T, AbiError> {
    let op = if conjugate {
        Operation::Dot
    } else {
        Operation::Dotu
    };
    let desc = descriptor(op, T::PRECISION)?;
    let shape = shape_of(lib, &desc);
    let value = match (shape.complex_result, shape.real_result) {
        (ComplexResult::HiddenArgument, _) => {
            let f = function::<DotOutFn<T>>(lib, &desc)?;
            let mut out = T::zero();
            f(&mut out, &n, x, &incx, y, &incy);
            out
        }
        (_, RealResult::WidenedDouble) => {
            let f = function::<DotFn<T, f64>>(lib, &desc)?;
            T::from_real(<T::Real as RealScalar>::from_f64(f(&n, x, &incx, y, &incy)))
        }
        _ => {
            let f = function::<DotFn<T, T>>(lib, &desc)?;
            f(&n, x, &incx, y, &incy)
        }
    };
    Ok(value)
}

unsafe fn real_reduction<T: FortranScalar>(
    lib: &NativeBlas,
    op: Operation,
    n: BlasInt,
    x: *const T,
    incx: BlasInt,
) -> Result<T::Real, AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    match shape_of(lib, &desc).real_result {
        RealResult::WidenedDouble => {
            let f = function::<ReduceFn<T, f64>>(lib, &desc)?;
            Ok(<T::Real as RealScalar>::from_f64(f(&n, x, &incx)))
        }
        _ => {
            let f = function::<ReduceFn<T, T::Real>>(lib, &desc)?;
            Ok(f(&n, x, &incx))
        }
    }
}

/// Euclidean norm.
pub unsafe fn nrm2<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *const T,
    incx: BlasInt,
) -> Result<T::Real, AbiError> {
    real_reduction(lib, Operation::Nrm2, n, x, incx)
}

/// Sum of `|re| + |im|`.
pub unsafe fn asum<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *const T,
    incx: BlasInt,
) -> Result<T::Real, AbiError> {
    real_reduction(lib, Operation::Asum, n, x, incx)
}

/// One-based index of the first element of largest `|re| + |im|`; 0 when `n < 1`.
pub unsafe fn iamax<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *const T,
    incx: BlasInt,
) -> Result<BlasInt, AbiError> {
    let desc = descriptor(Operation::Iamax, T::PRECISION)?;
    let f = function::<ReduceFn<T, BlasInt>>(lib, &desc)?;
    Ok(f(&n, x, &incx))
}

/// Plane rotation with real cosine and sine (`srot`, `drot`, `csrot`, `zdrot`).
#[allow(clippy::too_many_arguments)]
pub unsafe fn rot<T: FortranScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *mut T,
    incx: BlasInt,
    y: *mut T,
    incy: BlasInt,
    c: T::Real,
    s: T::Real,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Rot, T::PRECISION)?;
    let f = function::<RotFn<T, T::Real>>(lib, &desc)?;
    f(&n, x, &incx, y, &incy, &c, &s);
    Ok(())
}

/// Construct a Givens rotation; `a` is overwritten with `r`.
pub unsafe fn rotg<T: FortranScalar>(
    lib: &NativeBlas,
    a: &mut T,
    b: &mut T,
    c: &mut T::Real,
    s: &mut T,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Rotg, T::PRECISION)?;
    let f = function::<RotgFn<T, T::Real>>(lib, &desc)?;
    f(a, b, c, s);
    Ok(())
}

/// Apply a modified Givens rotation described by `param`.
pub unsafe fn rotm<T: RealScalar>(
    lib: &NativeBlas,
    n: BlasInt,
    x: *mut T,
    incx: BlasInt,
    y: *mut T,
    incy: BlasInt,
    param: &[T; 5],
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Rotm, T::PRECISION)?;
    let f = function::<RotmFn<T>>(lib, &desc)?;
    f(&n, x, &incx, y, &incy, param.as_ptr());
    Ok(())
}

/// Construct a modified Givens rotation.
pub unsafe fn rotmg<T: RealScalar>(
    lib: &NativeBlas,
    d1: &mut T,
    d2: &mut T,
    x1: &mut T,
    y1: T,
    param: &mut [T; 5],
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Rotmg, T::PRECISION)?;
    let f = function::<RotmgFn<T>>(lib, &desc)?;
    f(d1, d2, x1, &y1, param.as_mut_ptr());
    Ok(())
}
