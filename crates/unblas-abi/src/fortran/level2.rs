//! Level 2: matrix-vector kernels.

use super::{descriptor, function, takes_lengths};
use crate::error::AbiError;
use crate::flags::{fortran_char, Diag, Transpose, Uplo};
use crate::kernel::Operation;
use crate::library::NativeBlas;
use crate::scalar::{BlasInt, ComplexScalar, FortranScalar, RealScalar};
use crate::shape::FLAG_LENGTH;
use std::os::raw::c_char;

type Int = *const BlasInt;
type Flag = *const c_char;

type GemvFn<T> =
    unsafe extern "C" fn(Flag, Int, Int, *const T, *const T, Int, *const T, Int, *const T, *mut T, Int);
type GemvLenFn<T> = unsafe extern "C" fn(
    Flag,
    Int,
    Int,
    *const T,
    *const T,
    Int,
    *const T,
    Int,
    *const T,
    *mut T,
    Int,
    usize,
);
type GerFn<T> = unsafe extern "C" fn(Int, Int, *const T, *const T, Int, *const T, Int, *mut T, Int);
type SymvFn<T> =
    unsafe extern "C" fn(Flag, Int, *const T, *const T, Int, *const T, Int, *const T, *mut T, Int);
type SymvLenFn<T> = unsafe extern "C" fn(
    Flag,
    Int,
    *const T,
    *const T,
    Int,
    *const T,
    Int,
    *const T,
    *mut T,
    Int,
    usize,
);
/// `alpha` is real for `her`, hence the separate parameter.
type SyrFn<T, A> = unsafe extern "C" fn(Flag, Int, *const A, *const T, Int, *mut T, Int);
type SyrLenFn<T, A> = unsafe extern "C" fn(Flag, Int, *const A, *const T, Int, *mut T, Int, usize);
type Syr2Fn<T> =
    unsafe extern "C" fn(Flag, Int, *const T, *const T, Int, *const T, Int, *mut T, Int);
type Syr2LenFn<T> =
    unsafe extern "C" fn(Flag, Int, *const T, *const T, Int, *const T, Int, *mut T, Int, usize);
type TrmvFn<T> = unsafe extern "C" fn(Flag, Flag, Flag, Int, *const T, Int, *mut T, Int);
type TrmvLenFn<T> =
    unsafe extern "C" fn(Flag, Flag, Flag, Int, *const T, Int, *mut T, Int, usize, usize, usize);

/// `y := alpha*op(A)*x + beta*y`
#[allow(clippy::too_many_arguments)]
pub unsafe fn gemv<T: FortranScalar>(
    lib: &NativeBlas,
    trans: Transpose,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    x: *const T,
    incx: BlasInt,
    beta: T,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Gemv, T::PRECISION)?;
    let trans = fortran_char(trans.as_char());
    if takes_lengths(lib, &desc, 1) {
        let f = function::<GemvLenFn<T>>(lib, &desc)?;
        f(
            &trans, &m, &n, &alpha, a, &lda, x, &incx, &beta, y, &incy, FLAG_LENGTH,
        );
    } else {
        let f = function::<GemvFn<T>>(lib, &desc)?;
        f(&trans, &m, &n, &alpha, a, &lda, x, &incx, &beta, y, &incy);
    }
    Ok(())
}

/// `A := alpha*x*y**H + A` for complex types when `conjugate`, else `alpha*x*y**T + A`.
#[allow(clippy::too_many_arguments)]
pub unsafe fn ger<T: FortranScalar>(
    lib: &NativeBlas,
    conjugate: bool,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    x: *const T,
    incx: BlasInt,
    y: *const T,
    incy: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    let op = if conjugate {
        Operation::Ger
    } else {
        Operation::Geru
    };
    let desc = descriptor(op, T::PRECISION)?;
    let f = function::<GerFn<T>>(lib, &desc)?;
    f(&m, &n, &alpha, x, &incx, y, &incy, a, &lda);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
unsafe fn symv_like<T: FortranScalar>(
    lib: &NativeBlas,
    op: Operation,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    x: *const T,
    incx: BlasInt,
    beta: T,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let uplo = fortran_char(uplo.as_char());
    if takes_lengths(lib, &desc, 1) {
        let f = function::<SymvLenFn<T>>(lib, &desc)?;
        f(
            &uplo, &n, &alpha, a, &lda, x, &incx, &beta, y, &incy, FLAG_LENGTH,
        );
    } else {
        let f = function::<SymvFn<T>>(lib, &desc)?;
        f(&uplo, &n, &alpha, a, &lda, x, &incx, &beta, y, &incy);
    }
    Ok(())
}

/// Symmetric matrix-vector product (real types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn symv<T: RealScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    x: *const T,
    incx: BlasInt,
    beta: T,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    symv_like(lib, Operation::Symv, uplo, n, alpha, a, lda, x, incx, beta, y, incy)
}

/// Hermitian matrix-vector product (complex types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn hemv<T: ComplexScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    x: *const T,
    incx: BlasInt,
    beta: T,
    y: *mut T,
    incy: BlasInt,
) -> Result<(), AbiError> {
    symv_like(lib, Operation::Hemv, uplo, n, alpha, a, lda, x, incx, beta, y, incy)
}

#[allow(clippy::too_many_arguments)]
unsafe fn syr_like<T: FortranScalar, A: Copy>(
    lib: &NativeBlas,
    op: Operation,
    uplo: Uplo,
    n: BlasInt,
    alpha: A,
    x: *const T,
    incx: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let uplo = fortran_char(uplo.as_char());
    if takes_lengths(lib, &desc, 1) {
        let f = function::<SyrLenFn<T, A>>(lib, &desc)?;
        f(&uplo, &n, &alpha, x, &incx, a, &lda, FLAG_LENGTH);
    } else {
        let f = function::<SyrFn<T, A>>(lib, &desc)?;
        f(&uplo, &n, &alpha, x, &incx, a, &lda);
    }
    Ok(())
}

/// Symmetric rank-1 update (real types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn syr<T: RealScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    x: *const T,
    incx: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    syr_like(lib, Operation::Syr, uplo, n, alpha, x, incx, a, lda)
}

/// Hermitian rank-1 update with real `alpha` (complex types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn her<T: ComplexScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    n: BlasInt,
    alpha: T::Real,
    x: *const T,
    incx: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    syr_like(lib, Operation::Her, uplo, n, alpha, x, incx, a, lda)
}

#[allow(clippy::too_many_arguments)]
unsafe fn syr2_like<T: FortranScalar>(
    lib: &NativeBlas,
    op: Operation,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    x: *const T,
    incx: BlasInt,
    y: *const T,
    incy: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let uplo = fortran_char(uplo.as_char());
    if takes_lengths(lib, &desc, 1) {
        let f = function::<Syr2LenFn<T>>(lib, &desc)?;
        f(
            &uplo, &n, &alpha, x, &incx, y, &incy, a, &lda, FLAG_LENGTH,
        );
    } else {
        let f = function::<Syr2Fn<T>>(lib, &desc)?;
        f(&uplo, &n, &alpha, x, &incx, y, &incy, a, &lda);
    }
    Ok(())
}

/// Symmetric rank-2 update (real types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn syr2<T: RealScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    x: *const T,
    incx: BlasInt,
    y: *const T,
    incy: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    syr2_like(lib, Operation::Syr2, uplo, n, alpha, x, incx, y, incy, a, lda)
}

/// Hermitian rank-2 update (complex types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn her2<T: ComplexScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    n: BlasInt,
    alpha: T,
    x: *const T,
    incx: BlasInt,
    y: *const T,
    incy: BlasInt,
    a: *mut T,
    lda: BlasInt,
) -> Result<(), AbiError> {
    syr2_like(lib, Operation::Her2, uplo, n, alpha, x, incx, y, incy, a, lda)
}

#[allow(clippy::too_many_arguments)]
unsafe fn triangular_mv<T: FortranScalar>(
    lib: &NativeBlas,
    op: Operation,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: BlasInt,
    a: *const T,
    lda: BlasInt,
    x: *mut T,
    incx: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let uplo = fortran_char(uplo.as_char());
    let trans = fortran_char(trans.as_char());
    let diag = fortran_char(diag.as_char());
    if takes_lengths(lib, &desc, 3) {
        let f = function::<TrmvLenFn<T>>(lib, &desc)?;
        f(
            &uplo,
            &trans,
            &diag,
            &n,
            a,
            &lda,
            x,
            &incx,
            FLAG_LENGTH,
            FLAG_LENGTH,
            FLAG_LENGTH,
        );
    } else {
        let f = function::<TrmvFn<T>>(lib, &desc)?;
        f(&uplo, &trans, &diag, &n, a, &lda, x, &incx);
    }
    Ok(())
}

/// `x := op(A)*x` for triangular `A`.
#[allow(clippy::too_many_arguments)]
pub unsafe fn trmv<T: FortranScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: BlasInt,
    a: *const T,
    lda: BlasInt,
    x: *mut T,
    incx: BlasInt,
) -> Result<(), AbiError> {
    triangular_mv(lib, Operation::Trmv, uplo, trans, diag, n, a, lda, x, incx)
}

/// Solve `op(A)*x = b` in place for triangular `A`.
#[allow(clippy::too_many_arguments)]
pub unsafe fn trsv<T: FortranScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: BlasInt,
    a: *const T,
    lda: BlasInt,
    x: *mut T,
    incx: BlasInt,
) -> Result<(), AbiError> {
    triangular_mv(lib, Operation::Trsv, uplo, trans, diag, n, a, lda, x, incx)
}
