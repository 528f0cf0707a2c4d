//! Level 3: matrix-matrix kernels.

use super::{descriptor, function, takes_lengths};
use crate::error::AbiError;
use crate::flags::{fortran_char, Diag, Side, Transpose, Uplo};
use crate::kernel::Operation;
use crate::library::NativeBlas;
use crate::scalar::{BlasInt, ComplexScalar, FortranScalar};
use crate::shape::FLAG_LENGTH;
use std::os::raw::c_char;

type Int = *const BlasInt;
type Flag = *const c_char;

type GemmFn<T> = unsafe extern "C" fn(
    Flag,
    Flag,
    Int,
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
);
type GemmLenFn<T> = unsafe extern "C" fn(
    Flag,
    Flag,
    Int,
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
    usize,
);
type SymmFn<T> = unsafe extern "C" fn(
    Flag,
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
);
type SymmLenFn<T> = unsafe extern "C" fn(
    Flag,
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
    usize,
);
/// `S` is the scalar type of `alpha`/`beta`: real for `herk`.
type SyrkFn<T, S> =
    unsafe extern "C" fn(Flag, Flag, Int, Int, *const S, *const T, Int, *const S, *mut T, Int);
type SyrkLenFn<T, S> = unsafe extern "C" fn(
    Flag,
    Flag,
    Int,
    Int,
    *const S,
    *const T,
    Int,
    *const S,
    *mut T,
    Int,
    usize,
    usize,
);
/// `B` is the scalar type of `beta`: real for `her2k`.
type Syr2kFn<T, B> = unsafe extern "C" fn(
    Flag,
    Flag,
    Int,
    Int,
    *const T,
    *const T,
    Int,
    *const T,
    Int,
    *const B,
    *mut T,
    Int,
);
type Syr2kLenFn<T, B> = unsafe extern "C" fn(
    Flag,
    Flag,
    Int,
    Int,
    *const T,
    *const T,
    Int,
    *const T,
    Int,
    *const B,
    *mut T,
    Int,
    usize,
    usize,
);
type TrmmFn<T> =
    unsafe extern "C" fn(Flag, Flag, Flag, Flag, Int, Int, *const T, *const T, Int, *mut T, Int);
type TrmmLenFn<T> = unsafe extern "C" fn(
    Flag,
    Flag,
    Flag,
    Flag,
    Int,
    Int,
    *const T,
    *const T,
    Int,
    *mut T,
    Int,
    usize,
    usize,
    usize,
    usize,
);

/// `C := alpha*op(A)*op(B) + beta*C`
#[allow(clippy::too_many_arguments)]
pub unsafe fn gemm<T: FortranScalar>(
    lib: &NativeBlas,
    transa: Transpose,
    transb: Transpose,
    m: BlasInt,
    n: BlasInt,
    k: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: T,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(Operation::Gemm, T::PRECISION)?;
    let ta = fortran_char(transa.as_char());
    let tb = fortran_char(transb.as_char());
    if takes_lengths(lib, &desc, 2) {
        let f = function::<GemmLenFn<T>>(lib, &desc)?;
        f(
            &ta,
            &tb,
            &m,
            &n,
            &k,
            &alpha,
            a,
            &lda,
            b,
            &ldb,
            &beta,
            c,
            &ldc,
            FLAG_LENGTH,
            FLAG_LENGTH,
        );
    } else {
        let f = function::<GemmFn<T>>(lib, &desc)?;
        f(
            &ta, &tb, &m, &n, &k, &alpha, a, &lda, b, &ldb, &beta, c, &ldc,
        );
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
unsafe fn symm_like<T: FortranScalar>(
    lib: &NativeBlas,
    op: Operation,
    side: Side,
    uplo: Uplo,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: T,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let side = fortran_char(side.as_char());
    let uplo = fortran_char(uplo.as_char());
    if takes_lengths(lib, &desc, 2) {
        let f = function::<SymmLenFn<T>>(lib, &desc)?;
        f(
            &side,
            &uplo,
            &m,
            &n,
            &alpha,
            a,
            &lda,
            b,
            &ldb,
            &beta,
            c,
            &ldc,
            FLAG_LENGTH,
            FLAG_LENGTH,
        );
    } else {
        let f = function::<SymmFn<T>>(lib, &desc)?;
        f(&side, &uplo, &m, &n, &alpha, a, &lda, b, &ldb, &beta, c, &ldc);
    }
    Ok(())
}

/// Symmetric matrix-matrix product.
#[allow(clippy::too_many_arguments)]
pub unsafe fn symm<T: FortranScalar>(
    lib: &NativeBlas,
    side: Side,
    uplo: Uplo,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: T,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    symm_like(
        lib,
        Operation::Symm,
        side,
        uplo,
        m,
        n,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

/// Hermitian matrix-matrix product (complex types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn hemm<T: ComplexScalar>(
    lib: &NativeBlas,
    side: Side,
    uplo: Uplo,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: T,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    symm_like(
        lib,
        Operation::Hemm,
        side,
        uplo,
        m,
        n,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

#[allow(clippy::too_many_arguments)]
unsafe fn rank_k<T: FortranScalar, S: Copy>(
    lib: &NativeBlas,
    op: Operation,
    uplo: Uplo,
    trans: Transpose,
    n: BlasInt,
    k: BlasInt,
    alpha: S,
    a: *const T,
    lda: BlasInt,
    beta: S,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let uplo = fortran_char(uplo.as_char());
    let trans = fortran_char(trans.as_char());
    if takes_lengths(lib, &desc, 2) {
        let f = function::<SyrkLenFn<T, S>>(lib, &desc)?;
        f(
            &uplo,
            &trans,
            &n,
            &k,
            &alpha,
            a,
            &lda,
            &beta,
            c,
            &ldc,
            FLAG_LENGTH,
            FLAG_LENGTH,
        );
    } else {
        let f = function::<SyrkFn<T, S>>(lib, &desc)?;
        f(&uplo, &trans, &n, &k, &alpha, a, &lda, &beta, c, &ldc);
    }
    Ok(())
}

/// Symmetric rank-k update.
#[allow(clippy::too_many_arguments)]
pub unsafe fn syrk<T: FortranScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    trans: Transpose,
    n: BlasInt,
    k: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    beta: T,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    rank_k(lib, Operation::Syrk, uplo, trans, n, k, alpha, a, lda, beta, c, ldc)
}

/// Hermitian rank-k update with real `alpha` and `beta` (complex types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn herk<T: ComplexScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    trans: Transpose,
    n: BlasInt,
    k: BlasInt,
    alpha: T::Real,
    a: *const T,
    lda: BlasInt,
    beta: T::Real,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    rank_k(lib, Operation::Herk, uplo, trans, n, k, alpha, a, lda, beta, c, ldc)
}

#[allow(clippy::too_many_arguments)]
unsafe fn rank_2k<T: FortranScalar, B: Copy>(
    lib: &NativeBlas,
    op: Operation,
    uplo: Uplo,
    trans: Transpose,
    n: BlasInt,
    k: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: B,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let uplo = fortran_char(uplo.as_char());
    let trans = fortran_char(trans.as_char());
    if takes_lengths(lib, &desc, 2) {
        let f = function::<Syr2kLenFn<T, B>>(lib, &desc)?;
        f(
            &uplo,
            &trans,
            &n,
            &k,
            &alpha,
            a,
            &lda,
            b,
            &ldb,
            &beta,
            c,
            &ldc,
            FLAG_LENGTH,
            FLAG_LENGTH,
        );
    } else {
        let f = function::<Syr2kFn<T, B>>(lib, &desc)?;
        f(
            &uplo, &trans, &n, &k, &alpha, a, &lda, b, &ldb, &beta, c, &ldc,
        );
    }
    Ok(())
}

/// Symmetric rank-2k update.
#[allow(clippy::too_many_arguments)]
pub unsafe fn syr2k<T: FortranScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    trans: Transpose,
    n: BlasInt,
    k: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: T,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    rank_2k(
        lib,
        Operation::Syr2k,
        uplo,
        trans,
        n,
        k,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

/// Hermitian rank-2k update with real `beta` (complex types).
#[allow(clippy::too_many_arguments)]
pub unsafe fn her2k<T: ComplexScalar>(
    lib: &NativeBlas,
    uplo: Uplo,
    trans: Transpose,
    n: BlasInt,
    k: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *const T,
    ldb: BlasInt,
    beta: T::Real,
    c: *mut T,
    ldc: BlasInt,
) -> Result<(), AbiError> {
    rank_2k(
        lib,
        Operation::Her2k,
        uplo,
        trans,
        n,
        k,
        alpha,
        a,
        lda,
        b,
        ldb,
        beta,
        c,
        ldc,
    )
}

#[allow(clippy::too_many_arguments)]
unsafe fn triangular_mm<T: FortranScalar>(
    lib: &NativeBlas,
    op: Operation,
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *mut T,
    ldb: BlasInt,
) -> Result<(), AbiError> {
    let desc = descriptor(op, T::PRECISION)?;
    let side = fortran_char(side.as_char());
    let uplo = fortran_char(uplo.as_char());
    let trans = fortran_char(trans.as_char());
    let diag = fortran_char(diag.as_char());
    if takes_lengths(lib, &desc, 4) {
        let f = function::<TrmmLenFn<T>>(lib, &desc)?;
        f(
            &side,
            &uplo,
            &trans,
            &diag,
            &m,
            &n,
            &alpha,
            a,
            &lda,
            b,
            &ldb,
            FLAG_LENGTH,
            FLAG_LENGTH,
            FLAG_LENGTH,
            FLAG_LENGTH,
        );
    } else {
        let f = function::<TrmmFn<T>>(lib, &desc)?;
        f(
            &side, &uplo, &trans, &diag, &m, &n, &alpha, a, &lda, b, &ldb,
        );
    }
    Ok(())
}

/// `B := alpha*op(A)*B` or `alpha*B*op(A)` for triangular `A`.
#[allow(clippy::too_many_arguments)]
pub unsafe fn trmm<T: FortranScalar>(
    lib: &NativeBlas,
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *mut T,
    ldb: BlasInt,
) -> Result<(), AbiError> {
    triangular_mm(
        lib,
        Operation::Trmm,
        side,
        uplo,
        trans,
        diag,
        m,
        n,
        alpha,
        a,
        lda,
        b,
        ldb,
    )
}

/// Solve `op(A)*X = alpha*B` or `X*op(A) = alpha*B` in place.
#[allow(clippy::too_many_arguments)]
pub unsafe fn trsm<T: FortranScalar>(
    lib: &NativeBlas,
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: BlasInt,
    n: BlasInt,
    alpha: T,
    a: *const T,
    lda: BlasInt,
    b: *mut T,
    ldb: BlasInt,
) -> Result<(), AbiError> {
    triangular_mm(
        lib,
        Operation::Trsm,
        side,
        uplo,
        trans,
        diag,
        m,
        n,
        alpha,
        a,
        lda,
        b,
        ldb,
    )
}
