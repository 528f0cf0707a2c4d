use super::library;
use crate::error::{Error, Result};
use crate::validate::{blas_error_if, check_matrix, narrow, stored, to_blas_int};
use unblas_abi::{fortran, ComplexScalar, Diag, FortranScalar, Side, Transpose, Uplo};

/// `C := alpha*op(A)*op(B) + beta*C` with `C` of shape `m x n`.
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: FortranScalar>(
    transa: Transpose,
    transb: Transpose,
    m: i64,
    n: i64,
    k: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
    beta: T,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "gemm";
    let (a_rows, a_cols) = stored(transa, m, k);
    let (b_rows, b_cols) = stored(transb, k, n);
    blas_error_if!(FUNC, m < 0);
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, k < 0);
    blas_error_if!(FUNC, lda < a_rows.max(1));
    blas_error_if!(FUNC, ldb < b_rows.max(1));
    blas_error_if!(FUNC, ldc < m.max(1));
    narrow!(FUNC, to_blas_int; m, n, k, lda, ldb, ldc, a_rows, a_cols, b_rows, b_cols);
    check_matrix(FUNC, "a", a.len(), a_rows, a_cols, lda)?;
    check_matrix(FUNC, "b", b.len(), b_rows, b_cols, ldb)?;
    check_matrix(FUNC, "c", c.len(), m, n, ldc)?;
    let lib = library(FUNC)?;
    unsafe {
        fortran::gemm(
            lib,
            transa,
            transb,
            m,
            n,
            k,
            alpha,
            a.as_ptr(),
            lda,
            b.as_ptr(),
            ldb,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// Checks shared by `symm` and `hemm`; `A` is `ka x ka` with `ka` set by `side`.
#[allow(clippy::too_many_arguments)]
fn check_symm<T>(
    func: &'static str,
    side: Side,
    m: i64,
    n: i64,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
    c: &[T],
    ldc: i64,
) -> Result<()> {
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    blas_error_if!(func, m < 0);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, lda < ka.max(1));
    blas_error_if!(func, ldb < m.max(1));
    blas_error_if!(func, ldc < m.max(1));
    narrow!(func, to_blas_int; m, n, ka, lda, ldb, ldc);
    check_matrix(func, "a", a.len(), ka, ka, lda)?;
    check_matrix(func, "b", b.len(), m, n, ldb)?;
    check_matrix(func, "c", c.len(), m, n, ldc)
}

/// `C := alpha*A*B + beta*C` (or `B*A` on the right) for symmetric `A`.
#[allow(clippy::too_many_arguments)]
pub fn symm<T: FortranScalar>(
    side: Side,
    uplo: Uplo,
    m: i64,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
    beta: T,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "symm";
    check_symm(FUNC, side, m, n, a, lda, b, ldb, c, ldc)?;
    narrow!(FUNC, to_blas_int; m, n, lda, ldb, ldc);
    let lib = library(FUNC)?;
    unsafe {
        fortran::symm(
            lib,
            side,
            uplo,
            m,
            n,
            alpha,
            a.as_ptr(),
            lda,
            b.as_ptr(),
            ldb,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// Hermitian counterpart of [`symm`] (complex types).
#[allow(clippy::too_many_arguments)]
pub fn hemm<T: ComplexScalar>(
    side: Side,
    uplo: Uplo,
    m: i64,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
    beta: T,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "hemm";
    check_symm(FUNC, side, m, n, a, lda, b, ldb, c, ldc)?;
    narrow!(FUNC, to_blas_int; m, n, lda, ldb, ldc);
    let lib = library(FUNC)?;
    unsafe {
        fortran::hemm(
            lib,
            side,
            uplo,
            m,
            n,
            alpha,
            a.as_ptr(),
            lda,
            b.as_ptr(),
            ldb,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// Checks shared by the rank-k and rank-2k updates of an `n x n` `C`.
#[allow(clippy::too_many_arguments)]
fn check_rank_k<T>(
    func: &'static str,
    trans: Transpose,
    n: i64,
    k: i64,
    a: &[T],
    lda: i64,
    b: Option<(&[T], i64)>,
    c: &[T],
    ldc: i64,
) -> Result<()> {
    let (rows, cols) = stored(trans, n, k);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, k < 0);
    blas_error_if!(func, lda < rows.max(1));
    if let Some((_, ldb)) = b {
        blas_error_if!(func, ldb < rows.max(1));
    }
    blas_error_if!(func, ldc < n.max(1));
    narrow!(func, to_blas_int; n, lda, ldc, rows, cols);
    check_matrix(func, "a", a.len(), rows, cols, lda)?;
    if let Some((b, ldb)) = b {
        narrow!(func, to_blas_int; ldb);
        check_matrix(func, "b", b.len(), rows, cols, ldb)?;
    }
    check_matrix(func, "c", c.len(), n, n, ldc)
}

/// `C := alpha*A*A**T + beta*C` (or `A**T*A`) for symmetric `C`.
///
/// Complex types accept `NoTrans` and `Trans` only.
#[allow(clippy::too_many_arguments)]
pub fn syrk<T: FortranScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    beta: T,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "syrk";
    blas_error_if!(FUNC, T::PRECISION.is_complex() && trans == Transpose::ConjTrans);
    check_rank_k(FUNC, trans, n, k, a, lda, None, c, ldc)?;
    narrow!(FUNC, to_blas_int; n, k, lda, ldc);
    let lib = library(FUNC)?;
    unsafe {
        fortran::syrk(
            lib,
            uplo,
            trans,
            n,
            k,
            alpha,
            a.as_ptr(),
            lda,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// `C := alpha*A*A**H + beta*C` (or `A**H*A`) for Hermitian `C`, real
/// `alpha` and `beta`. Accepts `NoTrans` and `ConjTrans` only.
#[allow(clippy::too_many_arguments)]
pub fn herk<T: ComplexScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T::Real,
    a: &[T],
    lda: i64,
    beta: T::Real,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "herk";
    blas_error_if!(FUNC, trans == Transpose::Trans);
    check_rank_k(FUNC, trans, n, k, a, lda, None, c, ldc)?;
    narrow!(FUNC, to_blas_int; n, k, lda, ldc);
    let lib = library(FUNC)?;
    unsafe {
        fortran::herk(
            lib,
            uplo,
            trans,
            n,
            k,
            alpha,
            a.as_ptr(),
            lda,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// `C := alpha*A*B**T + alpha*B*A**T + beta*C` for symmetric `C`.
#[allow(clippy::too_many_arguments)]
pub fn syr2k<T: FortranScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
    beta: T,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "syr2k";
    blas_error_if!(FUNC, T::PRECISION.is_complex() && trans == Transpose::ConjTrans);
    check_rank_k(FUNC, trans, n, k, a, lda, Some((b, ldb)), c, ldc)?;
    narrow!(FUNC, to_blas_int; n, k, lda, ldb, ldc);
    let lib = library(FUNC)?;
    unsafe {
        fortran::syr2k(
            lib,
            uplo,
            trans,
            n,
            k,
            alpha,
            a.as_ptr(),
            lda,
            b.as_ptr(),
            ldb,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// `C := alpha*A*B**H + conj(alpha)*B*A**H + beta*C` for Hermitian `C`, real `beta`.
#[allow(clippy::too_many_arguments)]
pub fn her2k<T: ComplexScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
    beta: T::Real,
    c: &mut [T],
    ldc: i64,
) -> Result<()> {
    const FUNC: &str = "her2k";
    blas_error_if!(FUNC, trans == Transpose::Trans);
    check_rank_k(FUNC, trans, n, k, a, lda, Some((b, ldb)), c, ldc)?;
    narrow!(FUNC, to_blas_int; n, k, lda, ldb, ldc);
    let lib = library(FUNC)?;
    unsafe {
        fortran::her2k(
            lib,
            uplo,
            trans,
            n,
            k,
            alpha,
            a.as_ptr(),
            lda,
            b.as_ptr(),
            ldb,
            beta,
            c.as_mut_ptr(),
            ldc,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

#[allow(clippy::too_many_arguments)]
fn check_triangular_mm<T>(
    func: &'static str,
    side: Side,
    m: i64,
    n: i64,
    a: &[T],
    lda: i64,
    b: &[T],
    ldb: i64,
) -> Result<()> {
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    blas_error_if!(func, m < 0);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, lda < ka.max(1));
    blas_error_if!(func, ldb < m.max(1));
    narrow!(func, to_blas_int; m, n, ka, lda, ldb);
    check_matrix(func, "a", a.len(), ka, ka, lda)?;
    check_matrix(func, "b", b.len(), m, n, ldb)
}

/// `B := alpha*op(A)*B` (or `B*op(A)`) for triangular `A`.
#[allow(clippy::too_many_arguments)]
pub fn trmm<T: FortranScalar>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: i64,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &mut [T],
    ldb: i64,
) -> Result<()> {
    const FUNC: &str = "trmm";
    check_triangular_mm(FUNC, side, m, n, a, lda, b, ldb)?;
    narrow!(FUNC, to_blas_int; m, n, lda, ldb);
    let lib = library(FUNC)?;
    unsafe {
        fortran::trmm(
            lib,
            side,
            uplo,
            trans,
            diag,
            m,
            n,
            alpha,
            a.as_ptr(),
            lda,
            b.as_mut_ptr(),
            ldb,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// Solve `op(A)*X = alpha*B` (or `X*op(A)`) in place in `B`.
#[allow(clippy::too_many_arguments)]
pub fn trsm<T: FortranScalar>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: i64,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    b: &mut [T],
    ldb: i64,
) -> Result<()> {
    const FUNC: &str = "trsm";
    check_triangular_mm(FUNC, side, m, n, a, lda, b, ldb)?;
    narrow!(FUNC, to_blas_int; m, n, lda, ldb);
    let lib = library(FUNC)?;
    unsafe {
        fortran::trsm(
            lib,
            side,
            uplo,
            trans,
            diag,
            m,
            n,
            alpha,
            a.as_ptr(),
            lda,
            b.as_mut_ptr(),
            ldb,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}
