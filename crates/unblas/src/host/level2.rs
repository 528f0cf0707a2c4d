use super::library;
use crate::error::{Error, Result};
use crate::validate::{blas_error_if, check_matrix, check_vector, narrow, to_blas_int};
use unblas_abi::{fortran, ComplexScalar, Diag, FortranScalar, RealScalar, Transpose, Uplo};

/// `y := alpha*op(A)*x + beta*y` with `A` stored `m x n`.
#[allow(clippy::too_many_arguments)]
pub fn gemv<T: FortranScalar>(
    trans: Transpose,
    m: i64,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    x: &[T],
    incx: i64,
    beta: T,
    y: &mut [T],
    incy: i64,
) -> Result<()> {
    const FUNC: &str = "gemv";
    blas_error_if!(FUNC, m < 0);
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, lda < m.max(1));
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_blas_int; m, n, lda, incx, incy);
    let (len_x, len_y) = match trans {
        Transpose::NoTrans => (n, m),
        _ => (m, n),
    };
    check_matrix(FUNC, "a", a.len(), m, n, lda)?;
    check_vector(FUNC, "x", x.len(), len_x, incx)?;
    check_vector(FUNC, "y", y.len(), len_y, incy)?;
    let lib = library(FUNC)?;
    unsafe {
        fortran::gemv(
            lib,
            trans,
            m,
            n,
            alpha,
            a.as_ptr(),
            lda,
            x.as_ptr(),
            incx,
            beta,
            y.as_mut_ptr(),
            incy,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

#[allow(clippy::too_many_arguments)]
fn ger_impl<T: FortranScalar>(
    func: &'static str,
    conjugate: bool,
    m: i64,
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    blas_error_if!(func, m < 0);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, incy == 0);
    blas_error_if!(func, lda < m.max(1));
    narrow!(func, to_blas_int; m, n, incx, incy, lda);
    check_vector(func, "x", x.len(), m, incx)?;
    check_vector(func, "y", y.len(), n, incy)?;
    check_matrix(func, "a", a.len(), m, n, lda)?;
    let lib = library(func)?;
    unsafe {
        fortran::ger(
            lib,
            conjugate,
            m,
            n,
            alpha,
            x.as_ptr(),
            incx,
            y.as_ptr(),
            incy,
            a.as_mut_ptr(),
            lda,
        )
    }
    .map_err(|e| Error::abi(func, e))
}

/// `A := alpha*x*y**H + A` (`y**T` for real types).
#[allow(clippy::too_many_arguments)]
pub fn ger<T: FortranScalar>(
    m: i64,
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    ger_impl("ger", true, m, n, alpha, x, incx, y, incy, a, lda)
}

/// `A := alpha*x*y**T + A`
#[allow(clippy::too_many_arguments)]
pub fn geru<T: FortranScalar>(
    m: i64,
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    ger_impl("geru", false, m, n, alpha, x, incx, y, incy, a, lda)
}

/// Shared checks of the `n x n` symmetric/Hermitian matrix-vector products.
#[allow(clippy::too_many_arguments)]
fn check_symv<T>(
    func: &'static str,
    n: i64,
    a: &[T],
    lda: i64,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
) -> Result<()> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, lda < n.max(1));
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, incy == 0);
    narrow!(func, to_blas_int; n, lda, incx, incy);
    check_matrix(func, "a", a.len(), n, n, lda)?;
    check_vector(func, "x", x.len(), n, incx)?;
    check_vector(func, "y", y.len(), n, incy)
}

/// `y := alpha*A*x + beta*y` for symmetric `A` (real types).
#[allow(clippy::too_many_arguments)]
pub fn symv<T: RealScalar>(
    uplo: Uplo,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    x: &[T],
    incx: i64,
    beta: T,
    y: &mut [T],
    incy: i64,
) -> Result<()> {
    const FUNC: &str = "symv";
    check_symv(FUNC, n, a, lda, x, incx, y, incy)?;
    narrow!(FUNC, to_blas_int; n, lda, incx, incy);
    let lib = library(FUNC)?;
    unsafe {
        fortran::symv(
            lib,
            uplo,
            n,
            alpha,
            a.as_ptr(),
            lda,
            x.as_ptr(),
            incx,
            beta,
            y.as_mut_ptr(),
            incy,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// `y := alpha*A*x + beta*y` for Hermitian `A` (complex types).
#[allow(clippy::too_many_arguments)]
pub fn hemv<T: ComplexScalar>(
    uplo: Uplo,
    n: i64,
    alpha: T,
    a: &[T],
    lda: i64,
    x: &[T],
    incx: i64,
    beta: T,
    y: &mut [T],
    incy: i64,
) -> Result<()> {
    const FUNC: &str = "hemv";
    check_symv(FUNC, n, a, lda, x, incx, y, incy)?;
    narrow!(FUNC, to_blas_int; n, lda, incx, incy);
    let lib = library(FUNC)?;
    unsafe {
        fortran::hemv(
            lib,
            uplo,
            n,
            alpha,
            a.as_ptr(),
            lda,
            x.as_ptr(),
            incx,
            beta,
            y.as_mut_ptr(),
            incy,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

fn check_rank1<T>(
    func: &'static str,
    n: i64,
    x: &[T],
    incx: i64,
    a: &[T],
    lda: i64,
) -> Result<()> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, lda < n.max(1));
    narrow!(func, to_blas_int; n, incx, lda);
    check_vector(func, "x", x.len(), n, incx)?;
    check_matrix(func, "a", a.len(), n, n, lda)
}

/// `A := alpha*x*x**T + A` for symmetric `A` (real types).
#[allow(clippy::too_many_arguments)]
pub fn syr<T: RealScalar>(
    uplo: Uplo,
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    const FUNC: &str = "syr";
    check_rank1(FUNC, n, x, incx, a, lda)?;
    narrow!(FUNC, to_blas_int; n, incx, lda);
    let lib = library(FUNC)?;
    unsafe { fortran::syr(lib, uplo, n, alpha, x.as_ptr(), incx, a.as_mut_ptr(), lda) }
        .map_err(|e| Error::abi(FUNC, e))
}

/// `A := alpha*x*x**H + A` for Hermitian `A`, real `alpha` (complex types).
#[allow(clippy::too_many_arguments)]
pub fn her<T: ComplexScalar>(
    uplo: Uplo,
    n: i64,
    alpha: T::Real,
    x: &[T],
    incx: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    const FUNC: &str = "her";
    check_rank1(FUNC, n, x, incx, a, lda)?;
    narrow!(FUNC, to_blas_int; n, incx, lda);
    let lib = library(FUNC)?;
    unsafe { fortran::her(lib, uplo, n, alpha, x.as_ptr(), incx, a.as_mut_ptr(), lda) }
        .map_err(|e| Error::abi(FUNC, e))
}

#[allow(clippy::too_many_arguments)]
fn check_rank2<T>(
    func: &'static str,
    n: i64,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
    a: &[T],
    lda: i64,
) -> Result<()> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, incy == 0);
    blas_error_if!(func, lda < n.max(1));
    narrow!(func, to_blas_int; n, incx, incy, lda);
    check_vector(func, "x", x.len(), n, incx)?;
    check_vector(func, "y", y.len(), n, incy)?;
    check_matrix(func, "a", a.len(), n, n, lda)
}

/// `A := alpha*x*y**T + alpha*y*x**T + A` for symmetric `A` (real types).
#[allow(clippy::too_many_arguments)]
pub fn syr2<T: RealScalar>(
    uplo: Uplo,
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    const FUNC: &str = "syr2";
    check_rank2(FUNC, n, x, incx, y, incy, a, lda)?;
    narrow!(FUNC, to_blas_int; n, incx, incy, lda);
    let lib = library(FUNC)?;
    unsafe {
        fortran::syr2(
            lib,
            uplo,
            n,
            alpha,
            x.as_ptr(),
            incx,
            y.as_ptr(),
            incy,
            a.as_mut_ptr(),
            lda,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// `A := alpha*x*y**H + conj(alpha)*y*x**H + A` for Hermitian `A` (complex types).
#[allow(clippy::too_many_arguments)]
pub fn her2<T: ComplexScalar>(
    uplo: Uplo,
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
    a: &mut [T],
    lda: i64,
) -> Result<()> {
    const FUNC: &str = "her2";
    check_rank2(FUNC, n, x, incx, y, incy, a, lda)?;
    narrow!(FUNC, to_blas_int; n, incx, incy, lda);
    let lib = library(FUNC)?;
    unsafe {
        fortran::her2(
            lib,
            uplo,
            n,
            alpha,
            x.as_ptr(),
            incx,
            y.as_ptr(),
            incy,
            a.as_mut_ptr(),
            lda,
        )
    }
    .map_err(|e| Error::abi(FUNC, e))
}

fn check_triangular_mv<T>(
    func: &'static str,
    n: i64,
    a: &[T],
    lda: i64,
    x: &[T],
    incx: i64,
) -> Result<()> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, lda < n.max(1));
    blas_error_if!(func, incx == 0);
    narrow!(func, to_blas_int; n, lda, incx);
    check_matrix(func, "a", a.len(), n, n, lda)?;
    check_vector(func, "x", x.len(), n, incx)
}

/// `x := op(A)*x` for triangular `A`.
#[allow(clippy::too_many_arguments)]
pub fn trmv<T: FortranScalar>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: i64,
    a: &[T],
    lda: i64,
    x: &mut [T],
    incx: i64,
) -> Result<()> {
    const FUNC: &str = "trmv";
    check_triangular_mv(FUNC, n, a, lda, x, incx)?;
    narrow!(FUNC, to_blas_int; n, lda, incx);
    let lib = library(FUNC)?;
    unsafe {
        fortran::trmv(lib, uplo, trans, diag, n, a.as_ptr(), lda, x.as_mut_ptr(), incx)
    }
    .map_err(|e| Error::abi(FUNC, e))
}

/// Solve `op(A)*x = b` in place, `x` holding `b` on entry.
#[allow(clippy::too_many_arguments)]
pub fn trsv<T: FortranScalar>(
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    n: i64,
    a: &[T],
    lda: i64,
    x: &mut [T],
    incx: i64,
) -> Result<()> {
    const FUNC: &str = "trsv";
    check_triangular_mv(FUNC, n, a, lda, x, incx)?;
    narrow!(FUNC, to_blas_int; n, lda, incx);
    let lib = library(FUNC)?;
    unsafe {
        fortran::trsv(lib, uplo, trans, diag, n, a.as_ptr(), lda, x.as_mut_ptr(), incx)
    }
    .map_err(|e| Error::abi(FUNC, e))
}
