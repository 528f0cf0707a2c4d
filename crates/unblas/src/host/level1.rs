use super::library;
use crate::error::{Error, Result};
use crate::validate::{blas_error_if, check_vector, narrow, to_blas_int};
use unblas_abi::{fortran, FortranScalar, RealScalar};

/// `y := alpha*x + y`
pub fn axpy<T: FortranScalar>(
    n: i64,
    alpha: T,
    x: &[T],
    incx: i64,
    y: &mut [T],
    incy: i64,
) -> Result<()> {
    const FUNC: &str = "axpy";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_blas_int; n, incx, incy);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    check_vector(FUNC, "y", y.len(), n, incy)?;
    let lib = library(FUNC)?;
    unsafe { fortran::axpy(lib, n, alpha, x.as_ptr(), incx, y.as_mut_ptr(), incy) }
        .map_err(|e| Error::abi(FUNC, e))
}

/// `x := alpha*x`
pub fn scal<T: FortranScalar>(n: i64, alpha: T, x: &mut [T], incx: i64) -> Result<()> {
    const FUNC: &str = "scal";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx <= 0);
    narrow!(FUNC, to_blas_int; n, incx);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    let lib = library(FUNC)?;
    unsafe { fortran::scal(lib, n, alpha, x.as_mut_ptr(), incx) }.map_err(|e| Error::abi(FUNC, e))
}

pub fn copy<T: FortranScalar>(n: i64, x: &[T], incx: i64, y: &mut [T], incy: i64) -> Result<()> {
    const FUNC: &str = "copy";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_blas_int; n, incx, incy);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    check_vector(FUNC, "y", y.len(), n, incy)?;
    let lib = library(FUNC)?;
    unsafe { fortran::copy(lib, n, x.as_ptr(), incx, y.as_mut_ptr(), incy) }
        .map_err(|e| Error::abi(FUNC, e))
}

pub fn swap<T: FortranScalar>(
    n: i64,
    x: &mut [T],
    incx: i64,
    y: &mut [T],
    incy: i64,
) -> Result<()> {
    const FUNC: &str = "swap";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_blas_int; n, incx, incy);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    check_vector(FUNC, "y", y.len(), n, incy)?;
    let lib = library(FUNC)?;
    unsafe { fortran::swap(lib, n, x.as_mut_ptr(), incx, y.as_mut_ptr(), incy) }
        .map_err(|e| Error::abi(FUNC, e))
}

fn dot_impl<T: FortranScalar>(
    func: &'static str,
    conjugate: bool,
    n: i64,
    x: &[T],
    incx: i64,
    y: &[T],
    incy: i64,
) -> Result<T> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, incy == 0);
    narrow!(func, to_blas_int; n, incx, incy);
    check_vector(func, "x", x.len(), n, incx)?;
    check_vector(func, "y", y.len(), n, incy)?;
    let lib = library(func)?;
    unsafe { fortran::dot(lib, conjugate, n, x.as_ptr(), incx, y.as_ptr(), incy) }
        .map_err(|e| Error::abi(func, e))
}

/// `conj(x)·y` for complex types, `x·y` for real ones.
pub fn dot<T: FortranScalar>(n: i64, x: &[T], incx: i64, y: &[T], incy: i64) -> Result<T> {
    dot_impl("dot", true, n, x, incx, y, incy)
}

/// `x·y` without conjugation.
pub fn dotu<T: FortranScalar>(n: i64, x: &[T], incx: i64, y: &[T], incy: i64) -> Result<T> {
    dot_impl("dotu", false, n, x, incx, y, incy)
}

pub fn nrm2<T: FortranScalar>(n: i64, x: &[T], incx: i64) -> Result<T::Real> {
    const FUNC: &str = "nrm2";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx <= 0);
    narrow!(FUNC, to_blas_int; n, incx);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    let lib = library(FUNC)?;
    unsafe { fortran::nrm2(lib, n, x.as_ptr(), incx) }.map_err(|e| Error::abi(FUNC, e))
}

/// Sum of `|re| + |im|` over the vector.
pub fn asum<T: FortranScalar>(n: i64, x: &[T], incx: i64) -> Result<T::Real> {
    const FUNC: &str = "asum";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx <= 0);
    narrow!(FUNC, to_blas_int; n, incx);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    let lib = library(FUNC)?;
    unsafe { fortran::asum(lib, n, x.as_ptr(), incx) }.map_err(|e| Error::abi(FUNC, e))
}

/// Zero-based position of the first element of largest `|re| + |im|`;
/// `None` for an empty vector.
pub fn iamax<T: FortranScalar>(n: i64, x: &[T], incx: i64) -> Result<Option<usize>> {
    const FUNC: &str = "iamax";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx <= 0);
    narrow!(FUNC, to_blas_int; n, incx);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    let lib = library(FUNC)?;
    let index = unsafe { fortran::iamax(lib, n, x.as_ptr(), incx) }.map_err(|e| Error::abi(FUNC, e))?;
    Ok((index > 0).then(|| index as usize - 1))
}

/// Apply the plane rotation `(c, s)` to the pairs `(x[i], y[i])`.
#[allow(clippy::too_many_arguments)]
pub fn rot<T: FortranScalar>(
    n: i64,
    x: &mut [T],
    incx: i64,
    y: &mut [T],
    incy: i64,
    c: T::Real,
    s: T::Real,
) -> Result<()> {
    const FUNC: &str = "rot";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_blas_int; n, incx, incy);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    check_vector(FUNC, "y", y.len(), n, incy)?;
    let lib = library(FUNC)?;
    unsafe { fortran::rot(lib, n, x.as_mut_ptr(), incx, y.as_mut_ptr(), incy, c, s) }
        .map_err(|e| Error::abi(FUNC, e))
}

/// Construct a Givens rotation zeroing `b`. On return `a` holds `r`, `b`
/// the reconstruction value; the rotation `(c, s)` is returned.
pub fn rotg<T: FortranScalar>(a: &mut T, b: &mut T) -> Result<(T::Real, T)> {
    const FUNC: &str = "rotg";
    let lib = library(FUNC)?;
    let mut c = <T::Real as FortranScalar>::zero();
    let mut s = T::zero();
    unsafe { fortran::rotg(lib, a, b, &mut c, &mut s) }.map_err(|e| Error::abi(FUNC, e))?;
    Ok((c, s))
}

/// Apply the modified Givens rotation encoded in `param`.
pub fn rotm<T: RealScalar>(
    n: i64,
    x: &mut [T],
    incx: i64,
    y: &mut [T],
    incy: i64,
    param: &[T; 5],
) -> Result<()> {
    const FUNC: &str = "rotm";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_blas_int; n, incx, incy);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    check_vector(FUNC, "y", y.len(), n, incy)?;
    let lib = library(FUNC)?;
    unsafe { fortran::rotm(lib, n, x.as_mut_ptr(), incx, y.as_mut_ptr(), incy, param) }
        .map_err(|e| Error::abi(FUNC, e))
}

/// Construct a modified Givens rotation; returns its `param` encoding.
pub fn rotmg<T: RealScalar>(d1: &mut T, d2: &mut T, x1: &mut T, y1: T) -> Result<[T; 5]> {
    const FUNC: &str = "rotmg";
    let lib = library(FUNC)?;
    let mut param = [T::zero(); 5];
    unsafe { fortran::rotmg(lib, d1, d2, x1, y1, &mut param) }.map_err(|e| Error::abi(FUNC, e))?;
    Ok(param)
}
