use super::{launch, DeviceBuffer, Queue};
use crate::error::Result;
use crate::validate::{blas_error_if, check_matrix, check_vector, narrow, to_device_int};
use unblas_abi::{FortranScalar, Transpose};
use unblas_accelerate_api::{GemvArgs, GerArgs};

/// `y := alpha*op(A)*x + beta*y` with `A` stored `m x n`.
#[allow(clippy::too_many_arguments)]
pub fn gemv<T: FortranScalar>(
    trans: Transpose,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    beta: T,
    y: &mut DeviceBuffer<T>,
    incy: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "gemv";
    blas_error_if!(FUNC, m < 0);
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, lda < m.max(1));
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_device_int; m, n, lda, incx, incy);
    let (len_x, len_y) = match trans {
        Transpose::NoTrans => (n, m),
        _ => (m, n),
    };
    check_matrix(FUNC, "a", a.len(), m, n, lda)?;
    check_vector(FUNC, "x", x.len(), len_x, incx)?;
    check_vector(FUNC, "y", y.len(), len_y, incy)?;
    a.check_on(FUNC, "a", queue)?;
    x.check_on(FUNC, "x", queue)?;
    y.check_on(FUNC, "y", queue)?;
    let args = GemvArgs {
        precision: T::PRECISION,
        trans,
        m,
        n,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        x: x.as_ptr(),
        incx,
        beta: beta.into_value(),
        y: y.as_ptr(),
        incy,
    };
    launch(queue, FUNC, |p, s| p.gemv(s, &args))
}

#[allow(clippy::too_many_arguments)]
fn ger_impl<T: FortranScalar>(
    func: &'static str,
    conjugate: bool,
    m: i64,
    n: i64,
    alpha: T,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    a: &mut DeviceBuffer<T>,
    lda: i64,
    queue: &Queue,
) -> Result<()> {
    blas_error_if!(func, m < 0);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, incy == 0);
    blas_error_if!(func, lda < m.max(1));
    narrow!(func, to_device_int; m, n, incx, incy, lda);
    check_vector(func, "x", x.len(), m, incx)?;
    check_vector(func, "y", y.len(), n, incy)?;
    check_matrix(func, "a", a.len(), m, n, lda)?;
    x.check_on(func, "x", queue)?;
    y.check_on(func, "y", queue)?;
    a.check_on(func, "a", queue)?;
    let args = GerArgs {
        precision: T::PRECISION,
        conjugate,
        m,
        n,
        alpha: alpha.into_value(),
        x: x.as_ptr(),
        incx,
        y: y.as_ptr(),
        incy,
        a: a.as_ptr(),
        lda,
    };
    launch(queue, func, |p, s| p.ger(s, &args))
}

/// `A := alpha*x*y**H + A` (`y**T` for real types).
#[allow(clippy::too_many_arguments)]
pub fn ger<T: FortranScalar>(
    m: i64,
    n: i64,
    alpha: T,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    a: &mut DeviceBuffer<T>,
    lda: i64,
    queue: &Queue,
) -> Result<()> {
    ger_impl("ger", true, m, n, alpha, x, incx, y, incy, a, lda, queue)
}

/// `A := alpha*x*y**T + A`
#[allow(clippy::too_many_arguments)]
pub fn geru<T: FortranScalar>(
    m: i64,
    n: i64,
    alpha: T,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    a: &mut DeviceBuffer<T>,
    lda: i64,
    queue: &Queue,
) -> Result<()> {
    ger_impl("geru", false, m, n, alpha, x, incx, y, incy, a, lda, queue)
}
