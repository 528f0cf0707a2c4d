use super::{launch, DeviceBuffer, Queue};
use crate::error::Result;
use crate::validate::{blas_error_if, check_extent, check_vector, narrow, to_device_int};
use unblas_abi::FortranScalar;
use unblas_accelerate_api::{
    AxpyArgs, DeviceInt, DotArgs, ReductionArgs, ScalArgs, VectorPairArgs,
};

/// `y := alpha*x + y`
pub fn axpy<T: FortranScalar>(
    n: i64,
    alpha: T,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &mut DeviceBuffer<T>,
    incy: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "axpy";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx == 0);
    blas_error_if!(FUNC, incy == 0);
    narrow!(FUNC, to_device_int; n, incx, incy);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    check_vector(FUNC, "y", y.len(), n, incy)?;
    x.check_on(FUNC, "x", queue)?;
    y.check_on(FUNC, "y", queue)?;
    let args = AxpyArgs {
        precision: T::PRECISION,
        n,
        alpha: alpha.into_value(),
        x: x.as_ptr(),
        incx,
        y: y.as_ptr(),
        incy,
    };
    launch(queue, FUNC, |p, s| p.axpy(s, &args))
}

/// `x := alpha*x`
pub fn scal<T: FortranScalar>(
    n: i64,
    alpha: T,
    x: &mut DeviceBuffer<T>,
    incx: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "scal";
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, incx <= 0);
    narrow!(FUNC, to_device_int; n, incx);
    check_vector(FUNC, "x", x.len(), n, incx)?;
    x.check_on(FUNC, "x", queue)?;
    let args = ScalArgs {
        precision: T::PRECISION,
        n,
        alpha: alpha.into_value(),
        x: x.as_ptr(),
        incx,
    };
    launch(queue, FUNC, |p, s| p.scal(s, &args))
}

#[allow(clippy::too_many_arguments)]
fn pair_args<T: FortranScalar>(
    func: &'static str,
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    queue: &Queue,
) -> Result<VectorPairArgs> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx == 0);
    blas_error_if!(func, incy == 0);
    narrow!(func, to_device_int; n, incx, incy);
    check_vector(func, "x", x.len(), n, incx)?;
    check_vector(func, "y", y.len(), n, incy)?;
    x.check_on(func, "x", queue)?;
    y.check_on(func, "y", queue)?;
    Ok(VectorPairArgs {
        precision: T::PRECISION,
        n,
        x: x.as_ptr(),
        incx,
        y: y.as_ptr(),
        incy,
    })
}

pub fn copy<T: FortranScalar>(
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &mut DeviceBuffer<T>,
    incy: i64,
    queue: &Queue,
) -> Result<()> {
    let args = pair_args("copy", n, x, incx, y, incy, queue)?;
    launch(queue, "copy", |p, s| p.copy(s, &args))
}

pub fn swap<T: FortranScalar>(
    n: i64,
    x: &mut DeviceBuffer<T>,
    incx: i64,
    y: &mut DeviceBuffer<T>,
    incy: i64,
    queue: &Queue,
) -> Result<()> {
    let args = pair_args("swap", n, x, incx, y, incy, queue)?;
    launch(queue, "swap", |p, s| p.swap(s, &args))
}

#[allow(clippy::too_many_arguments)]
fn dot_impl<T: FortranScalar>(
    func: &'static str,
    conjugate: bool,
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    result: &mut DeviceBuffer<T>,
    queue: &Queue,
) -> Result<()> {
    let pair = pair_args(func, n, x, incx, y, incy, queue)?;
    check_extent(func, "result", result.len(), 1)?;
    result.check_on(func, "result", queue)?;
    let args = DotArgs {
        precision: pair.precision,
        conjugate,
        n: pair.n,
        x: pair.x,
        incx: pair.incx,
        y: pair.y,
        incy: pair.incy,
        result: result.as_ptr(),
    };
    launch(queue, func, |p, s| p.dot(s, &args))
}

/// `result[0] := conj(x)·y` for complex types, `x·y` for real ones.
#[allow(clippy::too_many_arguments)]
pub fn dot<T: FortranScalar>(
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    result: &mut DeviceBuffer<T>,
    queue: &Queue,
) -> Result<()> {
    dot_impl("dot", true, n, x, incx, y, incy, result, queue)
}

/// `result[0] := x·y` without conjugation.
#[allow(clippy::too_many_arguments)]
pub fn dotu<T: FortranScalar>(
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    y: &DeviceBuffer<T>,
    incy: i64,
    result: &mut DeviceBuffer<T>,
    queue: &Queue,
) -> Result<()> {
    dot_impl("dotu", false, n, x, incx, y, incy, result, queue)
}

fn reduction_args<T: FortranScalar, R: Copy>(
    func: &'static str,
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    result: &mut DeviceBuffer<R>,
    queue: &Queue,
) -> Result<ReductionArgs> {
    blas_error_if!(func, n < 0);
    blas_error_if!(func, incx <= 0);
    narrow!(func, to_device_int; n, incx);
    check_vector(func, "x", x.len(), n, incx)?;
    check_extent(func, "result", result.len(), 1)?;
    x.check_on(func, "x", queue)?;
    result.check_on(func, "result", queue)?;
    Ok(ReductionArgs {
        precision: T::PRECISION,
        n,
        x: x.as_ptr(),
        incx,
        result: result.as_ptr(),
    })
}

/// `result[0] := ||x||_2`
pub fn nrm2<T: FortranScalar>(
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    result: &mut DeviceBuffer<T::Real>,
    queue: &Queue,
) -> Result<()> {
    let args = reduction_args("nrm2", n, x, incx, result, queue)?;
    launch(queue, "nrm2", |p, s| p.nrm2(s, &args))
}

/// `result[0] := sum(|re| + |im|)`
pub fn asum<T: FortranScalar>(
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    result: &mut DeviceBuffer<T::Real>,
    queue: &Queue,
) -> Result<()> {
    let args = reduction_args("asum", n, x, incx, result, queue)?;
    launch(queue, "asum", |p, s| p.asum(s, &args))
}

/// `result[0] :=` one-based position of the first element of largest
/// `|re| + |im|`, or 0 for an empty vector.
pub fn iamax<T: FortranScalar>(
    n: i64,
    x: &DeviceBuffer<T>,
    incx: i64,
    result: &mut DeviceBuffer<DeviceInt>,
    queue: &Queue,
) -> Result<()> {
    let args = reduction_args("iamax", n, x, incx, result, queue)?;
    launch(queue, "iamax", |p, s| p.iamax(s, &args))
}
