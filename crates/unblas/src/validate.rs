//! Argument rules shared by the host and device paths.
//!
//! Callers check in a fixed order: logical rules with `blas_error_if!`,
//! then narrowing with `narrow!`, then buffer extents on the narrowed values.
//! Only then is a native routine reached.

use crate::error::{Error, Result};
use unblas_abi::{BlasInt, Transpose};
use unblas_accelerate_api::DeviceInt;

/// Fail with `Error::Precondition` naming the violated condition.
macro_rules! blas_error_if {
    ($func:expr, $cond:expr) => {
        if $cond {
            return Err($crate::error::Error::Precondition {
                func: $func,
                condition: stringify!($cond).to_string(),
            });
        }
    };
}
pub(crate) use blas_error_if;

/// Rebind each named `i64` through a narrowing conversion.
macro_rules! narrow {
    ($func:expr, $conv:path; $($v:ident),+ $(,)?) => {
        $( let $v = $conv($func, stringify!($v), $v)?; )+
    };
}
pub(crate) use narrow;

#[allow(clippy::useless_conversion)]
pub(crate) fn to_blas_int(func: &'static str, arg: &'static str, value: i64) -> Result<BlasInt> {
    BlasInt::try_from(value).map_err(|_| Error::Overflow {
        func,
        arg,
        value,
        max: BlasInt::MAX as i64,
    })
}

pub(crate) fn to_device_int(func: &'static str, arg: &'static str, value: i64) -> Result<DeviceInt> {
    DeviceInt::try_from(value).map_err(|_| Error::Overflow {
        func,
        arg,
        value,
        max: DeviceInt::MAX as i64,
    })
}

/// Elements spanned by `n` entries at stride `inc`.
pub(crate) fn vector_extent(n: i64, inc: i64) -> u128 {
    if n <= 0 {
        0
    } else {
        1 + (n as u128 - 1) * inc.unsigned_abs() as u128
    }
}

/// Elements spanned by a `rows x cols` column-major matrix with leading dimension `ld`.
pub(crate) fn matrix_extent(rows: i64, cols: i64, ld: i64) -> u128 {
    if rows <= 0 || cols <= 0 {
        0
    } else {
        ld as u128 * (cols as u128 - 1) + rows as u128
    }
}

pub(crate) fn check_extent(func: &'static str, name: &str, len: usize, needed: u128) -> Result<()> {
    if (len as u128) < needed {
        return Err(Error::Precondition {
            func,
            condition: format!("{name} holds {len} elements but {needed} are addressed"),
        });
    }
    Ok(())
}

pub(crate) fn check_vector<I: Into<i64>>(
    func: &'static str,
    name: &str,
    len: usize,
    n: I,
    inc: I,
) -> Result<()> {
    check_extent(func, name, len, vector_extent(n.into(), inc.into()))
}

pub(crate) fn check_matrix<I: Into<i64>>(
    func: &'static str,
    name: &str,
    len: usize,
    rows: I,
    cols: I,
    ld: I,
) -> Result<()> {
    check_extent(func, name, len, matrix_extent(rows.into(), cols.into(), ld.into()))
}

/// Stored shape of `op(A)` when `op(A)` is `rows x cols`.
pub(crate) fn stored<I>(trans: Transpose, rows: I, cols: I) -> (I, I) {
    match trans {
        Transpose::NoTrans => (rows, cols),
        Transpose::Trans | Transpose::ConjTrans => (cols, rows),
    }
}
