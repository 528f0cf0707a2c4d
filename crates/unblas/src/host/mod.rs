//! Synchronous BLAS on host slices through the runtime-loaded Fortran library.
//!
//! Sizes and strides are `i64`; they are validated and narrowed to
//! [`BlasInt`](unblas_abi::BlasInt) before the native routine is resolved.
//! Matrices are column-major.

mod level1;
mod level2;
mod level3;

pub use level1::*;
pub use level2::*;
pub use level3::*;

use crate::error::{Error, Result};
use unblas_abi::NativeBlas;

fn library(func: &'static str) -> Result<&'static NativeBlas> {
    unblas_abi::host_library().map_err(|e| Error::abi(func, e))
}
