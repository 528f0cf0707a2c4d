//! unblas ABI: the Fortran calling-convention layer
//!
//! Native Fortran BLAS libraries disagree on almost everything except the
//! arithmetic: symbol decoration, whether character arguments carry hidden
//! trailing lengths, how complex functions hand back their result and whether
//! single-precision functions actually return `double`. This crate captures
//! those choices in one [`AbiProfile`], computes the [`CallShape`] of every
//! kernel under that profile and calls the resolved symbol accordingly.
//!
//! The typed entry points in [`fortran`] are thin and `unsafe`: they take raw
//! pointers and native integers and expect arguments to be validated already.

pub mod error;
pub mod flags;
pub mod fortran;
pub mod kernel;
pub mod library;
pub mod profile;
pub mod scalar;
pub mod shape;

pub use error::AbiError;
pub use flags::{Diag, Side, Transpose, Uplo};
pub use kernel::{KernelDescriptor, Operation, Precision, ResultKind};
pub use library::{configure_host_library, host_library, HostLibraryOptions, NativeBlas};
pub use profile::{
    active_profile, install_profile, AbiProfile, ComplexReturn, FloatReturn, IntWidth, Mangling,
    StrlenConvention,
};
pub use scalar::{
    BlasInt, Complex32, Complex64, ComplexScalar, FortranScalar, RealScalar, ScalarValue,
};
pub use shape::{CallShape, ComplexResult, RealResult};
