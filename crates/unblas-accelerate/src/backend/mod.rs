//! GPU runtime backends, loaded at run time.

#[cfg(any(feature = "cuda", feature = "rocm"))]
pub mod vendor;

#[cfg(feature = "cuda")]
pub mod cuda;

#[cfg(feature = "rocm")]
pub mod rocm;
