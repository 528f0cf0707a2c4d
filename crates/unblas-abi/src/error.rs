use crate::kernel::{Operation, Precision};
use crate::profile::IntWidth;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AbiError {
    #[error("failed to load BLAS library '{path}': {source}")]
    LibraryLoad {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("no Fortran BLAS library could be loaded (tried {tried})")]
    LibraryNotFound { tried: String },

    #[error("symbol '{symbol}' not found in '{path}'")]
    MissingSymbol {
        symbol: String,
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("{op:?} has no native kernel for {precision:?}")]
    NoKernel { op: Operation, precision: Precision },

    #[error("ABI profile already resolved as {active}; refusing to switch to {requested}")]
    ProfileLocked { active: String, requested: String },

    #[error("native integer width {requested:?} does not match this build ({built:?})")]
    IntWidthMismatch { requested: IntWidth, built: IntWidth },
}
