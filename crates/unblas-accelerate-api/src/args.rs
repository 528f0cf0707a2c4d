//! Precision-tagged argument packs handed to providers.
//!
//! All sizes are already validated and narrowed to [`DeviceInt`]; pointers
//! are device addresses (or pinned host addresses) of the tagged precision.

use crate::{DeviceInt, DevicePtr};
use unblas_abi::{Diag, Precision, ScalarValue, Side, Transpose, Uplo};

#[derive(Debug, Clone, Copy)]
pub struct AxpyArgs {
    pub precision: Precision,
    pub n: DeviceInt,
    pub alpha: ScalarValue,
    pub x: DevicePtr,
    pub incx: DeviceInt,
    pub y: DevicePtr,
    pub incy: DeviceInt,
}

#[derive(Debug, Clone, Copy)]
pub struct ScalArgs {
    pub precision: Precision,
    pub n: DeviceInt,
    pub alpha: ScalarValue,
    pub x: DevicePtr,
    pub incx: DeviceInt,
}

/// Two-vector kernels without scalars: `copy` (x read, y written) and `swap`.
#[derive(Debug, Clone, Copy)]
pub struct VectorPairArgs {
    pub precision: Precision,
    pub n: DeviceInt,
    pub x: DevicePtr,
    pub incx: DeviceInt,
    pub y: DevicePtr,
    pub incy: DeviceInt,
}

#[derive(Debug, Clone, Copy)]
pub struct DotArgs {
    pub precision: Precision,
    /// `conj(x)·y` when set (complex types only).
    pub conjugate: bool,
    pub n: DeviceInt,
    pub x: DevicePtr,
    pub incx: DeviceInt,
    pub y: DevicePtr,
    pub incy: DeviceInt,
    /// One element of `precision`, device resident.
    pub result: DevicePtr,
}

/// `nrm2`, `asum` (real result of `precision.real()`) and `iamax`
/// (one-based [`DeviceInt`] result).
#[derive(Debug, Clone, Copy)]
pub struct ReductionArgs {
    pub precision: Precision,
    pub n: DeviceInt,
    pub x: DevicePtr,
    pub incx: DeviceInt,
    pub result: DevicePtr,
}

#[derive(Debug, Clone, Copy)]
pub struct GemvArgs {
    pub precision: Precision,
    pub trans: Transpose,
    pub m: DeviceInt,
    pub n: DeviceInt,
    pub alpha: ScalarValue,
    pub a: DevicePtr,
    pub lda: DeviceInt,
    pub x: DevicePtr,
    pub incx: DeviceInt,
    pub beta: ScalarValue,
    pub y: DevicePtr,
    pub incy: DeviceInt,
}

#[derive(Debug, Clone, Copy)]
pub struct GerArgs {
    pub precision: Precision,
    /// `x*y**H` when set (complex types only).
    pub conjugate: bool,
    pub m: DeviceInt,
    pub n: DeviceInt,
    pub alpha: ScalarValue,
    pub x: DevicePtr,
    pub incx: DeviceInt,
    pub y: DevicePtr,
    pub incy: DeviceInt,
    pub a: DevicePtr,
    pub lda: DeviceInt,
}

#[derive(Debug, Clone, Copy)]
pub struct GemmArgs {
    pub precision: Precision,
    pub transa: Transpose,
    pub transb: Transpose,
    pub m: DeviceInt,
    pub n: DeviceInt,
    pub k: DeviceInt,
    pub alpha: ScalarValue,
    pub a: DevicePtr,
    pub lda: DeviceInt,
    pub b: DevicePtr,
    pub ldb: DeviceInt,
    pub beta: ScalarValue,
    pub c: DevicePtr,
    pub ldc: DeviceInt,
}

/// `symm`, or `hemm` when `hermitian`.
#[derive(Debug, Clone, Copy)]
pub struct SymmArgs {
    pub precision: Precision,
    pub hermitian: bool,
    pub side: Side,
    pub uplo: Uplo,
    pub m: DeviceInt,
    pub n: DeviceInt,
    pub alpha: ScalarValue,
    pub a: DevicePtr,
    pub lda: DeviceInt,
    pub b: DevicePtr,
    pub ldb: DeviceInt,
    pub beta: ScalarValue,
    pub c: DevicePtr,
    pub ldc: DeviceInt,
}

/// `syrk`, or `herk` when `hermitian` (then `alpha` and `beta` are real).
#[derive(Debug, Clone, Copy)]
pub struct RankKArgs {
    pub precision: Precision,
    pub hermitian: bool,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub n: DeviceInt,
    pub k: DeviceInt,
    pub alpha: ScalarValue,
    pub a: DevicePtr,
    pub lda: DeviceInt,
    pub beta: ScalarValue,
    pub c: DevicePtr,
    pub ldc: DeviceInt,
}

/// `syr2k`, or `her2k` when `hermitian` (then `beta` is real).
#[derive(Debug, Clone, Copy)]
pub struct Rank2KArgs {
    pub precision: Precision,
    pub hermitian: bool,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub n: DeviceInt,
    pub k: DeviceInt,
    pub alpha: ScalarValue,
    pub a: DevicePtr,
    pub lda: DeviceInt,
    pub b: DevicePtr,
    pub ldb: DeviceInt,
    pub beta: ScalarValue,
    pub c: DevicePtr,
    pub ldc: DeviceInt,
}

/// `trmm` and `trsm`; `b` is overwritten in place.
#[derive(Debug, Clone, Copy)]
pub struct TriangularArgs {
    pub precision: Precision,
    pub side: Side,
    pub uplo: Uplo,
    pub trans: Transpose,
    pub diag: Diag,
    pub m: DeviceInt,
    pub n: DeviceInt,
    pub alpha: ScalarValue,
    pub a: DevicePtr,
    pub lda: DeviceInt,
    pub b: DevicePtr,
    pub ldb: DeviceInt,
}
