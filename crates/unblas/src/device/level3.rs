use super::{launch, DeviceBuffer, Queue};
use crate::error::Result;
use crate::validate::{blas_error_if, check_matrix, narrow, stored, to_device_int};
use unblas_abi::{ComplexScalar, Diag, FortranScalar, Side, Transpose, Uplo};
use unblas_accelerate_api::{
    DeviceInt, GemmArgs, Rank2KArgs, RankKArgs, SymmArgs, TriangularArgs,
};

/// `C := alpha*op(A)*op(B) + beta*C` with `C` of shape `m x n`.
#[allow(clippy::too_many_arguments)]
pub fn gemm<T: FortranScalar>(
    transa: Transpose,
    transb: Transpose,
    m: i64,
    n: i64,
    k: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    beta: T,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "gemm";
    let (a_rows, a_cols) = stored(transa, m, k);
    let (b_rows, b_cols) = stored(transb, k, n);
    blas_error_if!(FUNC, m < 0);
    blas_error_if!(FUNC, n < 0);
    blas_error_if!(FUNC, k < 0);
    blas_error_if!(FUNC, lda < a_rows.max(1));
    blas_error_if!(FUNC, ldb < b_rows.max(1));
    blas_error_if!(FUNC, ldc < m.max(1));
    narrow!(FUNC, to_device_int; m, n, k, lda, ldb, ldc, a_rows, a_cols, b_rows, b_cols);
    check_matrix(FUNC, "a", a.len(), a_rows, a_cols, lda)?;
    check_matrix(FUNC, "b", b.len(), b_rows, b_cols, ldb)?;
    check_matrix(FUNC, "c", c.len(), m, n, ldc)?;
    a.check_on(FUNC, "a", queue)?;
    b.check_on(FUNC, "b", queue)?;
    c.check_on(FUNC, "c", queue)?;
    let args = GemmArgs {
        precision: T::PRECISION,
        transa,
        transb,
        m,
        n,
        k,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        b: b.as_ptr(),
        ldb,
        beta: beta.into_value(),
        c: c.as_ptr(),
        ldc,
    };
    launch(queue, FUNC, |p, s| p.gemm(s, &args))
}

/// Narrowed `(m, n, lda, ldb, ldc)` of a `symm`/`hemm` call.
#[allow(clippy::too_many_arguments)]
fn check_symm<T: FortranScalar>(
    func: &'static str,
    side: Side,
    m: i64,
    n: i64,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    c: &DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<[DeviceInt; 5]> {
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    blas_error_if!(func, m < 0);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, lda < ka.max(1));
    blas_error_if!(func, ldb < m.max(1));
    blas_error_if!(func, ldc < m.max(1));
    narrow!(func, to_device_int; m, n, ka, lda, ldb, ldc);
    check_matrix(func, "a", a.len(), ka, ka, lda)?;
    check_matrix(func, "b", b.len(), m, n, ldb)?;
    check_matrix(func, "c", c.len(), m, n, ldc)?;
    a.check_on(func, "a", queue)?;
    b.check_on(func, "b", queue)?;
    c.check_on(func, "c", queue)?;
    Ok([m, n, lda, ldb, ldc])
}

#[allow(clippy::too_many_arguments)]
fn symm_impl<T: FortranScalar>(
    func: &'static str,
    hermitian: bool,
    side: Side,
    uplo: Uplo,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    beta: T,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    let [m, n, lda, ldb, ldc] = check_symm(func, side, m, n, a, lda, b, ldb, c, ldc, queue)?;
    let args = SymmArgs {
        precision: T::PRECISION,
        hermitian,
        side,
        uplo,
        m,
        n,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        b: b.as_ptr(),
        ldb,
        beta: beta.into_value(),
        c: c.as_ptr(),
        ldc,
    };
    launch(queue, func, |p, s| p.symm(s, &args))
}

/// `C := alpha*A*B + beta*C` (or `B*A` on the right) for symmetric `A`.
#[allow(clippy::too_many_arguments)]
pub fn symm<T: FortranScalar>(
    side: Side,
    uplo: Uplo,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    beta: T,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    symm_impl("symm", false, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc, queue)
}

/// Hermitian counterpart of [`symm`].
#[allow(clippy::too_many_arguments)]
pub fn hemm<T: ComplexScalar>(
    side: Side,
    uplo: Uplo,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    beta: T,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    symm_impl("hemm", true, side, uplo, m, n, alpha, a, lda, b, ldb, beta, c, ldc, queue)
}

/// Narrowed `(n, k, lda, ldb, ldc)` of a rank-k or rank-2k update; `ldb`
/// mirrors `lda` when there is no `B`.
#[allow(clippy::too_many_arguments)]
fn check_rank_k<T: FortranScalar>(
    func: &'static str,
    trans: Transpose,
    n: i64,
    k: i64,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: Option<(&DeviceBuffer<T>, i64)>,
    c: &DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<[DeviceInt; 5]> {
    let (rows, cols) = stored(trans, n, k);
    let ldb = b.map_or(lda, |(_, ldb)| ldb);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, k < 0);
    blas_error_if!(func, lda < rows.max(1));
    blas_error_if!(func, ldb < rows.max(1));
    blas_error_if!(func, ldc < n.max(1));
    narrow!(func, to_device_int; n, k, lda, ldb, ldc, rows, cols);
    check_matrix(func, "a", a.len(), rows, cols, lda)?;
    if let Some((b, _)) = b {
        check_matrix(func, "b", b.len(), rows, cols, ldb)?;
    }
    check_matrix(func, "c", c.len(), n, n, ldc)?;
    a.check_on(func, "a", queue)?;
    if let Some((b, _)) = b {
        b.check_on(func, "b", queue)?;
    }
    c.check_on(func, "c", queue)?;
    Ok([n, k, lda, ldb, ldc])
}

/// `C := alpha*A*A**T + beta*C` (or `A**T*A`) for symmetric `C`.
///
/// Complex types accept `NoTrans` and `Trans` only.
#[allow(clippy::too_many_arguments)]
pub fn syrk<T: FortranScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    beta: T,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "syrk";
    blas_error_if!(FUNC, T::PRECISION.is_complex() && trans == Transpose::ConjTrans);
    let [n, k, lda, _, ldc] = check_rank_k(FUNC, trans, n, k, a, lda, None, c, ldc, queue)?;
    let args = RankKArgs {
        precision: T::PRECISION,
        hermitian: false,
        uplo,
        trans,
        n,
        k,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        beta: beta.into_value(),
        c: c.as_ptr(),
        ldc,
    };
    launch(queue, FUNC, |p, s| p.syrk(s, &args))
}

/// `C := alpha*A*A**H + beta*C` (or `A**H*A`) for Hermitian `C`, real
/// `alpha` and `beta`. Accepts `NoTrans` and `ConjTrans` only.
#[allow(clippy::too_many_arguments)]
pub fn herk<T: ComplexScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T::Real,
    a: &DeviceBuffer<T>,
    lda: i64,
    beta: T::Real,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "herk";
    blas_error_if!(FUNC, trans == Transpose::Trans);
    let [n, k, lda, _, ldc] = check_rank_k(FUNC, trans, n, k, a, lda, None, c, ldc, queue)?;
    let args = RankKArgs {
        precision: T::PRECISION,
        hermitian: true,
        uplo,
        trans,
        n,
        k,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        beta: beta.into_value(),
        c: c.as_ptr(),
        ldc,
    };
    launch(queue, FUNC, |p, s| p.syrk(s, &args))
}

/// `C := alpha*A*B**T + alpha*B*A**T + beta*C` for symmetric `C`.
#[allow(clippy::too_many_arguments)]
pub fn syr2k<T: FortranScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    beta: T,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "syr2k";
    blas_error_if!(FUNC, T::PRECISION.is_complex() && trans == Transpose::ConjTrans);
    let [n, k, lda, ldb, ldc] =
        check_rank_k(FUNC, trans, n, k, a, lda, Some((b, ldb)), c, ldc, queue)?;
    let args = Rank2KArgs {
        precision: T::PRECISION,
        hermitian: false,
        uplo,
        trans,
        n,
        k,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        b: b.as_ptr(),
        ldb,
        beta: beta.into_value(),
        c: c.as_ptr(),
        ldc,
    };
    launch(queue, FUNC, |p, s| p.syr2k(s, &args))
}

/// `C := alpha*A*B**H + conj(alpha)*B*A**H + beta*C` for Hermitian `C`, real `beta`.
#[allow(clippy::too_many_arguments)]
pub fn her2k<T: ComplexScalar>(
    uplo: Uplo,
    trans: Transpose,
    n: i64,
    k: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    beta: T::Real,
    c: &mut DeviceBuffer<T>,
    ldc: i64,
    queue: &Queue,
) -> Result<()> {
    const FUNC: &str = "her2k";
    blas_error_if!(FUNC, trans == Transpose::Trans);
    let [n, k, lda, ldb, ldc] =
        check_rank_k(FUNC, trans, n, k, a, lda, Some((b, ldb)), c, ldc, queue)?;
    let args = Rank2KArgs {
        precision: T::PRECISION,
        hermitian: true,
        uplo,
        trans,
        n,
        k,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        b: b.as_ptr(),
        ldb,
        beta: beta.into_value(),
        c: c.as_ptr(),
        ldc,
    };
    launch(queue, FUNC, |p, s| p.syr2k(s, &args))
}

#[allow(clippy::too_many_arguments)]
fn triangular_args<T: FortranScalar>(
    func: &'static str,
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &DeviceBuffer<T>,
    ldb: i64,
    queue: &Queue,
) -> Result<TriangularArgs> {
    let ka = match side {
        Side::Left => m,
        Side::Right => n,
    };
    blas_error_if!(func, m < 0);
    blas_error_if!(func, n < 0);
    blas_error_if!(func, lda < ka.max(1));
    blas_error_if!(func, ldb < m.max(1));
    narrow!(func, to_device_int; m, n, ka, lda, ldb);
    check_matrix(func, "a", a.len(), ka, ka, lda)?;
    check_matrix(func, "b", b.len(), m, n, ldb)?;
    a.check_on(func, "a", queue)?;
    b.check_on(func, "b", queue)?;
    Ok(TriangularArgs {
        precision: T::PRECISION,
        side,
        uplo,
        trans,
        diag,
        m,
        n,
        alpha: alpha.into_value(),
        a: a.as_ptr(),
        lda,
        b: b.as_ptr(),
        ldb,
    })
}

/// `B := alpha*op(A)*B` (or `B*op(A)`) for triangular `A`.
#[allow(clippy::too_many_arguments)]
pub fn trmm<T: FortranScalar>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &mut DeviceBuffer<T>,
    ldb: i64,
    queue: &Queue,
) -> Result<()> {
    let args = triangular_args("trmm", side, uplo, trans, diag, m, n, alpha, a, lda, b, ldb, queue)?;
    launch(queue, "trmm", |p, s| p.trmm(s, &args))
}

/// Solve `op(A)*X = alpha*B` (or `X*op(A)`) in place in `B`.
#[allow(clippy::too_many_arguments)]
pub fn trsm<T: FortranScalar>(
    side: Side,
    uplo: Uplo,
    trans: Transpose,
    diag: Diag,
    m: i64,
    n: i64,
    alpha: T,
    a: &DeviceBuffer<T>,
    lda: i64,
    b: &mut DeviceBuffer<T>,
    ldb: i64,
    queue: &Queue,
) -> Result<()> {
    let args = triangular_args("trsm", side, uplo, trans, diag, m, n, alpha, a, lda, b, ldb, queue)?;
    launch(queue, "trsm", |p, s| p.trsm(s, &args))
}
