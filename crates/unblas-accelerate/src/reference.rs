//! Host reference kernels run by the in-process provider's stream workers.
//!
//! Column-major, reference BLAS semantics including negative increments
//! (element `i` of a vector with `inc < 0` lives at `(n-1-i)*|inc|`).
//! Callers guarantee pointer extents; sizes are already validated.

use unblas_abi::{FortranScalar, RealScalar, Transpose};
use unblas_accelerate_api::DeviceInt;

#[inline]
fn offset(i: usize, n: usize, inc: DeviceInt) -> usize {
    let step = inc.unsigned_abs() as usize;
    if inc >= 0 {
        i * step
    } else {
        (n - 1 - i) * step
    }
}

#[inline]
fn len(n: DeviceInt) -> usize {
    n.max(0) as usize
}

pub(crate) unsafe fn axpy<T: FortranScalar>(
    n: DeviceInt,
    alpha: T,
    x: *const T,
    incx: DeviceInt,
    y: *mut T,
    incy: DeviceInt,
) {
    let n = len(n);
    for i in 0..n {
        let yi = y.add(offset(i, n, incy));
        *yi += alpha * *x.add(offset(i, n, incx));
    }
}

pub(crate) unsafe fn scal<T: FortranScalar>(n: DeviceInt, alpha: T, x: *mut T, incx: DeviceInt) {
    let n = len(n);
    for i in 0..n {
        let xi = x.add(offset(i, n, incx));
        *xi = alpha * *xi;
    }
}

pub(crate) unsafe fn copy<T: FortranScalar>(
    n: DeviceInt,
    x: *const T,
    incx: DeviceInt,
    y: *mut T,
    incy: DeviceInt,
) {
    let n = len(n);
    for i in 0..n {
        *y.add(offset(i, n, incy)) = *x.add(offset(i, n, incx));
    }
}

pub(crate) unsafe fn swap<T: FortranScalar>(
    n: DeviceInt,
    x: *mut T,
    incx: DeviceInt,
    y: *mut T,
    incy: DeviceInt,
) {
    let n = len(n);
    for i in 0..n {
        std::ptr::swap(x.add(offset(i, n, incx)), y.add(offset(i, n, incy)));
    }
}

pub(crate) unsafe fn dot<T: FortranScalar>(
    conjugate: bool,
    n: DeviceInt,
    x: *const T,
    incx: DeviceInt,
    y: *const T,
    incy: DeviceInt,
) -> T {
    let n = len(n);
    let mut acc = T::zero();
    for i in 0..n {
        let xi = *x.add(offset(i, n, incx));
        let xi = if conjugate { xi.conj() } else { xi };
        acc += xi * *y.add(offset(i, n, incy));
    }
    acc
}

/// Euclidean norm as `scale * sqrt(ssq)`, rescaled whenever a larger
/// magnitude arrives so squares neither overflow nor underflow.
pub(crate) unsafe fn nrm2<T: FortranScalar>(n: DeviceInt, x: *const T, incx: DeviceInt) -> T::Real {
    let n = len(n);
    let mut scale = 0.0f64;
    let mut ssq = 1.0f64;
    for i in 0..n {
        let xi = *x.add(offset(i, n, incx));
        for part in [xi.re(), xi.im()] {
            let a = part.to_f64().abs();
            if a == 0.0 {
                continue;
            }
            if scale < a {
                ssq = 1.0 + ssq * (scale / a).powi(2);
                scale = a;
            } else {
                ssq += (a / scale).powi(2);
            }
        }
    }
    <T::Real as RealScalar>::from_f64(scale * ssq.sqrt())
}

pub(crate) unsafe fn asum<T: FortranScalar>(n: DeviceInt, x: *const T, incx: DeviceInt) -> T::Real {
    let n = len(n);
    let mut acc = T::Real::zero();
    for i in 0..n {
        acc += (*x.add(offset(i, n, incx))).abs1();
    }
    acc
}

/// One-based index of the first maximum of `|re| + |im|`; 0 for an empty vector.
pub(crate) unsafe fn iamax<T: FortranScalar>(n: DeviceInt, x: *const T, incx: DeviceInt) -> DeviceInt {
    let n = len(n);
    let mut best: Option<(usize, T::Real)> = None;
    for i in 0..n {
        let v = (*x.add(offset(i, n, incx))).abs1();
        match best {
            Some((_, b)) if !(v > b) => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i as DeviceInt + 1).unwrap_or(0)
}

#[inline]
unsafe fn element<T: FortranScalar>(a: *const T, lda: usize, trans: Transpose, i: usize, j: usize) -> T {
    match trans {
        Transpose::NoTrans => *a.add(i + j * lda),
        Transpose::Trans => *a.add(j + i * lda),
        Transpose::ConjTrans => (*a.add(j + i * lda)).conj(),
    }
}

/// `y := alpha*op(A)*x + beta*y`; `beta == 0` ignores the prior contents of `y`.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn gemv<T: FortranScalar>(
    trans: Transpose,
    m: DeviceInt,
    n: DeviceInt,
    alpha: T,
    a: *const T,
    lda: DeviceInt,
    x: *const T,
    incx: DeviceInt,
    beta: T,
    y: *mut T,
    incy: DeviceInt,
) {
    let (rows, cols) = match trans {
        Transpose::NoTrans => (len(m), len(n)),
        _ => (len(n), len(m)),
    };
    let lda = len(lda);
    for i in 0..rows {
        let mut acc = T::zero();
        for j in 0..cols {
            acc += element(a, lda, trans, i, j) * *x.add(offset(j, cols, incx));
        }
        let yi = y.add(offset(i, rows, incy));
        *yi = if beta == T::zero() {
            alpha * acc
        } else {
            alpha * acc + beta * *yi
        };
    }
}

/// `A := alpha*x*y**T + A`, or `alpha*x*y**H + A` when `conjugate`.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn ger<T: FortranScalar>(
    conjugate: bool,
    m: DeviceInt,
    n: DeviceInt,
    alpha: T,
    x: *const T,
    incx: DeviceInt,
    y: *const T,
    incy: DeviceInt,
    a: *mut T,
    lda: DeviceInt,
) {
    let (m, n, lda) = (len(m), len(n), len(lda));
    for j in 0..n {
        let yj = *y.add(offset(j, n, incy));
        let yj = if conjugate { yj.conj() } else { yj };
        let scale = alpha * yj;
        for i in 0..m {
            *a.add(i + j * lda) += *x.add(offset(i, m, incx)) * scale;
        }
    }
}

/// `C := alpha*op(A)*op(B) + beta*C`; `beta == 0` ignores the prior contents of `C`.
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn gemm<T: FortranScalar>(
    transa: Transpose,
    transb: Transpose,
    m: DeviceInt,
    n: DeviceInt,
    k: DeviceInt,
    alpha: T,
    a: *const T,
    lda: DeviceInt,
    b: *const T,
    ldb: DeviceInt,
    beta: T,
    c: *mut T,
    ldc: DeviceInt,
) {
    let (m, n, k) = (len(m), len(n), len(k));
    let (lda, ldb, ldc) = (len(lda), len(ldb), len(ldc));
    for j in 0..n {
        for i in 0..m {
            let mut acc = T::zero();
            for l in 0..k {
                acc += element(a, lda, transa, i, l) * element(b, ldb, transb, l, j);
            }
            let cij = c.add(i + j * ldc);
            *cij = if beta == T::zero() {
                alpha * acc
            } else {
                alpha * acc + beta * *cij
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unblas_abi::Complex64;

    #[test]
    fn negative_increment_walks_backwards() {
        let x = [1.0f64, 2.0, 3.0];
        let mut y = [0.0f64; 3];
        unsafe { copy(3, x.as_ptr(), -1, y.as_mut_ptr(), 1) };
        assert_eq!(y, [3.0, 2.0, 1.0]);
    }

    #[test]
    fn nrm2_survives_large_and_tiny_magnitudes() {
        let big = [1e200f64, 1e200];
        let n = unsafe { nrm2(2, big.as_ptr(), 1) };
        assert!(n.is_finite());
        assert!((n / (2f64.sqrt() * 1e200) - 1.0).abs() < 1e-14);

        let tiny = [3e-200f64, 4e-200];
        let n = unsafe { nrm2(2, tiny.as_ptr(), 1) };
        assert!((n / 5e-200 - 1.0).abs() < 1e-14);

        let z = [Complex64::new(3.0, 4.0), Complex64::new(0.0, 0.0)];
        assert_eq!(unsafe { nrm2(2, z.as_ptr(), 1) }, 5.0);
        assert_eq!(unsafe { nrm2(0, z.as_ptr(), 1) }, 0.0);
    }

    #[test]
    fn iamax_takes_first_maximum() {
        let x = [1.0f64, -4.0, 4.0, 2.0];
        assert_eq!(unsafe { iamax(4, x.as_ptr(), 1) }, 2);
        assert_eq!(unsafe { iamax(0, x.as_ptr(), 1) }, 0);
    }

    #[test]
    fn complex_dot_conjugates_first_operand() {
        let x = [Complex64::new(0.0, 1.0)];
        let y = [Complex64::new(0.0, 1.0)];
        let c = unsafe { dot(true, 1, x.as_ptr(), 1, y.as_ptr(), 1) };
        let u = unsafe { dot(false, 1, x.as_ptr(), 1, y.as_ptr(), 1) };
        assert_eq!(c, Complex64::new(1.0, 0.0));
        assert_eq!(u, Complex64::new(-1.0, 0.0));
    }

    #[test]
    fn gemm_transposed_operand() {
        // A is 2x2 column-major [[1,2],[3,4]]; C = A^T * I
        let a = [1.0f64, 3.0, 2.0, 4.0];
        let b = [1.0f64, 0.0, 0.0, 1.0];
        let mut c = [f64::NAN; 4];
        unsafe {
            gemm(
                Transpose::Trans,
                Transpose::NoTrans,
                2,
                2,
                2,
                1.0,
                a.as_ptr(),
                2,
                b.as_ptr(),
                2,
                0.0,
                c.as_mut_ptr(),
                2,
            )
        };
        assert_eq!(c, [1.0, 2.0, 3.0, 4.0]);
    }
}
