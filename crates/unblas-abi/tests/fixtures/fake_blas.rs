//! Minimal Fortran BLAS stand-in, compiled to a cdylib by `tests/fake_blas.rs`.
//!
//! Complex functions return through a hidden first argument and single
//! precision reductions return `double` (the f2c shapes). Routines taking
//! character flags expect trailing hidden lengths (the gfortran shape) and
//! record the values they receive.

use std::os::raw::c_char;
use std::sync::atomic::{AtomicUsize, Ordering};

#[repr(C)]
#[derive(Clone, Copy)]
pub struct Z {
    re: f64,
    im: f64,
}

#[allow(clippy::declare_interior_mutable_const)]
const UNSET: AtomicUsize = AtomicUsize::new(0);
static LENGTHS: [AtomicUsize; 4] = [UNSET; 4];
static RECORDED: AtomicUsize = AtomicUsize::new(0);

fn record(lengths: &[usize]) {
    for (slot, len) in LENGTHS.iter().zip(lengths) {
        slot.store(*len, Ordering::SeqCst);
    }
    RECORDED.store(lengths.len(), Ordering::SeqCst);
}

unsafe fn at<T: Copy>(p: *const T, i: i32, inc: i32) -> T {
    *p.offset((i * inc) as isize)
}

/// Copy the hidden lengths of the last flagged call into `out`; returns how many.
#[no_mangle]
pub unsafe extern "C" fn fake_hidden_lengths(out: *mut usize) -> usize {
    let n = RECORDED.load(Ordering::SeqCst);
    for (i, slot) in LENGTHS.iter().enumerate().take(n) {
        *out.add(i) = slot.load(Ordering::SeqCst);
    }
    n
}

#[no_mangle]
pub unsafe extern "C" fn zdotc_(
    out: *mut Z,
    n: *const i32,
    x: *const Z,
    incx: *const i32,
    y: *const Z,
    incy: *const i32,
) {
    let mut acc = Z { re: 0.0, im: 0.0 };
    for i in 0..*n {
        let (a, b) = (at(x, i, *incx), at(y, i, *incy));
        acc.re += a.re * b.re + a.im * b.im;
        acc.im += a.re * b.im - a.im * b.re;
    }
    *out = acc;
}

#[no_mangle]
pub unsafe extern "C" fn zdotu_(
    out: *mut Z,
    n: *const i32,
    x: *const Z,
    incx: *const i32,
    y: *const Z,
    incy: *const i32,
) {
    let mut acc = Z { re: 0.0, im: 0.0 };
    for i in 0..*n {
        let (a, b) = (at(x, i, *incx), at(y, i, *incy));
        acc.re += a.re * b.re - a.im * b.im;
        acc.im += a.re * b.im + a.im * b.re;
    }
    *out = acc;
}

#[no_mangle]
pub unsafe extern "C" fn sdot_(
    n: *const i32,
    x: *const f32,
    incx: *const i32,
    y: *const f32,
    incy: *const i32,
) -> f64 {
    (0..*n)
        .map(|i| at(x, i, *incx) as f64 * at(y, i, *incy) as f64)
        .sum()
}

#[no_mangle]
pub unsafe extern "C" fn ddot_(
    n: *const i32,
    x: *const f64,
    incx: *const i32,
    y: *const f64,
    incy: *const i32,
) -> f64 {
    (0..*n).map(|i| at(x, i, *incx) * at(y, i, *incy)).sum()
}

#[no_mangle]
pub unsafe extern "C" fn snrm2_(n: *const i32, x: *const f32, incx: *const i32) -> f64 {
    (0..*n)
        .map(|i| (at(x, i, *incx) as f64).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[no_mangle]
pub unsafe extern "C" fn sasum_(n: *const i32, x: *const f32, incx: *const i32) -> f64 {
    (0..*n).map(|i| (at(x, i, *incx) as f64).abs()).sum()
}

#[no_mangle]
pub unsafe extern "C" fn dgemv_(
    trans: *const c_char,
    m: *const i32,
    n: *const i32,
    alpha: *const f64,
    a: *const f64,
    lda: *const i32,
    x: *const f64,
    incx: *const i32,
    beta: *const f64,
    y: *mut f64,
    incy: *const i32,
    trans_len: usize,
) {
    record(&[trans_len]);
    let transposed = *trans as u8 != b'N';
    let (rows, cols) = if transposed { (*n, *m) } else { (*m, *n) };
    for r in 0..rows {
        let mut acc = 0.0;
        for c in 0..cols {
            let (i, j) = if transposed { (c, r) } else { (r, c) };
            acc += *a.offset((i + j * *lda) as isize) * at(x, c, *incx);
        }
        let yr = y.offset((r * *incy) as isize);
        *yr = *alpha * acc + *beta * *yr;
    }
}

#[no_mangle]
pub unsafe extern "C" fn dgemm_(
    transa: *const c_char,
    transb: *const c_char,
    m: *const i32,
    n: *const i32,
    k: *const i32,
    alpha: *const f64,
    a: *const f64,
    lda: *const i32,
    b: *const f64,
    ldb: *const i32,
    beta: *const f64,
    c: *mut f64,
    ldc: *const i32,
    transa_len: usize,
    transb_len: usize,
) {
    record(&[transa_len, transb_len]);
    let ta = *transa as u8 != b'N';
    let tb = *transb as u8 != b'N';
    let elem = |p: *const f64, ld: i32, t: bool, i: i32, j: i32| {
        if t {
            *p.offset((j + i * ld) as isize)
        } else {
            *p.offset((i + j * ld) as isize)
        }
    };
    for i in 0..*m {
        for j in 0..*n {
            let mut acc = 0.0;
            for l in 0..*k {
                acc += elem(a, *lda, ta, i, l) * elem(b, *ldb, tb, l, j);
            }
            let cij = c.offset((i + j * *ldc) as isize);
            *cij = *alpha * acc + *beta * *cij;
        }
    }
}
