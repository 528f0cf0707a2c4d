//! Host path against the system Fortran BLAS, when one can be loaded.
#![cfg(not(any(
    feature = "ilp64",
    feature = "accelerate",
    feature = "mangle-lower",
    feature = "mangle-upper",
    feature = "mangle-upper-underscore",
    feature = "complex-return-argument",
    feature = "f2c-float-return"
)))]

use unblas::{host, Complex64, Error, Transpose, Uplo};

fn have_blas() -> bool {
    match host::nrm2(0, &[0.0f64], 1) {
        Ok(_) => true,
        Err(Error::Unavailable { what, .. }) => {
            eprintln!("No system BLAS found ({what}), skipping test");
            false
        }
        Err(e) => panic!("unexpected error probing BLAS: {e}"),
    }
}

#[test]
fn level1_real() {
    if !have_blas() {
        return;
    }
    let x = [1.0f64, -2.0, 3.0];
    let mut y = [10.0f64, 20.0, 30.0];
    host::axpy(3, 2.0, &x, 1, &mut y, 1).unwrap();
    assert_eq!(y, [12.0, 16.0, 36.0]);
    assert_eq!(host::dot(3, &x, 1, &y, 1).unwrap(), 12.0 - 32.0 + 108.0);
    assert_eq!(host::asum(3, &x, 1).unwrap(), 6.0);
    assert_eq!(host::iamax(3, &x, 1).unwrap(), Some(2));
    assert_eq!(host::iamax(0, &x, 1).unwrap(), None);
    let n = host::nrm2(2, &[3.0f32, 4.0], 1).unwrap();
    assert!((n - 5.0).abs() < 1e-6);
}

#[test]
fn complex_dot_conjugates_only_when_asked() {
    if !have_blas() {
        return;
    }
    let x = [Complex64::new(1.0, 2.0), Complex64::new(3.0, -1.0)];
    let y = [Complex64::new(2.0, 1.0), Complex64::new(-1.0, 4.0)];
    assert_eq!(host::dot(2, &x, 1, &y, 1).unwrap(), Complex64::new(-3.0, 8.0));
    assert_eq!(host::dotu(2, &x, 1, &y, 1).unwrap(), Complex64::new(1.0, 18.0));
}

#[test]
fn givens_rotation() {
    if !have_blas() {
        return;
    }
    let (mut a, mut b) = (3.0f64, 4.0f64);
    let (c, s) = host::rotg(&mut a, &mut b).unwrap();
    assert!((a.abs() - 5.0).abs() < 1e-12);
    assert!((c * c + s * s - 1.0).abs() < 1e-12);
}

#[test]
fn gemm_with_character_flags() {
    if !have_blas() {
        return;
    }
    let a = [1.0f64, 3.0, 2.0, 4.0];
    let b = [5.0f64, 7.0, 6.0, 8.0];
    let mut c = [0.0f64; 4];
    host::gemm(
        Transpose::NoTrans,
        Transpose::NoTrans,
        2,
        2,
        2,
        1.0,
        &a,
        2,
        &b,
        2,
        0.0,
        &mut c,
        2,
    )
    .unwrap();
    assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);
}

#[test]
fn symmetric_rank_k_reads_one_triangle() {
    if !have_blas() {
        return;
    }
    // A = [1 2; 3 4], C = A*A**T; only the lower triangle is written.
    let a = [1.0f64, 3.0, 2.0, 4.0];
    let mut c = [0.0f64, 0.0, -1.0, 0.0];
    host::syrk(Uplo::Lower, Transpose::NoTrans, 2, 2, 1.0, &a, 2, 0.0, &mut c, 2).unwrap();
    assert_eq!(c, [5.0, 11.0, -1.0, 25.0]);
}
