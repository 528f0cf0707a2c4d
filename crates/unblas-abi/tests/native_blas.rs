//! Integration tests against the system Fortran BLAS, when one is installed.
#![cfg(not(feature = "ilp64"))]

use unblas_abi::library::DEFAULT_CANDIDATES;
use unblas_abi::{fortran, AbiProfile, Complex64, KernelDescriptor, NativeBlas, Operation, Precision, Transpose};

fn system_blas() -> Option<NativeBlas> {
    for name in DEFAULT_CANDIDATES.iter().take(2) {
        if let Ok(lib) = NativeBlas::load_by_name(name, AbiProfile::gnu()) {
            return Some(lib);
        }
    }
    eprintln!("No system BLAS found (tried openblas, blas), skipping test");
    None
}

#[test]
fn test_library_exports_mangled_names() {
    let Some(lib) = system_blas() else { return };
    let ddot = KernelDescriptor::new(Operation::Dot, Precision::Double).unwrap();
    assert!(lib.provides(&ddot));
    assert_eq!(lib.profile().symbol(&ddot), "ddot_");
}

#[test]
fn test_daxpy_and_ddot() {
    let Some(lib) = system_blas() else { return };
    let x = [1.0f64, 2.0, 3.0];
    let mut y = [10.0f64, 20.0, 30.0];
    unsafe {
        fortran::axpy(&lib, 3, 2.0, x.as_ptr(), 1, y.as_mut_ptr(), 1).unwrap();
    }
    assert_eq!(y, [12.0, 24.0, 36.0]);

    let dot = unsafe { fortran::dot(&lib, true, 3, x.as_ptr(), 1, y.as_ptr(), 1).unwrap() };
    assert!((dot - (12.0 + 48.0 + 108.0)).abs() < 1e-12);
}

#[test]
fn test_dgemm_with_hidden_lengths() {
    let Some(lib) = system_blas() else { return };
    // column-major 2x2
    let a = [1.0f64, 3.0, 2.0, 4.0];
    let b = [5.0f64, 7.0, 6.0, 8.0];
    let mut c = [0.0f64; 4];
    unsafe {
        fortran::gemm(
            &lib,
            Transpose::NoTrans,
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
        .unwrap();
    }
    assert_eq!(c, [19.0, 43.0, 22.0, 50.0]);
}

#[test]
fn test_idamax_is_one_based() {
    let Some(lib) = system_blas() else { return };
    let x = [1.0f64, -7.0, 3.0];
    let idx = unsafe { fortran::iamax(&lib, 3, x.as_ptr(), 1).unwrap() };
    assert_eq!(idx, 2);
}

#[test]
fn test_zdotc_by_value() {
    let Some(lib) = system_blas() else { return };
    if !lib.path().contains("openblas") {
        eprintln!("Complex return convention of {} unknown, skipping test", lib.path());
        return;
    }
    let x = [Complex64::new(1.0, 2.0), Complex64::new(0.0, 1.0)];
    let y = [Complex64::new(3.0, -1.0), Complex64::new(2.0, 2.0)];
    let dotc = unsafe { fortran::dot(&lib, true, 2, x.as_ptr(), 1, y.as_ptr(), 1).unwrap() };
    let dotu = unsafe { fortran::dot(&lib, false, 2, x.as_ptr(), 1, y.as_ptr(), 1).unwrap() };
    let expect_c: Complex64 = x.iter().zip(&y).map(|(a, b)| a.conj() * b).sum();
    let expect_u: Complex64 = x.iter().zip(&y).map(|(a, b)| a * b).sum();
    assert!((dotc - expect_c).norm() < 1e-12);
    assert!((dotu - expect_u).norm() < 1e-12);
    assert_ne!(dotc, dotu);
}
