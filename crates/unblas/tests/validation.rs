//! Argument checks on the host path. Every case here is rejected before a
//! Fortran library is needed, so these run without one installed.

use unblas::{host, Complex32, Complex64, Diag, Error, Side, Transpose, Uplo};

fn condition(result: unblas::Result<impl std::fmt::Debug>) -> (&'static str, String) {
    match result {
        Err(Error::Precondition { func, condition }) => (func, condition),
        other => panic!("expected a precondition failure, got {other:?}"),
    }
}

#[test]
fn negative_sizes_are_rejected_for_every_precision() {
    let mut s = [0.0f32; 4];
    let mut d = [0.0f64; 4];
    let mut c = [Complex32::default(); 4];
    let mut z = [Complex64::default(); 4];
    assert_eq!(condition(host::scal(-1, 2.0f32, &mut s, 1)), ("scal", "n < 0".into()));
    assert_eq!(condition(host::scal(-1, 2.0f64, &mut d, 1)), ("scal", "n < 0".into()));
    assert_eq!(
        condition(host::scal(-1, Complex32::new(1.0, 0.0), &mut c, 1)),
        ("scal", "n < 0".into())
    );
    assert_eq!(
        condition(host::scal(-1, Complex64::new(1.0, 0.0), &mut z, 1)),
        ("scal", "n < 0".into())
    );

    let x = [0.0f64; 4];
    assert_eq!(condition(host::dot(-3, &x, 1, &x, 1)).1, "n < 0");
    assert_eq!(condition(host::nrm2(-1, &x, 1)).1, "n < 0");
    assert_eq!(condition(host::iamax(-1, &x, 1)).1, "n < 0");
    let a = [0.0f64; 4];
    assert_eq!(
        condition(host::gemv(Transpose::NoTrans, 2, -1, 1.0, &a, 2, &x, 1, 0.0, &mut d, 1)).1,
        "n < 0"
    );
    let mut cm = [0.0f64; 4];
    assert_eq!(
        condition(host::gemm(
            Transpose::NoTrans,
            Transpose::NoTrans,
            2,
            2,
            -2,
            1.0,
            &a,
            2,
            &a,
            2,
            0.0,
            &mut cm,
            2
        ))
        .1,
        "k < 0"
    );
}

#[test]
fn zero_and_negative_increments() {
    let x = [1.0f64; 4];
    let mut y = [1.0f64; 4];
    assert_eq!(condition(host::axpy(2, 1.0, &x, 0, &mut y, 1)).1, "incx == 0");
    assert_eq!(condition(host::axpy(2, 1.0, &x, 1, &mut y, 0)).1, "incy == 0");
    assert_eq!(condition(host::copy(2, &x, 1, &mut y, 0)).1, "incy == 0");
    // reductions and scal only take positive strides
    assert_eq!(condition(host::asum(2, &x, -1)).1, "incx <= 0");
    assert_eq!(condition(host::scal(2, 2.0, &mut y, 0)).1, "incx <= 0");
    let mut a = [0.0f64; 4];
    assert_eq!(
        condition(host::ger(2, 2, 1.0, &x, 0, &x, 1, &mut a, 2)).1,
        "incx == 0"
    );
}

#[test]
fn leading_dimensions_below_the_row_count() {
    let a = [0.0f64; 16];
    let x = [0.0f64; 4];
    let mut y = [0.0f64; 4];
    assert_eq!(
        condition(host::gemv(Transpose::Trans, 4, 4, 1.0, &a, 3, &x, 1, 0.0, &mut y, 1)).1,
        "lda < m.max(1)"
    );
    let mut c = [0.0f64; 16];
    let (func, cond) = condition(host::gemm(
        Transpose::Trans,
        Transpose::NoTrans,
        4,
        4,
        2,
        1.0,
        &a,
        1,
        &a,
        4,
        0.0,
        &mut c,
        4,
    ));
    assert_eq!(func, "gemm");
    assert_eq!(cond, "lda < a_rows.max(1)");
    let mut b = [0.0f64; 16];
    assert_eq!(
        condition(host::trsm(
            Side::Right,
            Uplo::Upper,
            Transpose::NoTrans,
            Diag::NonUnit,
            2,
            4,
            1.0,
            &a,
            3,
            &mut b,
            2
        ))
        .1,
        "lda < ka.max(1)"
    );
}

#[test]
fn short_buffers_are_caught_before_the_call() {
    let x = [1.0f64; 5];
    let mut y = [1.0f64; 5];
    // 3 elements at stride 2 span 5 slots; stride 3 spans 7.
    let (func, cond) = condition(host::axpy(3, 1.0, &x, 3, &mut y, 2));
    assert_eq!(func, "axpy");
    assert_eq!(cond, "x holds 5 elements but 7 are addressed");

    let a = [0.0f64; 5];
    let mut c = [0.0f64; 4];
    assert_eq!(
        condition(host::gemm(
            Transpose::NoTrans,
            Transpose::NoTrans,
            2,
            2,
            3,
            1.0,
            &a,
            2,
            &a,
            3,
            0.0,
            &mut c,
            2
        ))
        .1,
        "a holds 5 elements but 6 are addressed"
    );
}

#[test]
fn hermitian_updates_reject_plain_transpose() {
    let a = [Complex64::default(); 4];
    let mut c = [Complex64::default(); 4];
    assert_eq!(
        condition(host::herk(Uplo::Lower, Transpose::Trans, 2, 2, 1.0, &a, 2, 0.0, &mut c, 2)),
        ("herk", "trans == Transpose::Trans".into())
    );
    let (func, _) = condition(host::syrk(
        Uplo::Lower,
        Transpose::ConjTrans,
        2,
        2,
        Complex64::new(1.0, 0.0),
        &a,
        2,
        Complex64::default(),
        &mut c,
        2,
    ));
    assert_eq!(func, "syrk");
}

#[test]
#[cfg(not(feature = "ilp64"))]
fn sizes_past_the_native_integer_overflow() {
    let x = [0.0f64; 1];
    let mut y = [0.0f64; 1];
    let too_big = i32::MAX as i64 + 1;
    match host::axpy(too_big, 1.0, &x, 1, &mut y, 1) {
        Err(Error::Overflow {
            func,
            arg,
            value,
            max,
        }) => {
            assert_eq!(func, "axpy");
            assert_eq!(arg, "n");
            assert_eq!(value, too_big);
            assert_eq!(max, i32::MAX as i64);
        }
        other => panic!("expected overflow, got {other:?}"),
    }
    match host::axpy(1, 1.0, &x, 1, &mut y, -too_big - 1) {
        Err(Error::Overflow { arg: "incy", .. }) => {}
        other => panic!("expected overflow, got {other:?}"),
    }
    // a zero increment is a logical error and is reported first
    assert!(matches!(
        host::axpy(too_big, 1.0, &x, 0, &mut y, 1),
        Err(Error::Precondition { .. })
    ));
}

#[test]
fn errors_name_their_operation() {
    let x = [0.0f64; 2];
    let err = host::nrm2(-1, &x, 1).unwrap_err();
    assert_eq!(err.func(), Some("nrm2"));
    assert_eq!(err.to_string(), "nrm2: invalid argument: n < 0");
}
