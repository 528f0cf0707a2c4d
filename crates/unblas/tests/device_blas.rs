//! Device path against the in-process backend (two simulated devices, one
//! worker thread per stream).

use unblas::device::{self, DeviceBuffer, Queue, Residency};
use unblas::{Complex64, DeviceInt, Diag, Error, Side, Transpose, Uplo};

fn queue(device: i32) -> Queue {
    unblas_accelerate::register_inprocess_provider();
    Queue::new(device).unwrap()
}

fn upload<T: Copy>(data: &[T], q: &Queue) -> DeviceBuffer<T> {
    let mut buf = device::device_malloc::<T>(data.len(), q).unwrap();
    device::device_copy_to(data, &mut buf, q).unwrap();
    buf
}

fn download<T: Copy + Default>(buf: &DeviceBuffer<T>, q: &Queue) -> Vec<T> {
    let mut host = vec![T::default(); buf.len()];
    device::device_copy_from(buf, &mut host, q).unwrap();
    host
}

fn free<T: Copy>(q: &Queue, bufs: impl IntoIterator<Item = DeviceBuffer<T>>) {
    for buf in bufs {
        device::device_free(buf, q).unwrap();
    }
}

#[test]
fn device_count_reports_simulated_devices() {
    let _q = queue(0);
    assert_eq!(device::get_device_count(), unblas_accelerate::INPROCESS_DEVICES);
    match Queue::new(2) {
        Err(Error::Precondition { func, condition }) => {
            assert_eq!(func, "Queue::new");
            assert_eq!(condition, "device 2 out of range (2 devices)");
        }
        other => panic!("expected a precondition failure, got {other:?}"),
    }
}

/// Whether a system BLAS, if found, can be trusted to follow the built profile.
const SYSTEM_ABI: bool = cfg!(not(any(
    feature = "ilp64",
    feature = "accelerate",
    feature = "mangle-lower",
    feature = "mangle-upper",
    feature = "mangle-upper-underscore",
    feature = "complex-return-argument",
    feature = "f2c-float-return"
)));

/// The host path's answer when a system BLAS loads, else `fallback`.
fn host_or<T>(host: impl FnOnce() -> unblas::Result<T>, fallback: T) -> T {
    if !SYSTEM_ABI {
        return fallback;
    }
    match host() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Host BLAS unavailable ({e}), comparing against a local reference");
            fallback
        }
    }
}

#[test]
fn dot_matches_host_path_after_sync() {
    let q = queue(0);
    let xs = [1.0f64, 2.0, 3.0, 4.0];
    let ys = [0.5f64, -1.0, 2.0, 0.25];
    let expected = host_or(
        || unblas::host::dot(4, &xs, 1, &ys, 1),
        xs.iter().zip(&ys).map(|(a, b)| a * b).sum(),
    );

    let x = upload(&xs, &q);
    let y = upload(&ys, &q);
    let mut r = device::device_malloc::<f64>(1, &q).unwrap();
    device::dot(4, &x, 1, &y, 1, &mut r, &q).unwrap();
    q.sync().unwrap();
    let got = download(&r, &q)[0];
    assert!((got - expected).abs() < 1e-12, "{got} vs {expected}");
    free(&q, [x, y, r]);
}

#[test]
fn nrm2_of_large_values_matches_host_path() {
    let q = queue(0);
    let xs = [1e200f64, -1e200, 1e200, 1e200];
    let expected = host_or(|| unblas::host::nrm2(4, &xs, 1), 2e200);
    assert!(expected.is_finite());

    let x = upload(&xs, &q);
    let mut r = device::device_malloc::<f64>(1, &q).unwrap();
    device::nrm2(4, &x, 1, &mut r, &q).unwrap();
    let got = download(&r, &q)[0];
    assert!((got / expected - 1.0).abs() < 1e-14, "{got} vs {expected}");
    free(&q, [x, r]);
}

#[test]
fn conjugated_and_plain_complex_dot_differ() {
    let q = queue(0);
    let xs = [Complex64::new(1.0, 2.0), Complex64::new(3.0, -1.0)];
    let ys = [Complex64::new(2.0, 1.0), Complex64::new(-1.0, 4.0)];
    let x = upload(&xs, &q);
    let y = upload(&ys, &q);
    let mut dotc = device::device_malloc::<Complex64>(1, &q).unwrap();
    let mut dotu = device::device_malloc::<Complex64>(1, &q).unwrap();
    device::dot(2, &x, 1, &y, 1, &mut dotc, &q).unwrap();
    device::dotu(2, &x, 1, &y, 1, &mut dotu, &q).unwrap();
    q.sync().unwrap();

    assert_eq!(download(&dotc, &q)[0], Complex64::new(-3.0, 8.0));
    assert_eq!(download(&dotu, &q)[0], Complex64::new(1.0, 18.0));
    free(&q, [x, y, dotc, dotu]);
}

#[test]
fn queued_kernels_run_in_submission_order() {
    let q = queue(0);
    let x = upload(&[1.0f32, 2.0, 3.0], &q);
    let mut y = upload(&[1.0f32, 1.0, 1.0], &q);
    device::axpy(3, 2.0f32, &x, 1, &mut y, 1, &q).unwrap();
    device::scal(3, 0.5f32, &mut y, 1, &q).unwrap();
    // axpy then scal; the reverse order would give [2.5, 4.5, 6.5]
    assert_eq!(download(&y, &q), vec![1.5, 2.5, 3.5]);
    free(&q, [x, y]);
}

#[test]
fn reductions_write_device_results() {
    let q = queue(0);
    let x = upload(&[1.0f32, -7.0, 3.0, 7.0], &q);
    let mut idx = device::device_malloc::<DeviceInt>(1, &q).unwrap();
    device::iamax(4, &x, 1, &mut idx, &q).unwrap();
    // one-based, first of equal magnitudes
    assert_eq!(download(&idx, &q), vec![2]);

    let v = upload(&[3.0f32, 4.0], &q);
    let mut norm = device::device_malloc::<f32>(1, &q).unwrap();
    device::nrm2(2, &v, 1, &mut norm, &q).unwrap();
    assert!((download(&norm, &q)[0] - 5.0).abs() < 1e-6);

    let z = upload(&[Complex64::new(1.0, -2.0), Complex64::new(-3.0, 0.0)], &q);
    let mut sum = device::device_malloc::<f64>(1, &q).unwrap();
    device::asum(2, &z, 1, &mut sum, &q).unwrap();
    assert_eq!(download(&sum, &q), vec![6.0]);

    let mut empty = device::device_malloc::<DeviceInt>(1, &q).unwrap();
    device::iamax(0, &x, 1, &mut empty, &q).unwrap();
    assert_eq!(download(&empty, &q), vec![0]);

    free(&q, [x, v, norm]);
    free(&q, [idx, empty]);
    free(&q, [z]);
    free(&q, [sum]);
}

#[test]
fn gemm_and_gemv_column_major() {
    let q = queue(0);
    // A = [1 2; 3 4], B = [5 6; 7 8]
    let a = upload(&[1.0f64, 3.0, 2.0, 4.0], &q);
    let b = upload(&[5.0f64, 7.0, 6.0, 8.0], &q);
    let mut c = upload(&[0.0f64; 4], &q);
    device::gemm(
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
        &q,
    )
    .unwrap();
    assert_eq!(download(&c, &q), vec![19.0, 43.0, 22.0, 50.0]);

    let x = upload(&[1.0f64, 1.0], &q);
    let mut y = upload(&[10.0f64, 10.0], &q);
    device::gemv(Transpose::Trans, 2, 2, 1.0, &a, 2, &x, 1, 1.0, &mut y, 1, &q).unwrap();
    // A**T * [1, 1] = [4, 6]
    assert_eq!(download(&y, &q), vec![14.0, 16.0]);
    free(&q, [a, b, c, x, y]);
}

#[test]
fn rank_one_update() {
    let q = queue(0);
    let x = upload(&[1.0f64, 2.0], &q);
    let y = upload(&[3.0f64, 4.0, 5.0], &q);
    let mut a = upload(&[0.0f64; 6], &q);
    device::ger(2, 3, 1.0, &x, 1, &y, 1, &mut a, 2, &q).unwrap();
    assert_eq!(download(&a, &q), vec![3.0, 6.0, 4.0, 8.0, 5.0, 10.0]);
    free(&q, [x, y, a]);
}

#[test]
fn queues_on_two_devices_interleave() {
    let q0 = queue(0);
    let q1 = queue(1);
    let x0 = upload(&[1.0f64, 2.0], &q0);
    let x1 = upload(&[10.0f64, 20.0], &q1);
    let mut y0 = upload(&[0.0f64, 0.0], &q0);
    let mut y1 = upload(&[0.0f64, 0.0], &q1);
    // every launch rebinds its own device
    device::axpy(2, 1.0, &x0, 1, &mut y0, 1, &q0).unwrap();
    device::axpy(2, 1.0, &x1, 1, &mut y1, 1, &q1).unwrap();
    device::axpy(2, 1.0, &x0, 1, &mut y0, 1, &q0).unwrap();
    assert_eq!(download(&y0, &q0), vec![2.0, 4.0]);
    assert_eq!(download(&y1, &q1), vec![10.0, 20.0]);

    match device::axpy(2, 1.0, &x1, 1, &mut y0, 1, &q0) {
        Err(Error::Precondition { func, condition }) => {
            assert_eq!(func, "axpy");
            assert_eq!(
                condition,
                "x lives on device 1 but the queue is bound to device 0"
            );
        }
        other => panic!("expected a precondition failure, got {other:?}"),
    }
    free(&q0, [x0, y0]);
    free(&q1, [x1, y1]);
}

#[test]
fn freeing_through_another_device_is_rejected() {
    let q0 = queue(0);
    let q1 = queue(1);
    let buf = device::device_malloc::<f32>(8, &q1).unwrap();
    let ptr = buf.as_ptr();
    assert!(matches!(
        device::device_free(buf, &q0),
        Err(Error::Precondition { func: "device_free", .. })
    ));
    // the rejected buffer was leaked, not released
    assert!(!ptr.is_null());
}

#[test]
fn buffer_lifecycle_and_pinned_staging() {
    let q = queue(0);
    let mut pinned = device::host_malloc_pinned::<f64>(4, &q).unwrap();
    assert_eq!(pinned.residency(), Residency::PinnedHost);
    unsafe { pinned.host_slice_mut() }
        .unwrap()
        .copy_from_slice(&[1.0, 2.0, 3.0, 4.0]);

    let mut dev = device::device_malloc::<f64>(4, &q).unwrap();
    assert_eq!(dev.residency(), Residency::Device);
    assert_eq!(dev.device(), 0);
    device::device_copy_to(unsafe { pinned.host_slice() }.unwrap(), &mut dev, &q).unwrap();
    let mut twin = device::device_malloc::<f64>(4, &q).unwrap();
    device::device_copy(&dev, &mut twin, &q).unwrap();
    device::scal(4, 2.0, &mut twin, 1, &q).unwrap();
    device::device_copy_from(&twin, unsafe { pinned.host_slice_mut() }.unwrap(), &q).unwrap();
    assert_eq!(unsafe { pinned.host_slice() }.unwrap(), &[2.0, 4.0, 6.0, 8.0]);

    // kernels take device memory only
    assert!(matches!(
        device::scal(4, 2.0, &mut pinned, 1, &q),
        Err(Error::Precondition { func: "scal", .. })
    ));
    assert!(unsafe { dev.host_slice() }.is_none());

    free(&q, [dev, twin]);
    device::host_free_pinned(pinned, &q).unwrap();
}

#[test]
fn copies_reject_short_buffers() {
    let q = queue(0);
    let mut buf = device::device_malloc::<f32>(2, &q).unwrap();
    assert!(matches!(
        device::device_copy_to(&[1.0f32, 2.0, 3.0], &mut buf, &q),
        Err(Error::Precondition { func: "device_copy_to", .. })
    ));
    let x = upload(&[1.0f32; 2], &q);
    assert!(matches!(
        device::axpy(3, 1.0, &x, 1, &mut buf, 1, &q),
        Err(Error::Precondition { func: "axpy", .. })
    ));
    free(&q, [buf, x]);
}

#[test]
fn workspace_grows_and_is_reused() {
    let q = queue(1);
    let small = q.ensure_workspace(256).unwrap();
    assert_eq!(q.ensure_workspace(64).unwrap(), small);
    let large = q.ensure_workspace(4096).unwrap();
    assert!(!large.is_null());
    assert_eq!(q.ensure_workspace(4096).unwrap(), large);
}

#[test]
fn validation_precedes_dispatch() {
    let q = queue(0);
    let x = upload(&[1.0f64; 4], &q);
    let mut y = upload(&[1.0f64; 4], &q);
    assert!(matches!(
        device::axpy(-1, 1.0, &x, 1, &mut y, 1, &q),
        Err(Error::Precondition { ref condition, .. }) if condition == "n < 0"
    ));
    assert!(matches!(
        device::copy(2, &x, 0, &mut y, 1, &q),
        Err(Error::Precondition { ref condition, .. }) if condition == "incx == 0"
    ));
    assert!(matches!(
        device::axpy(i32::MAX as i64 + 1, 1.0, &x, 1, &mut y, 1, &q),
        Err(Error::Overflow { arg: "n", .. })
    ));
    free(&q, [x, y]);
}

#[test]
fn kernels_missing_from_the_backend_are_unavailable() {
    let q = queue(0);
    let a = upload(&[1.0f64, 0.0, 0.0, 1.0], &q);
    let mut b = upload(&[1.0f64; 4], &q);
    let err = device::trsm(
        Side::Left,
        Uplo::Lower,
        Transpose::NoTrans,
        Diag::NonUnit,
        2,
        2,
        1.0,
        &a,
        2,
        &mut b,
        2,
        &q,
    )
    .unwrap_err();
    assert!(matches!(err, Error::Unavailable { func: "trsm", .. }), "{err}");

    let mut c = upload(&[0.0f64; 4], &q);
    assert!(matches!(
        device::syrk(Uplo::Upper, Transpose::NoTrans, 2, 2, 1.0, &a, 2, 0.0, &mut c, 2, &q),
        Err(Error::Unavailable { func: "syrk", .. })
    ));
    free(&q, [a, b, c]);
}
