//! Device path with no backend registered in this process.

use unblas::device::{self, Queue};
use unblas::Error;

#[test]
fn device_count_is_zero_without_a_backend() {
    assert_eq!(device::get_device_count(), 0);
}

#[test]
fn queue_creation_reports_unavailable() {
    match Queue::new(0) {
        Err(Error::Unavailable { func, what }) => {
            assert_eq!(func, "Queue::new");
            assert!(what.contains("no device backend"), "{what}");
        }
        other => panic!("expected unavailable, got {other:?}"),
    }
    assert!(matches!(
        device::set_device(0),
        Err(Error::Unavailable { func: "set_device", .. })
    ));
}
