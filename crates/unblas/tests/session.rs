use unblas::{AbiProfile, BlasConfig, Error};
use unblas_abi::Mangling;

#[test]
fn initialize_fixes_the_profile() {
    let mut config = BlasConfig::default();
    config.accelerate.enabled = false;
    let session = unblas::initialize(&config).unwrap();
    assert_eq!(session.profile(), AbiProfile::build_default());
    assert!(session.backend().is_none());
    assert_eq!(session.device_count(), 0);

    // the same overrides as the active profile are accepted
    let mut same = config.clone();
    same.abi.mangling = Some(session.profile().mangling);
    assert!(unblas::initialize(&same).is_ok());

    let mut other = config.clone();
    other.abi.mangling = Some(match session.profile().mangling {
        Mangling::Upper => Mangling::Lower,
        _ => Mangling::Upper,
    });
    match unblas::initialize(&other) {
        Err(Error::Config(e)) => assert!(e.to_string().contains("already resolved"), "{e}"),
        other => panic!("expected a configuration error, got {other:?}"),
    }
}
