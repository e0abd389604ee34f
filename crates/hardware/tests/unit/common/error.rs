//! Error type tests: messages and conversions.

use cachectl_core::common::{ConfigError, InvariantViolation, ProtocolViolation, SimError};

#[test]
fn config_error_messages() {
    assert_eq!(
        ConfigError::UnsupportedWays(4).to_string(),
        "unsupported way count 4: only 1 (direct-mapped) or 2 ways are supported"
    );
    assert_eq!(
        ConfigError::NotPowerOfTwo {
            field: "lines",
            value: 6
        }
        .to_string(),
        "lines must be a non-zero power of two, got 6"
    );
}

#[test]
fn sim_error_wraps_each_class() {
    let e: SimError = ProtocolViolation::UnsolicitedReady { state: "Idle" }.into();
    assert_eq!(
        e.to_string(),
        "protocol violation: memory asserted ready with no outstanding request (controller state Idle)"
    );

    let e: SimError = InvariantViolation::MultipleHits { index: 2, tag: 0x1f }.into();
    assert!(matches!(e, SimError::Invariant(_)));
    assert_eq!(
        e.to_string(),
        "invariant violation: set 2 holds tag 0x1f in more than one way"
    );

    let e: SimError = ConfigError::AddrWidth(0).into();
    assert!(matches!(e, SimError::Config(ConfigError::AddrWidth(0))));
}

#[test]
fn errors_implement_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
    assert_error::<ConfigError>();
    assert_error::<ProtocolViolation>();
    assert_error::<InvariantViolation>();
    assert_error::<SimError>();
}
