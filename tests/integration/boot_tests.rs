//! Boot path: configuration faults, controller lookup, simulated hardware.

use std::cell::Cell;

use sentry_turret::adapters::hardware::open_simulated;
use sentry_turret::adapters::rng::SmallRngSource;
use sentry_turret::app::events::SentryEvent;
use sentry_turret::app::service::boot;
use sentry_turret::config::SentryConfig;
use sentry_turret::control::angle::Axis;
use sentry_turret::drivers::laser_bank::Level;
use sentry_turret::error::Error;
use sentry_turret::fsm::StateId;
use sentry_turret::pins;

use crate::mock_hw::{MockTurret, RecordingSink, ScriptedRandom, mock_clock, mock_turret, new_log};

fn boot_failed(sink: &RecordingSink) -> Option<Error> {
    sink.events.iter().find_map(|e| match e {
        SentryEvent::BootFailed(err) => Some(*err),
        _ => None,
    })
}

#[test]
fn invalid_config_never_opens_hardware() {
    let log = new_log();
    let opened = Cell::new(false);
    let config = SentryConfig {
        pwm_frequency_hz: 0,
        ..SentryConfig::default()
    };
    let mut sink = RecordingSink::new();

    let result = boot(
        config,
        |_: &SentryConfig| -> sentry_turret::error::Result<MockTurret> {
            opened.set(true);
            Ok(mock_turret(&log))
        },
        mock_clock(&log, 0),
        ScriptedRandom::constant(0.5),
        &mut sink,
    );

    let failure = result.err().expect("boot must fail");
    assert_eq!(failure.state(), StateId::Failed);
    let err = failure.error();
    assert!(matches!(err, Error::Config(_)));
    assert!(!opened.get());
    assert!(log.borrow().is_empty(), "no actuator calls");
    assert_eq!(
        sink.events.first(),
        Some(&SentryEvent::StateChanged {
            from: StateId::Booting,
            to: StateId::Failed,
        })
    );
    assert_eq!(boot_failed(&sink), Some(err));
}

#[test]
fn missing_pwm_controller_fails_boot() {
    let config = SentryConfig {
        pwm_controller: 7,
        ..SentryConfig::default()
    };
    let mut sink = RecordingSink::new();

    let result = boot(
        config,
        open_simulated,
        mock_clock(&new_log(), 0),
        SmallRngSource::default(),
        &mut sink,
    );

    let failure = result.err().expect("boot must fail");
    assert_eq!(failure.state(), StateId::Failed);
    let err = failure.error();
    assert_eq!(err, Error::Config("pwm controller not available"));
    assert_eq!(boot_failed(&sink), Some(err));
}

#[test]
fn open_failure_is_reported_as_boot_failure() {
    let log = new_log();
    let mut sink = RecordingSink::new();

    let result = boot(
        SentryConfig::default(),
        |_: &SentryConfig| -> sentry_turret::error::Result<MockTurret> {
            Err(Error::Init("laser line could not be driven low"))
        },
        mock_clock(&log, 0),
        ScriptedRandom::constant(0.5),
        &mut sink,
    );

    let failure = result.err().expect("boot must fail");
    assert!(matches!(failure.error(), Error::Init(_)));
    assert!(log.borrow().is_empty());
    assert!(matches!(boot_failed(&sink), Some(Error::Init(_))));
}

#[test]
fn default_config_boots_on_simulated_hardware() {
    let mut sink = RecordingSink::new();

    let mut seq = boot(
        SentryConfig::default(),
        open_simulated,
        mock_clock(&new_log(), 42),
        SmallRngSource::default(),
        &mut sink,
    )
    .unwrap();

    assert_eq!(seq.state(), StateId::Booting);
    assert!(sink.events.is_empty());
    assert!(seq.lasers().lines().iter().all(|p| !p.is_high()));

    seq.calibrate(&mut sink).unwrap();
    seq.begin_patrol(&mut sink).unwrap();
    seq.patrol_once(&mut sink).unwrap();

    assert_eq!(seq.iterations(), 1);
    assert_eq!(seq.lasers().levels(), [Level::On; pins::LASER_COUNT]);
    assert!(seq.lasers().lines().iter().all(|p| p.is_high()));
    // Both servos are stopped between moves.
    assert_eq!(seq.servo(Axis::Pan).pwm().duty(), 0);
    assert_eq!(seq.servo(Axis::Tilt).pwm().duty(), 0);
}

#[test]
fn invalid_override_values_reach_boot_and_are_reported() {
    let config = SentryConfig::from_json(r#"{"laser_gpios": [24, 24, 21, 7, 16]}"#).unwrap();
    let mut sink = RecordingSink::new();

    let result = boot(
        config,
        open_simulated,
        mock_clock(&new_log(), 0),
        SmallRngSource::default(),
        &mut sink,
    );

    let failure = result.err().expect("boot must fail");
    assert_eq!(failure.error(), Error::Config("gpio assigned twice"));
    assert!(failure.error().is_boot_fault());
    assert_eq!(boot_failed(&sink), Some(failure.error()));
}
