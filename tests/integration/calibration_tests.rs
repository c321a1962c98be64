//! Calibration sweep: exact actuator order and lifecycle events.

use sentry_turret::app::events::SentryEvent;
use sentry_turret::config::SentryConfig;
use sentry_turret::control::angle::Axis;
use sentry_turret::drivers::laser_bank::Level;
use sentry_turret::fsm::StateId;

use crate::mock_hw::{Call, RecordingSink, ScriptedRandom, assert_calls, collapse, mock_sequencer};

fn step(axis: Axis, duty: f64, settle: u32) -> [Call; 3] {
    [Call::Start { axis, duty }, Call::Wait(settle), Call::Stop(axis)]
}

#[test]
fn sweep_runs_in_fixed_order_with_lasers_on_first() {
    let (mut seq, log) = mock_sequencer(SentryConfig::default(), ScriptedRandom::constant(0.5));
    let mut sink = RecordingSink::new();

    seq.calibrate(&mut sink).unwrap();

    let mut expected = vec![Call::LasersAll(Level::On)];
    expected.extend(step(Axis::Pan, 0.01, 1000));
    expected.extend(step(Axis::Pan, 0.12, 1000));
    expected.extend(step(Axis::Pan, 0.065, 1000));
    expected.extend(step(Axis::Tilt, 0.08, 1000));
    expected.extend(step(Axis::Tilt, 0.13, 1000));

    assert_calls(&collapse(&log.borrow()), &expected);
    assert_eq!(seq.lasers().levels(), [Level::On; 5]);
}

#[test]
fn lasers_are_written_in_index_order() {
    let (mut seq, log) = mock_sequencer(SentryConfig::default(), ScriptedRandom::constant(0.5));
    seq.calibrate(&mut RecordingSink::new()).unwrap();

    let first: Vec<Call> = log.borrow().iter().take(5).cloned().collect();
    let expected: Vec<Call> = (0..5).map(|i| Call::SetLine(i, Level::On)).collect();
    assert_eq!(first, expected);
}

#[test]
fn settle_time_follows_config() {
    let config = SentryConfig {
        settle_ms: 250,
        ..SentryConfig::default()
    };
    let (mut seq, log) = mock_sequencer(config, ScriptedRandom::constant(0.5));
    seq.calibrate(&mut RecordingSink::new()).unwrap();

    let waits: Vec<u32> = log
        .borrow()
        .iter()
        .filter_map(|c| match c {
            Call::Wait(ms) => Some(*ms),
            _ => None,
        })
        .collect();
    assert_eq!(waits, vec![250; 5]);
}

#[test]
fn calibration_reports_state_change_then_completion() {
    let (mut seq, _log) = mock_sequencer(SentryConfig::default(), ScriptedRandom::constant(0.5));
    let mut sink = RecordingSink::new();
    seq.calibrate(&mut sink).unwrap();

    assert_eq!(
        sink.events.first(),
        Some(&SentryEvent::StateChanged {
            from: StateId::Booting,
            to: StateId::Calibrating,
        })
    );
    assert_eq!(sink.events.last(), Some(&SentryEvent::Calibrated));
    assert_eq!(sink.skipped(), 0);
    let aims = sink
        .events
        .iter()
        .filter(|e| matches!(e, SentryEvent::Aimed { .. }))
        .count();
    assert_eq!(aims, 5);
}

#[test]
fn calibrating_twice_is_rejected() {
    let (mut seq, log) = mock_sequencer(SentryConfig::default(), ScriptedRandom::constant(0.5));
    let mut sink = RecordingSink::new();
    seq.calibrate(&mut sink).unwrap();
    let before = log.borrow().len();

    assert!(seq.calibrate(&mut sink).is_err());
    assert_eq!(log.borrow().len(), before, "no hardware touched");
    assert_eq!(seq.state(), StateId::Calibrating);
}
