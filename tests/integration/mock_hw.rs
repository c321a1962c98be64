//! Mock turret hardware for integration tests.
//!
//! Both servos, the laser bank, and the clock push into one shared call
//! log so tests can assert on the exact interleaving of moves, holds and
//! laser writes without touching real GPIO/PWM registers.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use sentry_turret::app::events::SentryEvent;
use sentry_turret::app::ports::{
    EventSink, LaserPort, RandomSource, ServoPort, TimePort, TurretHardware,
};
use sentry_turret::app::sequencer::{CancelToken, Sequencer};
use sentry_turret::config::SentryConfig;
use sentry_turret::control::angle::{Axis, DutyCycle};
use sentry_turret::drivers::laser_bank::Level;
use sentry_turret::error::{Error, Result};

pub const LASERS: usize = 5;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start { axis: Axis, duty: f64 },
    Stop(Axis),
    SetLine(usize, Level),
    /// A full pass over every laser line at one level (see [`collapse`]).
    LasersAll(Level),
    Wait(u32),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub fn new_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Fold each run of `SetLine(0..LASERS, level)` into one `LasersAll(level)`.
pub fn collapse(calls: &[Call]) -> Vec<Call> {
    let mut out = Vec::with_capacity(calls.len());
    let mut i = 0;
    while i < calls.len() {
        if let Call::SetLine(0, level) = calls[i] {
            let run = calls[i..]
                .iter()
                .take(LASERS)
                .enumerate()
                .take_while(|(n, c)| **c == Call::SetLine(*n, level))
                .count();
            if run == LASERS {
                out.push(Call::LasersAll(level));
                i += LASERS;
                continue;
            }
        }
        out.push(calls[i].clone());
        i += 1;
    }
    out
}

// ── Servo ─────────────────────────────────────────────────────

pub struct MockServo {
    axis: Axis,
    log: CallLog,
}

impl ServoPort for MockServo {
    fn start(&mut self, duty: DutyCycle) -> Result<()> {
        self.log.borrow_mut().push(Call::Start {
            axis: self.axis,
            duty: duty.fraction(),
        });
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Call::Stop(self.axis));
        Ok(())
    }
}

// ── Lasers ────────────────────────────────────────────────────

pub struct MockLasers {
    levels: [Level; LASERS],
    log: CallLog,
}

#[allow(dead_code)]
impl MockLasers {
    pub fn levels(&self) -> [Level; LASERS] {
        self.levels
    }
}

impl LaserPort for MockLasers {
    fn len(&self) -> usize {
        LASERS
    }

    fn set_line(&mut self, index: usize, level: Level) -> Result<()> {
        let slot = self
            .levels
            .get_mut(index)
            .ok_or(Error::IndexFault { index, len: LASERS })?;
        *slot = level;
        self.log.borrow_mut().push(Call::SetLine(index, level));
        Ok(())
    }
}

// ── Clock ─────────────────────────────────────────────────────

pub struct MockClock {
    subsec_ms: u32,
    log: CallLog,
}

impl DelayNs for MockClock {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Call::Wait(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Call::Wait(ms));
    }
}

impl TimePort for MockClock {
    fn subsec_millis(&self) -> u32 {
        self.subsec_ms
    }
}

// ── Random ────────────────────────────────────────────────────

/// Replays `values` in a loop and remembers the last seed.
pub struct ScriptedRandom {
    values: Vec<f64>,
    next: usize,
    pub seed: Option<u64>,
}

impl ScriptedRandom {
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            next: 0,
            seed: None,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn reseed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }
}

// ── Event sink ────────────────────────────────────────────────

/// Records events; optionally cancels a token after `stop_after` patrols.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<SentryEvent>,
    cancel: Option<(CancelToken, u64)>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancelling_after(token: CancelToken, stop_after: u64) -> Self {
        Self {
            events: Vec::new(),
            cancel: Some((token, stop_after)),
        }
    }

    pub fn skipped(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SentryEvent::CommandSkipped(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &SentryEvent) {
        if let (SentryEvent::PatrolIteration { count, .. }, Some((token, stop_after))) =
            (event, &self.cancel)
        {
            if count >= stop_after {
                token.cancel();
            }
        }
        self.events.push(event.clone());
    }
}

// ── Assembly ──────────────────────────────────────────────────

pub type MockTurret = TurretHardware<MockServo, MockLasers>;
pub type MockSequencer<R> = Sequencer<MockServo, MockLasers, MockClock, R>;

pub fn mock_turret(log: &CallLog) -> MockTurret {
    TurretHardware {
        pan: MockServo {
            axis: Axis::Pan,
            log: Rc::clone(log),
        },
        tilt: MockServo {
            axis: Axis::Tilt,
            log: Rc::clone(log),
        },
        lasers: MockLasers {
            levels: [Level::Off; LASERS],
            log: Rc::clone(log),
        },
    }
}

pub fn mock_clock(log: &CallLog, subsec_ms: u32) -> MockClock {
    MockClock {
        subsec_ms,
        log: Rc::clone(log),
    }
}

/// A sequencer over mocks, plus the shared call log.
pub fn mock_sequencer<R: RandomSource>(
    config: SentryConfig,
    rng: R,
) -> (MockSequencer<R>, CallLog) {
    let log = new_log();
    let seq = Sequencer::new(config, mock_turret(&log), mock_clock(&log, 321), rng);
    (seq, log)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// `assert_eq!` for call lists, with a tolerance on servo duty cycles.
pub fn assert_calls(actual: &[Call], expected: &[Call]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "call count differs\nactual:   {actual:?}\nexpected: {expected:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        let same = match (a, e) {
            (Call::Start { axis: aa, duty: ad }, Call::Start { axis: ea, duty: ed }) => {
                aa == ea && approx(*ad, *ed)
            }
            _ => a == e,
        };
        assert!(same, "call #{i}: got {a:?}, expected {e:?}");
    }
}
