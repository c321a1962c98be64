//! Motion sequencer — the sentry's only worker.
//!
//! Owns both servos and the laser bank for the life of the process and
//! drives them through two phases:
//!
//! ```text
//!  CALIBRATING (once)                 PATROLLING (forever)
//!  ───────────────────                ─────────────────────────────────
//!  lasers on                          draw U1, U2
//!  pan  -90  hold  stop               pan  = U1*180-90 ┐ back to back
//!  pan  +90  hold  stop               tilt = U2*90     ┘
//!  pan    0  hold  stop               hold settle
//!  tilt   0  hold  stop               stop pan, stop tilt
//!  tilt  90  hold  stop               laser phase (blink or pause)
//! ```
//!
//! Every hold is a blocking [`DelayNs::delay_ms`] on the caller's thread.
//! Nothing runs concurrently with the sequencer, so it needs no locks.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;
use log::info;

use crate::config::{PatrolMode, SentryConfig};
use crate::control::angle::{Axis, map_angle};
use crate::drivers::laser_bank::Level;
use crate::error::{Error, Result};
use crate::fsm::{InvalidTransition, Lifecycle, StateId};

use super::events::SentryEvent;
use super::ports::{EventSink, LaserPort, RandomSource, ServoPort, TimePort, TurretHardware};

/// Startup sweep: each entry is one move-hold-stop step.
pub const CALIBRATION_SWEEP: [(Axis, f64); 5] = [
    (Axis::Pan, -90.0),
    (Axis::Pan, 90.0),
    (Axis::Pan, 0.0),
    (Axis::Tilt, 0.0),
    (Axis::Tilt, 90.0),
];

// ───────────────────────────────────────────────────────────────
// Cancellation (opt-in extension point)
// ───────────────────────────────────────────────────────────────

/// Shared stop request for [`Sequencer::run_until`].  [`Sequencer::run`]
/// never looks at one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ───────────────────────────────────────────────────────────────
// Sequencer
// ───────────────────────────────────────────────────────────────

pub struct Sequencer<S, L, C, R> {
    config: SentryConfig,
    pan: S,
    tilt: S,
    lasers: L,
    clock: C,
    rng: R,
    lifecycle: Lifecycle,
    iterations: u64,
}

impl<S, L, C, R> Sequencer<S, L, C, R>
where
    S: ServoPort,
    L: LaserPort,
    C: DelayNs + TimePort,
    R: RandomSource,
{
    /// Take ownership of the opened hardware.  The sequencer starts in
    /// `Booting` and does nothing until [`calibrate`](Self::calibrate) or
    /// [`run`](Self::run).
    pub fn new(config: SentryConfig, hw: TurretHardware<S, L>, clock: C, rng: R) -> Self {
        Self {
            config,
            pan: hw.pan,
            tilt: hw.tilt,
            lasers: hw.lasers,
            clock,
            rng,
            lifecycle: Lifecycle::new(),
            iterations: 0,
        }
    }

    pub fn state(&self) -> StateId {
        self.lifecycle.current_state()
    }

    /// Completed patrol iterations.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn config(&self) -> &SentryConfig {
        &self.config
    }

    pub fn servo(&self, axis: Axis) -> &S {
        match axis {
            Axis::Pan => &self.pan,
            Axis::Tilt => &self.tilt,
        }
    }

    pub fn lasers(&self) -> &L {
        &self.lasers
    }

    fn servo_mut(&mut self, axis: Axis) -> &mut S {
        match axis {
            Axis::Pan => &mut self.pan,
            Axis::Tilt => &mut self.tilt,
        }
    }

    fn enter(&mut self, next: StateId, sink: &mut impl EventSink) -> Result<()> {
        let from = self.lifecycle.transition(next)?;
        sink.emit(&SentryEvent::StateChanged { from, to: next });
        Ok(())
    }

    // ── Motion primitives ─────────────────────────────────────

    /// Start `axis` towards `degrees`.  An out-of-range angle is a no-op:
    /// nothing is written and `Ok(false)` is returned.
    pub fn aim(&mut self, axis: Axis, degrees: f64, sink: &mut impl EventSink) -> Result<bool> {
        match map_angle(axis, degrees) {
            Ok(duty) => {
                self.servo_mut(axis).start(duty)?;
                sink.emit(&SentryEvent::Aimed { axis, degrees, duty });
                Ok(true)
            }
            Err(range) => {
                sink.emit(&SentryEvent::CommandSkipped(range));
                Ok(false)
            }
        }
    }

    /// One motion step: aim, hold for the settle time, stop.  The stop is
    /// issued even when the aim was skipped.
    pub fn sweep(&mut self, axis: Axis, degrees: f64, sink: &mut impl EventSink) -> Result<()> {
        self.aim(axis, degrees, sink)?;
        self.clock.delay_ms(self.config.settle_ms);
        self.servo_mut(axis).stop()
    }

    // ── Phases ────────────────────────────────────────────────

    /// Booting → Calibrating: lasers on, then the fixed sweep.
    pub fn calibrate(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.enter(StateId::Calibrating, sink)?;
        info!("Calibrating: {} sweep steps", CALIBRATION_SWEEP.len());

        self.lasers.set_all(Level::On)?;
        for (axis, degrees) in CALIBRATION_SWEEP {
            self.sweep(axis, degrees, sink)?;
        }

        sink.emit(&SentryEvent::Calibrated);
        Ok(())
    }

    /// Calibrating → Patrolling, reseeding the PRNG from the clock.
    pub fn begin_patrol(&mut self, sink: &mut impl EventSink) -> Result<()> {
        self.enter(StateId::Patrolling, sink)?;
        let seed = u64::from(self.clock.subsec_millis());
        self.rng.reseed(seed);
        info!("Patrolling: mode={:?} seed={}", self.config.patrol_mode, seed);
        Ok(())
    }

    /// One randomised aim-and-blink iteration.  Only valid while patrolling.
    pub fn patrol_once(&mut self, sink: &mut impl EventSink) -> Result<()> {
        let state = self.state();
        if state != StateId::Patrolling {
            return Err(Error::State(InvalidTransition {
                from: state,
                to: StateId::Patrolling,
            }));
        }

        let pan_deg = self.rng.next_unit() * 180.0 - 90.0;
        let tilt_deg = self.rng.next_unit() * 90.0;

        // Both axes move during the same settle window.
        self.aim(Axis::Pan, pan_deg, sink)?;
        self.aim(Axis::Tilt, tilt_deg, sink)?;
        self.clock.delay_ms(self.config.settle_ms);
        self.pan.stop()?;
        self.tilt.stop()?;

        self.laser_phase()?;

        self.iterations += 1;
        sink.emit(&SentryEvent::PatrolIteration {
            count: self.iterations,
            pan_deg,
            tilt_deg,
        });
        Ok(())
    }

    fn laser_phase(&mut self) -> Result<()> {
        match self.config.patrol_mode {
            PatrolMode::Blink => {
                let phase = self.config.blink_phase_ms;
                for _ in 0..self.config.blink_cycles {
                    self.clock.delay_ms(phase);
                    self.lasers.set_all(Level::Off)?;
                    self.clock.delay_ms(phase);
                    self.lasers.set_all(Level::On)?;
                }
            }
            PatrolMode::Pause => self.clock.delay_ms(self.config.pause_ms),
        }
        Ok(())
    }

    // ── Entry points ──────────────────────────────────────────

    /// Calibrate, then patrol forever.  Returns only if a hardware write
    /// fails; there is no natural exit.
    pub fn run(&mut self, sink: &mut impl EventSink) -> Result<Infallible> {
        self.calibrate(sink)?;
        self.begin_patrol(sink)?;
        loop {
            self.patrol_once(sink)?;
        }
    }

    /// Like [`run`](Self::run), but checks `cancel` before every patrol
    /// iteration.  Picks up from whichever phase the sequencer is in.
    /// Returns the number of completed iterations.
    pub fn run_until(&mut self, sink: &mut impl EventSink, cancel: &CancelToken) -> Result<u64> {
        match self.state() {
            StateId::Booting => {
                self.calibrate(sink)?;
                self.begin_patrol(sink)?;
            }
            StateId::Calibrating => self.begin_patrol(sink)?,
            StateId::Patrolling => {}
            StateId::Failed => {
                return Err(Error::State(InvalidTransition {
                    from: StateId::Failed,
                    to: StateId::Patrolling,
                }));
            }
        }
        while !cancel.is_cancelled() {
            self.patrol_once(sink)?;
        }
        info!("Patrol cancelled after {} iterations", self.iterations);
        Ok(self.iterations)
    }
}
