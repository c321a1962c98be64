//! Boot path — the only place a sentry can fail.
//!
//! [`boot`] validates the configuration, asks the platform to open the
//! turret hardware, and hands back a [`Sequencer`] ready to run.  Any
//! failure moves the lifecycle to `Failed`, is reported through the
//! [`EventSink`], and comes back as a [`BootFailure`] so the shell can
//! complete the task without ever patrolling.
//!
//! ```text
//!  SentryConfig ──▶ validate ──▶ open(&config) ──▶ Sequencer
//!                      │              │
//!                      └──────┬───────┘
//!                             ▼
//!                     Failed + BootFailed
//! ```

use core::fmt;

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::config::SentryConfig;
use crate::error::Error;
use crate::fsm::{Lifecycle, StateId};

use super::events::SentryEvent;
use super::ports::{EventSink, LaserPort, RandomSource, ServoPort, TimePort, TurretHardware};
use super::sequencer::Sequencer;

/// A boot that ended in `Failed`: the lifecycle it left behind plus the cause.
#[derive(Debug)]
pub struct BootFailure {
    lifecycle: Lifecycle,
    error: Error,
}

impl BootFailure {
    pub fn state(&self) -> StateId {
        self.lifecycle.current_state()
    }

    pub fn error(&self) -> Error {
        self.error
    }
}

impl fmt::Display for BootFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "boot failed ({}): {}", self.state().name(), self.error)
    }
}

impl From<BootFailure> for Error {
    fn from(f: BootFailure) -> Self {
        f.error
    }
}

/// Validate `config`, open the hardware, and build the sequencer.
///
/// `open` runs at most once and only with a validated configuration.
pub fn boot<S, L, C, R, F>(
    config: SentryConfig,
    open: F,
    clock: C,
    rng: R,
    sink: &mut impl EventSink,
) -> Result<Sequencer<S, L, C, R>, BootFailure>
where
    S: ServoPort,
    L: LaserPort,
    C: DelayNs + TimePort,
    R: RandomSource,
    F: FnOnce(&SentryConfig) -> crate::error::Result<TurretHardware<S, L>>,
{
    info!(
        "Booting: pan={} tilt={} lasers={:?} pwm={}@{}Hz",
        config.pan_gpio,
        config.tilt_gpio,
        config.laser_gpios,
        config.pwm_controller,
        config.pwm_frequency_hz
    );

    let opened = config
        .validate()
        .map_err(Error::from)
        .and_then(|()| open(&config));

    match opened {
        Ok(hw) => Ok(Sequencer::new(config, hw, clock, rng)),
        Err(e) => Err(reject(e, sink)),
    }
}

/// Fail a boot that never reached [`boot`], e.g. an unparseable
/// configuration override.  Reports exactly like a failed [`boot`].
pub fn reject(e: Error, sink: &mut impl EventSink) -> BootFailure {
    let mut lifecycle = Lifecycle::new();
    // Booting -> Failed is always a legal edge.
    if let Ok(from) = lifecycle.transition(StateId::Failed) {
        sink.emit(&SentryEvent::StateChanged {
            from,
            to: StateId::Failed,
        });
    }
    error!("Boot failed: {}, sentry will not patrol", e);
    sink.emit(&SentryEvent::BootFailed(e));
    BootFailure {
        lifecycle,
        error: e,
    }
}
