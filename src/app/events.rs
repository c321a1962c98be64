//! Outbound sentry events.
//!
//! The sequencer and the boot path emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them; the firmware only logs them.

use crate::control::angle::{Axis, DutyCycle, RangeError};
use crate::error::Error;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum SentryEvent {
    /// The lifecycle moved between states.
    StateChanged { from: StateId, to: StateId },

    /// A servo was commanded to an angle.
    Aimed {
        axis: Axis,
        degrees: f64,
        duty: DutyCycle,
    },

    /// An angle command was out of range and ignored.
    CommandSkipped(RangeError),

    /// The startup sweep finished.
    Calibrated,

    /// One patrol iteration finished (count starts at 1).
    PatrolIteration { count: u64, pan_deg: f64, tilt_deg: f64 },

    /// Boot could not complete; the sentry will not patrol.
    BootFailed(Error),
}
