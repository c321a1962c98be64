//! Unified error types for the sentry firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! sequencer and the lifecycle shell handle faults uniformly.  All variants
//! are `Copy` so they can be passed through the event sink without
//! allocation.
//!
//! Out-of-range angles are deliberately *not* part of this enum: they are
//! a local, silent condition owned by [`crate::control::angle`].

use core::fmt;

use crate::fsm::InvalidTransition;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator or output line command failed.
    Actuator(ActuatorError),
    /// A laser line index outside the fixed bank size.  Programming error.
    IndexFault { index: usize, len: usize },
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid, or the configured hardware is absent.
    Config(&'static str),
    /// A sequencer phase was entered out of order.
    State(InvalidTransition),
}

impl Error {
    /// Faults that stop the sentry before it ever patrols.  The boot path
    /// has already reported them.
    pub fn is_boot_fault(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Init(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::IndexFault { index, len } => {
                write!(f, "laser index {index} out of bounds (bank size {len})")
            }
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::State(e) => write!(f, "state: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

impl From<InvalidTransition> for Error {
    fn from(e: InvalidTransition) -> Self {
        Self::State(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
