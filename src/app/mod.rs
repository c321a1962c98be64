//! Application core — sentry behaviour, zero direct I/O.
//!
//! The motion sequencer (calibration sweep + endless patrol) and the boot
//! path that builds it.  All interaction with hardware happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod sequencer;
pub mod service;
