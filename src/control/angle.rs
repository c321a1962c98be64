//! Angle → duty-cycle mapping for the gimbal servos.
//!
//! Each axis maps its valid angle range linearly onto a fixed slice of the
//! 50 Hz PWM period:
//!
//! | Axis | Angle (deg)  | Duty cycle     |
//! |------|--------------|----------------|
//! | Pan  | -90 ..= +90  | 0.01 ..= 0.12  |
//! | Tilt |   0 ..= +90  | 0.08 ..= 0.13  |
//!
//! Angles outside the range are rejected with [`RangeError`].  The
//! sequencer treats that as "skip this command", never as a fault.

use core::fmt;
use core::ops::RangeInclusive;

/// Gimbal axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal rotation.
    Pan,
    /// Vertical rotation.
    Tilt,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::Pan, Axis::Tilt];

    /// Valid commanded angles, in degrees.
    pub const fn angle_range(self) -> RangeInclusive<f64> {
        match self {
            Self::Pan => -90.0..=90.0,
            Self::Tilt => 0.0..=90.0,
        }
    }

    /// Duty cycles the angle range maps onto.
    pub const fn duty_range(self) -> RangeInclusive<f64> {
        match self {
            Self::Pan => 0.01..=0.12,
            Self::Tilt => 0.08..=0.13,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Tilt => "tilt",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fraction of the PWM period the line is held high, `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DutyCycle(f64);

impl DutyCycle {
    /// `None` unless `fraction` lies in `0.0 ..= 1.0`.
    pub fn new(fraction: f64) -> Option<Self> {
        (0.0..=1.0).contains(&fraction).then_some(Self(fraction))
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    /// Scale onto an integer duty register with `max` as 100 %.
    pub fn to_raw(self, max: u16) -> u16 {
        (self.0 * f64::from(max)).round() as u16
    }
}

impl fmt::Display for DutyCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// A commanded angle that lies outside its axis's range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeError {
    pub axis: Axis,
    pub degrees: f64,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.axis.angle_range();
        write!(
            f,
            "{} angle {:.2} outside [{}, {}]",
            self.axis,
            self.degrees,
            range.start(),
            range.end()
        )
    }
}

impl core::error::Error for RangeError {}

/// Convert a logical angle into the servo duty cycle for `axis`.
///
/// NaN is out of range for every axis.
pub fn map_angle(axis: Axis, degrees: f64) -> Result<DutyCycle, RangeError> {
    if !axis.angle_range().contains(&degrees) {
        return Err(RangeError { axis, degrees });
    }
    let fraction = match axis {
        // [-90, 90] -> [0.01, 0.12]
        Axis::Pan => ((degrees + 90.0) * 0.11 / 180.0) + 0.01,
        // [0, 90] -> [0.08, 0.13]
        Axis::Tilt => (degrees * 0.05 / 90.0) + 0.08,
    };
    Ok(DutyCycle(fraction))
}
