//! System configuration parameters
//!
//! All hardware addressing and timing constants for the sentry.
//! Defaults come from [`crate::pins`]; a JSON override can be baked in at
//! build time through the `SENTRY_CONFIG` environment variable.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::pins;

/// What the sentry does with its lasers between two aiming moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolMode {
    /// Blink all lasers off/on for `blink_cycles` cycles, ending On.
    #[default]
    Blink,
    /// Earlier behaviour: one flat `pause_ms` wait, lasers untouched.
    Pause,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentryConfig {
    // --- Hardware addressing ---
    /// PWM line of the pan servo
    pub pan_gpio: i32,
    /// PWM line of the tilt servo
    pub tilt_gpio: i32,
    /// Laser output lines in bank index order
    pub laser_gpios: [i32; pins::LASER_COUNT],

    // --- PWM ---
    /// Servo carrier frequency (Hz)
    pub pwm_frequency_hz: u32,
    /// Identifier of the PWM controller the servos hang off
    pub pwm_controller: u8,

    // --- Timing ---
    /// Hold time after every move before the servo is stopped (ms)
    pub settle_ms: u32,
    /// Duration of one blink half-phase (ms)
    pub blink_phase_ms: u32,
    /// Number of off/on blink cycles per patrol iteration
    pub blink_cycles: u32,
    /// Flat wait used by [`PatrolMode::Pause`] (ms)
    pub pause_ms: u32,

    // --- Behaviour ---
    pub patrol_mode: PatrolMode,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            // Hardware
            pan_gpio: pins::PAN_PWM_GPIO,
            tilt_gpio: pins::TILT_PWM_GPIO,
            laser_gpios: pins::LASER_GPIOS,

            // PWM
            pwm_frequency_hz: pins::SERVO_PWM_FREQ_HZ,
            pwm_controller: pins::SERVO_PWM_CONTROLLER,

            // Timing
            settle_ms: 1000,
            blink_phase_ms: 50, // 50 cycles × 2 × 50 ms ≈ 5 s
            blink_cycles: 50,
            pause_ms: 5000,

            patrol_mode: PatrolMode::Blink,
        }
    }
}

/// Errors from loading or validating a [`SentryConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Override text is not valid JSON for this schema.
    Malformed,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Malformed => write!(f, "config override is malformed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Malformed => Error::Config("config override is malformed"),
            ConfigError::ValidationFailed(msg) => Error::Config(msg),
        }
    }
}

impl SentryConfig {
    /// Build-time override, if one was provided.
    const OVERRIDE: Option<&'static str> = option_env!("SENTRY_CONFIG");

    /// Resolve the active configuration: the `SENTRY_CONFIG` JSON baked in
    /// at build time, or the defaults.  Only parsing happens here;
    /// [`boot`](crate::app::service::boot) validates.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::OVERRIDE {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// Parse a (possibly partial) JSON document; missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|_| ConfigError::Malformed)
    }

    /// Reject configurations that would make the sentry misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pwm_frequency_hz == 0 {
            return Err(ConfigError::ValidationFailed("pwm_frequency_hz must be > 0"));
        }
        if self.settle_ms == 0 {
            return Err(ConfigError::ValidationFailed("settle_ms must be > 0"));
        }
        if self.patrol_mode == PatrolMode::Blink
            && (self.blink_phase_ms == 0 || self.blink_cycles == 0)
        {
            return Err(ConfigError::ValidationFailed(
                "blink_phase_ms and blink_cycles must be > 0 in blink mode",
            ));
        }
        if self.patrol_mode == PatrolMode::Pause && self.pause_ms == 0 {
            return Err(ConfigError::ValidationFailed("pause_ms must be > 0 in pause mode"));
        }

        let mut lines: heapless::Vec<i32, { pins::LASER_COUNT + 2 }> = heapless::Vec::new();
        for &gpio in [self.pan_gpio, self.tilt_gpio]
            .iter()
            .chain(self.laser_gpios.iter())
        {
            if gpio < 0 {
                return Err(ConfigError::ValidationFailed("gpio numbers must be >= 0"));
            }
            if lines.contains(&gpio) {
                return Err(ConfigError::ValidationFailed("gpio assigned twice"));
            }
            // Capacity is exactly the number of lines iterated.
            let _ = lines.push(gpio);
        }
        Ok(())
    }
}
