//! Default GPIO / peripheral assignments for the turret board.
//!
//! Single source of truth for the factory wiring.  Every value here is only
//! a default for [`SentryConfig`](crate::config::SentryConfig); drivers read
//! the configuration, never these constants directly.

// ---------------------------------------------------------------------------
// Gimbal servos (hobby servos, 50 Hz PWM)
// ---------------------------------------------------------------------------

/// PWM line driving the pan (horizontal) servo.
pub const PAN_PWM_GPIO: i32 = 18;
/// PWM line driving the tilt (vertical) servo.
pub const TILT_PWM_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// Laser emitters (active HIGH)
// ---------------------------------------------------------------------------

/// Number of laser emitters on the turret head.
pub const LASER_COUNT: usize = 5;

/// Laser output lines, in bank index order 0..4.
pub const LASER_GPIOS: [i32; LASER_COUNT] = [24, 25, 21, 7, 16];

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Servo carrier frequency shared by both axes.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

/// PWM controller the servos are attached to.
pub const SERVO_PWM_CONTROLLER: u8 = 1;

/// LEDC timer resolution (bits).  14 bits leaves ~16 k steps per 20 ms period.
pub const PWM_RESOLUTION_BITS: u32 = 14;
