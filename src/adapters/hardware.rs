//! Simulated turret hardware for host builds.
//!
//! [`SimPwm`] and [`SimPin`] implement the same embedded-hal traits as the
//! LEDC channels and GPIO drivers, tracking state in memory only.
//! [`open_simulated`] mirrors `hw_init::open_turret`: same controller
//! lookup, same drivers, no registers.

use core::convert::Infallible;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};
use log::debug;

use crate::app::ports::TurretHardware;
use crate::config::SentryConfig;
use crate::control::angle::Axis;
use crate::drivers::hw_init;
use crate::drivers::laser_bank::LaserBank;
use crate::drivers::servo::ServoChannel;
use crate::error::Result;
use crate::pins;

/// In-memory PWM channel with the same 14-bit register as the LEDC setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPwm {
    gpio: i32,
    duty: u16,
}

impl SimPwm {
    pub const MAX_DUTY: u16 = (1 << pins::PWM_RESOLUTION_BITS) - 1;

    pub fn new(gpio: i32) -> Self {
        Self { gpio, duty: 0 }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl pwm::ErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        Self::MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> core::result::Result<(), Self::Error> {
        debug!("sim pwm gpio{}: duty {}", self.gpio, duty);
        self.duty = duty;
        Ok(())
    }
}

/// In-memory GPIO output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    gpio: i32,
    high: bool,
}

impl SimPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, high: false }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl digital::ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}

pub type SimTurret =
    TurretHardware<ServoChannel<SimPwm>, LaserBank<SimPin, { pins::LASER_COUNT }>>;

/// Open simulated hardware for `config`.
pub fn open_simulated(config: &SentryConfig) -> Result<SimTurret> {
    hw_init::select_pwm_controller(
        &hw_init::enumerate_pwm_controllers(),
        config.pwm_controller,
    )?;
    log::info!(
        "hw_init(sim): pan=gpio{} tilt=gpio{} lasers={:?}",
        config.pan_gpio,
        config.tilt_gpio,
        config.laser_gpios
    );
    Ok(TurretHardware {
        pan: ServoChannel::new(Axis::Pan, SimPwm::new(config.pan_gpio)),
        tilt: ServoChannel::new(Axis::Tilt, SimPwm::new(config.tilt_gpio)),
        lasers: LaserBank::new(config.laser_gpios.map(SimPin::new))?,
    })
}
