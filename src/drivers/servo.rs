//! Hobby-servo driver on one PWM line.
//!
//! `start` writes the duty cycle and leaves the line pulsing at the
//! controller's carrier frequency; `stop` drives the line fully off.  The
//! servo holds its last position mechanically once the signal stops.
//!
//! ## Fire-and-forget
//!
//! There is no position feedback and the driver never waits for the horn
//! to settle.  Waiting is the sequencer's job.
//!
//! ## Dual-target design
//!
//! Generic over [`embedded_hal::pwm::SetDutyCycle`]: on ESP-IDF the line
//! is an LEDC channel, on host/test a simulated or mock channel.

use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::ServoPort;
use crate::control::angle::{Axis, DutyCycle};
use crate::error::{ActuatorError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServoState {
    Idle,
    Pulsing(DutyCycle),
}

pub struct ServoChannel<P> {
    axis: Axis,
    pwm: P,
    state: ServoState,
}

impl<P: SetDutyCycle> ServoChannel<P> {
    /// Wrap an already-configured PWM line.  The line is left untouched
    /// until the first command.
    pub fn new(axis: Axis, pwm: P) -> Self {
        Self {
            axis,
            pwm,
            state: ServoState::Idle,
        }
    }

    pub fn state(&self) -> ServoState {
        self.state
    }

    /// Access to the underlying line (simulation and tests).
    pub fn pwm(&self) -> &P {
        &self.pwm
    }
}

impl<P: SetDutyCycle> ServoPort for ServoChannel<P> {
    fn start(&mut self, duty: DutyCycle) -> Result<()> {
        let raw = duty.to_raw(self.pwm.max_duty_cycle());
        self.pwm
            .set_duty_cycle(raw)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.state = ServoState::Pulsing(duty);
        debug!("servo {}: start duty={} raw={}", self.axis, duty, raw);
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.state = ServoState::Idle;
        debug!("servo {}: stop", self.axis);
        Ok(())
    }
}
