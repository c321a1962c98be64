//! Laser emitter bank — a fixed set of active-HIGH digital outputs.
//!
//! Lines are addressed by bank index (0..N), not by GPIO number.  Every
//! line is driven Off during construction, so a bank that exists is a bank
//! whose lines are all outputs at a known level.
//!
//! An out-of-range index is a programming error: it is reported as
//! [`Error::IndexFault`] and no line is touched.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::app::ports::LaserPort;
use crate::error::{ActuatorError, Error, Result};

/// Logic level of one laser line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Off,
    On,
}

pub struct LaserBank<P, const N: usize> {
    lines: [P; N],
    levels: [Level; N],
}

impl<P: OutputPin, const N: usize> LaserBank<P, N> {
    /// Take ownership of `lines` and drive each one Off, in index order.
    pub fn new(lines: [P; N]) -> Result<Self> {
        let mut bank = Self {
            lines,
            levels: [Level::Off; N],
        };
        for line in &mut bank.lines {
            line.set_low()
                .map_err(|_| Error::Init("laser line could not be driven low"))?;
        }
        debug!("laser bank: {} lines initialised Off", N);
        Ok(bank)
    }

    pub fn level(&self, index: usize) -> Option<Level> {
        self.levels.get(index).copied()
    }

    pub fn levels(&self) -> [Level; N] {
        self.levels
    }

    /// Access to the underlying lines (simulation and tests).
    pub fn lines(&self) -> &[P; N] {
        &self.lines
    }
}

impl<P: OutputPin, const N: usize> LaserPort for LaserBank<P, N> {
    fn len(&self) -> usize {
        N
    }

    fn set_line(&mut self, index: usize, level: Level) -> Result<()> {
        let Some(line) = self.lines.get_mut(index) else {
            return Err(Error::IndexFault { index, len: N });
        };
        match level {
            Level::On => line.set_high(),
            Level::Off => line.set_low(),
        }
        .map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.levels[index] = level;
        Ok(())
    }
}
