//! Port traits — the hexagonal boundary between the sequencer and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Sequencer (domain)
//! ```
//!
//! Driven adapters (servos, lasers, clock, random source, event sinks)
//! implement these traits.  The [`Sequencer`](super::sequencer::Sequencer)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  Blocking waits use [`embedded_hal::delay::DelayNs`] rather
//! than a port of their own.

use crate::control::angle::DutyCycle;
use crate::drivers::laser_bank::Level;
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Servo port (driven adapter: domain → PWM line)
// ───────────────────────────────────────────────────────────────

/// One servo axis.  Commands are fire-and-forget.
pub trait ServoPort {
    /// Apply `duty` and keep the line pulsing.
    fn start(&mut self, duty: DutyCycle) -> Result<()>;

    /// Cease pulsing; the servo holds its last position.
    fn stop(&mut self) -> Result<()>;
}

// ───────────────────────────────────────────────────────────────
// Laser port (driven adapter: domain → GPIO bank)
// ───────────────────────────────────────────────────────────────

/// Fixed-size bank of on/off laser lines.
pub trait LaserPort {
    /// Number of lines; fixed at construction.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drive line `index`.  Fails with `Error::IndexFault` and changes
    /// nothing when `index >= len()`.
    fn set_line(&mut self, index: usize, level: Level) -> Result<()>;

    /// Drive every line, in index order.
    fn set_all(&mut self, level: Level) -> Result<()> {
        for index in 0..self.len() {
            self.set_line(index, level)?;
        }
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: domain ← wall clock)
// ───────────────────────────────────────────────────────────────

/// Wall-clock queries that are not delays.
pub trait TimePort {
    /// Sub-second component of the current time, `0..1000`.
    fn subsec_millis(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Random source (driven adapter: domain ← PRNG)
// ───────────────────────────────────────────────────────────────

/// Uniform draws for the patrol loop.
pub trait RandomSource {
    /// Restart the sequence from `seed`.
    fn reseed(&mut self, seed: u64);

    /// Next uniform value in `[0.0, 1.0)`.
    fn next_unit(&mut self) -> f64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`SentryEvent`](super::events::SentryEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::SentryEvent);
}

// ───────────────────────────────────────────────────────────────
// Hardware bundle
// ───────────────────────────────────────────────────────────────

/// Everything the sequencer drives, opened once during boot.
pub struct TurretHardware<S, L> {
    pub pan: S,
    pub tilt: S,
    pub lasers: L,
}
