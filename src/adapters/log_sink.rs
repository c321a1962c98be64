//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured sentry events to the
//! logger (UART / USB-CDC through `esp_idf_logger` in production).
//! Per-move traffic goes out at `debug` so a patrolling sentry does not
//! flood the console; lifecycle events go out at `info` or above.

use log::{debug, error, info, warn};

use crate::app::events::SentryEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`SentryEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &SentryEvent) {
        match event {
            SentryEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            SentryEvent::Aimed {
                axis,
                degrees,
                duty,
            } => {
                debug!("AIM | {} {:+.1}\u{00b0} duty={}", axis, degrees, duty);
            }
            SentryEvent::CommandSkipped(range) => {
                warn!("SKIP | {}", range);
            }
            SentryEvent::Calibrated => {
                info!("CALIBRATED | sweep complete");
            }
            SentryEvent::PatrolIteration {
                count,
                pan_deg,
                tilt_deg,
            } => {
                info!(
                    "PATROL | #{} pan={:+.1}\u{00b0} tilt={:.1}\u{00b0}",
                    count, pan_deg, tilt_deg
                );
            }
            SentryEvent::BootFailed(e) => {
                error!("BOOT | failed: {}", e);
            }
        }
    }
}
