//! Sentry Turret Firmware — Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  ServoChannel x2   LaserBank x5    SystemClock   SmallRngSource│
//! │  (ServoPort)       (LaserPort)     (DelayNs)     (RandomSource)│
//! │  LogEventSink                                                  │
//! │  (EventSink)                                                   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              Sequencer (pure logic)                    │    │
//! │  │  Lifecycle FSM · Angle mapping · Patrol                │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `main` only wires things up: the sequencer runs on its own thread
//! pinned to the APP core and `main` parks on its join handle for the
//! life of the process.
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use sentry_turret::adapters::log_sink::LogEventSink;
use sentry_turret::adapters::rng::SmallRngSource;
use sentry_turret::adapters::time::SystemClock;
use sentry_turret::app::service::{boot, reject};
use sentry_turret::config::SentryConfig;
use sentry_turret::drivers::hw_init;
use sentry_turret::drivers::task_pin::{Core, spawn_sentry_task};
use sentry_turret::error::Error;

const SENTRY_TASK_PRIORITY: u8 = 5;
const SENTRY_TASK_STACK_KB: usize = 8;

fn main() -> Result<()> {
    // ── 1. Platform init ──────────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("Sentry turret v{} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    // Values are validated by `boot`; only a malformed override stops here.
    let config = match SentryConfig::load() {
        Ok(c) => c,
        Err(e) => {
            reject(e.into(), &mut LogEventSink::new());
            return Ok(());
        }
    };

    // ── 3. Sentry task ────────────────────────────────────────
    let handle = spawn_sentry_task(
        Core::App,
        SENTRY_TASK_PRIORITY,
        SENTRY_TASK_STACK_KB,
        "sentry\0",
        move || -> Result<(), Error> {
            let mut sink = LogEventSink::new();
            let mut seq = boot(
                config,
                hw_init::open_turret,
                SystemClock::new(),
                SmallRngSource::default(),
                &mut sink,
            )?;
            seq.run(&mut sink).map(|never| match never {})
        },
    )?;

    // ── 4. Keep-alive ─────────────────────────────────────────
    let outcome = handle
        .join()
        .map_err(|_| anyhow::anyhow!("sentry task panicked"))?;

    match outcome {
        Ok(()) => Ok(()),
        // Already reported by the boot path; the task is simply complete.
        Err(e) if e.is_boot_fault() => Ok(()),
        Err(e) => {
            error!("Sentry halted: {}", e);
            Err(anyhow::anyhow!("sentry halted: {}", e))
        }
    }
}
