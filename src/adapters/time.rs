//! System clock adapter.
//!
//! Blocking delays for the sequencer plus the sub-second reading used to
//! seed the patrol PRNG.
//!
//! - **`target_os = "espidf"`** — delays go through `FreeRtos::delay_ms`
//!   (yields the task), sub-second time comes from `esp_timer_get_time()`.
//! - **`not(target_os = "espidf")`** — `std::thread::sleep` and the system
//!   wall clock, for host-side simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::TimePort;

/// Blocking clock for the sentry task.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl DelayNs for SystemClock {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

impl TimePort for SystemClock {
    #[cfg(target_os = "espidf")]
    fn subsec_millis(&self) -> u32 {
        // SAFETY: esp_timer_get_time is a read of the RTC-backed counter.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        ((us % 1_000_000) / 1_000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn subsec_millis(&self) -> u32 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_millis())
            .unwrap_or(0)
    }
}
