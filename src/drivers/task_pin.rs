//! Dedicated, core-pinned thread for the sentry task.
//!
//! The sequencer blocks for seconds at a time, so it gets its own
//! FreeRTOS task instead of running on the main task.  On ESP-IDF
//! `esp_pthread_set_cfg()` sets the core affinity, priority and stack of
//! the *next* `pthread_create()` from the calling thread; the config→spawn
//! pair must not be interleaved with other thread creation.
//! On non-ESP targets this is a plain named `std::thread`.

use std::thread::JoinHandle;

use crate::error::{Error, Result};

/// CPU core identifiers for the ESP32 Xtensa dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU), protocol stacks.
    Pro = 0,
    /// Core 1 (APP_CPU), application logic.
    App = 1,
}

/// Spawn `f` on `core` with explicit priority and stack.  `name` must be
/// null-terminated (e.g. `"sentry\0"`).
#[cfg(target_os = "espidf")]
pub fn spawn_sentry_task<T: Send + 'static>(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<JoinHandle<T>> {
    // SAFETY: cfg is a fully initialised default config; thread_name
    // points at a 'static null-terminated string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = priority as i32;
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = name.as_ptr() as *const _;
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(Error::Init("esp_pthread_set_cfg failed"));
    }

    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        display_name,
        core,
        priority,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .spawn(f)
        .map_err(|_| Error::Init("sentry task spawn failed"))
}

/// Simulation fallback: ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_sentry_task<T: Send + 'static>(
    _core: Core,
    _priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() -> T + Send + 'static,
) -> Result<JoinHandle<T>> {
    let display_name = name.trim_end_matches('\0');
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        display_name,
        stack_kb
    );

    std::thread::Builder::new()
        .name(display_name.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("sentry task spawn failed"))
}
