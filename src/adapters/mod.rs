//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                 | Connects to              |
//! |------------|----------------------------|--------------------------|
//! | `hardware` | embedded-hal PWM / GPIO    | in-memory simulation     |
//! | `log_sink` | EventSink                  | Serial log output        |
//! | `rng`      | RandomSource               | `SmallRng`               |
//! | `time`     | DelayNs, TimePort          | FreeRTOS / system clock  |
//!
//! The ESP-IDF hardware opener lives in `drivers::hw_init`.

pub mod hardware;
pub mod log_sink;
pub mod rng;
pub mod time;
