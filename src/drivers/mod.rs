//! Actuator drivers, hardware initialisation, and task helpers.

pub mod hw_init;
pub mod laser_bank;
pub mod servo;
pub mod task_pin;
