//! Pure control math, zero I/O.

pub mod angle;
