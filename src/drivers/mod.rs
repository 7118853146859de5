//! Peripheral drivers, hardware initialisation, and board helpers.

pub mod button;
pub mod gpio;
pub mod hw_init;
pub mod indicator;
pub mod watchdog;
