//! Application core: pure domain logic, zero I/O.
//!
//! Ties the sensor reader, the sample log and the service toggle into one
//! owned context ([`service::AppService`]).  All interaction with hardware
//! happens through the **port traits** defined in [`ports`].

pub mod events;
pub mod ports;
pub mod service;
