//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SensorReader / SampleLog / ServiceToggle
//! ```
//!
//! Driven adapters (sensor drivers, flash filesystem, WiFi AP, mDNS, HTTP
//! server, indicator LED, serial log) implement these traits.  The domain
//! consumes them via generics, so nothing in the core touches hardware
//! directly and every component runs against mocks on the host.

use core::net::Ipv4Addr;

use crate::error::{IoFailure, NetworkFailure};
use crate::routes::Routes;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// The 1-Wire thermometer.
pub trait PrimarySensorPort {
    /// Ask the sensor to start a new temperature conversion.
    fn request_conversion(&mut self);

    /// Last converted temperature in °C.  May be stale or a sentinel
    /// value; callers accept it as-is.
    fn last_celsius(&mut self) -> f32;
}

/// The temperature/humidity sensor.  Failed reads return `NaN`.
pub trait SecondarySensorPort {
    fn read_temperature(&mut self) -> f32;
    fn read_humidity(&mut self) -> f32;
}

/// Blocking millisecond delay, used only for the bounded sensor retry.
pub trait DelayPort {
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ flash filesystem)
// ───────────────────────────────────────────────────────────────

/// Named-file store on flash.
///
/// Every call is a self-contained open/operate/close; implementations
/// never keep a handle across calls.
pub trait FileStorePort {
    /// Append `data` to `path`, creating the file if needed.
    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), IoFailure>;

    /// Delete `path`.  `NotFound` if it does not exist.
    fn remove(&mut self, path: &str) -> Result<(), IoFailure>;

    /// Whether `path` currently exists.
    fn exists(&self, path: &str) -> bool;

    /// Whole-file read.  `NotFound` if it does not exist.
    fn read(&self, path: &str) -> Result<Vec<u8>, IoFailure>;
}

// ───────────────────────────────────────────────────────────────
// Service ports (driven adapter: domain → network / indicator)
// ───────────────────────────────────────────────────────────────

/// WiFi soft access point.
pub trait AccessPointPort {
    /// Bring the AP up and return the address it serves on.
    fn start_ap(&mut self, ssid: &str, password: &str) -> Result<Ipv4Addr, NetworkFailure>;
    fn stop_ap(&mut self);
}

/// mDNS host-name advertisement.
pub trait NameResolverPort {
    fn start_resolver(&mut self, hostname: &str) -> Result<(), NetworkFailure>;
    fn stop_resolver(&mut self);
}

/// HTTP request router serving the log file routes.
pub trait RequestRouterPort {
    /// Register every path in [`crate::routes::ROUTE_PATHS`] against
    /// `routes` and start serving.
    fn start_router<S>(&mut self, routes: Routes<S>) -> Result<(), NetworkFailure>
    where
        S: FileStorePort + Send + 'static;

    fn stop_router(&mut self);
}

/// Digital "service running" indicator.
pub trait IndicatorPort {
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log in
/// production, a `Vec` in tests).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
