//! Unified error types for the FlashLog firmware.
//!
//! Each subsystem owns a small `Copy` enum (sensor, storage, network) and
//! the top-level [`Error`] wraps them, so the main loop can log any
//! failure uniformly.  None of these are fatal: the loop logs the error
//! and carries on with the next iteration.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor cycle produced no usable reading.
    Sensor(SensorFailure),
    /// The flash log could not be written, read or removed.
    Io(IoFailure),
    /// The access point or one of its services failed to start.
    Network(NetworkFailure),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFailure {
    /// The DHT22 returned NaN for temperature or humidity on every attempt.
    SecondarySensorTimeout,
}

impl fmt::Display for SensorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecondarySensorTimeout => write!(f, "secondary sensor timed out"),
        }
    }
}

impl From<SensorFailure> for Error {
    fn from(e: SensorFailure) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Storage failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoFailure {
    /// The log file could not be opened for appending.
    OpenFailed,
    /// The file was opened but the line could not be written.
    WriteFailed,
    /// The file exists but could not be read back.
    ReadFailed,
    /// The file does not exist.
    NotFound,
    /// The file exists but could not be deleted.
    RemoveFailed,
}

impl fmt::Display for IoFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed => write!(f, "failed to open file for appending"),
            Self::WriteFailed => write!(f, "failed to write to file"),
            Self::ReadFailed => write!(f, "failed to read file"),
            Self::NotFound => write!(f, "file not found"),
            Self::RemoveFailed => write!(f, "failed to remove file"),
        }
    }
}

impl From<IoFailure> for Error {
    fn from(e: IoFailure) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Network failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// SSID or passphrase rejected before touching the radio.
    InvalidCredentials,
    /// The WiFi driver refused to start in AP mode.
    AccessPointStartFailed,
    /// The AP came up but its netif has no address.
    NoAddressAssigned,
    /// mDNS could not be initialised.
    ResolverStartFailed,
    /// The HTTP server could not be started or a route not registered.
    RouterStartFailed,
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid AP credentials"),
            Self::AccessPointStartFailed => write!(f, "access point failed to start"),
            Self::NoAddressAssigned => write!(f, "access point has no address"),
            Self::ResolverStartFailed => write!(f, "mDNS failed to start"),
            Self::RouterStartFailed => write!(f, "HTTP server failed to start"),
        }
    }
}

impl From<NetworkFailure> for Error {
    fn from(e: NetworkFailure) -> Self {
        Self::Network(e)
    }
}
