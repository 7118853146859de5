//! Outbound application events.
//!
//! The domain components emit these through the
//! [`EventSink`](super::ports::EventSink) port.  In production they end up
//! as serial log lines; nothing else parses them.

use core::net::Ipv4Addr;

use crate::error::{IoFailure, NetworkFailure, SensorFailure};
use crate::sample_log::Reading;
use crate::sensors::SensorSample;
use crate::service_toggle::ServiceState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Both sensors produced a usable sample (`attempts` DHT22 reads used).
    SensorRead { sample: SensorSample, attempts: u8 },

    /// The DHT22 stayed NaN for every attempt; the cycle is skipped.
    SensorFailed(SensorFailure),

    /// A line was appended to the log.
    Logged(Reading),

    /// Appending failed; `sequence` was still consumed.
    LogWriteFailed { sequence: u32, error: IoFailure },

    /// The download service is up at `ip`.
    ServiceStarted { ip: Ipv4Addr },

    /// The download service could not start; state left unchanged.
    ServiceStartFailed(NetworkFailure),

    /// The download service was shut down.
    ServiceStopped,

    /// The button was pressed; carries the state the toggle moved from.
    ButtonPressed(ServiceState),
}
