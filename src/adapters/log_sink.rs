//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::SensorRead { sample, attempts } => {
                info!(
                    "SAMPLE | DS18B20={:.2}\u{00b0}C | DHT22={:.1}\u{00b0}C {:.1}%RH | attempts={}",
                    sample.primary_temp_c,
                    sample.secondary_temp_c,
                    sample.secondary_humidity_pct,
                    attempts,
                );
            }
            AppEvent::SensorFailed(e) => {
                warn!("SAMPLE | failed: {}", e);
            }
            AppEvent::Logged(r) => {
                info!("LOG | #{} written", r.sequence);
            }
            AppEvent::LogWriteFailed { sequence, error } => {
                warn!("LOG | #{} not written: {}", sequence, error);
            }
            AppEvent::ServiceStarted { ip } => {
                info!("SERVICE | running at {}", ip);
            }
            AppEvent::ServiceStartFailed(e) => {
                warn!("SERVICE | start failed: {}", e);
            }
            AppEvent::ServiceStopped => {
                info!("SERVICE | stopped");
            }
            AppEvent::ButtonPressed(from) => {
                info!("BUTTON | pressed while {:?}", from);
            }
        }
    }
}
