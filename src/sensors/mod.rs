//! Sensor subsystem: individual drivers, the aggregating [`SensorHub`],
//! and the [`SensorReader`] that turns one sample cycle into a
//! [`SensorSample`] or a [`SensorFailure`].
//!
//! ```text
//!  DS18B20 ──┐
//!  DHT22   ──┼─▶ SensorHub ──▶ SensorReader::read() ──▶ SensorSample
//!  Delay   ──┘                  (bounded DHT retry)
//! ```

pub mod dht22;
pub mod ds18b20;

use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::{DelayPort, EventSink, PrimarySensorPort, SecondarySensorPort};
use crate::config::SystemConfig;
use crate::error::SensorFailure;

/// One cycle's worth of measurements, before it is given a sequence number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub primary_temp_c: f32,
    pub secondary_temp_c: f32,
    pub secondary_humidity_pct: f32,
}

// ───────────────────────────────────────────────────────────────
// SensorHub
// ───────────────────────────────────────────────────────────────

/// Owns both drivers and the retry delay and exposes them as one
/// hardware handle.
pub struct SensorHub<P, Q, D> {
    pub primary: P,
    pub secondary: Q,
    delay: D,
}

impl<P, Q, D> SensorHub<P, Q, D> {
    pub fn new(primary: P, secondary: Q, delay: D) -> Self {
        Self {
            primary,
            secondary,
            delay,
        }
    }
}

impl<P: PrimarySensorPort, Q, D> PrimarySensorPort for SensorHub<P, Q, D> {
    fn request_conversion(&mut self) {
        self.primary.request_conversion();
    }

    fn last_celsius(&mut self) -> f32 {
        self.primary.last_celsius()
    }
}

impl<P, Q: SecondarySensorPort, D> SecondarySensorPort for SensorHub<P, Q, D> {
    fn read_temperature(&mut self) -> f32 {
        self.secondary.read_temperature()
    }

    fn read_humidity(&mut self) -> f32 {
        self.secondary.read_humidity()
    }
}

impl<P, Q, D: DelayPort> DelayPort for SensorHub<P, Q, D> {
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

// ───────────────────────────────────────────────────────────────
// SensorReader
// ───────────────────────────────────────────────────────────────

/// Reads both sensors once per cycle with a bounded DHT22 retry.
pub struct SensorReader<H> {
    hw: H,
    attempts: u8,
    retry_delay_ms: u32,
}

impl<H> SensorReader<H>
where
    H: PrimarySensorPort + SecondarySensorPort + DelayPort,
{
    pub fn new(hw: H, config: &SystemConfig) -> Self {
        Self {
            hw,
            attempts: config.secondary_retry_attempts.max(1),
            retry_delay_ms: config.secondary_retry_delay_ms,
        }
    }

    /// Run one sample cycle.
    ///
    /// The DS18B20 value is taken once and never validated.  The DHT22 is
    /// read up to `attempts` times, waiting `retry_delay_ms` between
    /// attempts, until temperature and humidity are both non-NaN.
    pub fn read(&mut self, sink: &mut impl EventSink) -> Result<SensorSample, SensorFailure> {
        self.hw.request_conversion();
        let primary_temp_c = self.hw.last_celsius();

        for attempt in 1..=self.attempts {
            let t = self.hw.read_temperature();
            let h = self.hw.read_humidity();

            if !t.is_nan() && !h.is_nan() {
                let sample = SensorSample {
                    primary_temp_c,
                    secondary_temp_c: t,
                    secondary_humidity_pct: h,
                };
                sink.emit(&AppEvent::SensorRead { sample, attempts: attempt });
                return Ok(sample);
            }

            if attempt < self.attempts {
                self.hw.delay_ms(self.retry_delay_ms);
            }
        }

        warn!("DHT22: no valid frame after {} attempts", self.attempts);
        let failure = SensorFailure::SecondarySensorTimeout;
        sink.emit(&AppEvent::SensorFailed(failure));
        Err(failure)
    }

    /// Borrow the underlying hardware (tests inspect mock state through this).
    pub fn hardware(&self) -> &H {
        &self.hw
    }
}
