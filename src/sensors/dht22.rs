//! DHT22 (AM2302) temperature/humidity sensor on its single-wire bus.
//!
//! The host pulls the line low for >1 ms, releases it, and the sensor
//! answers with an 80 µs low / 80 µs high preamble followed by 40 data
//! bits.  Each bit is a ~50 µs low followed by a high whose length encodes
//! the value (~27 µs = 0, ~70 µs = 1).  Pulses are measured by polling in
//! 1 µs steps; a bit is `1` when its high phase outlasts its low phase,
//! which makes the decode independent of the exact loop period.
//!
//! The protocol is timing-sensitive and runs with interrupts enabled, so
//! frames are regularly lost.  A lost frame reads as `NaN`; the
//! [`SensorReader`](super::SensorReader) retries.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::SecondarySensorPort;

const START_LOW_US: u32 = 1_100;
const START_RELEASE_US: u32 = 40;
/// Polling steps before a pulse is considered lost.
const PULSE_TIMEOUT_STEPS: u32 = 1_000;

const FRAME_LEN: usize = 5;

/// Decoded frame: `(temperature °C, relative humidity %)`.
/// `None` if the checksum does not match.
pub fn decode_frame(frame: &[u8; FRAME_LEN]) -> Option<(f32, f32)> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return None;
    }
    let humidity = f32::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
    let raw_t = u16::from_be_bytes([frame[2], frame[3]]);
    let magnitude = f32::from(raw_t & 0x7FFF) / 10.0;
    let temperature = if raw_t & 0x8000 != 0 { -magnitude } else { magnitude };
    Some((temperature, humidity))
}

pub struct Dht22<P, D> {
    pin: P,
    delay: D,
    /// Humidity from the frame fetched by the last temperature read, so a
    /// temperature + humidity pair comes from one transaction.
    pending_humidity: Option<f32>,
}

impl<P, D> Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            pending_humidity: None,
        }
    }

    /// Count polling steps while the line stays at `level`.
    fn pulse_len(&mut self, level: bool) -> Option<u32> {
        let mut steps = 0;
        while self.pin.is_high().ok()? == level {
            steps += 1;
            if steps >= PULSE_TIMEOUT_STEPS {
                return None;
            }
            self.delay.delay_us(1);
        }
        Some(steps)
    }

    fn read_frame(&mut self) -> Option<[u8; FRAME_LEN]> {
        let _ = self.pin.set_low();
        self.delay.delay_us(START_LOW_US);
        let _ = self.pin.set_high();
        self.delay.delay_us(START_RELEASE_US);

        // Preamble.
        self.pulse_len(false)?;
        self.pulse_len(true)?;

        let mut frame = [0u8; FRAME_LEN];
        for bit in 0..FRAME_LEN * 8 {
            let low = self.pulse_len(false)?;
            let high = self.pulse_len(true)?;
            if high > low {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Some(frame)
    }

    /// One full transaction.
    pub fn read(&mut self) -> Option<(f32, f32)> {
        self.read_frame().as_ref().and_then(decode_frame)
    }
}

impl<P, D> SecondarySensorPort for Dht22<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn read_temperature(&mut self) -> f32 {
        match self.read() {
            Some((t, h)) => {
                self.pending_humidity = Some(h);
                t
            }
            None => {
                self.pending_humidity = None;
                f32::NAN
            }
        }
    }

    fn read_humidity(&mut self) -> f32 {
        match self.pending_humidity.take() {
            Some(h) => h,
            None => self.read().map_or(f32::NAN, |(_, h)| h),
        }
    }
}
