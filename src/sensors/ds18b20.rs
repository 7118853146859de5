//! DS18B20 digital thermometer on a bit-banged 1-Wire bus.
//!
//! Single device on the bus, so every transaction uses Skip ROM.
//!
//! ## Conversion model
//!
//! [`request_conversion`](PrimarySensorPort::request_conversion) issues
//! Convert T and returns immediately; it does not wait the ~750 ms a
//! 12-bit conversion takes.  [`last_celsius`](PrimarySensorPort::last_celsius)
//! reads the scratchpad, which still holds the previous conversion while a
//! new one is running.  The logged value therefore lags one sample
//! period behind, and the very first reading after power-up is the
//! 85.0 °C reset value.
//!
//! Missing device or CRC mismatch yields [`DEVICE_DISCONNECTED_C`].

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::PrimarySensorPort;

/// Sentinel returned when the sensor is absent or the scratchpad is corrupt.
pub const DEVICE_DISCONNECTED_C: f32 = -127.0;

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

const SCRATCHPAD_LEN: usize = 9;

// Standard-speed slot timings (µs), Maxim AN126.
const RESET_LOW_US: u32 = 480;
const PRESENCE_SAMPLE_US: u32 = 70;
const RESET_RECOVERY_US: u32 = 410;
const WRITE_1_LOW_US: u32 = 6;
const WRITE_1_RELEASE_US: u32 = 64;
const WRITE_0_LOW_US: u32 = 60;
const WRITE_0_RELEASE_US: u32 = 10;
const READ_LOW_US: u32 = 6;
const READ_SAMPLE_US: u32 = 9;
const READ_RECOVERY_US: u32 = 55;

/// Dallas/Maxim CRC-8 (polynomial x^8 + x^5 + x^4 + 1, LSB first).
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Decode a scratchpad into °C (12-bit resolution, 1/16 °C per LSB).
/// `None` if the CRC does not match.
pub fn decode_scratchpad(scratchpad: &[u8; SCRATCHPAD_LEN]) -> Option<f32> {
    if crc8(&scratchpad[..8]) != scratchpad[8] {
        return None;
    }
    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    Some(f32::from(raw) / 16.0)
}

/// DS18B20 driver over an open-drain pin with external pull-up.
///
/// `set_high()` releases the line; `set_low()` drives it.
pub struct Ds18b20<P, D> {
    pin: P,
    delay: D,
}

impl<P, D> Ds18b20<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Reset pulse.  Returns `true` if a device answered with a presence pulse.
    fn reset(&mut self) -> bool {
        let _ = self.pin.set_low();
        self.delay.delay_us(RESET_LOW_US);
        let _ = self.pin.set_high();
        self.delay.delay_us(PRESENCE_SAMPLE_US);
        let present = self.pin.is_low().unwrap_or(false);
        self.delay.delay_us(RESET_RECOVERY_US);
        present
    }

    fn write_bit(&mut self, bit: bool) {
        let (low, release) = if bit {
            (WRITE_1_LOW_US, WRITE_1_RELEASE_US)
        } else {
            (WRITE_0_LOW_US, WRITE_0_RELEASE_US)
        };
        let _ = self.pin.set_low();
        self.delay.delay_us(low);
        let _ = self.pin.set_high();
        self.delay.delay_us(release);
    }

    fn read_bit(&mut self) -> bool {
        let _ = self.pin.set_low();
        self.delay.delay_us(READ_LOW_US);
        let _ = self.pin.set_high();
        self.delay.delay_us(READ_SAMPLE_US);
        let bit = self.pin.is_high().unwrap_or(true);
        self.delay.delay_us(READ_RECOVERY_US);
        bit
    }

    fn write_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0);
        }
    }

    fn read_byte(&mut self) -> u8 {
        (0..8).fold(0u8, |acc, i| if self.read_bit() { acc | (1 << i) } else { acc })
    }

    /// Issue Convert T.  Returns `false` if nothing answered the reset.
    pub fn start_conversion(&mut self) -> bool {
        if !self.reset() {
            return false;
        }
        self.write_byte(CMD_SKIP_ROM);
        self.write_byte(CMD_CONVERT_T);
        true
    }

    /// Raw scratchpad, or `None` if nothing answered the reset.
    pub fn read_scratchpad(&mut self) -> Option<[u8; SCRATCHPAD_LEN]> {
        if !self.reset() {
            return None;
        }
        self.write_byte(CMD_SKIP_ROM);
        self.write_byte(CMD_READ_SCRATCHPAD);
        let mut sp = [0u8; SCRATCHPAD_LEN];
        for b in &mut sp {
            *b = self.read_byte();
        }
        Some(sp)
    }
}

impl<P, D> PrimarySensorPort for Ds18b20<P, D>
where
    P: InputPin + OutputPin,
    D: DelayNs,
{
    fn request_conversion(&mut self) {
        if !self.start_conversion() {
            log::debug!("DS18B20: no presence pulse on convert");
        }
    }

    fn last_celsius(&mut self) -> f32 {
        self.read_scratchpad()
            .as_ref()
            .and_then(decode_scratchpad)
            .unwrap_or(DEVICE_DISCONNECTED_C)
    }
}
