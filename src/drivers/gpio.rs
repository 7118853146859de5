//! `embedded-hal` 1.0 glue for the bit-banged sensor buses.
//!
//! [`OpenDrainPin`] drives a line low or releases it to the external
//! pull-up and reads the level back.  [`RomDelay`] provides the
//! microsecond busy-waits the bus timing needs, plus the millisecond
//! [`DelayPort`] used between DHT22 retries.
//!
//! On the host both are inert: the pin reads back whatever was last
//! written (so a sensor never answers) and delays sleep the thread.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::app::ports::DelayPort;
use crate::drivers::hw_init;

/// One open-drain GPIO configured by `hw_init::init_peripherals`.
pub struct OpenDrainPin {
    gpio: i32,
    #[cfg(not(target_os = "espidf"))]
    level: bool,
}

impl OpenDrainPin {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            #[cfg(not(target_os = "espidf"))]
            level: true,
        }
    }
}

impl ErrorType for OpenDrainPin {
    type Error = Infallible;
}

impl OutputPin for OpenDrainPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, false);
        #[cfg(not(target_os = "espidf"))]
        {
            self.level = false;
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, true);
        #[cfg(not(target_os = "espidf"))]
        {
            self.level = true;
        }
        Ok(())
    }
}

impl InputPin for OpenDrainPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        #[cfg(target_os = "espidf")]
        let high = hw_init::gpio_read(self.gpio);
        #[cfg(not(target_os = "espidf"))]
        let high = self.level;
        Ok(high)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}

/// Busy-wait delay backed by the ROM `esp_rom_delay_us` routine.
#[derive(Debug, Default, Clone, Copy)]
pub struct RomDelay;

impl DelayNs for RomDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns.div_ceil(1_000));
    }

    #[cfg(target_os = "espidf")]
    fn delay_us(&mut self, us: u32) {
        // SAFETY: ROM busy-loop, no shared state.
        unsafe { esp_idf_svc::sys::esp_rom_delay_us(us) };
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(std::time::Duration::from_micros(u64::from(us)));
    }
}

impl DelayPort for RomDelay {
    fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(self, ms);
    }
}
