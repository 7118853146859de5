//! GPIO pin assignments for the FlashLog board (ESP32 DevKit).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DS18B20 1-Wire data line (open-drain, 4.7 kΩ external pull-up).
pub const ONE_WIRE_GPIO: i32 = 4;

/// DHT22 single-bus data line (open-drain, 10 kΩ external pull-up).
pub const DHT_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User interface
// ---------------------------------------------------------------------------

/// Momentary push-button, active-low with internal pull-up.
/// Falling edge toggles the download service.
pub const BUTTON_GPIO: i32 = 18;

/// On-board LED, HIGH while the download service is running.
pub const INDICATOR_GPIO: i32 = 2;
