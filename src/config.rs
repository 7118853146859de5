//! System configuration parameters
//!
//! All tunable parameters for the FlashLog system.  Values are fixed at
//! build time; nothing is persisted besides the sample log itself.

use serde::{Deserialize, Serialize};

use crate::adapters::wifi::{validate_password, validate_ssid};
use crate::error::Error;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Sampling ---
    /// Minimum time between two sample cycles (milliseconds)
    pub sample_interval_ms: u32,
    /// DHT22 attempts per cycle before giving up
    pub secondary_retry_attempts: u8,
    /// Wait between DHT22 attempts (milliseconds)
    pub secondary_retry_delay_ms: u32,

    // --- Log file ---
    /// Lines kept before the file is wiped and restarted
    pub max_log_entries: u32,
    /// Log file name inside the flash filesystem
    pub log_path: heapless::String<32>,
    /// VFS mount point of the SPIFFS partition
    pub mount_point: heapless::String<16>,

    // --- Button ---
    /// Edges closer than this to the last accepted edge are bounce (milliseconds)
    pub debounce_window_ms: u32,

    // --- Download service ---
    /// Access point SSID
    pub ap_ssid: heapless::String<32>,
    /// Access point WPA2 passphrase
    pub ap_password: heapless::String<64>,
    /// Access point radio channel
    pub ap_channel: u8,
    /// mDNS host name (advertised as `<hostname>.local`)
    pub hostname: heapless::String<24>,
    /// HTTP server port
    pub http_port: u16,

    // --- Housekeeping ---
    /// Task watchdog timeout (milliseconds)
    pub watchdog_timeout_ms: u32,
    /// Idle time handed back to the scheduler each loop iteration (milliseconds)
    pub loop_yield_ms: u32,
}

fn fixed<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    // Defaults are compile-time constants well inside capacity.
    let _ = out.push_str(s);
    out
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Sampling
            sample_interval_ms: 5_000,
            secondary_retry_attempts: 3,
            secondary_retry_delay_ms: 1,

            // Log file
            max_log_entries: 1_000,
            log_path: fixed("/data.csv"),
            mount_point: fixed("/spiffs"),

            // Button
            debounce_window_ms: 200,

            // Download service
            ap_ssid: fixed("ESP32_Point"),
            ap_password: fixed("password_1234"),
            ap_channel: 1,
            hostname: fixed("iot-lea"),
            http_port: 80,

            // Housekeeping
            watchdog_timeout_ms: 10_000,
            loop_yield_ms: 10,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Returns the first violation found.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sample_interval_ms == 0 {
            return Err(Error::Config("sample_interval_ms must be > 0"));
        }
        if self.secondary_retry_attempts == 0 {
            return Err(Error::Config("secondary_retry_attempts must be >= 1"));
        }
        if self.max_log_entries == 0 {
            return Err(Error::Config("max_log_entries must be > 0"));
        }
        if !self.log_path.starts_with('/') {
            return Err(Error::Config("log_path must be absolute"));
        }
        if !self.mount_point.starts_with('/') {
            return Err(Error::Config("mount_point must be absolute"));
        }
        if validate_ssid(&self.ap_ssid).is_err() {
            return Err(Error::Config("ap_ssid must be 1-32 printable ASCII bytes"));
        }
        if validate_password(&self.ap_password).is_err() {
            return Err(Error::Config("ap_password must be empty or 8-64 bytes"));
        }
        if self.hostname.is_empty() {
            return Err(Error::Config("hostname must not be empty"));
        }
        if !(1..=13).contains(&self.ap_channel) {
            return Err(Error::Config("ap_channel must be 1-13"));
        }
        if self.http_port == 0 {
            return Err(Error::Config("http_port must be > 0"));
        }
        if self.loop_yield_ms >= self.watchdog_timeout_ms {
            return Err(Error::Config("loop_yield_ms must be below watchdog_timeout_ms"));
        }
        Ok(())
    }
}
