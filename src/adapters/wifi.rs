//! WiFi access-point adapter.
//!
//! Implements [`AccessPointPort`]: brings up a WPA2 soft-AP with the
//! fixed credentials and reports the address the AP netif was given.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::BlockingWifi` in AP mode.
//! - **all other targets**: simulation stub that hands out the default
//!   soft-AP address.

use core::net::Ipv4Addr;
use log::info;

use crate::app::ports::AccessPointPort;
use crate::error::NetworkFailure;

#[cfg(target_os = "espidf")]
use esp_idf_svc::wifi::{
    AccessPointConfiguration, AuthMethod, BlockingWifi, Configuration, EspWifi,
};

/// Address the ESP-IDF soft-AP netif assigns itself by default.
pub const DEFAULT_AP_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// SSID must be 1-32 printable ASCII bytes.
pub fn validate_ssid(ssid: &str) -> Result<(), NetworkFailure> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(NetworkFailure::InvalidCredentials);
    }
    Ok(())
}

/// Passphrase must be 8-64 bytes for WPA2, or empty for an open AP.
pub fn validate_password(password: &str) -> Result<(), NetworkFailure> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(NetworkFailure::InvalidCredentials);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// AP adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiApAdapter {
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    channel: u8,
    active: bool,
}

impl WifiApAdapter {
    /// Wrap an initialised (not yet started) WiFi driver.
    #[cfg(target_os = "espidf")]
    pub fn new(wifi: BlockingWifi<EspWifi<'static>>, channel: u8) -> Self {
        Self {
            wifi,
            channel,
            active: false,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(channel: u8) -> Self {
        Self {
            channel,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self, ssid: &str, password: &str) -> Result<Ipv4Addr, NetworkFailure> {
        let auth_method = if password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let conf = Configuration::AccessPoint(AccessPointConfiguration {
            ssid: ssid
                .try_into()
                .map_err(|_| NetworkFailure::InvalidCredentials)?,
            password: password
                .try_into()
                .map_err(|_| NetworkFailure::InvalidCredentials)?,
            auth_method,
            channel: self.channel,
            ..Default::default()
        });

        let started = self
            .wifi
            .set_configuration(&conf)
            .and_then(|()| self.wifi.start())
            .and_then(|()| self.wifi.wait_netif_up());
        if let Err(e) = started {
            log::error!("WiFi(espidf): AP start failed: {}", e);
            self.platform_stop();
            return Err(NetworkFailure::AccessPointStartFailed);
        }

        match self.wifi.wifi().ap_netif().get_ip_info() {
            Ok(info) => Ok(info.ip),
            Err(e) => {
                log::error!("WiFi(espidf): AP netif has no address: {}", e);
                self.platform_stop();
                Err(NetworkFailure::NoAddressAssigned)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&mut self, ssid: &str, _password: &str) -> Result<Ipv4Addr, NetworkFailure> {
        info!("WiFi(sim): AP '{}' on channel {}", ssid, self.channel);
        Ok(DEFAULT_AP_ADDRESS)
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&mut self) {
        if let Err(e) = self.wifi.stop() {
            log::error!("WiFi(espidf): AP stop failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&mut self) {
        info!("WiFi(sim): AP down");
    }
}

// ───────────────────────────────────────────────────────────────
// AccessPointPort
// ───────────────────────────────────────────────────────────────

impl AccessPointPort for WifiApAdapter {
    fn start_ap(&mut self, ssid: &str, password: &str) -> Result<Ipv4Addr, NetworkFailure> {
        validate_ssid(ssid)?;
        validate_password(password)?;

        info!("WiFi: starting AP '{}'", ssid);
        let ip = self.platform_start(ssid, password)?;
        self.active = true;
        info!("WiFi: AP IP address {}", ip);
        Ok(ip)
    }

    fn stop_ap(&mut self) {
        if !self.active {
            return;
        }
        self.platform_stop();
        self.active = false;
        info!("WiFi: AP stopped");
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
