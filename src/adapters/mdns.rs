//! mDNS name-resolution adapter.
//!
//! Publishes `<hostname>.local` and an `_http._tcp` service record for
//! the download server.  Uses the raw `espressif/mdns` component calls on
//! ESP-IDF and is a no-op on simulation targets.
//!
//! Lifecycle is tied to the access point: start after the AP has an
//! address, stop before it goes down.

use log::info;

use crate::app::ports::NameResolverPort;
use crate::error::NetworkFailure;

const MDNS_SERVICE_TYPE: &str = "_http";
const MDNS_SERVICE_PROTO: &str = "_tcp";

/// mDNS advertisement adapter.
pub struct MdnsAdapter {
    hostname: heapless::String<24>,
    http_port: u16,
    active: bool,
}

impl MdnsAdapter {
    pub fn new(http_port: u16) -> Self {
        Self {
            hostname: heapless::String::new(),
            http_port,
            active: false,
        }
    }

    /// Whether mDNS is currently advertising.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&self) -> Result<(), NetworkFailure> {
        use esp_idf_svc::sys::*;
        unsafe {
            let ret = mdns_init();
            if ret != ESP_OK as i32 {
                log::error!("mDNS: mdns_init failed ({})", ret);
                return Err(NetworkFailure::ResolverStartFailed);
            }

            let mut hostname_buf = [0u8; 32];
            let hb = self.hostname.as_bytes();
            let hl = hb.len().min(31);
            hostname_buf[..hl].copy_from_slice(&hb[..hl]);
            let ret = mdns_hostname_set(hostname_buf.as_ptr() as *const _);
            if ret != ESP_OK as i32 {
                log::error!("mDNS: hostname_set failed ({})", ret);
                mdns_free();
                return Err(NetworkFailure::ResolverStartFailed);
            }
            mdns_instance_name_set(b"FlashLog Sampler\0".as_ptr() as *const _);

            let ret = mdns_service_add(
                b"FlashLog\0".as_ptr() as *const _,
                b"_http\0".as_ptr() as *const _,
                b"_tcp\0".as_ptr() as *const _,
                self.http_port,
                core::ptr::null_mut(),
                0,
            );
            if ret != ESP_OK as i32 {
                log::warn!("mDNS: service_add failed ({}), hostname only", ret);
            }
        }
        info!(
            "mDNS(espidf): registered {}.local {}.{}:{}",
            self.hostname, MDNS_SERVICE_TYPE, MDNS_SERVICE_PROTO, self.http_port
        );
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_start(&self) -> Result<(), NetworkFailure> {
        info!(
            "mDNS(sim): registered {}.local {}.{}:{}",
            self.hostname, MDNS_SERVICE_TYPE, MDNS_SERVICE_PROTO, self.http_port
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_stop(&self) {
        unsafe {
            esp_idf_svc::sys::mdns_free();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_stop(&self) {
        info!("mDNS(sim): unregistered");
    }
}

impl NameResolverPort for MdnsAdapter {
    fn start_resolver(&mut self, hostname: &str) -> Result<(), NetworkFailure> {
        if self.active {
            return Ok(());
        }
        if hostname.is_empty() {
            return Err(NetworkFailure::ResolverStartFailed);
        }
        self.hostname.clear();
        self.hostname
            .push_str(hostname)
            .map_err(|_| NetworkFailure::ResolverStartFailed)?;
        self.platform_start()?;
        self.active = true;
        info!("mDNS: advertising {}.local", self.hostname);
        Ok(())
    }

    fn stop_resolver(&mut self) {
        if !self.active {
            return;
        }
        self.platform_stop();
        self.active = false;
        info!("mDNS: stopped");
    }
}
