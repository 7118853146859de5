//! Service bundle handed to the toggle.
//!
//! [`ServiceAdapter`] owns the access point, the mDNS responder, the HTTP
//! router and the indicator LED, and forwards each service port to the
//! matching piece.

use core::net::Ipv4Addr;

use crate::adapters::http::HttpAdapter;
use crate::adapters::mdns::MdnsAdapter;
use crate::adapters::wifi::WifiApAdapter;
use crate::app::ports::{
    AccessPointPort, FileStorePort, IndicatorPort, NameResolverPort, RequestRouterPort,
};
use crate::drivers::indicator::IndicatorLed;
use crate::error::NetworkFailure;
use crate::routes::Routes;

pub struct ServiceAdapter {
    pub wifi: WifiApAdapter,
    pub mdns: MdnsAdapter,
    pub http: HttpAdapter,
    pub indicator: IndicatorLed,
}

impl ServiceAdapter {
    pub fn new(
        wifi: WifiApAdapter,
        mdns: MdnsAdapter,
        http: HttpAdapter,
        indicator: IndicatorLed,
    ) -> Self {
        Self {
            wifi,
            mdns,
            http,
            indicator,
        }
    }
}

impl AccessPointPort for ServiceAdapter {
    fn start_ap(&mut self, ssid: &str, password: &str) -> Result<Ipv4Addr, NetworkFailure> {
        self.wifi.start_ap(ssid, password)
    }

    fn stop_ap(&mut self) {
        self.wifi.stop_ap();
    }
}

impl NameResolverPort for ServiceAdapter {
    fn start_resolver(&mut self, hostname: &str) -> Result<(), NetworkFailure> {
        self.mdns.start_resolver(hostname)
    }

    fn stop_resolver(&mut self) {
        self.mdns.stop_resolver();
    }
}

impl RequestRouterPort for ServiceAdapter {
    fn start_router<S>(&mut self, routes: Routes<S>) -> Result<(), NetworkFailure>
    where
        S: FileStorePort + Send + 'static,
    {
        self.http.start_router(routes)
    }

    fn stop_router(&mut self) {
        self.http.stop_router();
    }
}

impl IndicatorPort for ServiceAdapter {
    fn set_indicator(&mut self, on: bool) {
        self.indicator.set(on);
    }
}
