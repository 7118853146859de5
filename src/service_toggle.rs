//! Two-state controller for the download service.
//!
//! ```text
//!            flip() ok                      flip()
//!  ┌─────────┐ ─────────────▶ ┌─────────┐ ─────────────▶ ┌─────────┐
//!  │ Stopped │                │ Running │                │ Stopped │ …
//!  └─────────┘ ◀── flip() err └─────────┘                └─────────┘
//!       (rolled back, unchanged)
//! ```
//!
//! Start-up is a sequence of sub-steps: access point, mDNS, HTTP router.
//! `Running` is only committed once all of them succeed; a failing step
//! undoes the ones before it in reverse order and the state stays
//! `Stopped`.  The indicator output is only driven on a committed
//! transition, so it always mirrors [`ServiceToggle::state`].

use core::net::Ipv4Addr;

use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::{
    AccessPointPort, EventSink, FileStorePort, IndicatorPort, NameResolverPort, RequestRouterPort,
};
use crate::config::SystemConfig;
use crate::error::NetworkFailure;
use crate::routes::Routes;
use crate::sample_log::SharedLog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Stopped,
    Running,
}

pub struct ServiceToggle<N, S> {
    net: N,
    routes: Routes<S>,
    state: ServiceState,
    ip: Option<Ipv4Addr>,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    hostname: heapless::String<24>,
}

impl<N, S> ServiceToggle<N, S>
where
    N: AccessPointPort + NameResolverPort + RequestRouterPort + IndicatorPort,
    S: FileStorePort + Send + 'static,
{
    /// Starts `Stopped` with the indicator driven off.
    pub fn new(mut net: N, log: SharedLog<S>, config: &SystemConfig) -> Self {
        net.set_indicator(false);
        Self {
            net,
            routes: Routes::new(log),
            state: ServiceState::Stopped,
            ip: None,
            ssid: config.ap_ssid.clone(),
            password: config.ap_password.clone(),
            hostname: config.hostname.clone(),
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Address the service is reachable at while `Running`.
    pub fn ip(&self) -> Option<Ipv4Addr> {
        self.ip
    }

    pub fn network(&self) -> &N {
        &self.net
    }

    pub fn network_mut(&mut self) -> &mut N {
        &mut self.net
    }

    /// Toggle the service.  Returns the resulting state, or the failure
    /// that kept it `Stopped`.
    pub fn flip(&mut self, sink: &mut impl EventSink) -> Result<ServiceState, NetworkFailure> {
        match self.state {
            ServiceState::Stopped => self.start(sink),
            ServiceState::Running => {
                self.stop(sink);
                Ok(ServiceState::Stopped)
            }
        }
    }

    fn start(&mut self, sink: &mut impl EventSink) -> Result<ServiceState, NetworkFailure> {
        match self.bring_up() {
            Ok(ip) => {
                self.net.set_indicator(true);
                self.state = ServiceState::Running;
                self.ip = Some(ip);
                info!(
                    "SERVICE: running, http://{}/download (http://{}.local)",
                    ip, self.hostname
                );
                sink.emit(&AppEvent::ServiceStarted { ip });
                Ok(ServiceState::Running)
            }
            Err(e) => {
                error!("SERVICE: start aborted: {}", e);
                sink.emit(&AppEvent::ServiceStartFailed(e));
                Err(e)
            }
        }
    }

    /// Run every start-up step, undoing completed ones on failure.
    fn bring_up(&mut self) -> Result<Ipv4Addr, NetworkFailure> {
        let ip = self.net.start_ap(&self.ssid, &self.password)?;
        if ip.is_unspecified() {
            self.net.stop_ap();
            return Err(NetworkFailure::NoAddressAssigned);
        }
        info!("SERVICE: AP '{}' up at {}", self.ssid, ip);

        if let Err(e) = self.net.start_resolver(&self.hostname) {
            self.net.stop_ap();
            return Err(e);
        }

        if let Err(e) = self.net.start_router(self.routes.clone()) {
            self.net.stop_resolver();
            self.net.stop_ap();
            return Err(e);
        }

        Ok(ip)
    }

    fn stop(&mut self, sink: &mut impl EventSink) {
        self.net.set_indicator(false);
        self.net.stop_ap();
        self.net.stop_router();
        self.net.stop_resolver();
        self.state = ServiceState::Stopped;
        self.ip = None;
        info!("SERVICE: stopped");
        sink.emit(&AppEvent::ServiceStopped);
    }
}
