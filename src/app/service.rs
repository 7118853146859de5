//! Application service: the owned context the main loop drives.
//!
//! [`AppService`] owns the sensor reader, the shared sample log and the
//! service toggle, and borrows the button detector the ISR writes to.
//! There is no other firmware state; everything the loop touches is
//! reached through this struct.
//!
//! ```text
//!  SensorReader ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                   │      AppService      │
//!  ButtonEdge   ──▶ │  SampleLog · Toggle  │ ──▶ AP / mDNS / HTTP / LED
//!                   └──────────────────────┘
//! ```

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{
    AccessPointPort, DelayPort, EventSink, FileStorePort, IndicatorPort, NameResolverPort,
    PrimarySensorPort, RequestRouterPort, SecondarySensorPort,
};
use crate::config::SystemConfig;
use crate::drivers::button::ButtonEdgeDetector;
use crate::error::{Error, NetworkFailure};
use crate::sample_log::{self, Reading, SampleLog, SharedLog};
use crate::sensors::SensorReader;
use crate::service_toggle::{ServiceState, ServiceToggle};

pub struct AppService<'a, H, S, N> {
    reader: SensorReader<H>,
    log: SharedLog<S>,
    toggle: ServiceToggle<N, S>,
    button: &'a ButtonEdgeDetector,
}

impl<'a, H, S, N> AppService<'a, H, S, N>
where
    H: PrimarySensorPort + SecondarySensorPort + DelayPort,
    S: FileStorePort + Send + 'static,
    N: AccessPointPort + NameResolverPort + RequestRouterPort + IndicatorPort,
{
    pub fn new(
        reader: SensorReader<H>,
        log: SampleLog<S>,
        net: N,
        button: &'a ButtonEdgeDetector,
        config: &SystemConfig,
    ) -> Self {
        let log = log.into_shared();
        let toggle = ServiceToggle::new(net, log.clone(), config);
        info!(
            "AppService ready: log={} cap={} sample every {} ms",
            config.log_path, config.max_log_entries, config.sample_interval_ms
        );
        Self {
            reader,
            log,
            toggle,
            button,
        }
    }

    /// One sample cycle: read both sensors, append on success.
    ///
    /// A sensor failure skips the append entirely.
    pub fn sample_cycle(&mut self, sink: &mut impl EventSink) -> Result<Reading, Error> {
        let sample = self.reader.read(sink)?;

        let mut log = sample_log::lock(&self.log);
        match log.append(sample) {
            Ok(reading) => {
                sink.emit(&AppEvent::Logged(reading));
                Ok(reading)
            }
            Err(error) => {
                sink.emit(&AppEvent::LogWriteFailed {
                    sequence: log.entry_count(),
                    error,
                });
                Err(error.into())
            }
        }
    }

    /// Consume a pending button press, if any, and flip the service.
    pub fn service_check(
        &mut self,
        sink: &mut impl EventSink,
    ) -> Option<Result<ServiceState, NetworkFailure>> {
        if !self.button.take_pending() {
            return None;
        }
        sink.emit(&AppEvent::ButtonPressed(self.toggle.state()));
        Some(self.toggle.flip(sink))
    }

    pub fn service_state(&self) -> ServiceState {
        self.toggle.state()
    }

    pub fn entry_count(&self) -> u32 {
        sample_log::lock(&self.log).entry_count()
    }

    /// Handle on the shared log (the HTTP routes hold another clone).
    pub fn shared_log(&self) -> SharedLog<S> {
        self.log.clone()
    }

    pub fn toggle(&self) -> &ServiceToggle<N, S> {
        &self.toggle
    }

    pub fn reader_mut(&mut self) -> &mut SensorReader<H> {
        &mut self.reader
    }
}
