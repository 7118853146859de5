//! Mock adapters for integration tests.
//!
//! Every port the application core drives has a recording double here, so
//! tests can assert on the full call history without touching GPIO, flash
//! or the network stack.

use core::net::Ipv4Addr;
use std::collections::{HashMap, VecDeque};

use flashlog::app::events::AppEvent;
use flashlog::app::ports::{
    AccessPointPort, DelayPort, EventSink, FileStorePort, IndicatorPort, NameResolverPort,
    PrimarySensorPort, RequestRouterPort, SecondarySensorPort,
};
use flashlog::error::{IoFailure, NetworkFailure};
use flashlog::routes::{Response, Routes};

// ── MockStore ─────────────────────────────────────────────────

/// In-memory file store with failure switches.
#[derive(Default)]
pub struct MockStore {
    pub files: HashMap<String, Vec<u8>>,
    pub fail_open: bool,
    pub fail_remove: bool,
}

#[allow(dead_code)]
impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self, path: &str) -> Vec<String> {
        self.files
            .get(path)
            .map(|b| {
                String::from_utf8_lossy(b)
                    .lines()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl FileStorePort for MockStore {
    fn append(&mut self, path: &str, data: &[u8]) -> Result<(), IoFailure> {
        if self.fail_open {
            return Err(IoFailure::OpenFailed);
        }
        self.files
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), IoFailure> {
        if self.fail_remove {
            return Err(IoFailure::RemoveFailed);
        }
        self.files
            .remove(path)
            .map(|_| ())
            .ok_or(IoFailure::NotFound)
    }

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, IoFailure> {
        self.files.get(path).cloned().ok_or(IoFailure::NotFound)
    }
}

// ── MockSensors ───────────────────────────────────────────────

/// Scripted DS18B20 + DHT22.  Each DHT22 attempt pops one
/// `(temperature, humidity)` pair; an empty queue reads NaN.
pub struct MockSensors {
    pub primary: f32,
    pub secondary: VecDeque<(f32, f32)>,
    pending_humidity: Option<f32>,
    pub conversions: u32,
    pub delays: Vec<u32>,
}

#[allow(dead_code)]
impl MockSensors {
    pub fn new(primary: f32) -> Self {
        Self {
            primary,
            secondary: VecDeque::new(),
            pending_humidity: None,
            conversions: 0,
            delays: Vec::new(),
        }
    }

    /// Queue one good DHT22 reading.
    pub fn push_secondary(&mut self, temp: f32, humidity: f32) {
        self.secondary.push_back((temp, humidity));
    }

    /// Queue one failed DHT22 attempt.
    pub fn push_nan(&mut self) {
        self.secondary.push_back((f32::NAN, f32::NAN));
    }
}

impl PrimarySensorPort for MockSensors {
    fn request_conversion(&mut self) {
        self.conversions += 1;
    }

    fn last_celsius(&mut self) -> f32 {
        self.primary
    }
}

impl SecondarySensorPort for MockSensors {
    fn read_temperature(&mut self) -> f32 {
        match self.secondary.pop_front() {
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
        self.pending_humidity.take().unwrap_or(f32::NAN)
    }
}

impl DelayPort for MockSensors {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}

// ── MockNetwork ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetCall {
    StartAp { ssid: String, password: String },
    StopAp,
    StartResolver(String),
    StopResolver,
    StartRouter,
    StopRouter,
    Indicator(bool),
}

type Dispatcher = Box<dyn Fn(&str) -> Option<Response> + Send>;

/// Records every service call; each start step can be made to fail.
#[derive(Default)]
pub struct MockNetwork {
    pub calls: Vec<NetCall>,
    pub fail_ap: bool,
    pub unspecified_ip: bool,
    pub fail_resolver: bool,
    pub fail_router: bool,
    pub indicator: bool,
    pub(crate) router: Option<Dispatcher>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a GET against the running router.
    pub fn get(&self, uri: &str) -> Option<Response> {
        self.router.as_ref().and_then(|r| r(uri))
    }

    pub fn is_routing(&self) -> bool {
        self.router.is_some()
    }

    /// Calls other than indicator writes.
    pub fn service_calls(&self) -> Vec<NetCall> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, NetCall::Indicator(_)))
            .cloned()
            .collect()
    }
}

impl AccessPointPort for MockNetwork {
    fn start_ap(&mut self, ssid: &str, password: &str) -> Result<Ipv4Addr, NetworkFailure> {
        self.calls.push(NetCall::StartAp {
            ssid: ssid.to_string(),
            password: password.to_string(),
        });
        if self.fail_ap {
            return Err(NetworkFailure::AccessPointStartFailed);
        }
        if self.unspecified_ip {
            return Ok(Ipv4Addr::UNSPECIFIED);
        }
        Ok(Ipv4Addr::new(192, 168, 4, 1))
    }

    fn stop_ap(&mut self) {
        self.calls.push(NetCall::StopAp);
    }
}

impl NameResolverPort for MockNetwork {
    fn start_resolver(&mut self, hostname: &str) -> Result<(), NetworkFailure> {
        self.calls.push(NetCall::StartResolver(hostname.to_string()));
        if self.fail_resolver {
            return Err(NetworkFailure::ResolverStartFailed);
        }
        Ok(())
    }

    fn stop_resolver(&mut self) {
        self.calls.push(NetCall::StopResolver);
    }
}

impl RequestRouterPort for MockNetwork {
    fn start_router<S>(&mut self, routes: Routes<S>) -> Result<(), NetworkFailure>
    where
        S: FileStorePort + Send + 'static,
    {
        self.calls.push(NetCall::StartRouter);
        if self.fail_router {
            return Err(NetworkFailure::RouterStartFailed);
        }
        self.router = Some(Box::new(move |uri: &str| routes.handle(uri)));
        Ok(())
    }

    fn stop_router(&mut self) {
        self.calls.push(NetCall::StopRouter);
        self.router = None;
    }
}

impl IndicatorPort for MockNetwork {
    fn set_indicator(&mut self, on: bool) {
        self.calls.push(NetCall::Indicator(on));
        self.indicator = on;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
