//! Cooperative main loop.
//!
//! Each iteration does two independent checks and returns:
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────────┐
//!  │ iterate(now)                                             │
//!  │                                                          │
//!  │  now - last_reading >= interval ? ──▶ sample_cycle()     │
//!  │                                                          │
//!  │  button.take_pending()          ? ──▶ toggle.flip()      │
//!  └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here blocks except the bounded DHT22 retry inside the sample
//! cycle.  Failures are reported through the event sink and the loop
//! carries on; [`SchedulerLoop::run`] never returns.

use log::debug;

use crate::app::ports::{
    AccessPointPort, DelayPort, EventSink, FileStorePort, IndicatorPort, NameResolverPort,
    PrimarySensorPort, RequestRouterPort, SecondarySensorPort,
};
use crate::app::service::AppService;
use crate::config::SystemConfig;

/// Monotonic millisecond clock (wraps at `u32::MAX`).
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

/// What one iteration did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// A sample cycle ran (successful or not).
    pub sampled: bool,
    /// A button press was consumed and the toggle flipped (or tried to).
    pub toggled: bool,
}

pub struct SchedulerLoop {
    interval_ms: u32,
    last_reading_ms: u32,
    iterations: u64,
}

impl SchedulerLoop {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            interval_ms: config.sample_interval_ms,
            last_reading_ms: 0,
            iterations: 0,
        }
    }

    pub fn sample_due(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_reading_ms) >= self.interval_ms
    }

    pub fn last_reading_ms(&self) -> u32 {
        self.last_reading_ms
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// One pass of the loop at time `now_ms`.
    pub fn iterate<H, S, N>(
        &mut self,
        now_ms: u32,
        app: &mut AppService<'_, H, S, N>,
        sink: &mut impl EventSink,
    ) -> IterationReport
    where
        H: PrimarySensorPort + SecondarySensorPort + DelayPort,
        S: FileStorePort + Send + 'static,
        N: AccessPointPort + NameResolverPort + RequestRouterPort + IndicatorPort,
    {
        self.iterations = self.iterations.wrapping_add(1);
        let mut report = IterationReport::default();

        if self.sample_due(now_ms) {
            self.last_reading_ms = now_ms;
            report.sampled = true;
            if let Err(e) = app.sample_cycle(sink) {
                debug!("Scheduler: cycle at {} ms skipped ({})", now_ms, e);
            }
        }

        if app.service_check(sink).is_some() {
            report.toggled = true;
        }

        report
    }

    /// Run forever.  `idle` is called after every iteration (watchdog
    /// feed, yielding to lower-priority tasks).
    pub fn run<H, S, N>(
        mut self,
        app: &mut AppService<'_, H, S, N>,
        clock: &impl ClockPort,
        sink: &mut impl EventSink,
        mut idle: impl FnMut(),
    ) -> !
    where
        H: PrimarySensorPort + SecondarySensorPort + DelayPort,
        S: FileStorePort + Send + 'static,
        N: AccessPointPort + NameResolverPort + RequestRouterPort + IndicatorPort,
    {
        loop {
            self.iterate(clock.now_ms(), app, sink);
            idle();
        }
    }
}
