//! FlashLog Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Ds18b20 / Dht22   FlashFs        LogEventSink   Esp32Clock    │
//! │  (SensorHub)       (FileStore)    (EventSink)    (ClockPort)   │
//! │  ServiceAdapter = WifiAp + Mdns + Http + IndicatorLed          │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  SensorReader · SampleLog · ServiceToggle              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  SchedulerLoop (5 s cadence) · ButtonEdgeDetector (GPIO ISR)   │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use log::{error, info};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use flashlog::adapters::flash_fs::FlashFs;
use flashlog::adapters::http::HttpAdapter;
use flashlog::adapters::log_sink::LogEventSink;
use flashlog::adapters::mdns::MdnsAdapter;
use flashlog::adapters::network::ServiceAdapter;
use flashlog::adapters::time::Esp32Clock;
use flashlog::adapters::wifi::WifiApAdapter;
use flashlog::app::service::AppService;
use flashlog::config::SystemConfig;
use flashlog::drivers::button::ButtonEdgeDetector;
use flashlog::drivers::gpio::{OpenDrainPin, RomDelay};
use flashlog::drivers::hw_init;
use flashlog::drivers::indicator::IndicatorLed;
use flashlog::drivers::watchdog::Watchdog;
use flashlog::pins;
use flashlog::sample_log::SampleLog;
use flashlog::scheduler::SchedulerLoop;
use flashlog::sensors::dht22::Dht22;
use flashlog::sensors::ds18b20::Ds18b20;
use flashlog::sensors::{SensorHub, SensorReader};

/// Written by the GPIO ISR, drained by the main loop.
static BUTTON: ButtonEdgeDetector = ButtonEdgeDetector::new();

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  FlashLog v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Config ─────────────────────────────────────────────
    let config = SystemConfig::default();
    config.validate()?;
    info!("Config: {}", serde_json::to_string(&config)?);

    // ── 3. Hardware peripherals ───────────────────────────────
    hw_init::init_peripherals()?;
    if let Err(e) = hw_init::mount_spiffs(&config.mount_point) {
        // Appends will fail with OpenFailed until the next boot.
        error!("{}: continuing without storage", e);
    }

    BUTTON.set_window(config.debounce_window_ms);
    if let Err(e) = hw_init::init_isr_service(&BUTTON) {
        error!("ISR service init failed: {}: button disabled", e);
    }
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 4. Sensors ────────────────────────────────────────────
    let hub = SensorHub::new(
        Ds18b20::new(OpenDrainPin::new(pins::ONE_WIRE_GPIO), RomDelay),
        Dht22::new(OpenDrainPin::new(pins::DHT_GPIO), RomDelay),
        RomDelay,
    );
    let reader = SensorReader::new(hub, &config);

    // ── 5. Storage ────────────────────────────────────────────
    let log = SampleLog::new(FlashFs::new(config.mount_point.as_str()), &config);

    // ── 6. Download service (AP + mDNS + HTTP + LED) ──────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let esp_wifi = EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs))?;
    let wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

    let net = ServiceAdapter::new(
        WifiApAdapter::new(wifi, config.ap_channel),
        MdnsAdapter::new(config.http_port),
        HttpAdapter::new(config.http_port),
        IndicatorLed::new(pins::INDICATOR_GPIO),
    );

    // ── 7. App service + loop ─────────────────────────────────
    let mut app = AppService::new(reader, log, net, &BUTTON, &config);
    let mut sink = LogEventSink::new();
    let clock = Esp32Clock::new();
    let yield_ms = config.loop_yield_ms;

    info!("System ready. Entering main loop.");

    SchedulerLoop::new(&config).run(&mut app, &clock, &mut sink, || {
        watchdog.feed();
        FreeRtos::delay_ms(yield_ms);
    })
}
