//! Integration tests for the AppService pipeline: sensors → log →
//! button → service → HTTP routes, all against mock adapters.

use crate::mock_hw::{MockNetwork, MockSensors, MockStore, RecordingSink};

use flashlog::app::events::AppEvent;
use flashlog::app::service::AppService;
use flashlog::config::SystemConfig;
use flashlog::drivers::button::ButtonEdgeDetector;
use flashlog::error::{Error, IoFailure, SensorFailure};
use flashlog::sample_log;
use flashlog::sensors::SensorReader;
use flashlog::service_toggle::ServiceState;

type App<'a> = AppService<'a, MockSensors, MockStore, MockNetwork>;

fn make_app(button: &ButtonEdgeDetector, sensors: MockSensors) -> App<'_> {
    let config = SystemConfig::default();
    AppService::new(
        SensorReader::new(sensors, &config),
        sample_log::SampleLog::new(MockStore::new(), &config),
        MockNetwork::new(),
        button,
        &config,
    )
}

// ── Full path: one reading, download, remove ──────────────────

#[test]
fn reading_is_downloadable_then_removable() {
    let button = ButtonEdgeDetector::new();
    let mut sensors = MockSensors::new(21.5);
    sensors.push_secondary(22.0, 45.0);
    let mut app = make_app(&button, sensors);
    let mut sink = RecordingSink::new();

    let reading = app.sample_cycle(&mut sink).unwrap();
    assert_eq!(reading.sequence, 1);
    assert_eq!(app.entry_count(), 1);

    // Button press brings the service up.
    assert!(button.on_falling_edge(1_000));
    assert_eq!(app.service_check(&mut sink), Some(Ok(ServiceState::Running)));
    let net = app.toggle().network();
    assert!(net.indicator);

    let download = net.get("/download").unwrap();
    assert_eq!(download.status, 200);
    assert_eq!(download.content_type, "text/csv");
    assert_eq!(download.body, b"1,21.500000,22.000000,45.000000\n");

    let remove = net.get("/remove").unwrap();
    assert_eq!(remove.status, 200);
    assert_eq!(remove.body, b"File removed");

    let after = net.get("/download").unwrap();
    assert_eq!(after.status, 404);
    assert_eq!(after.body, b"File not found");
}

#[test]
fn routes_disappear_when_service_stops() {
    let button = ButtonEdgeDetector::new();
    let mut app = make_app(&button, MockSensors::new(20.0));
    let mut sink = RecordingSink::new();

    button.on_falling_edge(1_000);
    app.service_check(&mut sink);
    assert!(app.toggle().network().is_routing());

    button.on_falling_edge(2_000);
    assert_eq!(app.service_check(&mut sink), Some(Ok(ServiceState::Stopped)));
    assert!(app.toggle().network().get("/download").is_none());
    assert!(!app.toggle().network().indicator);
}

// ── Sensor failure skips the append ──────────────────────────

#[test]
fn secondary_timeout_produces_no_reading() {
    let button = ButtonEdgeDetector::new();
    let mut sensors = MockSensors::new(21.5);
    sensors.push_nan();
    sensors.push_nan();
    sensors.push_nan();
    sensors.push_secondary(22.0, 45.0); // would succeed on a 4th try
    let mut app = make_app(&button, sensors);
    let mut sink = RecordingSink::new();

    assert_eq!(
        app.sample_cycle(&mut sink),
        Err(Error::Sensor(SensorFailure::SecondarySensorTimeout))
    );
    assert_eq!(app.entry_count(), 0);
    assert!(sample_log::lock(&app.shared_log()).store().files.is_empty());
    assert_eq!(app.reader_mut().hardware().delays, vec![1, 1]);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Logged(_))), 0);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::SensorFailed(SensorFailure::SecondarySensorTimeout))
    );
}

#[test]
fn retry_recovers_on_second_attempt() {
    let button = ButtonEdgeDetector::new();
    let mut sensors = MockSensors::new(19.0);
    sensors.push_nan();
    sensors.push_secondary(20.0, 50.0);
    let mut app = make_app(&button, sensors);
    let mut sink = RecordingSink::new();

    let r = app.sample_cycle(&mut sink).unwrap();
    assert_eq!(r.secondary_humidity_pct, 50.0);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        AppEvent::SensorRead { attempts: 2, .. }
    )));
}

#[test]
fn disconnected_primary_is_logged_as_is() {
    let button = ButtonEdgeDetector::new();
    let mut sensors = MockSensors::new(-127.0);
    sensors.push_secondary(22.0, 45.0);
    let mut app = make_app(&button, sensors);
    let mut sink = RecordingSink::new();

    let r = app.sample_cycle(&mut sink).unwrap();
    assert_eq!(r.to_csv_line(), "1,-127.000000,22.000000,45.000000\n");
}

// ── Storage failure ───────────────────────────────────────────

#[test]
fn write_failure_is_reported_with_sequence() {
    let button = ButtonEdgeDetector::new();
    let mut sensors = MockSensors::new(21.0);
    sensors.push_secondary(22.0, 45.0);
    let mut app = make_app(&button, sensors);
    sample_log::lock(&app.shared_log()).store_mut().fail_open = true;
    let mut sink = RecordingSink::new();

    assert_eq!(
        app.sample_cycle(&mut sink),
        Err(Error::Io(IoFailure::OpenFailed))
    );
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::LogWriteFailed {
            sequence: 1,
            error: IoFailure::OpenFailed
        })
    );
}

// ── Button handling ───────────────────────────────────────────

#[test]
fn no_press_means_no_toggle() {
    let button = ButtonEdgeDetector::new();
    let mut app = make_app(&button, MockSensors::new(20.0));
    let mut sink = RecordingSink::new();

    assert_eq!(app.service_check(&mut sink), None);
    assert_eq!(app.service_state(), ServiceState::Stopped);
    assert!(sink.events.is_empty());
}

#[test]
fn bounced_press_toggles_once() {
    let button = ButtonEdgeDetector::new();
    let mut app = make_app(&button, MockSensors::new(20.0));
    let mut sink = RecordingSink::new();

    button.on_falling_edge(5_000);
    button.on_falling_edge(5_030);
    button.on_falling_edge(5_180);

    assert!(app.service_check(&mut sink).is_some());
    assert!(app.service_check(&mut sink).is_none());
    assert_eq!(app.service_state(), ServiceState::Running);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ButtonPressed(_))),
        1
    );
}
