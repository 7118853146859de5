//! SampleLog against the in-memory store: line format, rollover at the
//! entry cap, and the remove/continue numbering behaviour.

use crate::mock_hw::MockStore;

use flashlog::app::ports::FileStorePort;
use flashlog::config::SystemConfig;
use flashlog::error::IoFailure;
use flashlog::sample_log::SampleLog;
use flashlog::sensors::SensorSample;

const PATH: &str = "/data.csv";

fn sample(i: u32) -> SensorSample {
    SensorSample {
        primary_temp_c: 20.0 + i as f32 * 0.5,
        secondary_temp_c: 21.0,
        secondary_humidity_pct: 40.0,
    }
}

fn make_log() -> SampleLog<MockStore> {
    SampleLog::new(MockStore::new(), &SystemConfig::default())
}

#[test]
fn n_appends_give_n_lines() {
    let mut log = make_log();
    for i in 0..25 {
        log.append(sample(i)).unwrap();
    }
    assert_eq!(log.entry_count(), 25);

    let lines = log.store().lines(PATH);
    assert_eq!(lines.len(), 25);
    assert_eq!(lines[0], "1,20.000000,21.000000,40.000000");
    assert_eq!(lines[24], "25,32.000000,21.000000,40.000000");
}

#[test]
fn cap_plus_one_starts_fresh_file() {
    let mut log = make_log();
    for i in 0..1000 {
        log.append(sample(i % 10)).unwrap();
    }
    assert_eq!(log.entry_count(), 1000);
    assert_eq!(log.store().lines(PATH).len(), 1000);

    let r = log.append(sample(0)).unwrap();
    assert_eq!(r.sequence, 1);
    assert_eq!(log.entry_count(), 1);
    assert_eq!(log.store().lines(PATH), vec!["1,20.000000,21.000000,40.000000"]);
}

#[test]
fn reset_on_absent_file_is_not_found() {
    let mut log = make_log();
    assert_eq!(log.reset(), Err(IoFailure::NotFound));
}

#[test]
fn reset_removes_file_but_keeps_numbering() {
    let mut log = make_log();
    for i in 0..3 {
        log.append(sample(i)).unwrap();
    }
    log.reset().unwrap();
    assert!(!log.store().exists(PATH));
    assert_eq!(log.entry_count(), 3);

    let r = log.append(sample(0)).unwrap();
    assert_eq!(r.sequence, 4);
    assert_eq!(log.store().lines(PATH), vec!["4,20.000000,21.000000,40.000000"]);
}

#[test]
fn failed_remove_is_reported() {
    let mut log = make_log();
    log.append(sample(0)).unwrap();
    log.store_mut().fail_remove = true;
    assert_eq!(log.reset(), Err(IoFailure::RemoveFailed));
    assert!(log.store().exists(PATH));
}

#[test]
fn failed_append_still_consumes_sequence() {
    let mut log = make_log();
    log.store_mut().fail_open = true;
    assert_eq!(log.append(sample(0)), Err(IoFailure::OpenFailed));
    assert_eq!(log.entry_count(), 1);

    log.store_mut().fail_open = false;
    let r = log.append(sample(0)).unwrap();
    assert_eq!(r.sequence, 2);
    assert_eq!(log.store().lines(PATH).len(), 1);
}

#[test]
fn rollover_with_small_cap() {
    let config = SystemConfig {
        max_log_entries: 3,
        ..SystemConfig::default()
    };
    let mut log = SampleLog::new(MockStore::new(), &config);
    for i in 0..7 {
        log.append(sample(i)).unwrap();
    }
    // 3 + 3 + 1
    assert_eq!(log.entry_count(), 1);
    assert_eq!(log.store().lines(PATH).len(), 1);
}
