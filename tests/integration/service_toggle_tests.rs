//! ServiceToggle: alternation, indicator tracking, and rollback of a
//! partially started service.

use crate::mock_hw::{MockNetwork, MockStore, NetCall, RecordingSink};

use flashlog::app::events::AppEvent;
use flashlog::config::SystemConfig;
use flashlog::error::NetworkFailure;
use flashlog::sample_log::SampleLog;
use flashlog::service_toggle::{ServiceState, ServiceToggle};

fn make_toggle(net: MockNetwork) -> ServiceToggle<MockNetwork, MockStore> {
    let config = SystemConfig::default();
    let log = SampleLog::new(MockStore::new(), &config).into_shared();
    ServiceToggle::new(net, log, &config)
}

#[test]
fn starts_stopped_with_indicator_off() {
    let toggle = make_toggle(MockNetwork::new());
    assert_eq!(toggle.state(), ServiceState::Stopped);
    assert!(!toggle.network().indicator);
    assert_eq!(toggle.network().calls, vec![NetCall::Indicator(false)]);
}

#[test]
fn flips_alternate_and_indicator_follows() {
    let mut toggle = make_toggle(MockNetwork::new());
    let mut sink = RecordingSink::new();

    for i in 0..6 {
        let state = toggle.flip(&mut sink).unwrap();
        let expected = if i % 2 == 0 {
            ServiceState::Running
        } else {
            ServiceState::Stopped
        };
        assert_eq!(state, expected);
        assert_eq!(toggle.state(), expected);
        assert_eq!(toggle.network().indicator, expected == ServiceState::Running);
    }
}

#[test]
fn start_sequence_uses_fixed_identity() {
    let mut toggle = make_toggle(MockNetwork::new());
    let mut sink = RecordingSink::new();
    toggle.flip(&mut sink).unwrap();

    assert_eq!(
        toggle.network().service_calls(),
        vec![
            NetCall::StartAp {
                ssid: "ESP32_Point".into(),
                password: "password_1234".into(),
            },
            NetCall::StartResolver("iot-lea".into()),
            NetCall::StartRouter,
        ]
    );
    assert_eq!(toggle.ip(), Some("192.168.4.1".parse().unwrap()));
    assert!(sink.events.contains(&AppEvent::ServiceStarted {
        ip: "192.168.4.1".parse().unwrap()
    }));
}

#[test]
fn stop_tears_down_everything() {
    let mut toggle = make_toggle(MockNetwork::new());
    let mut sink = RecordingSink::new();
    toggle.flip(&mut sink).unwrap();
    toggle.network_mut().calls.clear();

    toggle.flip(&mut sink).unwrap();
    assert_eq!(
        toggle.network().calls,
        vec![
            NetCall::Indicator(false),
            NetCall::StopAp,
            NetCall::StopRouter,
            NetCall::StopResolver,
        ]
    );
    assert!(!toggle.network().is_routing());
    assert_eq!(toggle.ip(), None);
    assert_eq!(sink.events.last(), Some(&AppEvent::ServiceStopped));
}

#[test]
fn ap_failure_leaves_stopped() {
    let net = MockNetwork {
        fail_ap: true,
        ..MockNetwork::default()
    };
    let mut toggle = make_toggle(net);
    let mut sink = RecordingSink::new();

    assert_eq!(
        toggle.flip(&mut sink),
        Err(NetworkFailure::AccessPointStartFailed)
    );
    assert_eq!(toggle.state(), ServiceState::Stopped);
    assert!(!toggle.network().indicator);
    assert_eq!(
        sink.events,
        vec![AppEvent::ServiceStartFailed(
            NetworkFailure::AccessPointStartFailed
        )]
    );
}

#[test]
fn unspecified_address_is_failure() {
    let net = MockNetwork {
        unspecified_ip: true,
        ..MockNetwork::default()
    };
    let mut toggle = make_toggle(net);
    let mut sink = RecordingSink::new();

    assert_eq!(toggle.flip(&mut sink), Err(NetworkFailure::NoAddressAssigned));
    assert_eq!(toggle.network().service_calls().last(), Some(&NetCall::StopAp));
    assert_eq!(toggle.state(), ServiceState::Stopped);
}

#[test]
fn resolver_failure_rolls_back_ap() {
    let net = MockNetwork {
        fail_resolver: true,
        ..MockNetwork::default()
    };
    let mut toggle = make_toggle(net);
    let mut sink = RecordingSink::new();

    assert_eq!(toggle.flip(&mut sink), Err(NetworkFailure::ResolverStartFailed));
    let calls = toggle.network().service_calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1], NetCall::StartResolver("iot-lea".into()));
    assert_eq!(calls[2], NetCall::StopAp);
    assert!(!toggle.network().indicator);
}

#[test]
fn router_failure_rolls_back_in_reverse() {
    let net = MockNetwork {
        fail_router: true,
        ..MockNetwork::default()
    };
    let mut toggle = make_toggle(net);
    let mut sink = RecordingSink::new();

    assert_eq!(toggle.flip(&mut sink), Err(NetworkFailure::RouterStartFailed));
    let calls = toggle.network().service_calls();
    assert_eq!(
        &calls[2..],
        &[NetCall::StartRouter, NetCall::StopResolver, NetCall::StopAp]
    );
    assert_eq!(toggle.state(), ServiceState::Stopped);
}

#[test]
fn failed_start_can_be_retried() {
    let net = MockNetwork {
        fail_router: true,
        ..MockNetwork::default()
    };
    let mut toggle = make_toggle(net);
    let mut sink = RecordingSink::new();

    assert!(toggle.flip(&mut sink).is_err());
    toggle.network_mut().fail_router = false;
    assert_eq!(toggle.flip(&mut sink), Ok(ServiceState::Running));
    assert!(toggle.network().indicator);
}
