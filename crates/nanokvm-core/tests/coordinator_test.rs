// Coordinator behavior against a mock device, via wiremock.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nanokvm_api::{NanoKvmClient, TransportConfig};
use nanokvm_core::{
    ActionRequest, ButtonType, Coordinator, CoreError, DeviceConfig, DeviceRegistry, ToggleKind,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn ok_body(data: serde_json::Value) -> serde_json::Value {
    json!({ "code": 0, "msg": "success", "data": data })
}

fn device_config(server: &MockServer) -> DeviceConfig {
    DeviceConfig {
        host: server.uri(),
        username: "admin".into(),
        password: SecretString::from("admin".to_owned()),
        poll_interval: Duration::from_secs(300),
        timeout: Duration::from_secs(5),
    }
}

fn coordinator_for(server: &MockServer) -> Coordinator {
    let config = device_config(server);
    let client = NanoKvmClient::new(
        &config.host,
        config.username.clone(),
        config.password.clone(),
        &TransportConfig {
            timeout: config.timeout,
        },
    )
    .unwrap();
    Coordinator::new(client, &config)
}

/// Mount login plus every status endpoint with a healthy payload.
async fn mount_device(server: &MockServer, delay: Option<Duration>) {
    let endpoints = [
        ("auth/login", json!({ "token": "tok" })),
        (
            "vm/info",
            json!({
                "ip": "192.168.1.50",
                "mdns": "nanokvm.local",
                "application": "2.1.5",
                "deviceKey": "abc123",
            }),
        ),
        ("vm/hardware", json!({ "version": "Beta" })),
        ("vm/gpio", json!({ "pwr": true, "hdd": false })),
        ("vm/virtual-device", json!({ "network": true, "disk": false })),
        ("extensions/ssh", json!({ "enabled": false })),
        ("vm/mdns", json!({ "enabled": true })),
        ("hid/mode", json!({ "mode": "normal" })),
        ("vm/oled", json!({ "exist": true, "sleep": 60 })),
        ("network/wifi", json!({ "supported": false, "connected": false })),
        ("storage/image/mounted", json!({ "file": "" })),
        ("storage/cdrom", json!({ "cdrom": 0 })),
    ];

    for (endpoint, data) in endpoints {
        let verb = if endpoint == "auth/login" { "POST" } else { "GET" };
        let mut template = ResponseTemplate::new(200).set_body_json(ok_body(data));
        if let Some(d) = delay {
            template = template.set_delay(d);
        }
        Mock::given(method(verb))
            .and(path(format!("/api/{endpoint}")))
            .respond_with(template)
            .mount(server)
            .await;
    }
}

async fn requests_matching(server: &MockServer, verb: &str, url_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.to_string() == verb && r.url.path() == url_path)
        .count()
}

// ── Refresh semantics ───────────────────────────────────────────────

#[tokio::test]
async fn refresh_success_populates_a_consistent_snapshot() {
    let server = MockServer::start().await;
    mount_device(&server, None).await;
    let coordinator = coordinator_for(&server);

    let snapshot = coordinator.refresh().await.unwrap();
    assert_eq!(snapshot.device_key, "abc123");
    assert!(snapshot.power_led);
    assert!(!snapshot.ssh_enabled);
    assert!(snapshot.mdns_enabled);
    assert_eq!(snapshot.oled_sleep_secs, 60);
    assert!(!snapshot.has_mounted_image());

    let state = coordinator.state();
    assert_eq!(state.consecutive_failures, 0);
    assert!(state.last_error.is_none());
    assert!(state.last_success.is_some());
    assert!(state.is_available());
    assert_eq!(state.generation, 1);
}

#[tokio::test]
async fn failure_retains_previous_snapshot_and_counts_up() {
    let server = MockServer::start().await;
    mount_device(&server, None).await;
    let coordinator = coordinator_for(&server);

    coordinator.refresh().await.unwrap();

    // Device goes away: all mocks cleared, responses become empty 404s.
    server.reset().await;

    let err = coordinator.refresh().await.unwrap_err();
    assert!(!matches!(err, CoreError::Validation { .. }));

    let state = coordinator.state();
    assert_eq!(state.consecutive_failures, 1);
    assert!(state.last_error.is_some());
    // Stale-but-available: the old snapshot is still readable.
    let snapshot = state.snapshot.expect("stale snapshot retained");
    assert!(snapshot.power_led);

    let _ = coordinator.refresh().await.unwrap_err();
    assert_eq!(coordinator.state().consecutive_failures, 2);

    // Device comes back: counter resets on the next success.
    mount_device(&server, None).await;
    coordinator.refresh().await.unwrap();
    let state = coordinator.state();
    assert_eq!(state.consecutive_failures, 0);
    assert!(state.last_error.is_none());
}

#[tokio::test]
async fn concurrent_refreshes_share_a_single_fetch() {
    let server = MockServer::start().await;
    mount_device(&server, Some(Duration::from_millis(150))).await;
    let coordinator = Arc::new(coordinator_for(&server));

    // Both futures start polling before either fetch completes; the
    // second joins the first's outcome instead of duplicating I/O.
    let (a, b) = tokio::join!(coordinator.refresh(), coordinator.request_refresh());
    let a = a.unwrap();
    let b = b.unwrap();
    assert_eq!(a.device_key, b.device_key);

    assert_eq!(requests_matching(&server, "GET", "/api/vm/gpio").await, 1);
    assert_eq!(coordinator.state().generation, 1);
}

// ── Action dispatch ─────────────────────────────────────────────────

#[tokio::test]
async fn push_button_dispatches_then_refreshes_once() {
    let server = MockServer::start().await;
    mount_device(&server, None).await;

    Mock::given(method("POST"))
        .and(path("/api/vm/gpio"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "msg": "success",
            "data": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = coordinator_for(&server);
    coordinator.refresh().await.unwrap();
    assert_eq!(requests_matching(&server, "GET", "/api/vm/gpio").await, 1);

    coordinator
        .execute(ActionRequest::PushButton {
            button: ButtonType::Power,
            duration_ms: 100,
        })
        .await
        .unwrap();

    assert_eq!(requests_matching(&server, "POST", "/api/vm/gpio").await, 1);
    // Exactly one immediate refresh after the action.
    assert_eq!(requests_matching(&server, "GET", "/api/vm/gpio").await, 2);
}

#[tokio::test]
async fn validation_failure_never_reaches_the_network() {
    let server = MockServer::start().await;
    let coordinator = coordinator_for(&server);

    let err = coordinator
        .execute(ActionRequest::PushButton {
            button: ButtonType::Power,
            duration_ms: 50,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    let err = coordinator
        .execute(ActionRequest::PasteText {
            text: "caf\u{e9}".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_hdmi_requires_pcie_hardware() {
    let server = MockServer::start().await;
    mount_device(&server, None).await; // reports Beta
    let coordinator = coordinator_for(&server);
    coordinator.refresh().await.unwrap();

    let err = coordinator.execute(ActionRequest::ResetHdmi).await.unwrap_err();
    assert!(matches!(err, CoreError::Unsupported { .. }));
    assert_eq!(
        requests_matching(&server, "POST", "/api/vm/hdmi/reset").await,
        0
    );
}

#[tokio::test]
async fn virtual_device_toggle_is_a_noop_when_already_in_state() {
    let server = MockServer::start().await;
    mount_device(&server, None).await; // network: true
    let coordinator = coordinator_for(&server);
    coordinator.refresh().await.unwrap();

    coordinator
        .execute(ActionRequest::SetToggle {
            toggle: ToggleKind::VirtualNetwork,
            enabled: true,
        })
        .await
        .unwrap();

    assert_eq!(
        requests_matching(&server, "POST", "/api/vm/virtual-device").await,
        0
    );
}

#[tokio::test]
async fn device_failure_during_action_leaves_state_untouched() {
    let server = MockServer::start().await;
    mount_device(&server, None).await;

    Mock::given(method("POST"))
        .and(path("/api/hid/reset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -1,
            "msg": "hid busy",
            "data": null,
        })))
        .mount(&server)
        .await;

    let coordinator = coordinator_for(&server);
    coordinator.refresh().await.unwrap();
    let before = coordinator.state();

    let err = coordinator.execute(ActionRequest::ResetHid).await.unwrap_err();
    assert!(matches!(err, CoreError::Api { .. }));

    let after = coordinator.state();
    assert_eq!(after.consecutive_failures, before.consecutive_failures);
    assert_eq!(after.generation, before.generation);
}

// ── Registry lifecycle ──────────────────────────────────────────────

#[tokio::test]
async fn registry_setup_polls_and_teardown_stops() {
    let server = MockServer::start().await;
    mount_device(&server, None).await;

    let registry = DeviceRegistry::new();
    let config = device_config(&server);
    let host = config.host.clone();

    let coordinator = registry.setup(config).await.unwrap();
    assert!(coordinator.state().snapshot.is_some());
    assert_eq!(registry.len(), 1);
    assert!(registry.get(&host).is_some());

    // Second setup for the same identity is rejected.
    let err = registry.setup(device_config(&server)).await.unwrap_err();
    assert!(matches!(err, CoreError::DeviceExists { .. }));

    registry.teardown(&host).await.unwrap();
    assert!(registry.get(&host).is_none());
    assert!(registry.is_empty());
}

#[tokio::test]
async fn registry_setup_fails_fast_on_bad_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": -1,
            "msg": "invalid username or password",
            "data": null,
        })))
        .mount(&server)
        .await;

    let registry = DeviceRegistry::new();
    let err = registry.setup(device_config(&server)).await.unwrap_err();
    assert!(matches!(err, CoreError::SetupAuth { .. }));
    assert!(registry.is_empty());
}

#[tokio::test]
async fn registry_setup_is_retryable_when_unreachable() {
    // Point at a server that immediately goes away.
    let server = MockServer::start().await;
    let registry = DeviceRegistry::new();

    let err = registry.setup(device_config(&server)).await.unwrap_err();
    assert!(matches!(err, CoreError::SetupConnect { .. }));
    assert!(registry.is_empty());
}
