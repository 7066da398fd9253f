//! Full session and host lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `FirewallClient`
//! over real HTTP with its stock transport. The mock counts logins, which
//! lets the test check that the session cache reuses a live session.

use std::time::Duration;

use firewall_client::{ApiError, FirewallClient, FirewallConfig, Host, ObjectRef};
use mock_server::{MockState, DEFAULT_PASSWORD, DEFAULT_USER};

fn start_server(state: MockState) -> String {
    let addr = mock_server::spawn(state).unwrap();
    format!("http://{addr}/web_api")
}

fn config(base: &str, password: &str) -> FirewallConfig {
    let mut conf = FirewallConfig::new(base, DEFAULT_USER, password);
    conf.transport.timeout = Duration::from_secs(5);
    conf
}

#[test]
fn host_lifecycle() {
    let state = MockState::default();
    let base = start_server(state.clone());
    let client = FirewallClient::new(config(&base, DEFAULT_PASSWORD)).unwrap();

    // Step 1: first authenticated call logs in.
    let created = client
        .create_host(&Host {
            name: "web-01".to_string(),
            ipv4_address: "192.168.2.145".to_string(),
            ..Host::default()
        })
        .unwrap();
    assert_eq!(created.name, "web-01");
    assert!(!created.uid.is_empty());
    assert_eq!(state.login_count(), 1);

    // Step 2: a duplicate name surfaces the service's error text.
    let err = client
        .create_host(&Host {
            name: "web-01".to_string(),
            ..Host::default()
        })
        .unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("More than one object named 'web-01' exists."));

    // Step 3: rename, then read back by the new name.
    let updated = client
        .set_host(&Host {
            uid: created.uid.clone(),
            new_name: "web-primary".to_string(),
            color: "red".to_string(),
            ..Host::default()
        })
        .unwrap();
    assert_eq!(updated.name, "web-primary");
    let shown = client.show_host(&ObjectRef::name("web-primary")).unwrap();
    assert_eq!(shown.uid, created.uid);
    assert_eq!(shown.ipv4_address, "192.168.2.145");

    // Step 4: publish, delete, discard.
    let task = client.publish().unwrap();
    assert!(!task.task_id.is_empty());
    client.delete_host(&ObjectRef::uid(created.uid.clone())).unwrap();
    let discarded = client.discard().unwrap();
    assert_eq!(discarded.discarded_changes, 1);

    // Step 5: the unknown host is reported as not found.
    let err = client.show_host(&ObjectRef::uid(created.uid)).unwrap_err();
    assert_eq!(err.status(), Some(404));

    // Every call so far rode the first session.
    assert_eq!(state.login_count(), 1);

    // Step 6: logout forgets the session; the next call logs in again.
    client.logout().unwrap();
    assert!(client.session_id().is_none());
    client.publish().unwrap();
    assert_eq!(state.login_count(), 2);
}

#[test]
fn bad_credentials_fail_every_call() {
    let state = MockState::default();
    let base = start_server(state.clone());
    let client = FirewallClient::new(config(&base, "wrong")).unwrap();

    let err = client.publish().unwrap_err();
    assert!(matches!(err, ApiError::Rest(_)));
    assert!(err.to_string().contains("Authentication to server failed."));
    assert_eq!(state.login_count(), 0);
    assert!(client.session_id().is_none());
}

#[test]
fn server_side_expiry_is_not_retried() {
    let state = MockState::default();
    let base = start_server(state.clone());
    let client = FirewallClient::new(config(&base, DEFAULT_PASSWORD)).unwrap();

    client.login().unwrap();
    let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    rt.block_on(state.expire_sessions());

    let err = client.publish().unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Wrong session id"));
    assert_eq!(state.login_count(), 1);
}
