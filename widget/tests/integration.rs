//! Full CRUD lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every widget
//! client operation over real HTTP through the stock ureq transport.

use mock_server::MockState;
use widget_client::{ApiError, WidgetClient, WidgetNew};

fn start_server() -> String {
    let addr = mock_server::spawn(MockState::default()).unwrap();
    format!("http://{addr}/api")
}

#[test]
fn crud_lifecycle() {
    let client = WidgetClient::connect(&start_server()).unwrap();

    // Step 1: create.
    let created = client.create_widget(&WidgetNew::new("gear", "M")).unwrap();
    assert_eq!(created.name, "gear");
    assert_eq!(created.size, "M");
    let id = created.id.clone();

    // Step 2: get.
    let fetched = client.get_widget(&id).unwrap();
    assert_eq!(fetched, created);

    // Step 3: update.
    let updated = client.update_widget(&id, &WidgetNew::new("cog", "L")).unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.uid, created.uid);
    assert_eq!(updated.name, "cog");
    assert_eq!(updated.size, "L");

    // Step 4: delete.
    client.delete_widget(&id).unwrap();

    // Step 5: get and delete after delete are NotFound.
    assert!(matches!(client.get_widget(&id), Err(ApiError::NotFound)));
    assert!(matches!(client.delete_widget(&id), Err(ApiError::NotFound)));

    // Step 6: update of a missing widget is NotFound too.
    let err = client
        .update_widget(&id, &WidgetNew::new("ghost", "S"))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}
