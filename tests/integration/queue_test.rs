//! Integration tests for the public queue endpoints.

mod helpers;

use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_get_empty_queue() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/queue", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["queue"], json!([]));
    assert_eq!(response.body["wait_time"], 0);
    let per_line = response.body["wait_detail"]["per_line_single"]
        .as_array()
        .unwrap();
    assert_eq!(per_line.len(), 3);
}

#[tokio::test]
async fn test_join_fills_lines_left_to_right() {
    let app = helpers::TestApp::new().await;

    let first = app.join(json!({ "name": "Ann" })).await;
    assert_eq!(first["message"], "Successfully joined queue");
    assert_eq!(first["line_number"], 0);
    assert_eq!(first["place_in_queue"], 1);

    let second = app.join(json!({ "name": "Bob" })).await;
    assert_eq!(second["line_number"], 1);
    assert_eq!(second["place_in_queue"], 1);
}

#[tokio::test]
async fn test_join_span_behind_singles() {
    let app = helpers::TestApp::new().await;
    app.join(json!({ "name": "Ann" })).await;
    app.join(json!({ "name": "Bob" })).await;

    let pair = app.join(json!({ "name": "Cy", "party_size": 2 })).await;

    assert_eq!(pair["line_number"], 0);
    assert_eq!(pair["place_in_queue"], 2);
}

#[tokio::test]
async fn test_join_requires_name() {
    let app = helpers::TestApp::new().await;

    let response = app.request("POST", "/join", Some(json!({ "name": "   " }))).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    assert_eq!(response.body["message"], "Name is required");

    let listing = app.request("GET", "/queue", None).await;
    assert_eq!(listing.body["queue"], json!([]));
}

#[tokio::test]
async fn test_join_rejects_name_longer_than_column() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/join", Some(json!({ "name": "n".repeat(101) })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
    let listing = app.request("GET", "/queue", None).await;
    assert_eq!(listing.body["queue"], json!([]));

    let joined = app.join(json!({ "name": "n".repeat(100) })).await;
    assert_eq!(joined["place_in_queue"], 1);
}

#[tokio::test]
async fn test_join_rejects_oversized_party() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/join", Some(json!({ "name": "Big", "party_size": 4 })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_join_rejects_unknown_line() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/join", Some(json!({ "name": "Ann", "line_number": 7 })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_public_listing_names_head_of_line_only() {
    let app = helpers::TestApp::new().await;
    app.join(json!({ "name": "Ann", "line_number": 0, "phone_number": "+15550001" }))
        .await;
    app.join(json!({ "name": "Bob", "line_number": 0 })).await;

    let response = app.request("GET", "/queue", None).await;

    let queue = response.body["queue"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["name"], "Ann");
    assert_eq!(queue[0]["place_in_queue"], 1);
    assert!(queue[1].get("name").is_none());
    assert_eq!(queue[1]["place_in_queue"], 2);
    assert!(!response.text.contains("+15550001"));
}

#[tokio::test]
async fn test_cancel_by_contact() {
    let app = helpers::TestApp::new().await;
    app.join(json!({ "name": "Ann", "email": "Ann@Example.com" }))
        .await;

    let response = app
        .request("POST", "/cancel", Some(json!({ "contact": "ann@example.com" })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["cancelled"], true);

    let again = app
        .request("POST", "/cancel", Some(json!({ "contact": "ann@example.com" })))
        .await;
    assert_eq!(again.body["cancelled"], false);

    let listing = app.request("GET", "/queue", None).await;
    assert_eq!(listing.body["queue"], json!([]));
}

#[tokio::test]
async fn test_sms_cancel_reply() {
    let app = helpers::TestApp::new().await;
    app.join(json!({ "name": "Ann", "phone_number": "+15550001" }))
        .await;
    app.join(json!({ "name": "Bob" })).await;

    let ignored = app.form("/sms", "Body=hello&From=%2B15550001").await;
    assert_eq!(ignored.status, StatusCode::NO_CONTENT);

    let response = app.form("/sms", "Body=+Cancel+&From=%2B15550001").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text.contains("You have been removed from the queue."));

    let listing = app.request("GET", "/queue", None).await;
    let queue = listing.body["queue"].as_array().unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0]["name"], "Bob");
}

#[tokio::test]
async fn test_sms_cancel_unknown_sender() {
    let app = helpers::TestApp::new().await;

    let response = app.form("/sms", "Body=cancel&From=%2B15559999").await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["store"], "connected");
    assert_eq!(response.body["ws_connections"], 0);
}
