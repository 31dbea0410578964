//! Integration tests for the admin endpoints.

mod helpers;

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_check_password() {
    let app = helpers::TestApp::new().await;

    let ok = app
        .request(
            "POST",
            "/admin/check_password",
            Some(json!({ "password": helpers::ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["message"], "Password is correct");

    let wrong = app
        .request(
            "POST",
            "/admin/check_password",
            Some(json!({ "password": "guess" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["error"], "UNAUTHORIZED");
    assert_eq!(wrong.body["message"], "Invalid password");
}

#[tokio::test]
async fn test_password_header_accepted() {
    let app = helpers::TestApp::new().await;

    let response = app.admin_request("/admin/check_password", json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_admin_queue_shows_contact_details() {
    let app = helpers::TestApp::new().await;
    app.join(json!({ "name": "Ann", "line_number": 0, "phone_number": "+15550001" }))
        .await;
    app.join(json!({ "name": "Bob", "line_number": 0, "email": "bob@example.com" }))
        .await;

    let response = app.admin_request("/admin/queue", json!({})).await;

    assert_eq!(response.status, StatusCode::OK);
    let queue = response.body["queue"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["name"], "Ann");
    assert_eq!(queue[0]["phone_number"], "+15550001");
    assert_eq!(queue[1]["name"], "Bob");
    assert_eq!(queue[1]["email"], "bob@example.com");
}

#[tokio::test]
async fn test_admin_queue_requires_password() {
    let app = helpers::TestApp::new().await;

    let response = app
        .request("POST", "/admin/queue", Some(json!({ "password": "nope" })))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_next_serves_full_span() {
    let app = helpers::TestApp::new().await;
    let joined = app.join(json!({ "name": "Trio", "party_size": 3 })).await;

    let response = app
        .admin_request("/admin/next", json!({ "line_number": 0 }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Line 0 advanced");
    assert_eq!(response.body["served"], joined["id"]);

    let snapshot = app.state.service.snapshot().await.unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.last_admitted.len(), 3);
    for admitted in &snapshot.last_admitted {
        assert!(*admitted > DateTime::<Utc>::UNIX_EPOCH);
    }
}

#[tokio::test]
async fn test_next_compacts_line() {
    let app = helpers::TestApp::new().await;
    for name in ["Ann", "Bob", "Cy"] {
        app.join(json!({ "name": name, "line_number": 1 })).await;
    }

    app.admin_request("/admin/next", json!({ "line_number": 1 }))
        .await;

    let response = app.admin_request("/admin/queue", json!({})).await;
    let queue = response.body["queue"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["name"], "Bob");
    assert_eq!(queue[0]["place_in_queue"], 1);
    assert_eq!(queue[1]["name"], "Cy");
    assert_eq!(queue[1]["place_in_queue"], 2);
}

#[tokio::test]
async fn test_next_on_empty_line() {
    let app = helpers::TestApp::new().await;

    let response = app
        .admin_request("/admin/next", json!({ "line_number": 2 }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Line 2 advanced");
    assert!(response.body.get("served").is_none());
}

#[tokio::test]
async fn test_next_validates_line() {
    let app = helpers::TestApp::new().await;

    let missing = app.admin_request("/admin/next", json!({})).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Line number is required");

    let out_of_range = app
        .admin_request("/admin/next", json!({ "line_number": 5 }))
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let app = helpers::TestApp::new().await;
    let joined = app.join(json!({ "name": "Ann" })).await;

    let first = app
        .admin_request("/admin/remove", json!({ "user_id": joined["id"] }))
        .await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], "User removed");

    let second = app
        .admin_request("/admin/remove", json!({ "user_id": joined["id"] }))
        .await;
    assert_eq!(second.status, StatusCode::OK);

    let listing = app.request("GET", "/queue", None).await;
    assert_eq!(listing.body["queue"], json!([]));
}

#[tokio::test]
async fn test_remove_requires_password() {
    let app = helpers::TestApp::new().await;
    let joined = app.join(json!({ "name": "Ann" })).await;

    let response = app
        .request(
            "POST",
            "/admin/remove",
            Some(json!({ "user_id": joined["id"], "password": "nope" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    let listing = app.request("GET", "/queue", None).await;
    assert_eq!(listing.body["queue"].as_array().unwrap().len(), 1);
}
