//! Integration tests for WebSocket rooms and queue updates.

mod helpers;

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use http::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use kiosk_service::JoinRequest;

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(app: &helpers::TestApp) -> Socket {
    let addr = app.spawn().await;
    let url = format!("ws://{}{}/ws", addr, app.prefix);
    let (socket, _) = connect_async(url).await.expect("WebSocket connect failed");
    socket
}

async fn next_frame(socket: &mut Socket) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Socket closed")
            .expect("Socket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

async fn send(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("Send failed");
}

#[tokio::test]
async fn test_ws_upgrade_without_handshake() {
    let app = helpers::TestApp::new().await;

    let response = app.request("GET", "/ws", None).await;

    assert!(
        response.status == StatusCode::BAD_REQUEST
            || response.status == StatusCode::UPGRADE_REQUIRED,
        "Expected 400 or 426, got {}",
        response.status
    );
}

#[tokio::test]
async fn test_connect_receives_public_listing() {
    let app = helpers::TestApp::new().await;
    app.join(json!({ "name": "Ann", "phone_number": "+15550001" }))
        .await;

    let mut socket = connect(&app).await;
    let frame = next_frame(&mut socket).await;

    assert_eq!(frame["type"], "queue_update");
    assert_eq!(frame["queue"][0]["name"], "Ann");
    assert!(frame["queue"][0].get("phone_number").is_none());
    assert_eq!(frame["wait_detail"]["per_line_single"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_ping_pong() {
    let app = helpers::TestApp::new().await;
    let mut socket = connect(&app).await;
    next_frame(&mut socket).await;

    send(&mut socket, json!({ "type": "ping" })).await;

    assert_eq!(next_frame(&mut socket).await["type"], "pong");
}

#[tokio::test]
async fn test_malformed_frame_gets_error() {
    let app = helpers::TestApp::new().await;
    let mut socket = connect(&app).await;
    next_frame(&mut socket).await;

    send(&mut socket, json!({ "type": "dance" })).await;

    let frame = next_frame(&mut socket).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["code"], "INVALID_MESSAGE");
}

#[tokio::test]
async fn test_admin_connect_with_wrong_password() {
    let app = helpers::TestApp::new().await;
    let mut socket = connect(&app).await;
    next_frame(&mut socket).await;

    send(&mut socket, json!({ "type": "admin_connect", "password": "guess" })).await;

    let frame = next_frame(&mut socket).await;
    assert_eq!(frame["type"], "admin_error");
    assert_eq!(frame["error"], "Invalid password");
}

#[tokio::test]
async fn test_admin_room_receives_full_listing() {
    let app = helpers::TestApp::new().await;
    let mut admin = connect(&app).await;
    next_frame(&mut admin).await;

    send(
        &mut admin,
        json!({ "type": "admin_connect", "password": helpers::ADMIN_PASSWORD }),
    )
    .await;

    let status = next_frame(&mut admin).await;
    assert_eq!(status["type"], "admin_status");
    assert_eq!(status["role"], "admin");
    let listing = next_frame(&mut admin).await;
    assert_eq!(listing["type"], "queue_update");
    assert_eq!(listing["queue"], json!([]));

    app.state
        .service
        .join(JoinRequest::named("Ann").on_line(0))
        .await
        .unwrap();
    app.state
        .service
        .join(JoinRequest::named("Bob").on_line(0))
        .await
        .unwrap();

    next_frame(&mut admin).await;
    let update = next_frame(&mut admin).await;
    assert_eq!(update["type"], "queue_update");
    let queue = update["queue"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[1]["name"], "Bob");
    assert!(queue[1].get("email_consent").is_some());
}

#[tokio::test]
async fn test_public_room_sees_redacted_updates() {
    let app = helpers::TestApp::new().await;
    let mut public = connect(&app).await;
    next_frame(&mut public).await;

    app.state
        .service
        .join(JoinRequest::named("Ann").on_line(2))
        .await
        .unwrap();
    app.state
        .service
        .join(JoinRequest::named("Bob").on_line(2))
        .await
        .unwrap();

    next_frame(&mut public).await;
    let update = next_frame(&mut public).await;
    let queue = update["queue"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["name"], "Ann");
    assert!(queue[1].get("name").is_none());
}

#[tokio::test]
async fn test_admin_leave_returns_to_public() {
    let app = helpers::TestApp::new().await;
    let mut socket = connect(&app).await;
    next_frame(&mut socket).await;

    send(
        &mut socket,
        json!({ "type": "admin_connect", "password": helpers::ADMIN_PASSWORD }),
    )
    .await;
    next_frame(&mut socket).await;
    next_frame(&mut socket).await;

    send(&mut socket, json!({ "type": "admin_leave" })).await;
    let listing = next_frame(&mut socket).await;
    assert_eq!(listing["type"], "queue_update");

    app.state
        .service
        .join(JoinRequest::named("Ann").on_line(0))
        .await
        .unwrap();
    app.state
        .service
        .join(JoinRequest::named("Bob").on_line(0))
        .await
        .unwrap();

    next_frame(&mut socket).await;
    let update = next_frame(&mut socket).await;
    assert!(update["queue"][1].get("name").is_none());
}
