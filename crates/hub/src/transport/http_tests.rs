// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use crate::config::HubConfig;
use crate::state::HubState;
use crate::transport::build_router;

fn test_server() -> (Arc<HubState>, axum_test::TestServer) {
    let cfg = HubConfig::parse_from(["relay-hub"]);
    let state = Arc::new(HubState::new(cfg, CancellationToken::new()));
    let server = axum_test::TestServer::new(build_router(Arc::clone(&state))).unwrap();
    (state, server)
}

#[tokio::test]
async fn pair_request_rejects_unknown_role() {
    let (_state, server) = test_server();
    let resp = server
        .post("/api/pair/request")
        .json(&serde_json::json!({"deviceId": "D1", "deviceName": "Desk", "role": "tablet"}))
        .await;
    resp.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn pair_request_then_confirm_happy_path() {
    let (_state, server) = test_server();
    let resp = server
        .post("/api/pair/request")
        .json(&serde_json::json!({"deviceId": "D1", "deviceName": "Desk", "role": "desktop"}))
        .await;
    resp.assert_status_ok();
    let code = resp.json::<serde_json::Value>()["data"]["code"].as_str().unwrap().to_owned();

    let resp = server
        .post("/api/pair/confirm")
        .json(&serde_json::json!({"code": code, "deviceId": "P1", "deviceName": "Phone"}))
        .await;
    resp.assert_status_ok();
    let json = resp.json::<serde_json::Value>();
    assert_eq!(json["data"]["success"], true);
    assert!(json["data"]["roomId"].is_string());

    // The code is single-use.
    let resp = server
        .post("/api/pair/confirm")
        .json(&serde_json::json!({"code": code, "deviceId": "P2", "deviceName": "Phone2"}))
        .await;
    let json = resp.json::<serde_json::Value>();
    assert_eq!(json["data"]["success"], false);
}

#[tokio::test]
async fn pair_confirm_same_role_reports_error_without_invalidating_code() {
    let (_state, server) = test_server();
    let resp = server
        .post("/api/pair/request")
        .json(&serde_json::json!({"deviceId": "D1", "deviceName": "Desk", "role": "desktop"}))
        .await;
    let code = resp.json::<serde_json::Value>()["data"]["code"].as_str().unwrap().to_owned();

    let resp = server
        .post("/api/pair/confirm")
        .json(&serde_json::json!({"code": code, "deviceId": "D2", "deviceName": "Desk2", "role": "desktop"}))
        .await;
    let json = resp.json::<serde_json::Value>();
    assert_eq!(json["data"]["success"], false);
    assert_eq!(json["data"]["error"], "cannot pair same device types");

    let resp = server
        .post("/api/pair/confirm")
        .json(&serde_json::json!({"code": code, "deviceId": "P1", "deviceName": "Phone"}))
        .await;
    let json = resp.json::<serde_json::Value>();
    assert_eq!(json["data"]["success"], true);
}

#[tokio::test]
async fn pair_status_reports_unpaired_then_paired() {
    let (state, server) = test_server();
    let resp = server.get("/api/pair/status").add_query_param("deviceId", "D1").await;
    assert_eq!(resp.json::<serde_json::Value>()["data"]["paired"], false);

    state.rooms.create("D1".to_owned(), "P1".to_owned()).await;
    let resp = server.get("/api/pair/status").add_query_param("deviceId", "D1").await;
    assert_eq!(resp.json::<serde_json::Value>()["data"]["paired"], true);
}

#[tokio::test]
async fn health_returns_ok() {
    let (_state, server) = test_server();
    let resp = server.get("/api/health").await;
    resp.assert_status_ok();
}

#[tokio::test]
async fn unknown_route_returns_stub_404_page() {
    let (_state, server) = test_server();
    let resp = server.get("/nothing-here").await;
    resp.assert_status(axum::http::StatusCode::NOT_FOUND);
    assert!(resp.text().contains("404"));
}
