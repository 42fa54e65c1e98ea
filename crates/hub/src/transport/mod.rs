// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP + WebSocket transport for the Hub.

pub mod http;
pub mod ws;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::HubState;

/// Build the axum `Router` with every Hub route (spec §6).
pub fn build_router(state: Arc<HubState>) -> Router {
    Router::new()
        .route("/api/health", get(http::health))
        .route("/api/pair/request", post(http::pair_request))
        .route("/api/pair/confirm", post(http::pair_confirm))
        .route("/api/pair/status", get(http::pair_status))
        .route("/ws", get(ws::ws_handler))
        .fallback(http::not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
