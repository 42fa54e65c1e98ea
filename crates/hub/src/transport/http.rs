// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use relay_proto::{ErrorCode, Frame, Role};
use serde::{Deserialize, Serialize};

use crate::error::error_response;
use crate::state::HubState;

/// Generic envelope every pairing route replies with: `{success, data?,
/// error?}` (spec §6).
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn err(message: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(message.into()) }
    }
}

pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(serde_json::json!({ "status": "ok" })))
}

pub async fn not_found() -> impl IntoResponse {
    Html("<html><body><h1>404 Not Found</h1></body></html>")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequestBody {
    pub device_id: String,
    pub device_name: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequestData {
    pub code: String,
    pub expires_at: u64,
}

/// `POST /api/pair/request` (spec §4.1, §6).
pub async fn pair_request(
    State(state): State<Arc<HubState>>,
    Json(body): Json<PairRequestBody>,
) -> impl IntoResponse {
    if body.device_id.is_empty() || body.device_name.is_empty() {
        return error_response(ErrorCode::BadRequest, "deviceId and deviceName are required").into_response();
    }

    let Some(role) = Role::parse(&body.role) else {
        return error_response(ErrorCode::BadRequest, "role must be \"desktop\" or \"phone\"").into_response();
    };

    let length = match state.config.pair_code_length() {
        Ok(length) => length,
        Err(e) => return error_response(ErrorCode::Internal, e.to_string()).into_response(),
    };

    let (code, expires_at) =
        state.pending.request(body.device_id, role, length, state.config.pair_code_ttl()).await;

    Json(ApiResponse::ok(PairRequestData { code, expires_at: instant_to_epoch_hint(expires_at) })).into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairConfirmBody {
    pub code: String,
    pub device_id: String,
    pub device_name: String,
    /// Optional: explicit in the embedded variant; absent in the cloud
    /// variant, where the confirmer is always phone-role (normalised to
    /// the request-body form for both, per DESIGN.md).
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairConfirmData {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /api/pair/confirm` (spec §4.1, §6). On success, proactively
/// notifies both peers' live connections with `paired {roomId}`.
pub async fn pair_confirm(
    State(state): State<Arc<HubState>>,
    Json(body): Json<PairConfirmBody>,
) -> impl IntoResponse {
    if body.code.is_empty() || body.device_id.is_empty() {
        return error_response(ErrorCode::BadRequest, "code and deviceId are required").into_response();
    }

    let role = match body.role.as_deref() {
        Some(s) => match Role::parse(s) {
            Some(role) => role,
            None => return error_response(ErrorCode::BadRequest, "invalid role").into_response(),
        },
        None => Role::Phone,
    };

    match state.pending.confirm(&body.code, &body.device_id, role).await {
        Ok(confirmed) => {
            let room_id =
                state.rooms.create(confirmed.desktop_device_id.clone(), confirmed.phone_device_id.clone()).await;

            if let Some(desktop) = state.registry.get(&confirmed.desktop_device_id).await {
                *desktop.room_id.write().await = Some(room_id.clone());
                desktop.send(Frame::Paired { room_id: room_id.clone() });
            }
            if let Some(phone) = state.registry.get(&confirmed.phone_device_id).await {
                *phone.room_id.write().await = Some(room_id.clone());
                phone.send(Frame::Paired { room_id: room_id.clone() });
            }

            Json(ApiResponse::ok(PairConfirmData { success: true, room_id: Some(room_id), error: None }))
                .into_response()
        }
        Err(code) => Json(ApiResponse::ok(PairConfirmData {
            success: false,
            room_id: None,
            error: Some(code.as_str().to_owned()),
        }))
        .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct PairStatusQuery {
    #[serde(rename = "deviceId")]
    pub device_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairStatusData {
    pub paired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

/// `GET /api/pair/status?deviceId=…` — informational only (spec §4.1).
pub async fn pair_status(
    State(state): State<Arc<HubState>>,
    Query(query): Query<PairStatusQuery>,
) -> impl IntoResponse {
    let room_id = state.rooms.room_for_device(&query.device_id).await;
    Json(ApiResponse::ok(PairStatusData { paired: room_id.is_some(), room_id }))
}

/// `Instant` has no epoch; return seconds-from-now as the TTL hint callers
/// actually need (spec leaves the exact representation to the
/// implementation — `expiresAt` is never compared across processes).
fn instant_to_epoch_hint(expires_at: std::time::Instant) -> u64 {
    expires_at.saturating_duration_since(std::time::Instant::now()).as_secs()
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
