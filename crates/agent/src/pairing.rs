// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the Hub's pairing surface (spec §4.1, §6): the Agent
//! mints a pair code for the user to enter on their phone (or chat
//! front-end), then waits on its WebSocket connection for `paired`.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AgentError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PairRequestBody<'a> {
    device_id: &'a str,
    device_name: &'a str,
    role: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairRequestData {
    code: String,
    #[allow(dead_code)]
    expires_at: u64,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// `POST /api/pair/request`. Returns the code the user should enter
/// elsewhere to complete the pairing.
pub async fn request_pair_code(
    client: &reqwest::Client,
    hub_url: &str,
    device_id: &str,
    device_name: &str,
) -> Result<String, AgentError> {
    let url = format!("{hub_url}/api/pair/request");
    let body = PairRequestBody { device_id, device_name, role: "desktop" };

    let response: ApiResponse<PairRequestData> =
        client.post(url).json(&body).send().await?.json().await?;

    if !response.success {
        return Err(AgentError::new(
            relay_proto::ErrorCode::Internal,
            response.error.unwrap_or_else(|| "pair request failed".to_owned()),
        ));
    }
    let data = response.data.ok_or_else(|| {
        AgentError::new(relay_proto::ErrorCode::Internal, "pair request response missing data")
    })?;

    info!(code = %data.code, "pairing code issued; enter it on the paired device");
    Ok(data.code)
}

// Covered against a real loopback Hub in tests/integration.rs (spec §7.4).
