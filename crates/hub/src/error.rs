// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::Json;
use relay_proto::ErrorCode;
use serde::{Deserialize, Serialize};

/// Top-level error response envelope returned by every HTTP route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Render an [`ErrorCode`] as the axum response the Hub's HTTP routes share.
pub fn error_response(code: ErrorCode, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    let status = StatusCode::from_u16(code.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = ErrorResponse {
        error: ErrorBody { code: code.as_str().to_owned(), message: message.into() },
    };
    (status, Json(body))
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
