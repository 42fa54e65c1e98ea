// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use relay_proto::ErrorCode;
use relay_session::SessionError;

#[derive(Debug, thiserror::Error)]
#[error("{code}: {context}")]
pub struct BridgeError {
    pub code: ErrorCode,
    pub context: String,
}

impl BridgeError {
    pub fn new(code: ErrorCode, context: impl Into<String>) -> Self {
        Self { code, context: context.into() }
    }
}

impl From<SessionError> for BridgeError {
    fn from(e: SessionError) -> Self {
        Self { code: e.code, context: e.context }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
