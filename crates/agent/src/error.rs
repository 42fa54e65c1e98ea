// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use relay_proto::ErrorCode;
use relay_session::SessionError;

#[derive(Debug, thiserror::Error)]
#[error("{code}: {context}")]
pub struct AgentError {
    pub code: ErrorCode,
    pub context: String,
}

impl AgentError {
    pub fn new(code: ErrorCode, context: impl Into<String>) -> Self {
        Self { code, context: context.into() }
    }
}

impl From<SessionError> for AgentError {
    fn from(e: SessionError) -> Self {
        Self { code: e.code, context: e.context }
    }
}

impl From<reqwest::Error> for AgentError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(ErrorCode::Internal, e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
