// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session-layer errors (spec §7.3, §8): a thin `thiserror` wrapper around
//! the shared [`ErrorCode`] that also carries human-readable context.

use relay_proto::ErrorCode;

#[derive(Debug, thiserror::Error)]
#[error("{code}: {context}")]
pub struct SessionError {
    pub code: ErrorCode,
    pub context: String,
}

impl SessionError {
    pub fn new(code: ErrorCode, context: impl Into<String>) -> Self {
        Self { code, context: context.into() }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
