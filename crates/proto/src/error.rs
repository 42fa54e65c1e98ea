// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unified error codes shared across the Hub's HTTP/WebSocket surface and
/// the Agent's session multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidPairCode,
    PairCodeExpired,
    SameDeviceType,
    DeviceNotInRoom,
    Unauthorized,
    BadRequest,
    NotFound,
    Busy,
    SessionCapReached,
    PathNotAllowed,
    PathMissing,
    Internal,
}

impl ErrorCode {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidPairCode => 404,
            Self::PairCodeExpired => 410,
            Self::SameDeviceType => 409,
            Self::DeviceNotInRoom => 404,
            Self::Unauthorized => 401,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::Busy => 409,
            Self::SessionCapReached => 409,
            Self::PathNotAllowed => 403,
            Self::PathMissing => 404,
            Self::Internal => 500,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidPairCode => "invalid pair code",
            Self::PairCodeExpired => "pair code expired",
            Self::SameDeviceType => "cannot pair same device types",
            Self::DeviceNotInRoom => "device not in room",
            Self::Unauthorized => "unauthorized",
            Self::BadRequest => "bad request",
            Self::NotFound => "not found",
            Self::Busy => "busy",
            Self::SessionCapReached => "session cap reached",
            Self::PathNotAllowed => "not allowed",
            Self::PathMissing => "path does not exist",
            Self::Internal => "internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
