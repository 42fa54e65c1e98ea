// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn http_status_matches_semantics() {
    assert_eq!(ErrorCode::InvalidPairCode.http_status(), 404);
    assert_eq!(ErrorCode::PairCodeExpired.http_status(), 410);
    assert_eq!(ErrorCode::SameDeviceType.http_status(), 409);
    assert_eq!(ErrorCode::Unauthorized.http_status(), 401);
    assert_eq!(ErrorCode::Busy.http_status(), 409);
    assert_eq!(ErrorCode::PathNotAllowed.http_status(), 403);
    assert_eq!(ErrorCode::Internal.http_status(), 500);
}

#[test]
fn display_matches_as_str() {
    assert_eq!(ErrorCode::NotFound.to_string(), ErrorCode::NotFound.as_str());
}

#[test]
fn serializes_snake_case() {
    let json = serde_json::to_string(&ErrorCode::SessionCapReached).unwrap();
    assert_eq!(json, "\"session_cap_reached\"");
}

#[test]
fn round_trips_through_json() {
    for code in [
        ErrorCode::InvalidPairCode,
        ErrorCode::PairCodeExpired,
        ErrorCode::SameDeviceType,
        ErrorCode::DeviceNotInRoom,
        ErrorCode::Unauthorized,
        ErrorCode::BadRequest,
        ErrorCode::NotFound,
        ErrorCode::Busy,
        ErrorCode::SessionCapReached,
        ErrorCode::PathNotAllowed,
        ErrorCode::PathMissing,
        ErrorCode::Internal,
    ] {
        let json = serde_json::to_string(&code).unwrap();
        let back: ErrorCode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, code);
    }
}
