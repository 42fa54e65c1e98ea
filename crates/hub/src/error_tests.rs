// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn maps_status_code() {
    let (status, Json(body)) = error_response(ErrorCode::InvalidPairCode, "no such code");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.error.code, "invalid_pair_code");
    assert_eq!(body.error.message, "no such code");
}
