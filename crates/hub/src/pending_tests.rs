// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use relay_proto::Role;

use super::*;

#[tokio::test]
async fn happy_path_confirm_slots_by_role() {
    let pending = PendingPairs::new();
    let (code, _) =
        pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;

    let confirmed = pending.confirm(&code, "P1", Role::Phone).await.unwrap();
    assert_eq!(confirmed.desktop_device_id, "D1");
    assert_eq!(confirmed.phone_device_id, "P1");
}

#[tokio::test]
async fn confirm_consumes_the_code() {
    let pending = PendingPairs::new();
    let (code, _) =
        pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;
    pending.confirm(&code, "P1", Role::Phone).await.unwrap();

    let err = pending.confirm(&code, "P2", Role::Phone).await.unwrap_err();
    assert_eq!(err, ErrorCode::InvalidPairCode);
}

#[tokio::test]
async fn fresh_request_from_same_device_invalidates_prior_code() {
    let pending = PendingPairs::new();
    let (old_code, _) =
        pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;
    pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;

    let err = pending.confirm(&old_code, "P1", Role::Phone).await.unwrap_err();
    assert_eq!(err, ErrorCode::InvalidPairCode);
}

#[tokio::test]
async fn same_role_confirm_is_rejected_but_code_survives() {
    let pending = PendingPairs::new();
    let (code, _) =
        pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;

    let err = pending.confirm(&code, "D2", Role::Desktop).await.unwrap_err();
    assert_eq!(err, ErrorCode::SameDeviceType);

    // Retried from the correct role, the same code still works.
    let confirmed = pending.confirm(&code, "P1", Role::Phone).await.unwrap();
    assert_eq!(confirmed.desktop_device_id, "D1");
    assert_eq!(confirmed.phone_device_id, "P1");
}

#[tokio::test]
async fn expired_code_is_rejected_and_removed() {
    let pending = PendingPairs::new();
    let (code, _) =
        pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_millis(1)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let err = pending.confirm(&code, "P1", Role::Phone).await.unwrap_err();
    assert_eq!(err, ErrorCode::PairCodeExpired);
    assert!(!pending.status("D1").await);
}

#[tokio::test]
async fn sweep_expired_removes_stale_codes_only() {
    let pending = PendingPairs::new();
    pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_millis(1)).await;
    pending.request("D2".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;
    tokio::time::sleep(Duration::from_millis(10)).await;

    let removed = pending.sweep_expired().await;
    assert_eq!(removed.len(), 1);
    assert!(!pending.status("D1").await);
    assert!(pending.status("D2").await);
}

#[tokio::test]
async fn normalizes_code_case_and_separators_on_confirm() {
    let pending = PendingPairs::new();
    let (code, _) =
        pending.request("D1".to_owned(), Role::Desktop, PairCodeLength::Canonical, Duration::from_secs(300)).await;
    let messy = code.to_lowercase().replace('-', "");

    let confirmed = pending.confirm(&messy, "P1", Role::Phone).await.unwrap();
    assert_eq!(confirmed.phone_device_id, "P1");
}
