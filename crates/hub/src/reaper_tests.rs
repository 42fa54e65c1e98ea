// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use relay_proto::{Frame, Role};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::config::HubConfig;
use crate::registry::Connection;

fn test_state() -> Arc<HubState> {
    let cfg = HubConfig::parse_from(["relay-hub"]);
    Arc::new(HubState::new(cfg, CancellationToken::new()))
}

#[tokio::test]
async fn sweep_notifies_peer_and_removes_stale_connection() {
    let state = test_state();
    let room_id = state.rooms.create("D1".to_owned(), "P1".to_owned()).await;

    let (desktop_tx, _desktop_rx) = mpsc::unbounded_channel();
    let desktop = Connection::new("D1".to_owned(), Role::Desktop, desktop_tx);
    *desktop.room_id.write().await = Some(room_id.clone());
    state.registry.insert(Arc::clone(&desktop)).await;

    let (phone_tx, mut phone_rx) = mpsc::unbounded_channel();
    let phone = Connection::new("P1".to_owned(), Role::Phone, phone_tx);
    *phone.room_id.write().await = Some(room_id);
    state.registry.insert(Arc::clone(&phone)).await;

    // Force the desktop connection to look stale.
    *desktop.last_seen.write().await = std::time::Instant::now() - std::time::Duration::from_secs(3600);

    sweep(&state).await;

    assert!(!state.registry.is_online("D1").await);
    assert!(state.registry.is_online("P1").await);
    assert_eq!(phone_rx.recv().await, Some(Frame::PeerOffline));
    assert!(desktop.cancel.is_cancelled());
}

#[tokio::test]
async fn sweep_expires_pending_pair_codes() {
    let state = test_state();
    state
        .pending
        .request(
            "D1".to_owned(),
            Role::Desktop,
            relay_proto::paircode::PairCodeLength::Canonical,
            std::time::Duration::from_millis(1),
        )
        .await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    sweep(&state).await;
    assert!(!state.pending.status("D1").await);
}
