// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic sweep (spec §4.5): closes stale connections, expires pending
//! pair codes, and — if configured — evicts idle rooms.

use std::sync::Arc;

use tracing::debug;

use crate::dispatcher;
use crate::state::HubState;

/// Run the reaper loop until the state's shutdown token fires.
pub async fn run(state: Arc<HubState>) {
    let mut ticker = tokio::time::interval(state.config.heartbeat_interval());
    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => break,
            _ = ticker.tick() => sweep(&state).await,
        }
    }
}

async fn sweep(state: &Arc<HubState>) {
    let stale_after = state.config.heartbeat_interval() * 2;
    let stale = state.registry.stale(stale_after).await;
    for conn in &stale {
        debug!(device_id = %conn.device_id, "closing stale connection");
        dispatcher::notify_peer_offline(state, conn).await;
        state.registry.remove_if_current(&conn.device_id, conn).await;
        conn.cancel.cancel();
    }

    let expired = state.pending.sweep_expired().await;
    if !expired.is_empty() {
        debug!(count = expired.len(), "expired pending pair codes");
    }

    if let Some(idle_after) = state.config.room_idle_evict() {
        let idle = state.rooms.idle_since(idle_after).await;
        for room in &idle {
            debug!(room_id = %room.id, "evicting idle room");
            state.rooms.remove(&room.id).await;
        }
    }
}

#[cfg(test)]
#[path = "reaper_tests.rs"]
mod tests;
