// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-frame handling for an authenticated connection (spec §4.3).

use std::sync::Arc;

use relay_proto::Frame;
use tracing::{debug, warn};

use crate::registry::Connection;
use crate::state::HubState;

/// Handle one inbound frame from an already-authenticated connection.
pub async fn handle(state: &Arc<HubState>, conn: &Arc<Connection>, frame: Frame) {
    conn.touch().await;

    match frame {
        Frame::Ping => conn.send(Frame::Pong),

        Frame::Rejoin { room_id } => handle_rejoin(state, conn, room_id).await,

        frame if frame.is_relayable() => relay(state, conn, frame).await,

        other => {
            warn!(device_id = %conn.device_id, frame = ?other, "unexpected frame from authenticated connection");
            conn.send(Frame::Error { reason: "unexpected message".to_owned() });
        }
    }
}

/// Relay a `message`/`session_*` frame to the sender's paired peer
/// unchanged, preserving sender order on this (sender, receiver) pair.
async fn relay(state: &Arc<HubState>, conn: &Arc<Connection>, frame: Frame) {
    let room_id = conn.room_id.read().await.clone();
    let Some(room_id) = room_id else {
        conn.send(Frame::Error { reason: "device not in room".to_owned() });
        return;
    };

    let Some(room) = state.rooms.get(&room_id).await else {
        conn.send(Frame::Error { reason: "device not in room".to_owned() });
        return;
    };

    state.rooms.touch(&room_id).await;

    let Some(peer_id) = room.peer_of(&conn.device_id) else {
        conn.send(Frame::Error { reason: "device not in room".to_owned() });
        return;
    };

    match state.registry.get(peer_id).await {
        Some(peer) => peer.send(frame),
        // The spec makes no ordering or delivery guarantee across a
        // disconnect (§5 Ordering) — the frame is simply dropped.
        None => debug!(device_id = %conn.device_id, peer_id, "dropping relayed frame, peer offline"),
    }
}

/// `rejoin {roomId}` (spec §4.3): reattach a reconnecting device to an
/// existing Room without requiring the peer to re-enter a pair code.
/// Repeated `rejoin` on a socket already bound to `room_id` is a no-op
/// after the first success (spec §8 "Rejoin idempotence") — it does not
/// re-send `Paired` to either side.
async fn handle_rejoin(state: &Arc<HubState>, conn: &Arc<Connection>, room_id: String) {
    let Some(room) = state.rooms.get(&room_id).await else {
        warn!(device_id = %conn.device_id, room_id, "rejoin failed: room not found");
        conn.send(Frame::RejoinFailed { reason: "room not found".to_owned() });
        return;
    };

    let Some(peer_id) = room.peer_of(&conn.device_id).map(str::to_owned) else {
        warn!(device_id = %conn.device_id, room_id, "rejoin failed: device not in room");
        conn.send(Frame::RejoinFailed { reason: "device not in room".to_owned() });
        return;
    };

    let already_bound = *conn.room_id.read().await == Some(room_id.clone());

    *conn.room_id.write().await = Some(room_id.clone());
    state.rooms.touch(&room_id).await;

    let peer = state.registry.get(&peer_id).await;

    if already_bound {
        conn.send(Frame::RejoinSuccess { room_id, peer_online: peer.is_some() });
        return;
    }

    match peer {
        Some(peer) if *peer.room_id.read().await == Some(room_id.clone()) => {
            conn.send(Frame::Paired { room_id: room_id.clone() });
            peer.send(Frame::Paired { room_id });
        }
        _ => {
            conn.send(Frame::RejoinSuccess { room_id, peer_online: peer.is_some() });
        }
    }
}

/// Tell the peer (if present) that `conn` just went offline, without
/// touching the Room itself — it survives either peer disconnecting
/// (spec §4.1, §4.3).
pub async fn notify_peer_offline(state: &Arc<HubState>, conn: &Arc<Connection>) {
    let room_id = conn.room_id.read().await.clone();
    let Some(room_id) = room_id else { return };
    let Some(room) = state.rooms.get(&room_id).await else { return };
    let Some(peer_id) = room.peer_of(&conn.device_id) else { return };
    if let Some(peer) = state.registry.get(peer_id).await {
        peer.send(Frame::PeerOffline);
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;
