// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connection registry: one live entry per connected device (spec §4.2).
//!
//! A device reconnecting (new socket, same `device_id`) displaces its prior
//! entry rather than coexisting with it — the old connection is cancelled
//! and its outbox closes, which unwinds its WebSocket task.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use relay_proto::{Frame, Role};
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;

/// A single live WebSocket connection, keyed by device id in the [`Registry`].
pub struct Connection {
    pub device_id: String,
    pub role: Role,
    pub room_id: RwLock<Option<String>>,
    pub outbox: mpsc::UnboundedSender<Frame>,
    pub cancel: CancellationToken,
    pub connected_at: Instant,
    pub last_seen: RwLock<Instant>,
}

impl Connection {
    pub fn new(device_id: String, role: Role, outbox: mpsc::UnboundedSender<Frame>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            device_id,
            role,
            room_id: RwLock::new(None),
            outbox,
            cancel: CancellationToken::new(),
            connected_at: now,
            last_seen: RwLock::new(now),
        })
    }

    pub fn send(&self, frame: Frame) {
        // The receiver only drops once the connection's write task has
        // exited, at which point there is nothing useful to do with a
        // send failure.
        let _ = self.outbox.send(frame);
    }

    pub async fn touch(&self) {
        *self.last_seen.write().await = Instant::now();
    }
}

/// Live connections, one per device id.
#[derive(Default)]
pub struct Registry {
    conns: RwLock<HashMap<String, Arc<Connection>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `conn`, returning the displaced connection (if any) so the
    /// caller can cancel it *after* releasing the registry lock.
    pub async fn insert(&self, conn: Arc<Connection>) -> Option<Arc<Connection>> {
        self.conns.write().await.insert(conn.device_id.clone(), conn)
    }

    /// Remove `device_id` only if the current entry is still `expected`
    /// (compared by pointer identity). Prevents a stale connection's
    /// cleanup task from evicting a newer connection that has since
    /// displaced it.
    pub async fn remove_if_current(&self, device_id: &str, expected: &Arc<Connection>) {
        let mut guard = self.conns.write().await;
        if let Some(current) = guard.get(device_id) {
            if Arc::ptr_eq(current, expected) {
                guard.remove(device_id);
            }
        }
    }

    pub async fn get(&self, device_id: &str) -> Option<Arc<Connection>> {
        self.conns.read().await.get(device_id).cloned()
    }

    pub async fn is_online(&self, device_id: &str) -> bool {
        self.conns.read().await.contains_key(device_id)
    }

    pub async fn len(&self) -> usize {
        self.conns.read().await.len()
    }

    pub async fn stale(&self, older_than: std::time::Duration) -> Vec<Arc<Connection>> {
        let guard = self.conns.read().await;
        let mut out = Vec::new();
        for conn in guard.values() {
            if conn.last_seen.read().await.elapsed() > older_than {
                out.push(Arc::clone(conn));
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
