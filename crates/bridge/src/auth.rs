// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Password gate for the chat-front-end variant (spec §4.8). An operator
//! identity starts `Unseen`; its first message moves it to `Prompted` (the
//! password prompt is sent); its first textual reply while `Prompted` is
//! compared against the shared secret. The policy around *which* messages
//! count as a password attempt (e.g. slash commands don't) lives in
//! [`crate::dispatch`] — this module only holds the state machine and the
//! comparison itself.

use std::collections::HashMap;

use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unseen,
    Prompted,
    Authenticated,
}

pub struct AuthGate {
    shared_secret: String,
    states: RwLock<HashMap<i64, AuthState>>,
}

impl AuthGate {
    pub fn new(shared_secret: impl Into<String>) -> Self {
        Self { shared_secret: shared_secret.into(), states: RwLock::new(HashMap::new()) }
    }

    pub async fn state(&self, operator_id: i64) -> AuthState {
        self.states.read().await.get(&operator_id).copied().unwrap_or(AuthState::Unseen)
    }

    pub async fn mark_prompted(&self, operator_id: i64) {
        let mut states = self.states.write().await;
        states.entry(operator_id).or_insert(AuthState::Prompted);
    }

    /// Compare `candidate` against the shared secret. Only meaningful while
    /// `Prompted`; on match, transitions to `Authenticated`.
    pub async fn try_authenticate(&self, operator_id: i64, candidate: &str) -> bool {
        if constant_time_eq(candidate.as_bytes(), self.shared_secret.as_bytes()) {
            self.states.write().await.insert(operator_id, AuthState::Authenticated);
            true
        } else {
            false
        }
    }

    /// Operators currently admitted. Used to address proactive pushes (worker
    /// output not sent in direct reply to an inbound message).
    pub async fn authenticated_operators(&self) -> Vec<i64> {
        self.states.read().await.iter().filter(|(_, state)| **state == AuthState::Authenticated).map(|(id, _)| *id).collect()
    }
}

/// Constant-ish time comparison: always walks the longer of the two
/// buffers so the early-exit timing leaks only a length mismatch, not which
/// byte first differed.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len_differs = a.len() != b.len();
    let n = a.len().max(b.len());
    let mut diff: u8 = len_differs as u8;
    for i in 0..n {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
