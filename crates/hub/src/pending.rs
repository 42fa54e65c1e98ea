// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pending pair-code store (spec §4.1). Dual-indexed by `initiator_device_id`
//! (a fresh request from the same device invalidates its prior code) and by
//! the normalised code (confirm looks codes up this way).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use relay_proto::paircode::{self, PairCodeLength};
use relay_proto::{ErrorCode, Role};
use tokio::sync::RwLock;

pub struct PendingPair {
    pub code: String,
    pub initiator_device_id: String,
    pub initiator_role: Role,
    pub expires_at: Instant,
}

#[derive(Default)]
pub struct PendingPairs {
    by_code: RwLock<HashMap<String, PendingPair>>,
    by_device: RwLock<HashMap<String, String>>,
}

/// Result of a successful confirm: the two devices slotted by role.
pub struct Confirmed {
    pub desktop_device_id: String,
    pub phone_device_id: String,
}

impl PendingPairs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh code for `device_id`, replacing any code it already
    /// holds. Regenerates on the (astronomically unlikely) chance of a
    /// collision with a still-live code.
    pub async fn request(
        &self,
        device_id: String,
        role: Role,
        length: PairCodeLength,
        ttl: Duration,
    ) -> (String, Instant) {
        let mut by_code = self.by_code.write().await;
        let mut by_device = self.by_device.write().await;

        if let Some(prior_code) = by_device.remove(&device_id) {
            by_code.remove(&prior_code);
        }

        let mut rng = rand::rng();
        let code = loop {
            let candidate = paircode::generate(&mut rng, length);
            let key = paircode::normalize(&candidate);
            if !by_code.contains_key(&key) {
                break candidate;
            }
        };

        let expires_at = Instant::now() + ttl;
        let key = paircode::normalize(&code);
        by_code.insert(
            key.clone(),
            PendingPair { code: code.clone(), initiator_device_id: device_id.clone(), initiator_role: role, expires_at },
        );
        by_device.insert(device_id, key);
        (code, expires_at)
    }

    /// Resolve `code` against `confirmer_device_id`/`confirmer_role`. On
    /// success, the PendingPair is consumed and the two devices are
    /// returned slotted by role, regardless of which side initiated.
    pub async fn confirm(
        &self,
        code: &str,
        confirmer_device_id: &str,
        confirmer_role: Role,
    ) -> Result<Confirmed, ErrorCode> {
        let key = paircode::normalize(code);
        let mut by_code = self.by_code.write().await;

        let pending = by_code.get(&key).ok_or(ErrorCode::InvalidPairCode)?;

        if Instant::now() > pending.expires_at {
            let initiator = pending.initiator_device_id.clone();
            by_code.remove(&key);
            self.by_device.write().await.remove(&initiator);
            return Err(ErrorCode::PairCodeExpired);
        }

        if pending.initiator_role == confirmer_role {
            return Err(ErrorCode::SameDeviceType);
        }

        let initiator_device_id = pending.initiator_device_id.clone();
        let initiator_role = pending.initiator_role;
        by_code.remove(&key);
        self.by_device.write().await.remove(&initiator_device_id);

        let (desktop_device_id, phone_device_id) = if initiator_role == Role::Desktop {
            (initiator_device_id, confirmer_device_id.to_owned())
        } else {
            (confirmer_device_id.to_owned(), initiator_device_id)
        };

        Ok(Confirmed { desktop_device_id, phone_device_id })
    }

    pub async fn status(&self, device_id: &str) -> bool {
        self.by_device.read().await.contains_key(device_id)
    }

    /// Remove and return every code whose `expires_at` has passed.
    pub async fn sweep_expired(&self) -> Vec<String> {
        let now = Instant::now();
        let mut by_code = self.by_code.write().await;
        let mut by_device = self.by_device.write().await;

        let expired: Vec<String> =
            by_code.iter().filter(|(_, p)| now > p.expires_at).map(|(k, _)| k.clone()).collect();

        let mut removed_initiators = Vec::with_capacity(expired.len());
        for key in &expired {
            if let Some(p) = by_code.remove(key) {
                removed_initiators.push(p.initiator_device_id);
            }
        }
        for device_id in &removed_initiators {
            by_device.remove(device_id);
        }
        expired
    }
}

#[cfg(test)]
#[path = "pending_tests.rs"]
mod tests;
