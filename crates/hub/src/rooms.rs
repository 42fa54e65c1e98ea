// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rooms: the pairing between exactly one desktop device and one phone
//! device (spec §4.1, §4.3). A Room outlives either peer's socket — it is
//! only torn down by explicit unpair or (optionally) idle eviction.

use std::collections::HashMap;
use std::time::Instant;

use relay_proto::Role;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct Room {
    pub id: String,
    pub desktop_id: String,
    pub phone_id: String,
    pub created_at: Instant,
    pub last_active: RwLock<Instant>,
}

impl Room {
    pub fn peer_of(&self, device_id: &str) -> Option<&str> {
        if device_id == self.desktop_id {
            Some(&self.phone_id)
        } else if device_id == self.phone_id {
            Some(&self.desktop_id)
        } else {
            None
        }
    }

    pub fn role_of(&self, device_id: &str) -> Option<Role> {
        if device_id == self.desktop_id {
            Some(Role::Desktop)
        } else if device_id == self.phone_id {
            Some(Role::Phone)
        } else {
            None
        }
    }

    pub async fn touch(&self) {
        *self.last_active.write().await = Instant::now();
    }
}

#[derive(Default)]
pub struct Rooms {
    by_id: RwLock<HashMap<String, Room>>,
    /// Reverse index so a device's room can be found on rejoin without a
    /// linear scan (spec §4.4).
    by_device: RwLock<HashMap<String, String>>,
}

impl Rooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, desktop_id: String, phone_id: String) -> String {
        let id = Uuid::new_v4().to_string();
        let now = Instant::now();
        let room = Room {
            id: id.clone(),
            desktop_id: desktop_id.clone(),
            phone_id: phone_id.clone(),
            created_at: now,
            last_active: RwLock::new(now),
        };
        self.by_id.write().await.insert(id.clone(), room);
        let mut by_device = self.by_device.write().await;
        by_device.insert(desktop_id, id.clone());
        by_device.insert(phone_id, id.clone());
        id
    }

    pub async fn get(&self, room_id: &str) -> Option<std::sync::Arc<RoomSnapshot>> {
        self.by_id.read().await.get(room_id).map(RoomSnapshot::of)
    }

    pub async fn room_for_device(&self, device_id: &str) -> Option<String> {
        self.by_device.read().await.get(device_id).cloned()
    }

    pub async fn touch(&self, room_id: &str) {
        if let Some(room) = self.by_id.read().await.get(room_id) {
            room.touch().await;
        }
    }

    pub async fn remove(&self, room_id: &str) -> Option<std::sync::Arc<RoomSnapshot>> {
        let room = self.by_id.write().await.remove(room_id)?;
        let mut by_device = self.by_device.write().await;
        by_device.remove(&room.desktop_id);
        by_device.remove(&room.phone_id);
        Some(RoomSnapshot::of(&room))
    }

    pub async fn idle_since(&self, older_than: std::time::Duration) -> Vec<std::sync::Arc<RoomSnapshot>> {
        let guard = self.by_id.read().await;
        let mut out = Vec::new();
        for room in guard.values() {
            if room.last_active.read().await.elapsed() > older_than {
                out.push(RoomSnapshot::of(room));
            }
        }
        out
    }

    pub async fn len(&self) -> usize {
        self.by_id.read().await.len()
    }
}

/// An immutable copy of a [`Room`]'s identity fields, safe to hold across
/// an `.await` point after the registry lock guard has been dropped.
#[derive(Clone)]
pub struct RoomSnapshot {
    pub id: String,
    pub desktop_id: String,
    pub phone_id: String,
}

impl RoomSnapshot {
    fn of(room: &Room) -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            id: room.id.clone(),
            desktop_id: room.desktop_id.clone(),
            phone_id: room.phone_id.clone(),
        })
    }

    pub fn peer_of(&self, device_id: &str) -> Option<&str> {
        if device_id == self.desktop_id {
            Some(&self.phone_id)
        } else if device_id == self.phone_id {
            Some(&self.desktop_id)
        } else {
            None
        }
    }
}

#[cfg(test)]
#[path = "rooms_tests.rs"]
mod tests;
