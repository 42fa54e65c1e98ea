// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted device identity: generated once, reused across restarts so the
//! Hub recognises a reconnecting Agent as the same device (spec §7.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Identity {
    pub device_id: String,
    pub device_name: String,
    /// The Room this device last paired into, if any. Lets the Agent send
    /// `rejoin` instead of waiting for a fresh pair on every restart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

/// Load identity from `path`, generating and persisting a fresh one if the
/// file is absent. `device_id`/`device_name` overrides from config win over
/// whatever is on disk.
pub fn load_or_create(
    path: &Path,
    device_id_override: Option<String>,
    device_name_override: Option<String>,
) -> anyhow::Result<Identity> {
    let mut identity = match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Identity::default(),
        Err(e) => return Err(e.into()),
    };

    let mut changed = identity.device_id.is_empty() || identity.device_name.is_empty();

    if let Some(id) = device_id_override {
        changed |= identity.device_id != id;
        identity.device_id = id;
    } else if identity.device_id.is_empty() {
        identity.device_id = Uuid::new_v4().to_string();
    }

    if let Some(name) = device_name_override {
        changed |= identity.device_name != name;
        identity.device_name = name;
    } else if identity.device_name.is_empty() {
        identity.device_name = default_device_name();
    }

    if changed {
        save(path, &identity)?;
    }
    Ok(identity)
}

/// Persist `room_id` back to disk so the next run can `rejoin` directly.
pub fn remember_room(path: &Path, identity: &mut Identity, room_id: String) -> anyhow::Result<()> {
    identity.room_id = Some(room_id);
    save(path, identity)
}

/// Clear the persisted room, e.g. after a failed rejoin forces re-pairing.
pub fn forget_room(path: &Path, identity: &mut Identity) -> anyhow::Result<()> {
    identity.room_id = None;
    save(path, identity)
}

fn save(path: &Path, identity: &Identity) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(identity)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, json)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn default_device_name() -> String {
    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .unwrap_or_else(|_| "desktop-agent".to_owned())
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod tests;
