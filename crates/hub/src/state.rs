// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use tokio_util::sync::CancellationToken;

use crate::config::HubConfig;
use crate::pending::PendingPairs;
use crate::registry::Registry;
use crate::rooms::Rooms;

/// Shared Hub state: the registry, room table, and pending-pair store named
/// in the lock-acquisition order the dispatcher follows (`registry → rooms
/// → pending`) whenever it needs more than one at once.
pub struct HubState {
    pub config: HubConfig,
    pub registry: Registry,
    pub rooms: Rooms,
    pub pending: PendingPairs,
    pub shutdown: CancellationToken,
}

impl HubState {
    pub fn new(config: HubConfig, shutdown: CancellationToken) -> Self {
        Self {
            config,
            registry: Registry::new(),
            rooms: Rooms::new(),
            pending: PendingPairs::new(),
            shutdown,
        }
    }
}
