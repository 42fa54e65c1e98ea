// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use clap::Parser;
use relay_proto::paircode::PairCodeLength;

/// Rendezvous hub: pairs a desktop and a phone, then relays text frames
/// between them for as long as both stay connected.
#[derive(Debug, Clone, Parser)]
#[command(name = "relay-hub", version, about)]
pub struct HubConfig {
    /// Host address to bind to.
    #[arg(long, default_value = "0.0.0.0", env = "HUB_HOST")]
    pub host: String,

    /// HTTP + WebSocket port.
    #[arg(long, default_value_t = 3000, env = "HUB_PORT")]
    pub port: u16,

    /// Pair-code length: "canonical" (8 chars, cloud) or "compact" (4 chars, embedded/LAN).
    #[arg(long, default_value = "canonical", env = "HUB_PAIR_CODE_LENGTH")]
    pub pair_code_length: String,

    /// Pair-code lifetime in seconds.
    #[arg(long, default_value_t = 300, env = "HUB_PAIR_CODE_TTL_SECS")]
    pub pair_code_ttl_secs: u64,

    /// Seconds between heartbeat reaper sweeps.
    #[arg(long, default_value_t = 30, env = "HUB_HEARTBEAT_INTERVAL_SECS")]
    pub heartbeat_interval_secs: u64,

    /// Evict a Room when idle (no frames relayed through it) for this many
    /// seconds. `0` disables idle eviction, which is the accepted default
    /// for the cloud variant (spec §9 Open Questions) — set this explicitly
    /// for long-lived embedded deployments with many ephemeral pairings.
    #[arg(long, default_value_t = 0, env = "HUB_ROOM_IDLE_EVICT_SECS")]
    pub room_idle_evict_secs: u64,

    /// Log format.
    #[arg(long, default_value = "text", env = "HUB_LOG_FORMAT")]
    pub log_format: String,

    /// Log level.
    #[arg(long, default_value = "info", env = "HUB_LOG_LEVEL")]
    pub log_level: String,
}

impl HubConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.pair_code_length()?;
        if self.pair_code_ttl_secs == 0 {
            anyhow::bail!("--pair-code-ttl-secs must be greater than zero");
        }
        if self.heartbeat_interval_secs == 0 {
            anyhow::bail!("--heartbeat-interval-secs must be greater than zero");
        }
        Ok(())
    }

    pub fn pair_code_length(&self) -> anyhow::Result<PairCodeLength> {
        match self.pair_code_length.as_str() {
            "canonical" => Ok(PairCodeLength::Canonical),
            "compact" => Ok(PairCodeLength::Compact),
            other => anyhow::bail!("invalid --pair-code-length: {other} (expected canonical or compact)"),
        }
    }

    pub fn pair_code_ttl(&self) -> Duration {
        Duration::from_secs(self.pair_code_ttl_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs)
    }

    pub fn room_idle_evict(&self) -> Option<Duration> {
        if self.room_idle_evict_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.room_idle_evict_secs))
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
