// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Desktop Agent: holds the WebSocket connection to the rendezvous Hub and
/// drives a local Session multiplexer on a paired phone's behalf (spec
/// §4.6, §7.2).
#[derive(Debug, Clone, Parser)]
#[command(name = "relay-agent", version, about)]
pub struct AgentConfig {
    /// Base HTTP(S) URL of the Hub (e.g. `https://relay.example.com`).
    #[arg(long, env = "AGENT_HUB_URL")]
    pub hub_url: String,

    /// This device's stable id. Generated and persisted on first run if
    /// absent (spec §7.2).
    #[arg(long, env = "AGENT_DEVICE_ID")]
    pub device_id: Option<String>,

    /// Human-readable name shown during pairing. Generated and persisted
    /// alongside `device_id` if absent.
    #[arg(long, env = "AGENT_DEVICE_NAME")]
    pub device_name: Option<String>,

    /// Where persisted device identity (`device_id`/`device_name`) is
    /// stored. Defaults to the platform config directory.
    #[arg(long, env = "AGENT_IDENTITY_PATH")]
    pub identity_path: Option<PathBuf>,

    /// Path to the assistant CLI binary the session worker spawns.
    #[arg(long, env = "AGENT_CLI_PATH", default_value = "~/.local/bin/claude")]
    pub cli_path: String,

    /// Maximum number of concurrently open Sessions.
    #[arg(long, env = "AGENT_SESSION_CAP", default_value_t = 8)]
    pub session_cap: usize,

    /// Directories a Session's `workingDirectory` may be created under.
    /// Repeatable; also accepted colon-separated via `AGENT_ALLOWED_DIRS`.
    #[arg(long = "allow-dir", env = "AGENT_ALLOWED_DIRS", value_delimiter = ':')]
    pub allowed_directories: Vec<PathBuf>,

    /// Delay before a crashed session worker is restarted.
    #[arg(long, default_value_t = 3, env = "AGENT_RESTART_DELAY_SECS")]
    pub restart_delay_secs: u64,

    /// Log format.
    #[arg(long, default_value = "text", env = "AGENT_LOG_FORMAT")]
    pub log_format: String,

    /// Log level.
    #[arg(long, default_value = "info", env = "AGENT_LOG_LEVEL")]
    pub log_level: String,
}

impl AgentConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hub_url.is_empty() {
            anyhow::bail!("--hub-url must not be empty");
        }
        if !(self.hub_url.starts_with("http://") || self.hub_url.starts_with("https://")) {
            anyhow::bail!("--hub-url must start with http:// or https://");
        }
        if self.session_cap == 0 {
            anyhow::bail!("--session-cap must be greater than zero");
        }
        if self.allowed_directories.is_empty() {
            anyhow::bail!("at least one --allow-dir is required");
        }
        Ok(())
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }

    pub fn cli_path_expanded(&self) -> PathBuf {
        expand_tilde(&self.cli_path)
    }

    /// Where persisted identity lives, defaulting to the platform config
    /// directory (`~/.config/relay-agent/identity.json` on Linux).
    pub fn identity_path(&self) -> PathBuf {
        self.identity_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("relay-agent")
                .join("identity.json")
        })
    }

    pub fn ws_url(&self) -> String {
        if let Some(rest) = self.hub_url.strip_prefix("https://") {
            format!("wss://{rest}/ws")
        } else if let Some(rest) = self.hub_url.strip_prefix("http://") {
            format!("ws://{rest}/ws")
        } else {
            format!("{}/ws", self.hub_url)
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
