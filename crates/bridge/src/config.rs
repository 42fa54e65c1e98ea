// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Bridge: a single-operator chat front-end that multiplexes a Telegram
/// chat against a local Session multiplexer, with no Hub in between (spec
/// §1, §4.8-§4.11, §7.2).
#[derive(Debug, Clone, Parser)]
#[command(name = "relay-bridge", version, about)]
pub struct BridgeConfig {
    /// Telegram Bot API token, from `@BotFather`.
    #[arg(long, env = "BRIDGE_BOT_TOKEN")]
    pub bot_token: String,

    /// Shared password the first message from an unrecognized chat must
    /// match before any command or session traffic is accepted (spec §4.8).
    #[arg(long, env = "BRIDGE_PASSWORD")]
    pub shared_secret: String,

    /// Outbound text frames longer than this are split (spec §4.10).
    #[arg(long, default_value_t = 4000, env = "BRIDGE_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Path to the assistant CLI binary the session worker spawns.
    #[arg(long, env = "BRIDGE_CLI_PATH", default_value = "~/.local/bin/claude")]
    pub cli_path: String,

    /// Maximum number of concurrently open Sessions.
    #[arg(long, env = "BRIDGE_SESSION_CAP", default_value_t = 8)]
    pub session_cap: usize,

    /// Directories a Session's `workingDirectory` may be created under.
    /// Repeatable; also accepted colon-separated via `BRIDGE_ALLOWED_DIRS`.
    #[arg(long = "allow-dir", env = "BRIDGE_ALLOWED_DIRS", value_delimiter = ':')]
    pub allowed_directories: Vec<PathBuf>,

    /// Delay before a crashed session worker is restarted.
    #[arg(long, default_value_t = 3, env = "BRIDGE_RESTART_DELAY_SECS")]
    pub restart_delay_secs: u64,

    /// Log format.
    #[arg(long, default_value = "text", env = "BRIDGE_LOG_FORMAT")]
    pub log_format: String,

    /// Log level.
    #[arg(long, default_value = "info", env = "BRIDGE_LOG_LEVEL")]
    pub log_level: String,
}

impl BridgeConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bot_token.is_empty() {
            anyhow::bail!("--bot-token must not be empty");
        }
        if self.shared_secret.is_empty() {
            anyhow::bail!("--shared-secret must not be empty");
        }
        if self.chunk_size == 0 {
            anyhow::bail!("--chunk-size must be greater than zero");
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
