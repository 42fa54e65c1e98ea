// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge: the single-operator chat-front-end variant (spec §1, §4.8-§4.11).
//! Unlike the Desktop Agent, there is no Hub in between — a Telegram chat
//! drives the Session multiplexer directly, gated by a shared password.

pub mod auth;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod queue;
pub mod telegram;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use relay_session::{Multiplexer, MultiplexerConfig};

use crate::config::BridgeConfig;
use crate::dispatch::Bridge;

/// Construct the multiplexer and Bridge, then run the Telegram dispatcher
/// until a Ctrl+C signal is received.
pub async fn run(config: BridgeConfig) -> anyhow::Result<()> {
    tracing::info!("bridge starting");

    let (events_tx, events_rx) = mpsc::channel(256);
    let mux_config = MultiplexerConfig {
        cli_path: config.cli_path_expanded(),
        session_cap: config.session_cap,
        allowed_directories: config.allowed_directories.clone(),
        restart_delay: config.restart_delay(),
    };
    let mux = Multiplexer::new(mux_config, events_tx);
    let bridge = Arc::new(Bridge::new(mux, config.shared_secret.clone(), config.chunk_size));

    let shutdown = CancellationToken::new();
    let run_shutdown = shutdown.clone();
    let bot_token = config.bot_token.clone();
    let dispatch_task = tokio::spawn(async move { telegram::run(&bot_token, bridge, events_rx, run_shutdown).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    shutdown.cancel();
    dispatch_task.await??;

    Ok(())
}
