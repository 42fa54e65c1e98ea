// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop Agent: the process a user runs next to their checkout. It
//! authenticates to the rendezvous Hub, pairs (or rejoins) with a phone or
//! chat front-end, and drives a local Session multiplexer on its behalf
//! (spec §2, §4.6-§4.7, §7.2, §7.6).

pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod identity;
pub mod pairing;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use relay_session::{Multiplexer, MultiplexerConfig};

use crate::config::AgentConfig;

/// Construct the multiplexer, connect to the Hub, and run until `shutdown`
/// fires.
pub async fn run(config: AgentConfig) -> anyhow::Result<()> {
    let identity_path = config.identity_path();
    let identity = identity::load_or_create(&identity_path, config.device_id.clone(), config.device_name.clone())?;

    tracing::info!(device_id = %identity.device_id, device_name = %identity.device_name, "desktop agent starting");

    let (events_tx, events_rx) = mpsc::channel(256);
    let mux_config = MultiplexerConfig {
        cli_path: config.cli_path_expanded(),
        session_cap: config.session_cap,
        allowed_directories: config.allowed_directories.clone(),
        restart_delay: config.restart_delay(),
    };
    let mux = Multiplexer::new(mux_config, events_tx);

    let shutdown = CancellationToken::new();
    spawn_status_log(Arc::new(identity.device_id.clone()), shutdown.clone());

    let conn_config = connection::ConnectionConfig {
        hub_url: config.hub_url.clone(),
        ws_url: config.ws_url(),
        identity_path,
    };

    let conn_shutdown = shutdown.clone();
    let conn_task = tokio::spawn(connection::run(conn_config, identity, mux, events_rx, conn_shutdown));

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    shutdown.cancel();
    let _ = conn_task.await;

    Ok(())
}

/// Local status surface (spec §7.5): since the Agent has no public
/// listener, liveness is a periodic log line rather than an HTTP endpoint.
fn spawn_status_log(device_id: Arc<String>, shutdown: CancellationToken) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = tokio::time::sleep(Duration::from_secs(300)) => {
                    tracing::info!(device_id = %device_id, "desktop agent alive");
                }
            }
        }
    });
}
