// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Rendezvous hub: pairs a desktop and a phone, then relays frames between
//! them for as long as both stay connected (spec §4.1-§4.5).

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod pending;
pub mod reaper;
pub mod registry;
pub mod rooms;
pub mod state;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::HubConfig;
use crate::state::HubState;
use crate::transport::build_router;

/// Run the hub until its shutdown token fires (or the process receives a
/// termination signal via the top-level `main`).
pub async fn run(config: HubConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let state = Arc::new(HubState::new(config, shutdown.clone()));
    tokio::spawn(reaper::run(Arc::clone(&state)));

    tracing::info!("relay-hub listening on {addr}");
    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
