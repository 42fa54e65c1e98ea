// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use relay_agent::config::AgentConfig;

#[tokio::main]
async fn main() {
    let config = AgentConfig::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    if config.log_format == "json" {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    if let Err(e) = config.validate() {
        error!("invalid configuration: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = relay_agent::run(config).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}
