// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn base() -> AgentConfig {
    AgentConfig {
        hub_url: "https://relay.example.com".to_owned(),
        device_id: None,
        device_name: None,
        identity_path: None,
        cli_path: "~/.local/bin/claude".to_owned(),
        session_cap: 8,
        allowed_directories: vec![PathBuf::from("/home/user/code")],
        restart_delay_secs: 3,
        log_format: "text".to_owned(),
        log_level: "info".to_owned(),
    }
}

#[test]
fn validate_rejects_empty_hub_url() {
    let mut config = base();
    config.hub_url = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_non_http_hub_url() {
    let mut config = base();
    config.hub_url = "relay.example.com".to_owned();
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_no_allowed_directories() {
    let mut config = base();
    config.allowed_directories.clear();
    assert!(config.validate().is_err());
}

#[test]
fn ws_url_rewrites_scheme() {
    let config = base();
    assert_eq!(config.ws_url(), "wss://relay.example.com/ws");

    let mut http = base();
    http.hub_url = "http://localhost:3000".to_owned();
    assert_eq!(http.ws_url(), "ws://localhost:3000/ws");
}

#[test]
fn cli_path_expands_tilde() {
    let config = base();
    let expanded = config.cli_path_expanded();
    assert!(!expanded.starts_with("~"));
}
