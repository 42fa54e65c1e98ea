// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn base() -> BridgeConfig {
    BridgeConfig {
        bot_token: "123:abc".to_owned(),
        shared_secret: "hunter2".to_owned(),
        chunk_size: 4000,
        cli_path: "~/.local/bin/claude".to_owned(),
        session_cap: 8,
        allowed_directories: vec![PathBuf::from("/tmp")],
        restart_delay_secs: 3,
        log_format: "text".to_owned(),
        log_level: "info".to_owned(),
    }
}

#[test]
fn validate_accepts_a_well_formed_config() {
    assert!(base().validate().is_ok());
}

#[test]
fn validate_rejects_empty_bot_token() {
    let mut config = base();
    config.bot_token = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_empty_shared_secret() {
    let mut config = base();
    config.shared_secret = String::new();
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_zero_chunk_size() {
    let mut config = base();
    config.chunk_size = 0;
    assert!(config.validate().is_err());
}

#[test]
fn validate_rejects_no_allowed_directories() {
    let mut config = base();
    config.allowed_directories = Vec::new();
    assert!(config.validate().is_err());
}

#[test]
fn cli_path_expands_tilde() {
    let config = base();
    let expanded = config.cli_path_expanded();
    assert!(!expanded.display().to_string().starts_with('~'));
}
