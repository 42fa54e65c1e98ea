// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge against a real fake-CLI worker (spec §7.4, §9 Testable
//! Properties): authentication, session lifecycle, and message relay
//! through the Bridge's public `handle_message` surface, with no Telegram
//! involved.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use relay_bridge::dispatch::Bridge;
use relay_session::{Multiplexer, MultiplexerConfig, MultiplexerEvent, SessionMessageKind};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

async fn recv_ready(rx: &mut mpsc::Receiver<MultiplexerEvent>) {
    loop {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Some(MultiplexerEvent::SessionMessage { message: SessionMessageKind::Ready, .. })) => return,
            Ok(Some(_)) => continue,
            other => panic!("expected a Ready sessionMessage, got {other:?}"),
        }
    }
}

async fn recv_ack(rx: &mut mpsc::Receiver<MultiplexerEvent>) -> String {
    loop {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Some(MultiplexerEvent::SessionMessage { message: SessionMessageKind::Text { text, .. }, .. })) => return text,
            Ok(Some(_)) => continue,
            other => panic!("expected a Text sessionMessage, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn authenticate_create_session_and_relay_a_message() {
    let (tx, mut rx) = mpsc::channel(64);
    let mux = Multiplexer::new(
        MultiplexerConfig {
            cli_path: fixture("fake_cli.sh"),
            session_cap: 4,
            allowed_directories: vec![std::env::temp_dir()],
            restart_delay: Duration::from_millis(50),
        },
        tx,
    );
    let bridge = Bridge::new(mux, "hunter2", 4000);

    let prompt = bridge.handle_message(1, "hi").await;
    assert!(prompt[0].contains("password"));

    let ack = bridge.handle_message(1, "hunter2").await;
    assert_eq!(ack, vec!["authenticated".to_owned()]);

    let created = bridge.handle_message(1, "/new work").await;
    assert!(created[0].starts_with("created session work"));
    recv_ready(&mut rx).await;

    let reply = bridge.handle_message(1, "hello there").await;
    assert!(reply.is_empty(), "worker output arrives as a sessionMessage event, not a direct reply");

    assert_eq!(recv_ack(&mut rx).await, "ack");

    let status = bridge.handle_message(1, "/status").await;
    assert!(status[0].contains("1 session"));
}

#[tokio::test]
async fn wrong_password_does_not_admit_the_operator() {
    let (tx, _rx) = mpsc::channel(64);
    let mux = Multiplexer::new(
        MultiplexerConfig {
            cli_path: fixture("fake_cli.sh"),
            session_cap: 4,
            allowed_directories: vec![std::env::temp_dir()],
            restart_delay: Duration::from_millis(50),
        },
        tx,
    );
    let bridge = Bridge::new(mux, "hunter2", 4000);

    bridge.handle_message(1, "hi").await;
    let reply = bridge.handle_message(1, "nope").await;
    assert!(reply[0].contains("password"));

    let reply = bridge.handle_message(1, "/list").await;
    assert!(reply[0].contains("authenticate first"));
}
