// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use super::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn config(cli: &str) -> WorkerConfig {
    WorkerConfig {
        cli_path: fixture(cli),
        working_directory: std::env::temp_dir(),
        restart_delay: Duration::from_millis(50),
    }
}

async fn recv(rx: &mut mpsc::Receiver<WorkerEvent>) -> WorkerEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("worker event within timeout")
        .expect("worker event channel open")
}

#[tokio::test]
async fn ready_then_send_yields_message_and_done() {
    let (tx, mut rx) = mpsc::channel(16);
    let worker = Worker::spawn(config("fake_cli.sh"), tx);

    assert!(matches!(recv(&mut rx).await, WorkerEvent::Ready));

    worker.send("hello").unwrap();
    assert!(worker.is_busy());

    match recv(&mut rx).await {
        WorkerEvent::Message { subtype: MessageSubtype::Success, text } => {
            assert_eq!(text, "ack");
        }
        other => panic!("expected Message, got {other:?}"),
    }
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Done));
    assert!(!worker.is_busy());

    let usage = worker.usage().await;
    assert_eq!(usage.input_tokens, 1);
    assert_eq!(usage.turn_count, 1);
    assert_eq!(worker.provider_session_id().await, Some("fake-session".to_owned()));

    worker.shutdown();
}

#[tokio::test]
async fn send_while_busy_fails_fast() {
    let (tx, mut rx) = mpsc::channel(16);
    let worker = Worker::spawn(config("fake_cli.sh"), tx);
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Ready));

    worker.send("first").unwrap();
    let err = worker.send("second").unwrap_err();
    assert_eq!(err.code, relay_proto::ErrorCode::Busy);

    worker.shutdown();
}

#[tokio::test]
async fn crash_mid_turn_emits_partial_as_error_then_exit_then_restarts() {
    let (tx, mut rx) = mpsc::channel(16);
    let worker = Worker::spawn(config("fake_cli_crash.sh"), tx);

    assert!(matches!(recv(&mut rx).await, WorkerEvent::Ready));
    worker.send("hello").unwrap();

    match recv(&mut rx).await {
        WorkerEvent::Message { subtype: MessageSubtype::Error, text } => {
            assert_eq!(text, "partial");
        }
        other => panic!("expected error-subtype Message, got {other:?}"),
    }
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Exit { .. }));
    // Auto-restart: a fresh Ready follows after restart_delay.
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Ready));

    worker.shutdown();
}

#[tokio::test]
async fn restart_resets_usage_and_provider_session_id() {
    let (tx, mut rx) = mpsc::channel(16);
    let worker = Worker::spawn(config("fake_cli.sh"), tx);
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Ready));

    worker.send("hello").unwrap();
    recv(&mut rx).await; // Message
    recv(&mut rx).await; // Done
    assert_eq!(worker.usage().await.turn_count, 1);

    worker.restart();
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Exit { .. }));
    assert!(matches!(recv(&mut rx).await, WorkerEvent::Ready));

    assert_eq!(worker.usage().await.turn_count, 0);
    assert_eq!(worker.provider_session_id().await, None);

    worker.shutdown();
}
