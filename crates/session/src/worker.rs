// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session worker (spec §4.7), strategy (A): persistent child process,
//! line-delimited stream-json on stdin/stdout. Strategy (B) — one child per
//! turn — is the rejected alternative recorded in DESIGN.md.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use relay_proto::ErrorCode;

use crate::error::SessionError;
use crate::stream::{self, StreamMessage};
use crate::usage::SessionUsage;

/// Parameters needed to spawn a worker that `Multiplexer` doesn't already
/// track per-Session (spec §4.7, §7.2).
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub cli_path: PathBuf,
    pub working_directory: PathBuf,
    pub restart_delay: std::time::Duration,
}

/// `subtype` of an emitted `message` event (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSubtype {
    Success,
    Error,
}

/// Events a worker emits asynchronously (spec §4.7).
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Ready,
    Message { subtype: MessageSubtype, text: String },
    Done,
    Error { err: String },
    Exit { code: Option<i32> },
}

enum WorkerCommand {
    Send(String),
    Stop,
    ForceStop,
    Restart,
}

/// Handle to a running Session worker. Cloning is cheap; all clones refer
/// to the same background task.
#[derive(Clone)]
pub struct Worker {
    cmd_tx: mpsc::UnboundedSender<WorkerCommand>,
    busy: Arc<AtomicBool>,
    provider_session_id: Arc<RwLock<Option<String>>>,
    model: Arc<RwLock<Option<String>>>,
    usage: Arc<RwLock<SessionUsage>>,
    cancel: CancellationToken,
}

impl Worker {
    /// Spawn the background task that owns the child process. `events` is
    /// how the caller (the multiplexer) observes worker activity.
    pub fn spawn(config: WorkerConfig, events: mpsc::Sender<WorkerEvent>) -> Self {
        let busy = Arc::new(AtomicBool::new(false));
        let provider_session_id = Arc::new(RwLock::new(None));
        let model = Arc::new(RwLock::new(None));
        let usage = Arc::new(RwLock::new(SessionUsage::default()));
        let cancel = CancellationToken::new();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(
            config,
            cmd_rx,
            events,
            Arc::clone(&busy),
            Arc::clone(&provider_session_id),
            Arc::clone(&model),
            Arc::clone(&usage),
            cancel.clone(),
        ));

        Self { cmd_tx, busy, provider_session_id, model, usage, cancel }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub async fn usage(&self) -> SessionUsage {
        self.usage.read().await.clone()
    }

    pub async fn provider_session_id(&self) -> Option<String> {
        self.provider_session_id.read().await.clone()
    }

    pub async fn model(&self) -> Option<String> {
        self.model.read().await.clone()
    }

    /// Fails fast with `Busy` if a send is already in flight (spec §4.7).
    pub fn send(&self, text: impl Into<String>) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::new(ErrorCode::Busy, "already processing"));
        }
        self.cmd_tx
            .send(WorkerCommand::Send(text.into()))
            .map_err(|_| SessionError::new(ErrorCode::Internal, "session worker task is gone"))
    }

    pub fn stop(&self) {
        let _ = self.cmd_tx.send(WorkerCommand::Stop);
    }

    pub fn force_stop(&self) {
        let _ = self.cmd_tx.send(WorkerCommand::ForceStop);
    }

    pub fn restart(&self) {
        let _ = self.cmd_tx.send(WorkerCommand::Restart);
    }

    /// Tear the worker down permanently (used when a Session is closed).
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

struct ChildProc {
    child: Child,
    stdin: Option<ChildStdin>,
    lines_rx: mpsc::Receiver<String>,
}

fn spawn_child(config: &WorkerConfig) -> std::io::Result<ChildProc> {
    let mut cmd = Command::new(&config.cli_path);
    cmd.args([
        "--input-format",
        "stream-json",
        "--output-format",
        "stream-json",
        "--print",
        "--verbose",
        "--dangerously-skip-permissions",
    ])
    .current_dir(&config.working_directory)
    .env("FORCE_COLOR", "0")
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stdin = child.stdin.take();
    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");

    let (lines_tx, lines_rx) = mpsc::channel(64);
    tokio::spawn(async move {
        let mut reader = BufReader::new(stdout).lines();
        loop {
            match reader.next_line().await {
                Ok(Some(line)) => {
                    if lines_tx.send(line).await.is_err() {
                        break;
                    }
                }
                _ => break,
            }
        }
    });
    tokio::spawn(async move {
        let mut reader = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            let line = line.trim();
            if !line.is_empty() {
                warn!(line, "session worker stderr");
            }
        }
    });

    Ok(ChildProc { child, stdin, lines_rx })
}

#[allow(clippy::too_many_arguments)]
async fn run(
    config: WorkerConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<WorkerCommand>,
    events: mpsc::Sender<WorkerEvent>,
    busy: Arc<AtomicBool>,
    provider_session_id: Arc<RwLock<Option<String>>>,
    model: Arc<RwLock<Option<String>>>,
    usage: Arc<RwLock<SessionUsage>>,
    cancel: CancellationToken,
) {
    let mut stop_requested = false;

    'spawn: loop {
        if stop_requested || cancel.is_cancelled() {
            return;
        }

        let mut proc = match spawn_child(&config) {
            Ok(p) => p,
            Err(e) => {
                let _ = events
                    .send(WorkerEvent::Error { err: format!("failed to spawn session worker: {e}") })
                    .await;
                tokio::time::sleep(config.restart_delay).await;
                continue;
            }
        };
        info!(cli_path = %config.cli_path.display(), "session worker spawned");
        let _ = events.send(WorkerEvent::Ready).await;

        let pid = proc.child.id();
        let mut buffer = String::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    if let Some(pid) = pid {
                        let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
                    }
                    let _ = proc.child.wait().await;
                    return;
                }

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(WorkerCommand::Send(text)) => {
                            busy.store(true, Ordering::Release);
                            let mut line = stream::encode_user_message(&text);
                            line.push('\n');
                            let write_ok = match proc.stdin.as_mut() {
                                Some(stdin) => stdin.write_all(line.as_bytes()).await.is_ok(),
                                None => false,
                            };
                            if !write_ok {
                                busy.store(false, Ordering::Release);
                                let _ = events
                                    .send(WorkerEvent::Error { err: "failed to write to session worker stdin".to_owned() })
                                    .await;
                            }
                        }
                        Some(WorkerCommand::Stop) => {
                            stop_requested = true;
                            proc.stdin.take();
                            if let Some(pid) = pid {
                                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
                            }
                        }
                        Some(WorkerCommand::ForceStop) => {
                            stop_requested = true;
                            if let Some(pid) = pid {
                                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGKILL);
                            }
                        }
                        Some(WorkerCommand::Restart) => {
                            if let Some(pid) = pid {
                                let _ = kill(Pid::from_raw(pid as i32), Signal::SIGTERM);
                            }
                            let status = proc.child.wait().await.ok();
                            *usage.write().await = SessionUsage::default();
                            *provider_session_id.write().await = None;
                            *model.write().await = None;
                            busy.store(false, Ordering::Release);
                            let _ = events.send(WorkerEvent::Exit { code: status.and_then(|s| s.code()) }).await;
                            continue 'spawn;
                        }
                        None => {
                            cancel.cancel();
                        }
                    }
                }

                line = proc.lines_rx.recv() => {
                    match line {
                        Some(line) => {
                            let json: Value = match serde_json::from_str(&line) {
                                Ok(v) => v,
                                Err(e) => {
                                    let elided = if line.len() > 200 { &line[..200] } else { &line };
                                    warn!(err = %e, line = elided, "malformed stream-json line from session worker");
                                    continue;
                                }
                            };
                            match stream::classify(&json) {
                                Some(StreamMessage::Init { provider_session_id: sid, model: m }) => {
                                    if sid.is_some() {
                                        *provider_session_id.write().await = sid;
                                    }
                                    if m.is_some() {
                                        *model.write().await = m;
                                    }
                                }
                                Some(StreamMessage::AssistantText(text)) => {
                                    if !buffer.is_empty() {
                                        buffer.push('\n');
                                    }
                                    buffer.push_str(&text);
                                }
                                Some(StreamMessage::Result { usage: delta }) => {
                                    if let Some(delta) = delta {
                                        usage.write().await.accumulate(&delta);
                                    }
                                    let text = std::mem::take(&mut buffer);
                                    busy.store(false, Ordering::Release);
                                    let _ = events
                                        .send(WorkerEvent::Message { subtype: MessageSubtype::Success, text })
                                        .await;
                                    let _ = events.send(WorkerEvent::Done).await;
                                }
                                Some(StreamMessage::Other) | None => {}
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        let status = proc.child.wait().await.ok();
        let code = status.and_then(|s| s.code());
        if !buffer.is_empty() {
            let _ = events
                .send(WorkerEvent::Message { subtype: MessageSubtype::Error, text: buffer })
                .await;
        }
        busy.store(false, Ordering::Release);
        info!(?code, "session worker exited");
        let _ = events.send(WorkerEvent::Exit { code }).await;

        if stop_requested || cancel.is_cancelled() {
            return;
        }
        tokio::time::sleep(config.restart_delay).await;
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
