// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session multiplexer (spec §4.6): holds an ordered set of Sessions, a
//! current active id, and re-emits every worker event as `sessionMessage`.
//! The multiplexer never formats text; that's the Bridge's/Agent's job.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, RwLock};

use relay_proto::{dirguard, ErrorCode, SessionSummary};

use crate::error::SessionError;
use crate::worker::{MessageSubtype, Worker, WorkerConfig, WorkerEvent};

/// Static configuration the multiplexer needs to spawn and police Sessions.
#[derive(Debug, Clone)]
pub struct MultiplexerConfig {
    pub cli_path: PathBuf,
    pub session_cap: usize,
    pub allowed_directories: Vec<PathBuf>,
    pub restart_delay: Duration,
}

impl MultiplexerConfig {
    /// First allow-listed directory; used when `create` omits one.
    fn default_working_directory(&self) -> Option<&Path> {
        self.allowed_directories.first().map(PathBuf::as_path)
    }
}

/// What kind of thing happened to a Session, mirrored from a `WorkerEvent`.
#[derive(Debug, Clone)]
pub enum SessionMessageKind {
    Ready,
    Text { subtype: MessageSubtype, text: String },
    Done,
    Error { err: String },
    Exit { code: Option<i32> },
}

impl From<WorkerEvent> for SessionMessageKind {
    fn from(event: WorkerEvent) -> Self {
        match event {
            WorkerEvent::Ready => Self::Ready,
            WorkerEvent::Message { subtype, text } => Self::Text { subtype, text },
            WorkerEvent::Done => Self::Done,
            WorkerEvent::Error { err } => Self::Error { err },
            WorkerEvent::Exit { code } => Self::Exit { code },
        }
    }
}

/// Events the multiplexer emits. `SessionMessage` carries every worker
/// event unchanged in meaning, tagged with which Session it came from.
#[derive(Debug, Clone)]
pub enum MultiplexerEvent {
    SessionCreated { session: SessionSummary },
    SessionSwitched { id: String },
    SessionClosed { id: String },
    SessionMessage { session_id: String, message: SessionMessageKind },
}

struct SessionEntry {
    id: u64,
    name: String,
    working_directory: PathBuf,
    created_at: Instant,
    message_count: u64,
    worker: Worker,
}

fn summarize(entry: &SessionEntry, active_id: Option<u64>) -> SessionSummary {
    SessionSummary {
        id: entry.id.to_string(),
        name: entry.name.clone(),
        working_directory: entry.working_directory.display().to_string(),
        status: if entry.worker.is_busy() { "busy" } else { "idle" }.to_owned(),
        is_active: active_id == Some(entry.id),
        message_count: entry.message_count,
        running_minutes: entry.created_at.elapsed().as_secs() / 60,
    }
}

/// Resolve `id_or_name` by numeric id first, then by exact name (spec §4.6).
fn resolve(sessions: &[SessionEntry], id_or_name: &str) -> Option<u64> {
    if let Ok(id) = id_or_name.parse::<u64>() {
        if sessions.iter().any(|s| s.id == id) {
            return Some(id);
        }
    }
    sessions.iter().find(|s| s.name == id_or_name).map(|s| s.id)
}

struct Inner {
    sessions: Vec<SessionEntry>,
    active_id: Option<u64>,
    next_id: u64,
}

/// Multiplexer handle. Cheap to clone; all clones share the same Session
/// set and the same background event forwarders.
#[derive(Clone)]
pub struct Multiplexer {
    inner: Arc<RwLock<Inner>>,
    config: MultiplexerConfig,
    events_tx: mpsc::Sender<MultiplexerEvent>,
}

impl Multiplexer {
    pub fn new(config: MultiplexerConfig, events_tx: mpsc::Sender<MultiplexerEvent>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner { sessions: Vec::new(), active_id: None, next_id: 1 })),
            config,
            events_tx,
        }
    }

    fn spawn_forwarder(&self, id: u64, mut rx: mpsc::Receiver<WorkerEvent>) {
        let inner = Arc::clone(&self.inner);
        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            let session_id = id.to_string();
            while let Some(event) = rx.recv().await {
                if matches!(event, WorkerEvent::Done) {
                    let mut inner = inner.write().await;
                    if let Some(entry) = inner.sessions.iter_mut().find(|s| s.id == id) {
                        entry.message_count += 1;
                    }
                }
                let message = SessionMessageKind::from(event);
                if events_tx.send(MultiplexerEvent::SessionMessage { session_id: session_id.clone(), message }).await.is_err() {
                    break;
                }
            }
        });
    }

    /// Create a new Session (spec §4.6). Fails on a full set, a
    /// directory-scope violation, or a nonexistent `workingDirectory`.
    pub async fn create(
        &self,
        name: Option<String>,
        working_directory: Option<PathBuf>,
    ) -> Result<SessionSummary, SessionError> {
        let working_directory = match working_directory.or_else(|| self.config.default_working_directory().map(Path::to_path_buf)) {
            Some(dir) => dir,
            None => return Err(SessionError::new(ErrorCode::PathMissing, "no workingDirectory given and no default configured")),
        };

        if !dirguard::is_allowed(&working_directory, &self.config.allowed_directories) {
            return Err(SessionError::new(
                ErrorCode::PathNotAllowed,
                format!("{} is not an allowed directory", working_directory.display()),
            ));
        }
        if !working_directory.is_dir() {
            return Err(SessionError::new(ErrorCode::PathMissing, format!("{} does not exist", working_directory.display())));
        }

        let mut inner = self.inner.write().await;
        if inner.sessions.len() >= self.config.session_cap {
            return Err(SessionError::new(ErrorCode::SessionCapReached, "session cap reached"));
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let name = name.unwrap_or_else(|| format!("session-{id}"));

        let (worker_events_tx, worker_events_rx) = mpsc::channel(64);
        let worker = Worker::spawn(
            WorkerConfig {
                cli_path: self.config.cli_path.clone(),
                working_directory: working_directory.clone(),
                restart_delay: self.config.restart_delay,
            },
            worker_events_tx,
        );

        let entry = SessionEntry {
            id,
            name,
            working_directory,
            created_at: Instant::now(),
            message_count: 0,
            worker,
        };
        inner.sessions.push(entry);
        let is_first = inner.sessions.len() == 1;
        if is_first {
            inner.active_id = Some(id);
        }
        let summary = summarize(inner.sessions.last().expect("just pushed"), inner.active_id);
        drop(inner);

        self.spawn_forwarder(id, worker_events_rx);
        let _ = self.events_tx.send(MultiplexerEvent::SessionCreated { session: summary.clone() }).await;
        Ok(summary)
    }

    /// Resolve by numeric id then exact name and make it active (spec §4.6).
    pub async fn switch(&self, id_or_name: &str) -> Result<SessionSummary, SessionError> {
        let mut inner = self.inner.write().await;
        let id = resolve(&inner.sessions, id_or_name)
            .ok_or_else(|| SessionError::new(ErrorCode::NotFound, format!("no session matching {id_or_name}")))?;
        inner.active_id = Some(id);
        let summary = inner
            .sessions
            .iter()
            .find(|s| s.id == id)
            .map(|s| summarize(s, inner.active_id))
            .expect("resolved id exists");
        drop(inner);

        let _ = self.events_tx.send(MultiplexerEvent::SessionSwitched { id: id.to_string() }).await;
        Ok(summary)
    }

    /// Close a Session, defaulting to the active one (spec §4.6). If the
    /// closed Session was active, the oldest remaining becomes active.
    pub async fn close(&self, id_or_name: Option<String>) -> Result<String, SessionError> {
        let mut inner = self.inner.write().await;
        let target = match id_or_name {
            Some(s) => resolve(&inner.sessions, &s)
                .ok_or_else(|| SessionError::new(ErrorCode::NotFound, format!("no session matching {s}")))?,
            None => inner.active_id.ok_or_else(|| SessionError::new(ErrorCode::NotFound, "no active session"))?,
        };

        let pos = inner.sessions.iter().position(|s| s.id == target).expect("resolved id exists");
        let entry = inner.sessions.remove(pos);
        entry.worker.stop();
        entry.worker.shutdown();

        if inner.active_id == Some(target) {
            inner.active_id = inner.sessions.first().map(|s| s.id);
        }
        drop(inner);

        let id_str = target.to_string();
        let _ = self.events_tx.send(MultiplexerEvent::SessionClosed { id: id_str.clone() }).await;
        Ok(id_str)
    }

    /// Rename the active Session (spec §4.6).
    pub async fn rename(&self, name: impl Into<String>) -> Result<SessionSummary, SessionError> {
        let mut inner = self.inner.write().await;
        let id = inner.active_id.ok_or_else(|| SessionError::new(ErrorCode::NotFound, "no active session"))?;
        let name = name.into();
        if let Some(entry) = inner.sessions.iter_mut().find(|s| s.id == id) {
            entry.name = name;
        }
        let summary = inner
            .sessions
            .iter()
            .find(|s| s.id == id)
            .map(|s| summarize(s, inner.active_id))
            .expect("active session exists");
        Ok(summary)
    }

    /// All Sessions, in creation order (spec §4.6).
    pub async fn list(&self) -> Vec<SessionSummary> {
        let inner = self.inner.read().await;
        inner.sessions.iter().map(|s| summarize(s, inner.active_id)).collect()
    }

    /// Send `text` to the active Session's worker (spec §4.6). Busy-ness is
    /// re-checked by the worker itself.
    pub async fn send(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let inner = self.inner.read().await;
        let id = inner.active_id.ok_or_else(|| SessionError::new(ErrorCode::NotFound, "no active session"))?;
        let entry = inner.sessions.iter().find(|s| s.id == id).expect("active session exists");
        entry.worker.send(text)
    }

    /// The active Session's id, if any.
    pub async fn active_id(&self) -> Option<String> {
        self.inner.read().await.active_id.map(|id| id.to_string())
    }

    /// The active Session's summary, if any (spec §6 `/session`, `/status`).
    pub async fn active_summary(&self) -> Option<SessionSummary> {
        let inner = self.inner.read().await;
        let id = inner.active_id?;
        inner.sessions.iter().find(|s| s.id == id).map(|s| summarize(s, inner.active_id))
    }

    /// The active Session's usage accounting, if any.
    pub async fn active_usage(&self) -> Option<crate::usage::SessionUsage> {
        let worker = {
            let inner = self.inner.read().await;
            let id = inner.active_id?;
            inner.sessions.iter().find(|s| s.id == id).map(|s| s.worker.clone())
        }?;
        Some(worker.usage().await)
    }

    /// Force-stop the active Session's child process without closing the
    /// Session itself (spec §6 `/stop`).
    pub async fn force_stop_active(&self) -> Result<(), SessionError> {
        let inner = self.inner.read().await;
        let id = inner.active_id.ok_or_else(|| SessionError::new(ErrorCode::NotFound, "no active session"))?;
        let entry = inner.sessions.iter().find(|s| s.id == id).expect("active session exists");
        entry.worker.force_stop();
        Ok(())
    }

    /// Restart the active Session's worker in place (spec §6 `/restart`).
    pub async fn restart_active(&self) -> Result<(), SessionError> {
        let inner = self.inner.read().await;
        let id = inner.active_id.ok_or_else(|| SessionError::new(ErrorCode::NotFound, "no active session"))?;
        let entry = inner.sessions.iter().find(|s| s.id == id).expect("active session exists");
        entry.worker.restart();
        Ok(())
    }
}

#[cfg(test)]
#[path = "multiplexer_tests.rs"]
mod tests;
