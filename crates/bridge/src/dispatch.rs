// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridge core: the transport-agnostic policy that ties the password gate
//! (spec §4.8), the backlog queue (spec §4.9), the slash-command surface
//! (spec §6), and the Session multiplexer together. Nothing here knows
//! about Telegram; that lives in [`crate::telegram`].

use relay_proto::ErrorCode;
use relay_session::Multiplexer;

use crate::auth::{AuthGate, AuthState};
use crate::commands::{self, Command};
use crate::queue::MessageQueue;

const PASSWORD_PROMPT: &str = "\u{1f510} please enter password";

pub struct Bridge {
    mux: Multiplexer,
    auth: AuthGate,
    queue: MessageQueue,
    chunk_size: usize,
}

impl Bridge {
    pub fn new(mux: Multiplexer, shared_secret: impl Into<String>, chunk_size: usize) -> Self {
        Self { mux, auth: AuthGate::new(shared_secret), queue: MessageQueue::new(), chunk_size }
    }

    /// Handle one inbound chat message from `operator_id`. Returns the
    /// reply text(s), already chunked (spec §4.10).
    pub async fn handle_message(&self, operator_id: i64, text: &str) -> Vec<String> {
        let text = text.trim();
        let is_command = text.starts_with('/');

        match self.auth.state(operator_id).await {
            AuthState::Unseen => {
                self.auth.mark_prompted(operator_id).await;
                return self.reply(PASSWORD_PROMPT.to_owned());
            }
            AuthState::Prompted if is_command => {
                return self.reply("please authenticate first".to_owned());
            }
            AuthState::Prompted => {
                return if self.auth.try_authenticate(operator_id, text).await {
                    self.reply("authenticated".to_owned())
                } else {
                    self.reply(PASSWORD_PROMPT.to_owned())
                };
            }
            AuthState::Authenticated => {}
        }

        match commands::parse(text) {
            Some(cmd) => self.reply(self.handle_command(cmd).await),
            None => self.route_text(text.to_owned()).await,
        }
    }

    /// Drain one queued message on the active Session's `done` event (spec
    /// §4.9). Must be called from the same task context that processes
    /// incoming operator messages, per the concurrency model (spec §5).
    pub async fn on_session_done(&self) {
        if let Some(text) = self.queue.pop().await {
            let _ = self.mux.send(text).await;
        }
    }

    /// Operators currently admitted, for addressing proactive worker output
    /// that isn't sent in direct reply to an inbound message.
    pub async fn authenticated_operators(&self) -> Vec<i64> {
        self.auth.authenticated_operators().await
    }

    /// Chunk a proactively-pushed piece of worker output the same way a
    /// direct reply would be (spec §4.10).
    pub fn format_outbound(&self, text: &str) -> Vec<String> {
        relay_proto::codec::chunk(text, self.chunk_size)
    }

    /// The Session's name for per-session output tagging (spec §1), falling
    /// back to its id if it has since been closed.
    pub async fn session_label(&self, session_id: &str) -> String {
        self.mux.list().await.into_iter().find(|s| s.id == session_id).map(|s| s.name).unwrap_or_else(|| session_id.to_owned())
    }

    async fn route_text(&self, text: String) -> Vec<String> {
        match self.mux.send(text.clone()).await {
            Ok(()) => Vec::new(),
            Err(e) if e.code == ErrorCode::Busy => {
                self.queue.push(text).await;
                self.reply("queued".to_owned())
            }
            Err(e) => self.reply(e.to_string()),
        }
    }

    async fn handle_command(&self, cmd: Command) -> String {
        match cmd {
            Command::Start => HELP_TEXT.to_owned(),
            Command::New { name, working_directory } => {
                match self.mux.create(name, working_directory.map(std::path::PathBuf::from)).await {
                    Ok(session) => format!("created session {} ({})", session.name, session.id),
                    Err(e) => e.to_string(),
                }
            }
            Command::Switch { target } => match self.mux.switch(&target).await {
                Ok(session) => {
                    self.queue.clear().await;
                    format!("switched to {} ({})", session.name, session.id)
                }
                Err(e) => e.to_string(),
            },
            Command::List => {
                let sessions = self.mux.list().await;
                if sessions.is_empty() {
                    "no sessions".to_owned()
                } else {
                    sessions
                        .iter()
                        .map(|s| format!("{}{} {} [{}] - {} msgs", if s.is_active { "* " } else { "  " }, s.id, s.name, s.status, s.message_count))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Command::Close { target } => {
                self.queue.clear().await;
                match self.mux.close(target).await {
                    Ok(id) => format!("closed session {id}"),
                    Err(e) => e.to_string(),
                }
            }
            Command::Rename { name } => match self.mux.rename(name).await {
                Ok(session) => format!("renamed to {}", session.name),
                Err(e) => e.to_string(),
            },
            Command::Session => match self.mux.active_summary().await {
                Some(s) => {
                    let usage = self.mux.active_usage().await.unwrap_or_default();
                    format!(
                        "{} ({})\nstatus: {}\nmessages: {}\ncost: ${:.4}",
                        s.name, s.id, s.status, s.message_count, usage.total_cost_usd
                    )
                }
                None => "no active session".to_owned(),
            },
            Command::Status => {
                let sessions = self.mux.list().await;
                format!("{} session(s) open", sessions.len())
            }
            Command::Stop => {
                self.queue.clear().await;
                match self.mux.force_stop_active().await {
                    Ok(()) => "stopped".to_owned(),
                    Err(e) => e.to_string(),
                }
            }
            Command::Restart => {
                self.queue.clear().await;
                match self.mux.restart_active().await {
                    Ok(()) => "restarting".to_owned(),
                    Err(e) => e.to_string(),
                }
            }
            Command::Unknown { raw } => format!("unknown command: {raw}. Try /start."),
        }
    }

    fn reply(&self, text: String) -> Vec<String> {
        relay_proto::codec::chunk(&text, self.chunk_size)
    }
}

const HELP_TEXT: &str = "/new [name] [dir] - open a session\n\
/switch <id|name> - change the active session\n\
/list - list open sessions\n\
/close [id] - close a session\n\
/rename <name> - rename the active session\n\
/session - active session info\n\
/status - overall status\n\
/stop - force-stop the active worker\n\
/restart - restart the active worker\n\
Anything else is sent to the active session.";

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
