// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Slash-command surface (spec §6): everything a chat message can ask the
//! Bridge to do besides carry text to the active Session.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start` — print help.
    Start,
    /// `/new [name] [dir]`.
    New { name: Option<String>, working_directory: Option<String> },
    /// `/switch <id|name>`.
    Switch { target: String },
    /// `/list`.
    List,
    /// `/close [id]`.
    Close { target: Option<String> },
    /// `/rename <name>`.
    Rename { name: String },
    /// `/session` — usage info for the active session.
    Session,
    /// `/status`.
    Status,
    /// `/stop` — force-stop the active worker and clear the queue.
    Stop,
    /// `/restart` — restart the active worker and clear the queue.
    Restart,
    /// Recognized leading `/word` with no matching command.
    Unknown { raw: String },
}

/// Parse a chat message into a [`Command`], or `None` if it's plain text
/// that should be routed to the active Session as a user message.
pub fn parse(text: &str) -> Option<Command> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let mut parts = text.split_whitespace();
    let cmd = parts.next().unwrap_or("");
    let rest: Vec<&str> = parts.collect();

    Some(match cmd {
        "/start" => Command::Start,
        "/new" => Command::New { name: rest.first().map(|s| s.to_string()), working_directory: rest.get(1).map(|s| s.to_string()) },
        "/switch" => match rest.first() {
            Some(target) => Command::Switch { target: target.to_string() },
            None => Command::Unknown { raw: cmd.trim_start_matches('/').to_owned() },
        },
        "/list" => Command::List,
        "/close" => Command::Close { target: rest.first().map(|s| s.to_string()) },
        "/rename" if !rest.is_empty() => Command::Rename { name: rest.join(" ") },
        "/rename" => Command::Unknown { raw: cmd.trim_start_matches('/').to_owned() },
        "/session" => Command::Session,
        "/status" => Command::Status,
        "/stop" => Command::Stop,
        "/restart" => Command::Restart,
        other => Command::Unknown { raw: other.trim_start_matches('/').to_owned() },
    })
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
