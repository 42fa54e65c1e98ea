// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Declared role of a device. Never inferred by the Hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Desktop,
    /// Covers both the phone browser UI and a chat-bot front-end; the
    /// Hub only ever sees "the non-desktop side of the room".
    Phone,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Phone => "phone",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "desktop" => Some(Self::Desktop),
            "phone" | "web" => Some(Self::Phone),
            _ => None,
        }
    }

    pub fn is_opposite(&self, other: Role) -> bool {
        *self != other
    }
}

/// User-visible content carried between the two peers of a Room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEnvelope {
    pub id: String,
    pub content: String,
    pub timestamp: u64,
    pub session_id: String,
}

/// A row of the Session multiplexer's `list` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: String,
    pub name: String,
    pub working_directory: String,
    pub status: String,
    pub is_active: bool,
    pub message_count: u64,
    pub running_minutes: u64,
}

/// Every frame the Hub, Agent, or Bridge may send or receive, tagged by
/// `type` on the wire. Unknown `type` values fail to deserialize, which the
/// dispatcher treats as a protocol violation (§8 of the spec).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    // -- inbound to the Hub ---------------------------------------------
    Auth {
        token: String,
    },
    Ping,
    Rejoin {
        room_id: String,
    },
    Message {
        payload: MessageEnvelope,
    },
    SessionList,
    SessionListResult {
        sessions: Vec<SessionSummary>,
    },
    SessionCreate {
        name: Option<String>,
        working_directory: Option<String>,
    },
    SessionCreated {
        session: SessionSummary,
    },
    SessionSwitch {
        id_or_name: String,
    },
    SessionSwitched {
        id: String,
    },
    SessionDelete {
        id: Option<String>,
    },
    SessionDeleted {
        id: String,
    },
    SessionError {
        reason: String,
    },

    // -- outbound from the Hub -------------------------------------------
    AuthSuccess {
        device_id: String,
    },
    AuthError {
        reason: String,
    },
    Pong,
    Paired {
        room_id: String,
    },
    RejoinSuccess {
        room_id: String,
        peer_online: bool,
    },
    RejoinFailed {
        reason: String,
    },
    PeerOffline,
    Unpaired,
    Error {
        reason: String,
    },
}

impl Frame {
    /// True for frames the dispatcher relays unchanged rather than
    /// originating itself (§4.3: `message` and all `session_*` frames).
    pub fn is_relayable(&self) -> bool {
        matches!(
            self,
            Frame::Message { .. }
                | Frame::SessionList
                | Frame::SessionListResult { .. }
                | Frame::SessionCreate { .. }
                | Frame::SessionCreated { .. }
                | Frame::SessionSwitch { .. }
                | Frame::SessionSwitched { .. }
                | Frame::SessionDelete { .. }
                | Frame::SessionDeleted { .. }
                | Frame::SessionError { .. }
        )
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
