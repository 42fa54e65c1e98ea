// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translation between wire [`Frame`]s and the [`relay_session::Multiplexer`]
//! (spec §4.6): the multiplexer has no notion of the wire; this module is
//! the only place that does.

use relay_proto::{ErrorCode, Frame, MessageEnvelope};
use relay_session::{Multiplexer, MultiplexerEvent, SessionMessageKind};
use tracing::debug;
use uuid::Uuid;

fn now_millis() -> u64 {
    std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Handle one relayable frame from the paired peer, replying on `out` (a
/// sink back to the Hub) as appropriate.
pub async fn handle_inbound(mux: &Multiplexer, frame: Frame) -> Option<Frame> {
    match frame {
        Frame::Message { payload } => match mux.send(payload.content).await {
            Ok(()) => None,
            Err(e) => Some(Frame::SessionError { reason: e.to_string() }),
        },
        Frame::SessionList => {
            let sessions = mux.list().await;
            Some(Frame::SessionListResult { sessions })
        }
        Frame::SessionCreate { name, working_directory } => {
            match mux.create(name, working_directory.map(std::path::PathBuf::from)).await {
                Ok(session) => Some(Frame::SessionCreated { session }),
                Err(e) => Some(Frame::SessionError { reason: e.to_string() }),
            }
        }
        Frame::SessionSwitch { id_or_name } => match mux.switch(&id_or_name).await {
            Ok(session) => Some(Frame::SessionSwitched { id: session.id }),
            Err(e) => Some(Frame::SessionError { reason: e.to_string() }),
        },
        Frame::SessionDelete { id } => match mux.close(id).await {
            Ok(id) => Some(Frame::SessionDeleted { id }),
            Err(e) => Some(Frame::SessionError { reason: e.to_string() }),
        },
        other => {
            debug!(frame = ?other, "frame not handled by the session dispatcher");
            Some(Frame::Error { reason: ErrorCode::BadRequest.to_string() })
        }
    }
}

/// Translate one multiplexer event into the (at most one) wire frame it
/// produces. `Ready`/`Done`/`Exit` are operational events with no remote
/// peer-visible wire shape and are logged rather than relayed.
pub fn to_outbound_frame(event: MultiplexerEvent) -> Option<Frame> {
    match event {
        MultiplexerEvent::SessionCreated { session } => Some(Frame::SessionCreated { session }),
        MultiplexerEvent::SessionSwitched { id } => Some(Frame::SessionSwitched { id }),
        MultiplexerEvent::SessionClosed { id } => Some(Frame::SessionDeleted { id }),
        MultiplexerEvent::SessionMessage { session_id, message } => match message {
            SessionMessageKind::Text { text, .. } if !text.is_empty() => Some(Frame::Message {
                payload: MessageEnvelope {
                    id: Uuid::new_v4().to_string(),
                    content: text,
                    timestamp: now_millis(),
                    session_id,
                },
            }),
            SessionMessageKind::Error { err } => Some(Frame::SessionError { reason: err }),
            SessionMessageKind::Exit { code } => {
                debug!(session_id, ?code, "session worker exited");
                None
            }
            SessionMessageKind::Text { .. } | SessionMessageKind::Ready | SessionMessageKind::Done => {
                debug!(session_id, "session event has no wire representation");
                None
            }
        },
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
