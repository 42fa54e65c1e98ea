// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream WebSocket handler: the single socket a Desktop Agent or phone
//! keeps open with the Hub for the life of its session (spec §4.2-§4.3).

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use relay_proto::{Frame, Role};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::dispatcher;
use crate::registry::Connection;
use crate::state::HubState;

/// `GET /ws` — upgrade, then hold the socket open until auth, relay, or
/// disconnect.
pub async fn ws_handler(State(state): State<Arc<HubState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

async fn handle_ws(socket: WebSocket, state: Arc<HubState>) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let conn = match authenticate(&mut ws_tx, &mut ws_rx).await {
        Some((device_id, role)) => {
            let (outbox_tx, outbox_rx) = mpsc::unbounded_channel();
            let conn = Connection::new(device_id.clone(), role, outbox_tx);
            if let Some(displaced) = state.registry.insert(Arc::clone(&conn)).await {
                info!(device_id = %device_id, "second auth displaces prior connection");
                displaced.cancel.cancel();
            }
            if send_frame(&mut ws_tx, Frame::AuthSuccess { device_id: device_id.clone() }).await.is_err() {
                state.registry.remove_if_current(&device_id, &conn).await;
                return;
            }
            spawn_writer(ws_tx, outbox_rx);
            conn
        }
        None => return,
    };

    info!(device_id = %conn.device_id, "connection authenticated");

    loop {
        tokio::select! {
            _ = conn.cancel.cancelled() => break,
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<Frame>(&text) {
                            Ok(frame) => dispatcher::handle(&state, &conn, frame).await,
                            Err(e) => {
                                warn!(device_id = %conn.device_id, err = %e, "malformed frame");
                                conn.send(Frame::Error { reason: "malformed frame".to_owned() });
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    dispatcher::notify_peer_offline(&state, &conn).await;
    state.registry.remove_if_current(&conn.device_id, &conn).await;
    conn.cancel.cancel();
}

/// Read frames until a well-formed `auth` frame authenticates the
/// connection, replying `auth_error` (and continuing to read) for anything
/// else (spec §4.3).
async fn authenticate(
    ws_tx: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    ws_rx: &mut (impl StreamExt<Item = Result<Message, axum::Error>> + Unpin),
) -> Option<(String, Role)> {
    loop {
        let msg = ws_rx.next().await?;
        let Ok(Message::Text(text)) = msg else {
            if matches!(msg, Ok(Message::Close(_))) {
                return None;
            }
            continue;
        };

        match serde_json::from_str::<Frame>(&text) {
            Ok(Frame::Auth { token }) => match parse_auth_token(&token) {
                Some((device_id, role)) => return Some((device_id, role)),
                None => {
                    warn!("rejected malformed auth token");
                    if send_frame(ws_tx, Frame::AuthError { reason: "malformed auth token".to_owned() })
                        .await
                        .is_err()
                    {
                        return None;
                    }
                }
            },
            _ => {
                if send_frame(ws_tx, Frame::AuthError { reason: "not authenticated".to_owned() }).await.is_err() {
                    return None;
                }
            }
        }
    }
}

/// `"deviceId:deviceName:role"` (spec §4.3). `deviceName` is accepted but
/// not retained by the Hub — it only matters to the human pairing UI.
fn parse_auth_token(token: &str) -> Option<(String, Role)> {
    let mut parts = token.splitn(3, ':');
    let device_id = parts.next()?.to_owned();
    let _device_name = parts.next()?;
    let role = Role::parse(parts.next()?)?;
    if device_id.is_empty() {
        return None;
    }
    Some((device_id, role))
}

async fn send_frame(
    ws_tx: &mut (impl SinkExt<Message, Error = axum::Error> + Unpin),
    frame: Frame,
) -> Result<(), axum::Error> {
    let text = serde_json::to_string(&frame).unwrap_or_else(|_| "{}".to_owned());
    ws_tx.send(Message::Text(text.into())).await
}

fn spawn_writer(
    mut ws_tx: futures_util::stream::SplitSink<WebSocket, Message>,
    mut outbox_rx: mpsc::UnboundedReceiver<Frame>,
) {
    tokio::spawn(async move {
        while let Some(frame) = outbox_rx.recv().await {
            if send_frame(&mut ws_tx, frame).await.is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
