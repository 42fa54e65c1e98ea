// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Agent's single WebSocket connection to the Hub: authenticate, pair
//! or rejoin, then relay frames between the Hub and the Session
//! multiplexer until the connection drops, reconnecting with backoff.

use std::path::PathBuf;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use relay_proto::Frame;
use relay_session::{Multiplexer, MultiplexerEvent};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::dispatch;
use crate::identity::{self, Identity};

pub struct ConnectionConfig {
    pub hub_url: String,
    pub ws_url: String,
    pub identity_path: PathBuf,
}

/// Connect, authenticate, pair-or-rejoin, and relay frames until told to
/// stop, reconnecting with exponential backoff on every drop (grounded on
/// the same pattern the desktop mux's upstream bridge uses).
pub async fn run(
    config: ConnectionConfig,
    mut identity: Identity,
    mux: Multiplexer,
    mut mux_events: mpsc::Receiver<MultiplexerEvent>,
    cancel: CancellationToken,
) {
    let mut backoff = Duration::from_millis(500);
    let max_backoff = Duration::from_secs(30);
    let http = reqwest::Client::new();

    loop {
        if cancel.is_cancelled() {
            return;
        }

        match connect_and_serve(&config, &http, &mut identity, &mux, &mut mux_events, &cancel).await {
            Ok(()) => {
                info!("hub connection closed cleanly");
                backoff = Duration::from_millis(500);
            }
            Err(e) => {
                warn!(err = %e, "hub connection lost, retrying");
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(backoff) => {}
        }
        backoff = (backoff * 2).min(max_backoff);
    }
}

async fn connect_and_serve(
    config: &ConnectionConfig,
    http: &reqwest::Client,
    identity: &mut Identity,
    mux: &Multiplexer,
    mux_events: &mut mpsc::Receiver<MultiplexerEvent>,
    cancel: &CancellationToken,
) -> anyhow::Result<()> {
    let (stream, _) = tokio_tungstenite::connect_async(&config.ws_url).await?;
    let (mut ws_tx, mut ws_rx) = stream.split();

    send(&mut ws_tx, &Frame::Auth { token: format!("{}:{}:desktop", identity.device_id, identity.device_name) })
        .await?;
    match recv(&mut ws_rx).await? {
        Some(Frame::AuthSuccess { .. }) => {}
        Some(Frame::AuthError { reason }) => anyhow::bail!("hub rejected auth: {reason}"),
        other => anyhow::bail!("expected auth_success, got {other:?}"),
    }
    info!(device_id = %identity.device_id, "authenticated with hub");

    if let Some(room_id) = identity.room_id.clone() {
        send(&mut ws_tx, &Frame::Rejoin { room_id }).await?;
    } else {
        let code = crate::pairing::request_pair_code(http, &config.hub_url, &identity.device_id, &identity.device_name)
            .await?;
        info!(code = %code, "waiting to be paired");
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),

            frame = recv(&mut ws_rx) => {
                match frame? {
                    Some(Frame::Paired { room_id }) => {
                        identity::remember_room(&config.identity_path, identity, room_id.clone())?;
                        info!(room_id = %room_id, "paired");
                    }
                    Some(Frame::RejoinSuccess { room_id, peer_online }) => {
                        identity::remember_room(&config.identity_path, identity, room_id.clone())?;
                        info!(room_id = %room_id, peer_online, "rejoined room");
                    }
                    Some(Frame::RejoinFailed { reason }) => {
                        warn!(reason = %reason, "rejoin failed, will re-pair");
                        identity::forget_room(&config.identity_path, identity)?;
                    }
                    Some(Frame::PeerOffline) => debug!("peer went offline"),
                    Some(Frame::Unpaired) => {
                        info!("unpaired by hub");
                        identity.room_id = None;
                    }
                    Some(frame) if frame.is_relayable() => {
                        if let Some(reply) = dispatch::handle_inbound(mux, frame).await {
                            send(&mut ws_tx, &reply).await?;
                        }
                    }
                    Some(Frame::Error { reason }) => warn!(reason = %reason, "hub reported an error"),
                    Some(other) => debug!(frame = ?other, "unhandled frame from hub"),
                    None => return Ok(()),
                }
            }

            event = mux_events.recv() => {
                match event {
                    Some(event) => {
                        if let Some(frame) = dispatch::to_outbound_frame(event) {
                            send(&mut ws_tx, &frame).await?;
                        }
                    }
                    None => anyhow::bail!("session multiplexer event channel closed"),
                }
            }
        }
    }
}

type WsSink = futures_util::stream::SplitSink<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
    WsMessage,
>;
type WsSource = futures_util::stream::SplitStream<
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>,
>;

async fn send(tx: &mut WsSink, frame: &Frame) -> anyhow::Result<()> {
    let text = serde_json::to_string(frame)?;
    tx.send(WsMessage::Text(text.into())).await?;
    Ok(())
}

async fn recv(rx: &mut WsSource) -> anyhow::Result<Option<Frame>> {
    loop {
        match rx.next().await {
            Some(Ok(WsMessage::Text(text))) => return Ok(Some(serde_json::from_str(&text)?)),
            Some(Ok(WsMessage::Close(_))) | None => return Ok(None),
            Some(Ok(_)) => continue,
            Some(Err(e)) => return Err(e.into()),
        }
    }
}

// Protocol-level coverage (auth, pair, rejoin, relay) lives in
// tests/integration.rs against a real loopback Hub (spec §7.4).
