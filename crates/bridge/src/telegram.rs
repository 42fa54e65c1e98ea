// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Teloxide wiring: the only module aware of `teloxide::Bot`/`ChatId`. It
//! translates inbound messages to [`Bridge::handle_message`] calls and
//! forwards `MultiplexerEvent`s as outbound chat messages (spec §4.10).

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use relay_session::{MultiplexerEvent, SessionMessageKind};

use crate::dispatch::Bridge;

#[derive(Clone)]
struct BotState {
    bridge: Arc<Bridge>,
}

/// Build the bot and run its dispatcher until `shutdown` fires, forwarding
/// Session events to every authenticated operator as they arrive.
pub async fn run(bot_token: &str, bridge: Arc<Bridge>, mut events_rx: mpsc::Receiver<MultiplexerEvent>, shutdown: CancellationToken) -> anyhow::Result<()> {
    let bot = Bot::new(bot_token);
    let state = BotState { bridge: Arc::clone(&bridge) };

    let forwarder_bot = bot.clone();
    let forwarder_bridge = Arc::clone(&bridge);
    let forwarder_shutdown = shutdown.clone();
    let forwarder = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = forwarder_shutdown.cancelled() => return,
                event = events_rx.recv() => {
                    match event {
                        Some(event) => forward_event(&forwarder_bot, &forwarder_bridge, event).await,
                        None => return,
                    }
                }
            }
        }
    });

    let handler = Update::filter_message().endpoint({
        let state = state.clone();
        move |bot: Bot, msg: Message| {
            let state = state.clone();
            async move { handle_message(bot, msg, state).await }
        }
    });

    tokio::select! {
        _ = shutdown.cancelled() => {}
        _ = Dispatcher::builder(bot, handler).build().dispatch() => {}
    }

    forwarder.abort();
    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: BotState) -> anyhow::Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let chat_id = msg.chat.id;

    let replies = state.bridge.handle_message(chat_id.0, text).await;
    for reply in replies {
        send(&bot, chat_id, &reply).await;
    }
    Ok(())
}

/// Worker output arriving outside of a direct reply (`text`/`error`/`exit`
/// events, and the `done` event that drains the backlog) is pushed to every
/// authenticated operator.
async fn forward_event(bot: &Bot, bridge: &Bridge, event: MultiplexerEvent) {
    let MultiplexerEvent::SessionMessage { session_id, message } = event else {
        return;
    };

    let text = match message {
        SessionMessageKind::Text { text, .. } => text,
        SessionMessageKind::Error { err } => format!("error: {err}"),
        SessionMessageKind::Exit { code } => format!("session exited (code {code:?}), restarting..."),
        SessionMessageKind::Done => {
            bridge.on_session_done().await;
            return;
        }
        SessionMessageKind::Ready => return,
    };

    let label = bridge.session_label(&session_id).await;
    let tagged = format!("[{label}] {text}");

    let operators = bridge.authenticated_operators().await;
    for operator_id in operators {
        for chunk in bridge.format_outbound(&tagged) {
            send(bot, ChatId(operator_id), &chunk).await;
        }
    }
}

/// Send with HTML markup, falling back to plain text on failure (spec §4.10).
async fn send(bot: &Bot, chat_id: ChatId, text: &str) {
    let escaped = relay_proto::codec::escape_html(text);
    if bot.send_message(chat_id, escaped).parse_mode(ParseMode::Html).await.is_err() {
        if let Err(e) = bot.send_message(chat_id, text).await {
            warn!(%chat_id, error = %e, "failed to deliver chat message");
        }
    }
}
