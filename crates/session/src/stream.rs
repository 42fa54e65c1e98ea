// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Classification of the child CLI's stream-json stdout lines (spec §4.7,
//! strategy A). Pure functions only; the worker owns the I/O.

use serde_json::Value;

use crate::usage::{extract_usage_delta, UsageDelta};

/// One classified stream-json line.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamMessage {
    /// `system` with `subtype: "init"` — the provider's session id and model.
    Init { provider_session_id: Option<String>, model: Option<String> },
    /// `assistant` — concatenated `text`-type content blocks, if any.
    AssistantText(String),
    /// `result` — turn complete; usage/cost if present.
    Result { usage: Option<UsageDelta> },
    /// Anything else recognised-but-uninteresting (e.g. `assistant` with no
    /// text blocks, tool-use-only turns).
    Other,
}

/// Classify one parsed stream-json line. Returns `None` for lines missing
/// the `type` discriminant entirely (malformed, not a protocol error on
/// its own — the caller decides whether to warn).
pub fn classify(json: &Value) -> Option<StreamMessage> {
    let ty = json.get("type")?.as_str()?;
    match ty {
        "system" if json.get("subtype").and_then(Value::as_str) == Some("init") => {
            Some(StreamMessage::Init {
                provider_session_id: json
                    .get("session_id")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                model: json.get("model").and_then(Value::as_str).map(str::to_owned),
            })
        }
        "system" => Some(StreamMessage::Other),
        "assistant" => match extract_assistant_text(json) {
            Some(text) => Some(StreamMessage::AssistantText(text)),
            None => Some(StreamMessage::Other),
        },
        "result" => Some(StreamMessage::Result { usage: extract_usage_delta(json) }),
        _ => Some(StreamMessage::Other),
    }
}

/// Concatenate the `text` of every `type: "text"` content block in an
/// `assistant` message. `None` if there are no text blocks (e.g. a
/// tool-use-only turn).
fn extract_assistant_text(json: &Value) -> Option<String> {
    let content = json.get("message")?.get("content")?.as_array()?;
    let texts: Vec<&str> = content
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();
    if texts.is_empty() {
        return None;
    }
    Some(texts.join("\n"))
}

/// Build the single JSON line written to the child's stdin for a user
/// message (spec §4.7).
pub fn encode_user_message(text: &str) -> String {
    serde_json::json!({
        "type": "user",
        "message": { "role": "user", "content": text },
    })
    .to_string()
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
