// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker usage accounting (spec §4.7): accumulated from each `result`
//! message's `usage` object and `total_cost_usd`, reset only by `restart()`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Cumulative usage counters for one Session worker's lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_input_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub total_cost_usd: f64,
    pub turn_count: u64,
}

impl SessionUsage {
    pub fn accumulate(&mut self, delta: &UsageDelta) {
        self.input_tokens += delta.input_tokens;
        self.output_tokens += delta.output_tokens;
        self.cache_read_input_tokens += delta.cache_read_input_tokens;
        self.cache_creation_input_tokens += delta.cache_creation_input_tokens;
        self.total_cost_usd += delta.total_cost_usd;
        self.turn_count += 1;
    }
}

/// Usage extracted from a single `result` stream-json message.
#[derive(Debug, Clone, Default)]
pub struct UsageDelta {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_input_tokens: u64,
    pub cache_creation_input_tokens: u64,
    pub total_cost_usd: f64,
}

/// Extract a [`UsageDelta`] from a `type: "result"` stream-json line.
/// Returns `None` if the entry carries no `usage` object.
pub fn extract_usage_delta(json: &Value) -> Option<UsageDelta> {
    let usage = json.get("usage")?;
    Some(UsageDelta {
        input_tokens: usage.get("input_tokens").and_then(Value::as_u64).unwrap_or(0),
        output_tokens: usage.get("output_tokens").and_then(Value::as_u64).unwrap_or(0),
        cache_read_input_tokens: usage
            .get("cache_read_input_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        cache_creation_input_tokens: usage
            .get("cache_creation_input_tokens")
            .and_then(Value::as_u64)
            .unwrap_or(0),
        total_cost_usd: json.get("total_cost_usd").and_then(Value::as_f64).unwrap_or(0.0),
    })
}

#[cfg(test)]
#[path = "usage_tests.rs"]
mod tests;
