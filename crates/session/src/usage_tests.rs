// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extracts_usage_and_cost_from_result_message() {
    let json = serde_json::json!({
        "type": "result",
        "total_cost_usd": 0.0123,
        "usage": {
            "input_tokens": 10,
            "output_tokens": 20,
            "cache_read_input_tokens": 5,
            "cache_creation_input_tokens": 1,
        }
    });
    let delta = extract_usage_delta(&json).unwrap();
    assert_eq!(delta.input_tokens, 10);
    assert_eq!(delta.output_tokens, 20);
    assert_eq!(delta.cache_read_input_tokens, 5);
    assert_eq!(delta.cache_creation_input_tokens, 1);
    assert!((delta.total_cost_usd - 0.0123).abs() < f64::EPSILON);
}

#[test]
fn missing_usage_object_returns_none() {
    let json = serde_json::json!({"type": "system", "subtype": "init"});
    assert!(extract_usage_delta(&json).is_none());
}

#[test]
fn accumulate_sums_across_turns() {
    let mut usage = SessionUsage::default();
    usage.accumulate(&UsageDelta { input_tokens: 10, output_tokens: 5, ..Default::default() });
    usage.accumulate(&UsageDelta { input_tokens: 3, output_tokens: 2, ..Default::default() });
    assert_eq!(usage.input_tokens, 13);
    assert_eq!(usage.output_tokens, 7);
    assert_eq!(usage.turn_count, 2);
}
