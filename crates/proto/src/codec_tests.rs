// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn short_text_is_not_chunked() {
    let out = chunk("hello", 4000);
    assert_eq!(out, vec!["hello".to_owned()]);
}

#[test]
fn long_text_splits_on_last_newline_in_window() {
    let text = format!("{}\n{}", "a".repeat(8), "b".repeat(8));
    let out = chunk(&text, 10);
    assert_eq!(out.len(), 2);
    assert!(out[0].starts_with("[1/2]\n"));
    assert!(out[1].starts_with("[2/2]\n"));
    assert!(out[0].ends_with('\n'));
}

#[test]
fn falls_back_to_whitespace_past_half_without_newline() {
    let text = format!("{} {}", "a".repeat(6), "b".repeat(6));
    let out = chunk(&text, 10);
    assert_eq!(out.len(), 2);
    assert!(out[0].ends_with(' ') || out[0].chars().last().unwrap().is_whitespace());
}

#[test]
fn hard_cut_when_no_break_point_exists() {
    let text = "a".repeat(25);
    let out = chunk(&text, 10);
    assert!(out.len() >= 3);
    for piece in &out {
        let body = piece.splitn(2, '\n').nth(1).unwrap();
        assert!(body.chars().count() <= 10);
    }
}

#[test]
fn chunks_reassemble_to_original_text() {
    let text = "line one\nline two is a bit longer than the rest\nline three";
    let out = chunk(text, 15);
    let reassembled: String =
        out.iter().map(|p| p.splitn(2, '\n').nth(1).unwrap()).collect();
    assert_eq!(reassembled, text);
}

#[test]
fn escape_html_order_prevents_double_escaping() {
    assert_eq!(escape_html("a & b"), "a &amp; b");
    assert_eq!(escape_html("<tag>"), "&lt;tag&gt;");
    assert_eq!(escape_html("&lt;"), "&amp;lt;");
}
