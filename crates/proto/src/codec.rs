// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text framing for size-limited channels (spec §4.10).
//!
//! The direct-web variant forwards `content` unbounded; the Bridge's
//! chat-front-end variant has a hard per-message character cap and must
//! split. [`chunk`] implements the split policy once so both variants
//! agree on chunk boundaries.

/// Split `text` into chunks no longer than `max_chars`, each prefixed with
/// `[i/N]\n`. Returns a single chunk with no prefix if `text` already fits.
///
/// Split policy, in order of preference:
/// 1. the last newline within the window
/// 2. the last whitespace past the halfway mark
/// 3. a hard cut at `max_chars`
pub fn chunk(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_owned()];
    }

    let chars: Vec<char> = text.chars().collect();
    let mut pieces: Vec<String> = Vec::new();
    let mut start = 0usize;

    while start < chars.len() {
        let remaining = chars.len() - start;
        if remaining <= max_chars {
            pieces.push(chars[start..].iter().collect());
            break;
        }

        let window = &chars[start..start + max_chars];
        let split_at = last_newline(window)
            .or_else(|| last_whitespace_past_half(window))
            .unwrap_or(max_chars);

        let end = start + split_at.max(1);
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }

    let total = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, piece)| format!("[{}/{total}]\n{piece}", i + 1))
        .collect()
}

fn last_newline(window: &[char]) -> Option<usize> {
    window.iter().rposition(|&c| c == '\n').map(|i| i + 1)
}

fn last_whitespace_past_half(window: &[char]) -> Option<usize> {
    let half = window.len() / 2;
    window.iter().enumerate().rev().find(|(i, c)| *i >= half && c.is_whitespace()).map(|(i, _)| i + 1)
}

/// Escape `&`, `<`, `>` for channels that accept inline HTML markup. Order
/// matters: `&` must be escaped first or the other replacements would be
/// re-escaped.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
