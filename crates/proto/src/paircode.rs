// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pair-code alphabet, generation, and normalisation (spec §4.1).
//!
//! The canonical form is human-typed and therefore forgiving: separators
//! are cosmetic and case does not matter. [`normalize`] is the single place
//! that forgiveness is implemented, so `confirm(code) == confirm(normalize(code))`
//! holds by construction rather than by convention.

use rand::Rng;

/// 32 symbols, excluding the visually ambiguous `0 O 1 I`.
const ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// The two valid code lengths. An implementation MUST pick one at build
/// time (spec §4.1); the Hub's [`crate::paircode::PairCodeLength`] config
/// knob is that choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairCodeLength {
    /// Cloud variant: 8 symbols, rendered as `XXXX-XXXX`.
    Canonical,
    /// Embedded/LAN variant: 4 symbols, no separator.
    Compact,
}

impl PairCodeLength {
    fn symbol_count(self) -> usize {
        match self {
            Self::Canonical => 8,
            Self::Compact => 4,
        }
    }
}

/// Generate a fresh pair code of the given length using `rng`.
pub fn generate(rng: &mut impl Rng, length: PairCodeLength) -> String {
    let symbols: String = (0..length.symbol_count())
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect();

    match length {
        PairCodeLength::Canonical => format!("{}-{}", &symbols[0..4], &symbols[4..8]),
        PairCodeLength::Compact => symbols,
    }
}

/// Strip non-alphanumerics and uppercase, so `abcd-efgh`, `ABCDEFGH`, and
/// `abcdefgh` all resolve to the same lookup key.
pub fn normalize(code: &str) -> String {
    code.chars().filter(|c| c.is_alphanumeric()).collect::<String>().to_uppercase()
}

#[cfg(test)]
#[path = "paircode_tests.rs"]
mod tests;
