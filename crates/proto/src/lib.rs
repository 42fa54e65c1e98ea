// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol shared by the Hub, the Desktop Agent, and the Bridge.
//!
//! Nothing here talks to a socket. This crate only defines the JSON shapes
//! relayed between peers and the small pieces of pure logic (pair-code
//! normalisation, directory-scope containment, text chunking) that both
//! sides need to agree on byte-for-byte.

pub mod codec;
pub mod dirguard;
pub mod error;
pub mod frame;
pub mod paircode;

pub use error::ErrorCode;
pub use frame::{Frame, MessageEnvelope, Role, SessionSummary};
