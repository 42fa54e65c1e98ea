// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop-side Session multiplexer and Session worker (spec §4.6, §4.7).
//!
//! A `Multiplexer` owns a set of `Session`s, each backed by a `Worker` that
//! drives one persistent assistant-CLI child process. Callers (the Agent's
//! frame dispatcher, the Bridge) talk to a `Multiplexer`; the wire framing
//! that carries its events to a remote peer lives elsewhere.

pub mod error;
pub mod multiplexer;
pub mod stream;
pub mod usage;
pub mod worker;

pub use error::SessionError;
pub use multiplexer::{Multiplexer, MultiplexerConfig, MultiplexerEvent, SessionMessageKind};
pub use usage::{SessionUsage, UsageDelta};
pub use worker::{MessageSubtype, Worker, WorkerConfig, WorkerEvent};
