// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Every diagnostic the engine emits goes through a message struct defined in
//! [`messages`]. Each struct implements `Display` for the human-readable line
//! and [`messages::StructuredLog`] to emit the event with typed fields at its
//! documented level. Call sites therefore never format log strings themselves.
//!
//! # Usage
//!
//! ```rust
//! use the_sluice::observability::messages::{stage::WorkerStarted, StructuredLog};
//!
//! let msg = WorkerStarted {
//!     pipeline: "ingest",
//!     stage: "parse",
//!     worker: 0,
//! };
//!
//! msg.log();
//! ```
//!
//! Installing a subscriber is left to the binary (see `main.rs`), which uses
//! `tracing-subscriber` with an `EnvFilter` driven by `RUST_LOG`.

pub mod messages;
