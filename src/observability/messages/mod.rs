// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `pipeline` - lifecycle, submission and terminal collection events
//! * `stage` - worker pool and control-signal resolution events
//! * `validation` - configuration validation warnings and errors

use std::fmt::Display;

use tracing::Span;

pub mod pipeline;
pub mod stage;
pub mod validation;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
