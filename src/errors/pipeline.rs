// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural errors returned synchronously by pipeline operations.

use std::time::Duration;

use thiserror::Error;

use crate::engine::PipelineState;

/// Errors surfaced to the caller of a lifecycle or submission operation.
///
/// Business failures inside a stage are never reported here; they are routed
/// to the pipeline's on-fail callback as a [`StageError`](crate::errors::StageError).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The pipeline is draining or closed and refuses further work
    #[error("pipeline is closed")]
    Closed,

    /// `run` was called before any stage was added
    #[error("pipeline has no stages")]
    NoStages,

    /// The entry queue stayed full for the whole submission timeout
    #[error("submission timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    /// `run` was called on a pipeline that is already running
    #[error("pipeline is already running")]
    AlreadyRunning,

    /// An operation was attempted in a state that does not allow it
    #[error("cannot {operation} while pipeline is {state}")]
    InvalidState {
        operation: &'static str,
        state: PipelineState,
    },

    /// `run` was called outside of a tokio runtime
    #[error("no tokio runtime available to spawn pipeline workers")]
    NoRuntime,
}
