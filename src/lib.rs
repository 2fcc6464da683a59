// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // stage/submit options + file-driven pipelines
pub mod engine;     // pipeline, stage workers, collector
pub mod errors;     // error handling
pub mod observability;
pub mod traits;     // transform abstraction
pub mod transforms; // built-in transforms + registry

pub use config::{StageOptions, SubmitOptions};
pub use engine::{ControlSignal, Packet, Pipeline, PipelineState, StatsSnapshot};
pub use errors::{PipelineError, StageError};
pub use traits::{from_fn, Transform};
