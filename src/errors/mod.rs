// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod pipeline;
mod stage;

pub use config::{ConfigError, ValidationError};
pub use pipeline::PipelineError;
pub use stage::StageError;
