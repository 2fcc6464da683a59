// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod options;
mod runtime;
mod validation;

pub mod consts;

pub use loader::{load_and_validate_config, load_config, PipelineConfig, StageConfig, SubmitConfig};
pub use options::{StageOptions, SubmitOptions};
pub use runtime::PipelineBuilder;
pub use validation::validate_pipeline_config;
