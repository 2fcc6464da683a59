// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{validate_pipeline_config, PipelineConfig};
use crate::engine::Pipeline;
use crate::errors::ConfigError;
use crate::transforms::TransformRegistry;

/// Pipeline builder - turns a validated configuration into a ready-to-run pipeline.
///
/// # Example
/// ```
/// use the_sluice::config::{PipelineBuilder, PipelineConfig, StageConfig, SubmitConfig};
/// use the_sluice::transforms::builtin_text_transforms;
///
/// let config = PipelineConfig {
///     name: "cleanup".to_string(),
///     submit: SubmitConfig::default(),
///     stages: vec![StageConfig {
///         name: "trim".to_string(),
///         transform: "trim_text".to_string(),
///         concurrency: Some(2),
///         queue_capacity: None,
///         max_retries: None,
///         retry_backoff_ms: None,
///     }],
/// };
///
/// let pipeline = PipelineBuilder::from_config(&config, &builtin_text_transforms()).unwrap();
/// assert_eq!(pipeline.stage_names(), vec!["trim"]);
/// ```
pub struct PipelineBuilder;

impl PipelineBuilder {
    /// Build a pipeline in the `Built` state from configuration.
    ///
    /// Validates the configuration, then resolves each stage's transform by
    /// name. Every stage referring to the same name shares one transform.
    pub fn from_config<T>(
        cfg: &PipelineConfig,
        registry: &TransformRegistry<T>,
    ) -> Result<Pipeline<T>, ConfigError>
    where
        T: Clone + Send + 'static,
    {
        validate_pipeline_config(cfg).map_err(ConfigError::Invalid)?;

        let pipeline = Pipeline::new(cfg.name.clone());
        for stage in &cfg.stages {
            let transform =
                registry
                    .get(&stage.transform)
                    .ok_or_else(|| ConfigError::UnknownTransform {
                        stage: stage.name.clone(),
                        transform: stage.transform.clone(),
                    })?;
            pipeline.add_shared_stage(stage.name.clone(), transform, stage.stage_options())?;
        }
        Ok(pipeline)
    }
}
