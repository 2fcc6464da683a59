// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{validate_pipeline_config, StageOptions, SubmitOptions};
use crate::errors::ConfigError;

/// Configuration for a pipeline built from a file.
///
/// Stages run in the order they are listed. Each stage names a transform
/// that is resolved against a [`TransformRegistry`](crate::transforms::TransformRegistry)
/// when the pipeline is built.
///
/// # Fields
/// * `name` - Pipeline name used in logs
/// * `submit` - Defaults applied to every submission (optional)
/// * `stages` - Ordered stage definitions
///
/// # Example
/// ```yaml
/// name: text_cleanup
/// submit:
///   timeout_ms: 500
/// stages:
///   - name: upper
///     transform: change_text_case_upper
///     concurrency: 2
///   - name: trim
///     transform: trim_text
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default)]
    pub submit: SubmitConfig,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
}

impl PipelineConfig {
    /// Submission options built from the `submit` section.
    pub fn submit_options(&self) -> SubmitOptions {
        SubmitOptions {
            timeout: self.submit.timeout_ms.map(Duration::from_millis),
            start_at: self.submit.start_at.clone(),
        }
    }
}

/// Default submission behaviour.
///
/// # Fields
/// * `timeout_ms` - Give up on a submission after this many milliseconds of backpressure
/// * `start_at` - Stage every submission starts at; earlier stages pass it through
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SubmitConfig {
    pub timeout_ms: Option<u64>,
    pub start_at: Option<String>,
}

/// Configuration for a single stage.
///
/// Numeric fields are signed so that out-of-range values parse and are then
/// ignored, leaving the default in place, rather than rejecting the file.
///
/// # Example
/// ```yaml
/// name: fetch
/// transform: reverse_text
/// concurrency: 4
/// queue_capacity: 16
/// max_retries: 5
/// retry_backoff_ms: 10
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StageConfig {
    pub name: String,
    pub transform: String,
    pub concurrency: Option<i64>,
    pub queue_capacity: Option<i64>,
    pub max_retries: Option<i64>,
    pub retry_backoff_ms: Option<u64>,
}

impl StageConfig {
    /// Stage options with every invalid value dropped in favour of the default.
    ///
    /// ```
    /// use the_sluice::config::{StageConfig, StageOptions};
    ///
    /// let cfg = StageConfig {
    ///     name: "s".into(),
    ///     transform: "trim_text".into(),
    ///     concurrency: Some(0),
    ///     queue_capacity: Some(-4),
    ///     max_retries: Some(0),
    ///     retry_backoff_ms: None,
    /// };
    /// let defaults = StageOptions::default();
    /// let opts = cfg.stage_options();
    ///
    /// assert_eq!(opts.concurrency, defaults.concurrency);
    /// assert_eq!(opts.queue_capacity, defaults.queue_capacity);
    /// assert_eq!(opts.max_retries, 0);
    /// ```
    pub fn stage_options(&self) -> StageOptions {
        let mut options = StageOptions::default();
        if let Some(concurrency) = self.concurrency.and_then(|n| usize::try_from(n).ok()) {
            options = options.with_concurrency(concurrency);
        }
        if let Some(capacity) = self.queue_capacity.and_then(|n| usize::try_from(n).ok()) {
            options = options.with_queue_capacity(capacity);
        }
        if let Some(retries) = self.max_retries.and_then(|n| u32::try_from(n).ok()) {
            options = options.with_max_retries(retries);
        }
        if let Some(backoff) = self.retry_backoff_ms {
            options = options.with_retry_backoff(Duration::from_millis(backoff));
        }
        options
    }
}

/// Load a config file. The format follows the extension: `.yaml`/`.yml` or `.toml`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => {
            let content = fs::read_to_string(path)?;
            Ok(serde_yaml::from_str(&content)?)
        }
        Some("toml") => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Load a config file and validate it, reporting every problem found.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let cfg = load_config(path)?;
    validate_pipeline_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use std::io::Write;

    fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
name: text_cleanup
submit:
  timeout_ms: 250
  start_at: trim
stages:
  - name: upper
    transform: change_text_case_upper
    concurrency: 2
  - name: trim
    transform: trim_text
"#;

        let cfg: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.name, "text_cleanup");
        assert_eq!(cfg.stages.len(), 2);
        assert_eq!(cfg.stages[0].concurrency, Some(2));
        assert_eq!(cfg.stages[1].max_retries, None);

        let submit = cfg.submit_options();
        assert_eq!(submit.timeout, Some(Duration::from_millis(250)));
        assert_eq!(submit.start_at.as_deref(), Some("trim"));
    }

    #[test]
    fn test_negative_values_keep_defaults() {
        let yaml = r#"
name: p
stages:
  - name: s
    transform: trim_text
    concurrency: -1
    queue_capacity: -1
    max_retries: -1
"#;
        let cfg: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.stages[0].stage_options(), StageOptions::default());
    }

    #[test]
    fn test_explicit_values_override_defaults() {
        let cfg = StageConfig {
            name: "s".to_string(),
            transform: "trim_text".to_string(),
            concurrency: Some(3),
            queue_capacity: Some(0),
            max_retries: Some(7),
            retry_backoff_ms: Some(20),
        };
        let opts = cfg.stage_options();
        assert_eq!(opts.concurrency, 3);
        assert_eq!(opts.queue_capacity, 0);
        assert_eq!(opts.max_retries, 7);
        assert_eq!(opts.retry_backoff, Duration::from_millis(20));
    }

    #[test]
    fn test_load_yaml_and_toml_agree() {
        let yaml = write_config(
            ".yaml",
            r#"
name: same
stages:
  - name: upper
    transform: change_text_case_upper
    max_retries: 1
"#,
        );
        let toml = write_config(
            ".toml",
            r#"
name = "same"

[[stages]]
name = "upper"
transform = "change_text_case_upper"
max_retries = 1
"#,
        );

        let from_yaml = load_config(yaml.path()).unwrap();
        let from_toml = load_config(toml.path()).unwrap();
        assert_eq!(from_yaml, from_toml);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_config(".json", "{}");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_malformed_yaml_is_reported() {
        let file = write_config(".yml", "name: [unterminated");
        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_load_and_validate_rejects_duplicates() {
        let file = write_config(
            ".yaml",
            r#"
name: dupes
stages:
  - name: trim
    transform: trim_text
  - name: trim
    transform: trim_text
"#,
        );

        match load_and_validate_config(file.path()) {
            Err(ConfigError::Invalid(errors)) => assert_eq!(
                errors,
                vec![ValidationError::DuplicateStageName {
                    stage: "trim".to_string()
                }]
            ),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
