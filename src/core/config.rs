//! Configuration for the classification pipeline.
//!
//! Backend choice is an explicit startup decision: a deployment either names
//! a checkpoint artifact or opts into the random placeholder with
//! `demo_mode: true`. There is no silent default that could ship a
//! placeholder predictor to production undetected.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::domain::categories::Category;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which inference backend to serve.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Serve a trained ONNX checkpoint.
    Checkpoint {
        /// Path to the serialized weights artifact.
        model_path: PathBuf,
        /// Expected spatial input size as (width, height); validated against
        /// the model's declared shape when that shape is static.
        #[serde(default)]
        input_shape: Option<(u32, u32)>,
    },
    /// Serve the random placeholder.
    Random {
        /// Must be set to opt into serving random predictions.
        #[serde(default)]
        demo_mode: bool,
    },
}

/// Top-level configuration for building a classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Backend selection.
    pub backend: BackendConfig,
    /// Category table override; defaults to the built-in seven-category
    /// table when absent.
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

impl ClassifierConfig {
    /// Creates a configuration serving the given checkpoint artifact.
    pub fn checkpoint(model_path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendConfig::Checkpoint {
                model_path: model_path.into(),
                input_shape: None,
            },
            categories: None,
        }
    }

    /// Creates a demo configuration serving the random placeholder.
    pub fn demo() -> Self {
        Self {
            backend: BackendConfig::Random { demo_mode: true },
            categories: None,
        }
    }

    /// Validates the configuration before any resource is acquired.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the checkpoint path does not exist, the
    /// input shape has a zero dimension, or the random backend is selected
    /// without `demo_mode`.
    pub fn validate(&self) -> ClassifyResult<()> {
        match &self.backend {
            BackendConfig::Checkpoint {
                model_path,
                input_shape,
            } => {
                if !model_path.is_file() {
                    return Err(ClassifyError::config_error_with_context(
                        "model_path",
                        &model_path.display().to_string(),
                        "model artifact does not exist",
                    ));
                }
                if let Some((width, height)) = input_shape {
                    if *width == 0 || *height == 0 {
                        return Err(ClassifyError::config_error_with_context(
                            "input_shape",
                            &format!("{width}x{height}"),
                            "both dimensions must be greater than 0",
                        ));
                    }
                }
            }
            BackendConfig::Random { demo_mode } => {
                if !demo_mode {
                    return Err(ClassifyError::config_error(
                        "refusing to serve the random placeholder backend: \
                         set demo_mode = true to opt in explicitly",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_without_demo_mode_is_rejected() {
        let config = ClassifierConfig {
            backend: BackendConfig::Random { demo_mode: false },
            categories: None,
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("demo_mode"));
    }

    #[test]
    fn demo_config_validates() {
        assert!(ClassifierConfig::demo().validate().is_ok());
    }

    #[test]
    fn missing_checkpoint_path_is_rejected() {
        let config = ClassifierConfig::checkpoint("/nonexistent/model.onnx");
        assert!(config.validate().is_err());
    }

    #[test]
    fn backend_config_deserializes_from_tagged_json() {
        let config: BackendConfig = serde_json::from_str(
            r#"{ "kind": "checkpoint", "model_path": "models/trashnet.onnx" }"#,
        )
        .unwrap();
        assert!(matches!(config, BackendConfig::Checkpoint { .. }));

        let config: BackendConfig =
            serde_json::from_str(r#"{ "kind": "random", "demo_mode": true }"#).unwrap();
        assert!(matches!(config, BackendConfig::Random { demo_mode: true }));
    }

    #[test]
    fn demo_mode_defaults_to_off() {
        let config: BackendConfig = serde_json::from_str(r#"{ "kind": "random" }"#).unwrap();
        assert!(matches!(config, BackendConfig::Random { demo_mode: false }));
    }
}
