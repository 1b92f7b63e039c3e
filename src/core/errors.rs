//! Error types for the classification pipeline.
//!
//! This module defines the error taxonomy used throughout the crate: decode
//! and normalization failures, fatal model-load errors, inference errors, and
//! the internal unknown-category error that the service downgrades to a
//! fallback rather than surfacing to callers. It also provides the structured
//! per-request error returned at the service boundary.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Stage of the classification pipeline an error occurred in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Error occurred while decoding image bytes.
    Decode,
    /// Error occurred during image normalization.
    Normalization,
    /// Error occurred during backend inference.
    Inference,
    /// Error occurred during confidence calibration.
    Calibration,
    /// Error occurred while assembling the final result.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Decode => write!(f, "decode"),
            ProcessingStage::Normalization => write!(f, "normalization"),
            ProcessingStage::Inference => write!(f, "inference"),
            ProcessingStage::Calibration => write!(f, "calibration"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Enum representing the errors that can occur in the classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The supplied bytes are not a decodable image.
    #[error("image decode")]
    Decode(#[source] image::ImageError),

    /// The decoded image uses a color mode that cannot be converted to RGB.
    ///
    /// Conversion to RGB is always attempted first, so this is rare.
    #[error("unsupported color mode: {mode}")]
    UnsupportedMode {
        /// Description of the offending color mode.
        mode: String,
    },

    /// The model artifact could not be loaded. Fatal, startup-only.
    #[error("model load failed for '{}': {context}", .path.display())]
    ModelLoad {
        /// Path to the model artifact.
        path: PathBuf,
        /// What went wrong while loading.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend failed to produce a valid probability distribution.
    #[error("inference: {context}")]
    Inference {
        /// Additional context about the failure.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A category id outside `[0, K)` was produced.
    ///
    /// Internal: callers fall back to the default category instead of
    /// propagating this to the end user.
    #[error("unknown category id {category_id} (known ids: 0..{num_classes})")]
    UnknownCategory {
        /// The offending category id.
        category_id: usize,
        /// Number of registered categories.
        num_classes: usize,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    Config {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl ClassifyError {
    /// Creates a `ModelLoad` error with path context and an optional source.
    pub fn model_load(
        path: impl AsRef<Path>,
        context: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ModelLoad {
            path: path.as_ref().to_path_buf(),
            context: context.into(),
            source,
        }
    }

    /// Creates an `Inference` error from a message alone.
    pub fn inference(context: impl Into<String>) -> Self {
        Self::Inference {
            context: context.into(),
            source: None,
        }
    }

    /// Creates an `Inference` error wrapping an underlying error.
    pub fn inference_with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an `UnknownCategory` error.
    pub fn unknown_category(category_id: usize, num_classes: usize) -> Self {
        Self::UnknownCategory {
            category_id,
            num_classes,
        }
    }

    /// Creates an `InvalidInput` error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a `Config` error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a `Config` error with field context.
    pub fn config_error_with_context(field: &str, value: &str, reason: &str) -> Self {
        Self::Config {
            message: format!("field '{field}' with value '{value}': {reason}"),
        }
    }

    /// The pipeline stage this error belongs to when reported at the service
    /// boundary.
    pub fn stage(&self) -> ProcessingStage {
        match self {
            Self::Decode(_) | Self::UnsupportedMode { .. } => ProcessingStage::Decode,
            Self::Tensor(_) => ProcessingStage::Normalization,
            Self::ModelLoad { .. } | Self::Inference { .. } => ProcessingStage::Inference,
            Self::UnknownCategory { .. } => ProcessingStage::Calibration,
            Self::InvalidInput { .. } | Self::Config { .. } | Self::Io(_) => {
                ProcessingStage::PostProcessing
            }
        }
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(error: image::ImageError) -> Self {
        Self::Decode(error)
    }
}

/// Convenient result alias for classification operations.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Structured per-request error returned by the classification service.
///
/// Failures at any stage of a single classification are caught at the service
/// boundary and converted into this type; they never escape as bare pipeline
/// errors and never produce a partial result.
#[derive(Error, Debug)]
#[error("classification failed at {stage} for '{}': {source}", .filename.as_deref().unwrap_or("<unnamed>"))]
pub struct ClassificationError {
    /// The stage that failed.
    pub stage: ProcessingStage,
    /// The originating filename, when the caller supplied one.
    pub filename: Option<String>,
    /// The underlying pipeline error.
    #[source]
    pub source: ClassifyError,
}

impl ClassificationError {
    /// Wraps a pipeline error with its stage and the originating filename.
    pub fn new(filename: Option<&str>, source: ClassifyError) -> Self {
        Self {
            stage: source.stage(),
            filename: filename.map(str::to_owned),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_maps_decode_errors_to_decode() {
        let err = ClassifyError::UnsupportedMode {
            mode: "CMYK".to_string(),
        };
        assert_eq!(err.stage(), ProcessingStage::Decode);
    }

    #[test]
    fn classification_error_display_includes_filename() {
        let err = ClassificationError::new(
            Some("can.jpg"),
            ClassifyError::invalid_input("empty upload"),
        );
        let rendered = err.to_string();
        assert!(rendered.contains("can.jpg"));
        assert!(rendered.contains("post-processing"));
    }

    #[test]
    fn classification_error_display_without_filename() {
        let err = ClassificationError::new(None, ClassifyError::inference("no distribution"));
        assert!(err.to_string().contains("<unnamed>"));
    }
}
