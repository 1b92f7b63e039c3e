//! The core module of the classification pipeline.
//!
//! This module contains the fundamental components of the pipeline:
//! - Error handling
//! - Configuration management
//! - The inference backend abstraction and its variants
//! - Tensor type aliases
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod errors;
pub mod inference;
pub mod tensor;

pub use config::{BackendConfig, ClassifierConfig};
pub use errors::{ClassificationError, ClassifyError, ClassifyResult, ProcessingStage};
pub use inference::{CheckpointBackend, InferenceBackend, RandomBackend, validate_distribution};
pub use tensor::Tensor4D;

/// Initializes the tracing subscriber for logging.
///
/// Sets up the tracing subscriber with an environment filter and formatting
/// layer. Typically called once at application startup.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
