//! # wastesort
//!
//! A Rust library that classifies waste item photographs into material
//! categories and returns handling recommendations, using ONNX models.
//!
//! ## Features
//!
//! - Image normalization from arbitrary uploaded bytes to a fixed-shape
//!   tensor (any source format, dimensions, or color mode)
//! - Pluggable inference backends: a trained ONNX checkpoint or an
//!   explicitly-gated random placeholder for demos
//! - Per-category confidence calibration
//! - Batch classification with per-item failure isolation and preserved
//!   input order
//!
//! ## Modules
//!
//! * [`core`] - Errors, configuration, tensors, and the backend abstraction
//! * [`domain`] - Category registry and recommendation catalog
//! * [`processors`] - Normalization, calibration, and top-k selection
//! * [`pipeline`] - The classification service and its result records
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wastesort::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Serve a trained checkpoint; loading fails fast if the artifact is
//! // missing or architecture-mismatched.
//! let classifier =
//!     WasteClassifier::from_config(ClassifierConfig::checkpoint("models/trashnet.onnx"))?;
//!
//! let bytes = std::fs::read("can.jpg")?;
//! let result = classifier.classify(&bytes, Some("can.jpg"))?;
//! println!("{} ({:.1}%)", result.waste_type, result.confidence * 100.0);
//! for step in &result.recommendations {
//!     println!("  - {step}");
//! }
//!
//! // Batches isolate per-item failures and preserve input order.
//! let items = vec![(bytes, "can.jpg".to_string())];
//! for item in classifier.classify_batch(&items) {
//!     println!("{}: ok={}", item.filename(), item.is_success());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Demo mode
//!
//! Without a trained artifact, the random placeholder must be opted into
//! explicitly; it is never a silent default:
//!
//! ```rust
//! use wastesort::prelude::*;
//!
//! let classifier = WasteClassifier::from_config(ClassifierConfig::demo()).unwrap();
//! ```

pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;

/// Prelude module for convenient imports.
///
/// Brings the essentials into scope with a single use statement:
///
/// ```rust
/// use wastesort::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{
        BackendConfig, ClassificationError, ClassifierConfig, ClassifyError, ClassifyResult,
        InferenceBackend,
    };
    pub use crate::domain::{Category, CategoryRegistry, RecommendationCatalog};
    pub use crate::pipeline::{
        BatchItemResult, ClassificationResult, WasteClassifier, WasteClassifierBuilder,
    };
}
