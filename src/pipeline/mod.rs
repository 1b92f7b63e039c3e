//! The waste classification pipeline.
//!
//! This module wires the processors, backend, and domain tables into the
//! classification service and defines the records it returns.

pub mod classifier;
pub mod results;

pub use classifier::{WasteClassifier, WasteClassifierBuilder};
pub use results::{BatchItemResult, ClassificationResult};
