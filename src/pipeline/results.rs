//! Result records returned by the classification service.

use serde::Serialize;

/// Terminal result of classifying a single image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Name of the predicted waste category, e.g. "Metal".
    pub waste_type: String,
    /// Id of the predicted category.
    pub category_id: usize,
    /// Calibrated confidence in `[0, 1]`.
    pub confidence: f32,
    /// Ordered handling recommendations for the category.
    pub recommendations: Vec<String>,
}

/// Per-item outcome of a batch classification.
///
/// The batch output always has exactly one entry per input, in input order;
/// a failed item is captured here rather than aborting its siblings.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BatchItemResult {
    /// The item classified successfully.
    Success {
        /// Originating filename.
        filename: String,
        /// The classification.
        #[serde(flatten)]
        result: ClassificationResult,
    },
    /// The item failed; siblings are unaffected.
    Failure {
        /// Originating filename.
        filename: String,
        /// Human-readable description of the failure.
        error_message: String,
    },
}

impl BatchItemResult {
    /// The originating filename, regardless of outcome.
    pub fn filename(&self) -> &str {
        match self {
            Self::Success { filename, .. } | Self::Failure { filename, .. } => filename,
        }
    }

    /// Whether the item classified successfully.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The classification, when the item succeeded.
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Self::Success { result, .. } => Some(result),
            Self::Failure { .. } => None,
        }
    }
}
