//! The classification service.
//!
//! `WasteClassifier` orchestrates the full pipeline for one image
//! (normalize, infer, calibrate, map to category, attach recommendations)
//! and fans the same pipeline out over batches with per-item failure
//! isolation.

use crate::core::config::{BackendConfig, ClassifierConfig};
use crate::core::errors::{ClassificationError, ClassifyError, ClassifyResult};
use crate::core::inference::{
    CheckpointBackend, InferenceBackend, RandomBackend, validate_distribution,
};
use crate::domain::{CategoryRegistry, RecommendationCatalog};
use crate::pipeline::results::{BatchItemResult, ClassificationResult};
use crate::processors::{ConfidenceCalibrator, ImageNormalizer, Topk};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, warn};

/// Classifies waste item photographs into material categories.
///
/// All held state (the backend's weights, the category and recommendation
/// tables) is read-only after construction, so one classifier is safely
/// shared across concurrent requests.
#[derive(Debug)]
pub struct WasteClassifier {
    backend: Arc<dyn InferenceBackend>,
    categories: CategoryRegistry,
    catalog: RecommendationCatalog,
    normalizer: ImageNormalizer,
    calibrator: ConfidenceCalibrator,
    topk: Topk,
}

impl WasteClassifier {
    /// Builds a classifier from a validated configuration.
    ///
    /// Equivalent to `WasteClassifierBuilder::new(config).build()`.
    pub fn from_config(config: ClassifierConfig) -> ClassifyResult<Self> {
        WasteClassifierBuilder::new(config).build()
    }

    /// Classifies a single image from its raw uploaded bytes.
    ///
    /// Runs normalize → predict → validate distribution → top-1 → calibrate
    /// → category name → recommendations. Any stage failure is surfaced as
    /// one structured [`ClassificationError`]; never a partial result.
    pub fn classify(
        &self,
        bytes: &[u8],
        filename: Option<&str>,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.classify_inner(bytes)
            .map_err(|source| ClassificationError::new(filename, source))
    }

    /// Classifies many images independently, preserving input order.
    ///
    /// Each item runs the same pipeline as [`classify`](Self::classify); a
    /// failure is captured as a [`BatchItemResult::Failure`] for that item
    /// alone and cannot abort or affect the remaining items. The output
    /// always contains exactly one entry per input, index-aligned.
    pub fn classify_batch(&self, items: &[(Vec<u8>, String)]) -> Vec<BatchItemResult> {
        items
            .par_iter()
            .map(|(bytes, filename)| match self.classify(bytes, Some(filename)) {
                Ok(result) => BatchItemResult::Success {
                    filename: filename.clone(),
                    result,
                },
                Err(error) => {
                    debug!(filename = %filename, %error, "batch item failed");
                    BatchItemResult::Failure {
                        filename: filename.clone(),
                        error_message: error.to_string(),
                    }
                }
            })
            .collect()
    }

    /// The backend currently serving predictions.
    pub fn backend_info(&self) -> String {
        self.backend.backend_info()
    }

    fn classify_inner(&self, bytes: &[u8]) -> ClassifyResult<ClassificationResult> {
        let tensor = self.normalizer.normalize(bytes)?;

        let probabilities = self.backend.predict(&tensor)?;
        validate_distribution(&probabilities, self.categories.num_classes())?;

        let top = self.topk.top1(&probabilities)?;

        // An id outside the registry is downgraded to the default category
        // rather than surfaced (the distribution length check makes this
        // unreachable in practice, but the backend is a trust boundary).
        let (category_id, confidence) = match self.calibrator.calibrate(top.category_id, top.score)
        {
            Ok(confidence) => (top.category_id, confidence),
            Err(ClassifyError::UnknownCategory { category_id, num_classes }) => {
                warn!(
                    category_id,
                    num_classes, "unknown category from backend; falling back to default"
                );
                let fallback = self.categories.default_category();
                let confidence = self.calibrator.calibrate(fallback.id, top.score)?;
                (fallback.id, confidence)
            }
            Err(other) => return Err(other),
        };

        let waste_type = self
            .categories
            .name(category_id)
            .unwrap_or("Unknown")
            .to_string();
        let recommendations = self.catalog.lookup(&waste_type).to_vec();

        Ok(ClassificationResult {
            waste_type,
            category_id,
            confidence,
            recommendations,
        })
    }
}

/// Builder for [`WasteClassifier`].
///
/// Validates the configuration, constructs the configured backend (or
/// accepts an injected one), and wires the processors to the backend's
/// declared tensor layout.
pub struct WasteClassifierBuilder {
    config: ClassifierConfig,
    catalog: Option<RecommendationCatalog>,
    backend: Option<Arc<dyn InferenceBackend>>,
}

impl WasteClassifierBuilder {
    /// Creates a builder over the given configuration.
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            catalog: None,
            backend: None,
        }
    }

    /// Replaces the default recommendation catalog.
    pub fn catalog(mut self, catalog: RecommendationCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Injects a backend directly, bypassing backend configuration.
    ///
    /// This is the seam for test doubles and custom runtimes.
    pub fn backend(mut self, backend: Arc<dyn InferenceBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Builds the classifier, acquiring the backend.
    ///
    /// # Errors
    ///
    /// Returns `Config` errors for invalid configuration (including the
    /// random backend without `demo_mode`, and a backend whose class count
    /// disagrees with the category table) and `ModelLoad` errors when the
    /// checkpoint artifact cannot be loaded.
    pub fn build(self) -> ClassifyResult<WasteClassifier> {
        let categories = match self.config.categories.clone() {
            Some(table) => CategoryRegistry::new(table)?,
            None => CategoryRegistry::default(),
        };

        let backend: Arc<dyn InferenceBackend> = match self.backend {
            Some(backend) => backend,
            None => {
                self.config.validate()?;
                match &self.config.backend {
                    BackendConfig::Checkpoint {
                        model_path,
                        input_shape,
                    } => Arc::new(CheckpointBackend::load(
                        model_path,
                        categories.num_classes(),
                        *input_shape,
                    )?),
                    BackendConfig::Random { .. } => {
                        warn!("serving the random placeholder backend (demo mode)");
                        Arc::new(RandomBackend::new(categories.num_classes())?)
                    }
                }
            }
        };

        if backend.num_classes() != categories.num_classes() {
            return Err(ClassifyError::config_error(format!(
                "backend predicts {} classes but {} categories are registered",
                backend.num_classes(),
                categories.num_classes()
            )));
        }

        let normalizer = ImageNormalizer::new(backend.input_size(), backend.channel_order())?;
        let calibrator = ConfidenceCalibrator::from_registry(&categories);
        let topk = Topk::from_category_names(categories.names());

        debug!(backend = %backend.backend_info(), "built waste classifier");

        Ok(WasteClassifier {
            backend,
            categories,
            catalog: self.catalog.unwrap_or_default(),
            normalizer,
            calibrator,
            topk,
        })
    }
}
