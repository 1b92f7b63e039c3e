//! Inference backend abstraction.
//!
//! The [`InferenceBackend`] trait is the seam that lets a placeholder
//! predictor, an ONNX checkpoint, or a test double be swapped without
//! touching calling code. Backends report the tensor layout they were
//! trained on; the service builds its normalizer from that.

pub mod checkpoint;
pub mod random;

pub use checkpoint::CheckpointBackend;
pub use random::RandomBackend;

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::tensor::Tensor4D;
use crate::processors::ChannelOrder;
use std::fmt::Debug;

/// Tolerance for a probability distribution summing to 1.0.
const DISTRIBUTION_SUM_TOLERANCE: f32 = 1e-3;

/// A pluggable predictor turning a normalized image tensor into a
/// probability distribution over all K categories.
pub trait InferenceBackend: Send + Sync + Debug {
    /// Runs forward inference on a batch-of-1 tensor.
    ///
    /// Returns one probability per category id, covering all K categories
    /// and summing to 1.0 within floating-point tolerance.
    fn predict(&self, input: &Tensor4D) -> ClassifyResult<Vec<f32>>;

    /// Number of categories this backend predicts over.
    fn num_classes(&self) -> usize;

    /// Spatial input size the backend expects, as (width, height).
    fn input_size(&self) -> (u32, u32) {
        (224, 224)
    }

    /// Channel ordering the backend expects.
    fn channel_order(&self) -> ChannelOrder {
        ChannelOrder::HWC
    }

    /// Human-readable description of the backend, for logs.
    fn backend_info(&self) -> String;
}

/// Validates that a backend output is a usable probability distribution.
///
/// # Errors
///
/// Returns an `Inference` error when the vector's length differs from the
/// expected class count, any entry is non-finite or negative, or the mass
/// does not sum to 1.0 within tolerance.
pub fn validate_distribution(probabilities: &[f32], expected_classes: usize) -> ClassifyResult<()> {
    if probabilities.len() != expected_classes {
        return Err(ClassifyError::inference(format!(
            "backend produced {} probabilities, expected {expected_classes}",
            probabilities.len()
        )));
    }

    for (id, &p) in probabilities.iter().enumerate() {
        if !p.is_finite() || p < 0.0 {
            return Err(ClassifyError::inference(format!(
                "probability for category {id} is not a valid probability: {p}"
            )));
        }
    }

    let sum: f32 = probabilities.iter().sum();
    if (sum - 1.0).abs() > DISTRIBUTION_SUM_TOLERANCE {
        return Err(ClassifyError::inference(format!(
            "probability mass sums to {sum}, expected 1.0"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_valid_distribution() {
        assert!(validate_distribution(&[0.2, 0.3, 0.5], 3).is_ok());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(validate_distribution(&[0.5, 0.5], 3).is_err());
    }

    #[test]
    fn rejects_negative_and_non_finite_entries() {
        assert!(validate_distribution(&[-0.1, 1.1], 2).is_err());
        assert!(validate_distribution(&[f32::NAN, 1.0], 2).is_err());
    }

    #[test]
    fn rejects_mass_not_summing_to_one() {
        assert!(validate_distribution(&[0.9, 0.9], 2).is_err());
    }
}
