//! Placeholder backend producing uniform random predictions.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::core::inference::InferenceBackend;
use crate::core::tensor::Tensor4D;
use rand::Rng;

/// Lower bound of the drawn base confidence.
const MIN_BASE_CONFIDENCE: f32 = 0.70;
/// Upper bound of the drawn base confidence.
const MAX_BASE_CONFIDENCE: f32 = 0.99;

/// A stand-in predictor for deployments without a trained artifact.
///
/// Draws the winning category uniformly from `[0, K)` and its probability
/// uniformly from `[0.70, 0.99]`, spreading the remaining mass evenly over
/// the other categories. Serving this backend is an explicit configuration
/// decision (`demo_mode`); the builder refuses to construct it otherwise.
#[derive(Debug)]
pub struct RandomBackend {
    num_classes: usize,
}

impl RandomBackend {
    /// Creates a placeholder backend over `num_classes` categories.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if `num_classes` is 0.
    pub fn new(num_classes: usize) -> ClassifyResult<Self> {
        if num_classes == 0 {
            return Err(ClassifyError::config_error(
                "random backend requires at least one category",
            ));
        }
        Ok(Self { num_classes })
    }
}

impl InferenceBackend for RandomBackend {
    fn predict(&self, _input: &Tensor4D) -> ClassifyResult<Vec<f32>> {
        let mut rng = rand::rng();
        let winner = rng.random_range(0..self.num_classes);

        if self.num_classes == 1 {
            return Ok(vec![1.0]);
        }

        let confidence = rng.random_range(MIN_BASE_CONFIDENCE..MAX_BASE_CONFIDENCE);
        let remainder = (1.0 - confidence) / (self.num_classes - 1) as f32;

        Ok((0..self.num_classes)
            .map(|id| if id == winner { confidence } else { remainder })
            .collect())
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn backend_info(&self) -> String {
        format!("RandomBackend (demo placeholder, {} classes)", self.num_classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> Tensor4D {
        Tensor4D::zeros((1, 224, 224, 3))
    }

    #[test]
    fn rejects_zero_classes() {
        assert!(RandomBackend::new(0).is_err());
    }

    #[test]
    fn distribution_covers_all_classes_and_sums_to_one() {
        let backend = RandomBackend::new(7).unwrap();
        for _ in 0..50 {
            let probs = backend.predict(&input()).unwrap();
            assert_eq!(probs.len(), 7);
            let sum: f32 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn winning_probability_stays_in_the_drawn_range() {
        let backend = RandomBackend::new(7).unwrap();
        for _ in 0..50 {
            let probs = backend.predict(&input()).unwrap();
            let max = probs.iter().cloned().fold(f32::MIN, f32::max);
            assert!((MIN_BASE_CONFIDENCE..MAX_BASE_CONFIDENCE).contains(&max));
        }
    }

    #[test]
    fn single_class_degenerates_to_certainty() {
        let backend = RandomBackend::new(1).unwrap();
        assert_eq!(backend.predict(&input()).unwrap(), vec![1.0]);
    }
}
