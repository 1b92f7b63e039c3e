//! Per-category confidence calibration.

use crate::core::errors::{ClassifyError, ClassifyResult};
use crate::domain::CategoryRegistry;

/// Applies the static per-category confidence boost and clamps the result to
/// a valid probability.
///
/// Calibration is a pure function: `min(raw * boost(category_id), 1.0)`,
/// floored at 0. The boost table is fixed at construction.
#[derive(Debug, Clone)]
pub struct ConfidenceCalibrator {
    boosts: Vec<f32>,
}

impl ConfidenceCalibrator {
    /// Creates a calibrator from a boost table indexed by category id.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the table is empty or any boost falls
    /// outside `(0, 1]`.
    pub fn new(boosts: Vec<f32>) -> ClassifyResult<Self> {
        if boosts.is_empty() {
            return Err(ClassifyError::config_error(
                "calibration requires at least one confidence boost",
            ));
        }
        for (id, &boost) in boosts.iter().enumerate() {
            if !(boost > 0.0 && boost <= 1.0) {
                return Err(ClassifyError::config_error_with_context(
                    "confidence_boost",
                    &boost.to_string(),
                    &format!("must be in (0, 1] for category id {id}"),
                ));
            }
        }
        Ok(Self { boosts })
    }

    /// Creates a calibrator from a validated category registry.
    pub fn from_registry(registry: &CategoryRegistry) -> Self {
        // Registry invariants already guarantee a valid boost table.
        Self {
            boosts: registry.boosts(),
        }
    }

    /// Calibrates a raw confidence for the given category.
    ///
    /// # Errors
    ///
    /// Returns `UnknownCategory` if `category_id` is outside `[0, K)`. The
    /// service downgrades that to the default category rather than surfacing
    /// it to the caller.
    pub fn calibrate(&self, category_id: usize, raw_confidence: f32) -> ClassifyResult<f32> {
        let boost = self
            .boosts
            .get(category_id)
            .copied()
            .ok_or_else(|| ClassifyError::unknown_category(category_id, self.boosts.len()))?;
        Ok((raw_confidence * boost).clamp(0.0, 1.0))
    }

    /// Number of categories the calibrator knows about.
    pub fn num_classes(&self) -> usize {
        self.boosts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrator() -> ConfidenceCalibrator {
        ConfidenceCalibrator::from_registry(&CategoryRegistry::default())
    }

    #[test]
    fn zero_confidence_stays_zero() {
        let calibrator = calibrator();
        for id in 0..calibrator.num_classes() {
            assert_eq!(calibrator.calibrate(id, 0.0).unwrap(), 0.0);
        }
    }

    #[test]
    fn never_exceeds_one() {
        let calibrator = calibrator();
        for id in 0..calibrator.num_classes() {
            for step in 0..=10 {
                let raw = step as f32 / 10.0;
                assert!(calibrator.calibrate(id, raw).unwrap() <= 1.0);
            }
        }
    }

    #[test]
    fn applies_the_category_boost() {
        // Category 2 ("Metal") carries a 0.98 boost in the default table.
        let calibrated = calibrator().calibrate(2, 0.9).unwrap();
        assert!((calibrated - 0.9 * 0.98).abs() < 1e-6);
    }

    #[test]
    fn unknown_category_errors() {
        let err = calibrator().calibrate(99, 0.5).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::UnknownCategory { category_id: 99, num_classes: 7 }
        ));
    }

    #[test]
    fn rejects_invalid_boost_tables() {
        assert!(ConfidenceCalibrator::new(Vec::new()).is_err());
        assert!(ConfidenceCalibrator::new(vec![0.0]).is_err());
        assert!(ConfidenceCalibrator::new(vec![1.2]).is_err());
    }
}
