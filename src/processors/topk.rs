//! Top-k selection over class probability vectors.

use crate::core::errors::{ClassifyError, ClassifyResult};

/// One ranked prediction extracted from a probability vector.
#[derive(Debug, Clone, PartialEq)]
pub struct TopkEntry {
    /// Category id of the prediction.
    pub category_id: usize,
    /// Probability assigned to the category.
    pub score: f32,
    /// Human-readable category name.
    pub name: String,
}

/// Extracts the highest-probability predictions from a class distribution,
/// labeling them with category names.
#[derive(Debug, Clone)]
pub struct Topk {
    class_names: Vec<String>,
}

impl Topk {
    /// Creates a selector from category names ordered by id.
    pub fn from_category_names(class_names: Vec<String>) -> Self {
        Self { class_names }
    }

    /// Returns the top-k predictions, ranked by descending probability.
    ///
    /// `k` is clamped to the number of classes in the distribution. Ids
    /// without a registered name are labeled `Unknown(<id>)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `k` is 0 or the distribution is empty.
    pub fn process(&self, probabilities: &[f32], k: usize) -> ClassifyResult<Vec<TopkEntry>> {
        if k == 0 {
            return Err(ClassifyError::invalid_input("k must be greater than 0"));
        }
        if probabilities.is_empty() {
            return Err(ClassifyError::invalid_input(
                "cannot rank an empty probability vector",
            ));
        }

        let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        Ok(indexed
            .into_iter()
            .take(k.min(probabilities.len()))
            .map(|(category_id, score)| TopkEntry {
                category_id,
                score,
                name: self
                    .class_names
                    .get(category_id)
                    .cloned()
                    .unwrap_or_else(|| format!("Unknown({category_id})")),
            })
            .collect())
    }

    /// Returns the single highest-probability prediction.
    pub fn top1(&self, probabilities: &[f32]) -> ClassifyResult<TopkEntry> {
        let mut entries = self.process(probabilities, 1)?;
        entries.pop().ok_or_else(|| {
            ClassifyError::invalid_input("top-k ranking returned no entries")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topk() -> Topk {
        Topk::from_category_names(vec![
            "Organic".to_string(),
            "Plastic".to_string(),
            "Metal".to_string(),
        ])
    }

    #[test]
    fn top1_picks_the_argmax() {
        let entry = topk().top1(&[0.1, 0.2, 0.7]).unwrap();
        assert_eq!(entry.category_id, 2);
        assert_eq!(entry.name, "Metal");
        assert!((entry.score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn process_ranks_descending() {
        let entries = topk().process(&[0.3, 0.6, 0.1], 3).unwrap();
        let ids: Vec<usize> = entries.iter().map(|e| e.category_id).collect();
        assert_eq!(ids, vec![1, 0, 2]);
    }

    #[test]
    fn k_is_clamped_to_class_count() {
        let entries = topk().process(&[0.5, 0.5], 10).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn unregistered_ids_get_placeholder_names() {
        let bare = Topk::from_category_names(vec!["Organic".to_string()]);
        let entries = bare.process(&[0.4, 0.6], 2).unwrap();
        assert_eq!(entries[0].name, "Unknown(1)");
    }

    #[test]
    fn rejects_zero_k_and_empty_input() {
        assert!(topk().process(&[0.5, 0.5], 0).is_err());
        assert!(topk().process(&[], 1).is_err());
    }
}
