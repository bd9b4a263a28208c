//! Best-model selection

use crate::training::metrics::ClassificationMetrics;

/// Pick the entry with the greatest F1 score.
///
/// Ties keep the earlier entry: only a strictly greater score displaces the
/// current best, so with equal scores the first model evaluated wins.
pub fn select_best(results: &[(String, ClassificationMetrics)]) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for (name, metrics) in results {
        match best {
            Some((_, score)) if metrics.f1 <= score => {}
            _ => best = Some((name.as_str(), metrics.f1)),
        }
    }
    best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, f1: f64) -> (String, ClassificationMetrics) {
        (
            name.to_string(),
            ClassificationMetrics {
                accuracy: 0.0,
                precision: 0.0,
                recall: 0.0,
                f1,
            },
        )
    }

    #[test]
    fn test_greatest_f1_wins() {
        let results = vec![entry("knn", 0.7), entry("random-forest", 0.9), entry("lr", 0.8)];
        assert_eq!(select_best(&results), Some("random-forest"));
    }

    #[test]
    fn test_tie_keeps_earlier_entry() {
        let results = vec![entry("knn", 0.8), entry("random-forest", 0.8)];
        assert_eq!(select_best(&results), Some("knn"));
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_single_entry() {
        let results = vec![entry("knn", 0.0)];
        assert_eq!(select_best(&results), Some("knn"));
    }
}
