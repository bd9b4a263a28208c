//! Train/evaluate orchestration
//!
//! Runs each classifier configuration sequentially over one shared stratified
//! split: build, fit on the train subset, predict the test subset, score.
//! Results keep first-seen insertion order; a repeated model name overwrites
//! its earlier metrics in place.

use crate::data::{stratified_split, LabelEncoder, TrainTestSplit};
use crate::error::Result;
use crate::models::{build_model, Classifier, ClassifierModel};
use crate::spec::ModelConfig;
use crate::training::metrics::ClassificationMetrics;
use crate::training::selector::select_best;
use ndarray::Array2;
use std::time::Instant;
use tracing::info;

/// Split parameters for a comparison run
#[derive(Debug, Clone, Copy)]
pub struct ComparisonConfig {
    /// Fraction of samples held out for evaluation, in (0, 1)
    pub test_fraction: f64,
    /// Seed for the stratified shuffle
    pub seed: u64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: crate::data::DEFAULT_SPLIT_SEED,
        }
    }
}

/// Everything a finished comparison produced
#[derive(Debug)]
pub struct ComparisonOutcome {
    /// Per-model metrics in first-seen order
    pub results: Vec<(String, ClassificationMetrics)>,
    /// Fitted models, parallel to `results`
    pub models: Vec<(String, ClassifierModel)>,
    /// Name of the best entry by F1, if any model ran
    pub best: Option<String>,
    pub sample_count: usize,
    pub feature_count: usize,
    pub test_count: usize,
    pub classes: Vec<String>,
}

impl ComparisonOutcome {
    /// The fitted model selected as best
    pub fn best_model(&self) -> Option<&ClassifierModel> {
        let best = self.best.as_deref()?;
        self.models
            .iter()
            .find(|(name, _)| name == best)
            .map(|(_, model)| model)
    }
}

/// Runs the full compare loop over a dataset
pub struct ComparisonEngine {
    config: ComparisonConfig,
}

impl ComparisonEngine {
    pub fn new(config: ComparisonConfig) -> Self {
        Self { config }
    }

    /// Train and evaluate every configuration on one shared split
    pub fn run(
        &self,
        x: &Array2<f64>,
        labels: &[String],
        configs: &[ModelConfig],
    ) -> Result<ComparisonOutcome> {
        let encoder = LabelEncoder::fit(labels);
        info!(
            samples = x.nrows(),
            features = x.ncols(),
            classes = encoder.n_classes(),
            "dataset loaded"
        );

        let TrainTestSplit {
            x_train,
            x_test,
            y_train,
            y_test,
        } = stratified_split(x, labels, self.config.test_fraction, self.config.seed)?;

        let y_train_enc = encoder.transform(&y_train)?;
        let y_test_enc = encoder.transform(&y_test)?;

        let mut results: Vec<(String, ClassificationMetrics)> = Vec::new();
        let mut models: Vec<(String, ClassifierModel)> = Vec::new();

        for config in configs {
            let name = config.name().to_string();
            let mut model = build_model(config)?;

            let started = Instant::now();
            model.fit(&x_train, &y_train_enc)?;
            let predictions = model.predict(&x_test)?;
            let metrics = ClassificationMetrics::weighted(&y_test_enc, &predictions)?;
            info!(
                model = %name,
                accuracy = metrics.accuracy,
                f1 = metrics.f1,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "model evaluated"
            );

            upsert(&mut results, &name, metrics);
            upsert(&mut models, &name, model);
        }

        let best = select_best(&results).map(str::to_string);
        if let Some(ref best) = best {
            info!(model = %best, "best model selected");
        }

        Ok(ComparisonOutcome {
            results,
            models,
            best,
            sample_count: x.nrows(),
            feature_count: x.ncols(),
            test_count: x_test.nrows(),
            classes: encoder.classes().to_vec(),
        })
    }
}

/// Replace an existing entry by key, or append keeping insertion order
fn upsert<T>(entries: &mut Vec<(String, T)>, name: &str, value: T) {
    match entries.iter_mut().find(|(k, _)| k == name) {
        Some((_, slot)) => *slot = value,
        None => entries.push((name.to_string(), value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::parse_specs;
    use ndarray::Array2;

    fn two_cluster_dataset(per_class: usize) -> (Array2<f64>, Vec<String>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..per_class {
            let jitter = (i % 7) as f64 * 0.01;
            rows.extend_from_slice(&[0.1 + jitter, 0.2 + jitter]);
            labels.push("neg".to_string());
            rows.extend_from_slice(&[5.0 + jitter, 5.1 + jitter]);
            labels.push("pos".to_string());
        }
        let x = Array2::from_shape_vec((per_class * 2, 2), rows).unwrap();
        (x, labels)
    }

    #[test]
    fn test_run_all_families() {
        let (x, labels) = two_cluster_dataset(20);
        let configs = parse_specs(&["all".to_string()]).unwrap();

        let outcome = ComparisonEngine::new(ComparisonConfig::default())
            .run(&x, &labels, &configs)
            .unwrap();

        assert_eq!(outcome.results.len(), 3);
        assert_eq!(outcome.results[0].0, "knn");
        assert_eq!(outcome.results[1].0, "logistic-regression");
        assert_eq!(outcome.results[2].0, "random-forest");
        assert!(outcome.best.is_some());
        assert!(outcome.best_model().is_some());
        assert_eq!(outcome.classes, vec!["neg".to_string(), "pos".to_string()]);

        // Trivially separable clusters: everything should score high
        for (name, metrics) in &outcome.results {
            assert!(metrics.f1 > 0.9, "{name} f1 too low: {}", metrics.f1);
        }
    }

    #[test]
    fn test_duplicate_name_overwrites_in_place() {
        let (x, labels) = two_cluster_dataset(15);
        let configs = parse_specs(&[
            "knn:n_neighbors=1".to_string(),
            "rf:n_estimators=10".to_string(),
            "knn:n_neighbors=5".to_string(),
        ])
        .unwrap();

        let outcome = ComparisonEngine::new(ComparisonConfig::default())
            .run(&x, &labels, &configs)
            .unwrap();

        // Two distinct names, knn keeps its first position
        assert_eq!(outcome.results.len(), 2);
        assert_eq!(outcome.results[0].0, "knn");
        assert_eq!(outcome.results[1].0, "random-forest");
        match &outcome.models[0].1 {
            ClassifierModel::Knn(knn) => assert_eq!(knn.n_neighbors, 5),
            other => panic!("expected knn, got {other:?}"),
        }
    }

    #[test]
    fn test_deterministic_across_runs() {
        let (x, labels) = two_cluster_dataset(25);
        let configs = parse_specs(&["rf:n_estimators=10,random_state=3".to_string()]).unwrap();
        let engine = ComparisonEngine::new(ComparisonConfig {
            test_fraction: 0.2,
            seed: 11,
        });

        let a = engine.run(&x, &labels, &configs).unwrap();
        let b = engine.run(&x, &labels, &configs).unwrap();
        assert_eq!(a.results, b.results);
    }
}
