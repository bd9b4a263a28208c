//! Classifier families and the factory that builds them
//!
//! All families implement the [`Classifier`] trait and are held behind the
//! closed [`ClassifierModel`] enum, so dispatch is explicit rather than
//! name-based at runtime.

mod decision_tree;
mod factory;
mod knn;
mod logistic;
mod random_forest;

pub use decision_tree::DecisionTree;
pub use factory::build_model;
pub use knn::{DistanceMetric, KnnClassifier, WeightScheme};
pub use logistic::LogisticRegression;
pub use random_forest::RandomForestClassifier;

use crate::error::Result;
use crate::spec::ModelFamily;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Classifier interface: fit on encoded class indices, predict class indices
pub trait Classifier {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Closed set of buildable classifier variants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClassifierModel {
    Knn(KnnClassifier),
    LogisticRegression(LogisticRegression),
    RandomForest(RandomForestClassifier),
}

impl ClassifierModel {
    pub fn family(&self) -> ModelFamily {
        match self {
            Self::Knn(_) => ModelFamily::Knn,
            Self::LogisticRegression(_) => ModelFamily::LogisticRegression,
            Self::RandomForest(_) => ModelFamily::RandomForest,
        }
    }
}

impl Classifier for ClassifierModel {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            Self::Knn(m) => m.fit(x, y),
            Self::LogisticRegression(m) => m.fit(x, y),
            Self::RandomForest(m) => m.fit(x, y),
        }
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Self::Knn(m) => m.predict(x),
            Self::LogisticRegression(m) => m.predict(x),
            Self::RandomForest(m) => m.predict(x),
        }
    }
}
