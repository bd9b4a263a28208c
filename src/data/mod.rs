//! Dataset loading, encoding and splitting
//!
//! Produces the feature-matrix/label-vector pair consumed by the training
//! engine. Sources are either a pre-serialized [`DatasetContainer`] or a
//! delimited tabular file whose feature column holds numeric-array literals.

mod loader;
mod split;

pub use loader::{parse_array_literal, DataLoader, DatasetContainer};
pub use split::{stratified_split, TrainTestSplit, DEFAULT_SPLIT_SEED};

use crate::error::{ClfBenchError, Result};
use ndarray::Array1;

/// Maps categorical string labels to stable class indices.
///
/// Classes are the sorted unique labels, so the encoding is independent of
/// sample order and identical between train and test subsets.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Learn the class set from a label vector
    pub fn fit(labels: &[String]) -> Self {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Encode labels as class indices (f64, for the classifier interface)
    pub fn transform(&self, labels: &[String]) -> Result<Array1<f64>> {
        labels
            .iter()
            .map(|l| {
                self.classes
                    .binary_search(l)
                    .map(|i| i as f64)
                    .map_err(|_| ClfBenchError::DataError(format!("unknown label '{l}'")))
            })
            .collect()
    }

    /// The learned class set, in encoding order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of distinct classes
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
