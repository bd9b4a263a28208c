//! Classification metrics
//!
//! Accuracy plus support-weighted precision, recall and F1 over the classes
//! present in the true labels. Per-class scores with a zero denominator
//! contribute 0.0, so degenerate predictions never poison the aggregate.

use crate::error::{ClfBenchError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregate scores for one model evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationMetrics {
    /// Compute accuracy and support-weighted precision/recall/F1.
    ///
    /// Classes are taken from `y_true`; a class predicted but never present in
    /// the truth contributes false positives to the classes it displaces but
    /// gets no weight of its own.
    pub fn weighted(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<Self> {
        if y_true.len() != y_pred.len() {
            return Err(ClfBenchError::ShapeError {
                expected: format!("predictions length = {}", y_true.len()),
                actual: format!("predictions length = {}", y_pred.len()),
            });
        }
        if y_true.is_empty() {
            return Err(ClfBenchError::DataError(
                "cannot score an empty evaluation set".to_string(),
            ));
        }

        let n = y_true.len() as f64;
        let truth: Vec<i64> = y_true.iter().map(|&v| v.round() as i64).collect();
        let preds: Vec<i64> = y_pred.iter().map(|&v| v.round() as i64).collect();

        let correct = truth.iter().zip(preds.iter()).filter(|(t, p)| t == p).count();
        let accuracy = correct as f64 / n;

        let mut support: HashMap<i64, usize> = HashMap::new();
        for &t in &truth {
            *support.entry(t).or_insert(0) += 1;
        }

        let mut tp: HashMap<i64, usize> = HashMap::new();
        let mut fp: HashMap<i64, usize> = HashMap::new();
        let mut fn_: HashMap<i64, usize> = HashMap::new();
        for (&t, &p) in truth.iter().zip(preds.iter()) {
            if t == p {
                *tp.entry(t).or_insert(0) += 1;
            } else {
                *fp.entry(p).or_insert(0) += 1;
                *fn_.entry(t).or_insert(0) += 1;
            }
        }

        let mut precision = 0.0;
        let mut recall = 0.0;
        let mut f1 = 0.0;
        for (&class, &count) in &support {
            let weight = count as f64 / n;
            let tp_c = *tp.get(&class).unwrap_or(&0) as f64;
            let fp_c = *fp.get(&class).unwrap_or(&0) as f64;
            let fn_c = *fn_.get(&class).unwrap_or(&0) as f64;

            let p_c = if tp_c + fp_c > 0.0 { tp_c / (tp_c + fp_c) } else { 0.0 };
            let r_c = if tp_c + fn_c > 0.0 { tp_c / (tp_c + fn_c) } else { 0.0 };
            let f_c = if p_c + r_c > 0.0 {
                2.0 * p_c * r_c / (p_c + r_c)
            } else {
                0.0
            };

            precision += weight * p_c;
            recall += weight * r_c;
            f1 += weight * f_c;
        }

        Ok(Self {
            accuracy,
            precision,
            recall,
            f1,
        })
    }
}
