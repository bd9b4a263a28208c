//! Logistic regression classifier (one-vs-rest for multiclass)

use crate::error::{ClfBenchError, Result};
use crate::models::Classifier;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// L2-regularized logistic regression trained with gradient descent.
///
/// Multiclass problems are handled one-vs-rest: one binary sub-model per
/// class, argmax over class scores at prediction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// L2 regularization strength (1/C)
    pub alpha: f64,
    /// Gradient descent iteration cap
    pub max_iter: usize,
    /// Convergence tolerance on the gradient norm
    pub tol: f64,
    /// Gradient descent step size
    pub learning_rate: f64,
    classes: Vec<i64>,
    coefficients: Vec<Array1<f64>>,
    intercepts: Vec<f64>,
    is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            alpha: 0.01,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
            classes: Vec::new(),
            coefficients: Vec::new(),
            intercepts: Vec::new(),
            is_fitted: false,
        }
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit one binary sub-problem: y_bin holds 1.0 for the positive class
    fn fit_binary(&self, x: &Array2<f64>, y_bin: &Array1<f64>) -> (Array1<f64>, f64) {
        let n_samples = x.nrows() as f64;
        let mut weights: Array1<f64> = Array1::zeros(x.ncols());
        let mut bias = 0.0;

        for _ in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - y_bin;
            let dw = (x.t().dot(&errors) / n_samples) + (self.alpha * &weights);
            let db = errors.mean().unwrap_or(0.0);

            let grad_norm = (dw.mapv(|v| v * v).sum() + db * db).sqrt();
            if grad_norm < self.tol {
                break;
            }

            weights = weights - self.learning_rate * dw;
            bias -= self.learning_rate * db;
        }

        (weights, bias)
    }

    /// Per-class positive scores, one column per class
    fn class_scores(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ClfBenchError::ModelNotFitted);
        }

        let mut scores = Array2::zeros((x.nrows(), self.classes.len()));
        for (c, (w, &b)) in self
            .coefficients
            .iter()
            .zip(self.intercepts.iter())
            .enumerate()
        {
            let linear = x.dot(w) + b;
            let proba = Self::sigmoid(&linear);
            scores.column_mut(c).assign(&proba);
        }
        Ok(scores)
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ClfBenchError::ShapeError {
                expected: format!("y length = {}", x.nrows()),
                actual: format!("y length = {}", y.len()),
            });
        }

        let mut classes: Vec<i64> = y.iter().map(|&v| v.round() as i64).collect();
        classes.sort_unstable();
        classes.dedup();

        let mut coefficients = Vec::with_capacity(classes.len());
        let mut intercepts = Vec::with_capacity(classes.len());

        for &class in &classes {
            let y_bin: Array1<f64> =
                y.mapv(|v| if v.round() as i64 == class { 1.0 } else { 0.0 });
            let (w, b) = self.fit_binary(x, &y_bin);
            coefficients.push(w);
            intercepts.push(b);
        }

        self.classes = classes;
        self.coefficients = coefficients;
        self.intercepts = intercepts;
        self.is_fitted = true;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let scores = self.class_scores(x)?;

        let predictions: Vec<f64> = (0..scores.nrows())
            .map(|i| {
                let row = scores.row(i);
                let mut best = 0usize;
                for (c, &s) in row.iter().enumerate() {
                    if s > row[best] {
                        best = c;
                    }
                }
                self.classes[best] as f64
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_binary_separable() {
        let x = array![
            [0.0, 0.0],
            [0.2, 0.1],
            [0.1, 0.3],
            [0.3, 0.2],
            [5.0, 5.0],
            [5.2, 4.9],
            [4.8, 5.1],
            [5.1, 5.2],
        ];
        let y = array![0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0];

        let mut lr = LogisticRegression::new();
        lr.fit(&x, &y).unwrap();
        let preds = lr.predict(&x).unwrap();
        assert_eq!(preds.to_vec(), y.to_vec());
    }

    #[test]
    fn test_multiclass_one_vs_rest() {
        let x = array![
            [0.0, 0.0],
            [0.2, 0.2],
            [0.1, 0.0],
            [10.0, 0.0],
            [10.2, 0.1],
            [9.9, 0.2],
            [0.0, 10.0],
            [0.1, 10.2],
            [0.2, 9.9],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0];

        let mut lr = LogisticRegression::new().with_max_iter(2000);
        lr.fit(&x, &y).unwrap();
        let preds = lr.predict(&x).unwrap();

        let correct = preds
            .iter()
            .zip(y.iter())
            .filter(|(p, t)| (*p - *t).abs() < 0.5)
            .count();
        assert!(correct >= 8, "only {correct}/9 correct");
    }

    #[test]
    fn test_predict_before_fit_fails() {
        let lr = LogisticRegression::new();
        let err = lr.predict(&array![[1.0]]).unwrap_err();
        assert!(matches!(err, ClfBenchError::ModelNotFitted));
    }

    #[test]
    fn test_builder_overrides() {
        let lr = LogisticRegression::new()
            .with_alpha(0.5)
            .with_max_iter(500)
            .with_learning_rate(0.05);
        assert_eq!(lr.max_iter, 500);
        assert!((lr.alpha - 0.5).abs() < 1e-12);
    }
}
