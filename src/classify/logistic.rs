//! L2-regularized binary logistic regression.
//!
//! Fitted by full-batch gradient descent from a zero initialization, so
//! training is deterministic for a given design matrix.

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Gradient-descent settings for one binary fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitConfig {
    /// L2 penalty strength.
    pub l2: f64,
    /// Gradient-descent step size.
    pub learning_rate: f64,
    /// Maximum number of full-batch passes.
    pub max_epochs: usize,
    /// Stop early once the gradient norm falls below this.
    pub tolerance: f64,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            l2: 1.0,
            learning_rate: 0.5,
            max_epochs: 500,
            tolerance: 1e-5,
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// A fitted binary logistic model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryLogistic {
    weights: Vec<f64>,
    bias: f64,
}

impl BinaryLogistic {
    /// Fit on a design matrix `x` (rows = samples) and 0/1 targets `y`.
    ///
    /// The bias term is not regularized.
    pub fn fit(x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>, config: &FitConfig) -> Self {
        let (n, d) = x.dim();
        let n_f = n.max(1) as f64;

        // The ridge term scales weights by (1 - step * l2 / n) each pass;
        // that factor must stay inside (0, 1) or strong regularization
        // oscillates instead of shrinking. Damping the step by the ridge
        // strength keeps step * l2 / n below 1 for every l2 in the grid.
        let step = config.learning_rate / (1.0 + config.learning_rate * config.l2 / n_f);

        let mut weights: Array1<f64> = Array1::zeros(d);
        let mut bias = 0.0_f64;

        for _ in 0..config.max_epochs {
            let z = x.dot(&weights) + bias;
            let p = z.mapv(sigmoid);
            let err = &p - &y;

            let mut grad_w = x.t().dot(&err) / n_f;
            grad_w = grad_w + &weights * (config.l2 / n_f);
            let grad_b = err.sum() / n_f;

            let grad_norm = grad_w.dot(&grad_w).sqrt() + grad_b.abs();

            weights = weights - &grad_w * step;
            bias -= grad_b * step;

            if grad_norm < config.tolerance {
                break;
            }
        }

        Self {
            weights: weights.to_vec(),
            bias,
        }
    }

    /// Number of features this model was fitted on.
    pub fn feature_len(&self) -> usize {
        self.weights.len()
    }

    /// Probability of the positive class for each row of `x`.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let w = ArrayView1::from(self.weights.as_slice());
        (x.dot(&w) + self.bias).mapv(sigmoid)
    }
}
