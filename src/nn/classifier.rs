//! Two-layer classifier over patch batches.

use ndarray::{Array1, Array2, Axis, Zip};

use crate::core::GameRng;

/// Half-width of the uniform weight initialisation interval.
const INIT_SCALE: f32 = 1e-3;

/// Gradients of the loss with respect to every parameter.
///
/// Produced by one backward pass, consumed by one [`PatchClassifier::step`],
/// never retained.
#[derive(Clone, Debug)]
pub struct Gradients {
    pub w1: Array2<f32>,
    pub b1: Array1<f32>,
    pub w2: Array2<f32>,
    pub b2: Array1<f32>,
}

/// Two-layer feed-forward classifier.
///
/// `input_dim → hidden_dim` with ReLU, then `hidden_dim → output_dim`
/// linear. For the patch pipeline both `input_dim` and `output_dim` are
/// the flattened window length (9 for 3×3 windows).
#[derive(Clone, Debug)]
pub struct PatchClassifier {
    w1: Array2<f32>,
    b1: Array1<f32>,
    w2: Array2<f32>,
    b2: Array1<f32>,
}

impl PatchClassifier {
    /// Create a classifier with small uniform random weights (±[`INIT_SCALE`])
    /// and zero biases, drawn from the injected RNG.
    #[must_use]
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut GameRng,
    ) -> Self {
        assert!(input_dim > 0 && hidden_dim > 0 && output_dim > 0);
        let mut init = |rows: usize, cols: usize| {
            Array2::from_shape_fn((rows, cols), |_| {
                (rng.gen_f32() * 2.0 - 1.0) * INIT_SCALE
            })
        };
        let w1 = init(input_dim, hidden_dim);
        let w2 = init(hidden_dim, output_dim);
        Self {
            w1,
            b1: Array1::zeros(hidden_dim),
            w2,
            b2: Array1::zeros(output_dim),
        }
    }

    /// Number of input features per row.
    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.w1.nrows()
    }

    /// Number of output classes per row.
    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.w2.ncols()
    }

    /// Forward pass: `relu(x·w1 + b1)·w2 + b2`.
    ///
    /// Returns raw per-class scores, one row per input row.
    #[must_use]
    pub fn forward(&self, x: &Array2<f32>) -> Array2<f32> {
        debug_assert_eq!(x.ncols(), self.input_dim());
        let hidden = (x.dot(&self.w1) + &self.b1).mapv(|v| v.max(0.0));
        hidden.dot(&self.w2) + &self.b2
    }

    /// Forward pass plus row-wise softmax: per-row class probabilities.
    #[must_use]
    pub fn predict(&self, x: &Array2<f32>) -> Array2<f32> {
        softmax_rows(&self.forward(x))
    }

    /// Softmax cross-entropy loss and gradients over a labeled batch.
    ///
    /// `labels[i]` is the class index of row `i`. The loss is the mean
    /// negative log-probability of each row's class plus
    /// `reg · (Σw1² + Σw2²)`.
    ///
    /// Returns `None` for an empty batch: the row-max/softmax of a
    /// zero-row matrix is undefined, and an empty batch carries nothing
    /// to learn from.
    #[must_use]
    pub fn loss(&self, x: &Array2<f32>, labels: &[usize], reg: f32) -> Option<(f32, Gradients)> {
        let n = x.nrows();
        if n == 0 {
            return None;
        }
        assert_eq!(n, labels.len(), "one label per batch row");
        debug_assert_eq!(x.ncols(), self.input_dim());
        let nf = n as f32;

        // Forward, keeping the pre-activation for the ReLU mask.
        let pre = x.dot(&self.w1) + &self.b1;
        let hidden = pre.mapv(|v| v.max(0.0));
        let scores = hidden.dot(&self.w2) + &self.b2;
        let probs = softmax_rows(&scores);

        let mut data_loss = 0.0;
        for (i, &label) in labels.iter().enumerate() {
            assert!(label < self.output_dim(), "label {} out of range", label);
            data_loss -= probs[[i, label]].ln();
        }
        data_loss /= nf;
        let reg_loss = reg * (sum_of_squares(&self.w1) + sum_of_squares(&self.w2));
        let loss = data_loss + reg_loss;

        // Backward: softmax probabilities minus one-hot labels, through the
        // linear output layer, the ReLU mask, and the linear input layer.
        let mut d_out = probs;
        for (i, &label) in labels.iter().enumerate() {
            d_out[[i, label]] -= 1.0;
        }

        let dw2 = hidden.t().dot(&d_out) / nf + &self.w2 * reg;
        let db2 = d_out.sum_axis(Axis(0)) / nf;

        let mut d_hidden = d_out.dot(&self.w2.t());
        Zip::from(&mut d_hidden).and(&pre).for_each(|d, &p| {
            if p <= 0.0 {
                *d = 0.0;
            }
        });

        let dw1 = x.t().dot(&d_hidden) / nf + &self.w1 * reg;
        let db1 = d_hidden.sum_axis(Axis(0)) / nf;

        Some((
            loss,
            Gradients {
                w1: dw1,
                b1: db1,
                w2: dw2,
                b2: db2,
            },
        ))
    }

    /// One plain gradient-descent update: `param −= learning_rate · grad`.
    pub fn step(&mut self, grads: &Gradients, learning_rate: f32) {
        self.w1.scaled_add(-learning_rate, &grads.w1);
        self.b1.scaled_add(-learning_rate, &grads.b1);
        self.w2.scaled_add(-learning_rate, &grads.w2);
        self.b2.scaled_add(-learning_rate, &grads.b2);
    }
}

fn sum_of_squares(m: &Array2<f32>) -> f32 {
    m.iter().map(|&v| v * v).sum()
}

/// Numerically stable row-wise softmax: subtract each row's max before
/// exponentiating.
fn softmax_rows(scores: &Array2<f32>) -> Array2<f32> {
    debug_assert!(scores.nrows() > 0);
    let maxes = scores.map_axis(Axis(1), |row| {
        row.fold(f32::NEG_INFINITY, |m, &v| m.max(v))
    });
    let shifted = scores - &maxes.insert_axis(Axis(1));
    let exp = shifted.mapv(f32::exp);
    let sums = exp.sum_axis(Axis(1));
    exp / &sums.insert_axis(Axis(1))
}
