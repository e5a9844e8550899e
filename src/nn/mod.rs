//! The patch classifier: a fixed two-layer network.
//!
//! One hidden ReLU layer, a linear output layer, softmax cross-entropy
//! loss with L2 penalty, plain SGD updates. Input and output width are
//! both the flattened window length: column p of the output scores the
//! claim "window position p conceals a mine".

pub mod classifier;

pub use classifier::{Gradients, PatchClassifier};
