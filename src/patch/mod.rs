//! Sliding-window patch extraction.
//!
//! The board is encoded for the classifier as a batch of overlapping k×k
//! windows rather than one flat tensor: each window becomes a feature row,
//! each ground-truth mine inside a window becomes a position label, and
//! the inverse index mapping folds per-window scores back onto cells.

pub mod extractor;

pub use extractor::{labeled_batch, PatchExtractor};
