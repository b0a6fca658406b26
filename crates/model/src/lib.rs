//! # Droughtrisk Model
//!
//! Loading and evaluation of the pre-trained drought-risk classifier.
//!
//! The artifact is a JSON file holding the feature scaler and the support
//! vector machine exported from the training pipeline. It is loaded once at
//! process start and never mutated; evaluation is stateless, so a single
//! instance can serve every request.

mod artifact;
mod svm;

pub use artifact::{load_model, load_model_from_slice, ModelArtifact, Scaler};
pub use svm::{Kernel, SvmClassifier};

/// A pre-trained classifier mapping one feature vector to a probability.
///
/// Implementations must be pure: the same feature vector always yields the
/// same probability, and evaluation never mutates the classifier. This is
/// what makes chunked evaluation equivalent to whole-image evaluation.
pub trait Classifier {
    /// Number of features expected per pixel (band count minus one).
    fn feature_len(&self) -> usize;

    /// Probability in [0, 1] for one pixel's feature vector.
    fn predict_proba(&self, features: &[f64]) -> f64;
}
