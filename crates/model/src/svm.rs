//! Support vector machine evaluation

use crate::artifact::ModelArtifact;
use crate::Classifier;
use droughtrisk_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// SVM kernel parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Kernel {
    /// Linear decision function: `w . x + b`
    Linear { weights: Vec<f64> },
    /// RBF decision function: `sum_i a_i * exp(-gamma * |sv_i - x|^2) + b`
    Rbf {
        gamma: f64,
        support_vectors: Vec<Vec<f64>>,
        dual_coefs: Vec<f64>,
    },
}

impl Kernel {
    pub(crate) fn validate(&self, feature_len: usize) -> Result<()> {
        match self {
            Kernel::Linear { weights } => {
                if weights.len() != feature_len {
                    return Err(Error::ModelLoad(format!(
                        "Linear kernel has {} weights for {} features",
                        weights.len(),
                        feature_len
                    )));
                }
            }
            Kernel::Rbf {
                gamma,
                support_vectors,
                dual_coefs,
            } => {
                if *gamma <= 0.0 || !gamma.is_finite() {
                    return Err(Error::ModelLoad(format!("Invalid gamma: {}", gamma)));
                }
                if support_vectors.len() != dual_coefs.len() {
                    return Err(Error::ModelLoad(format!(
                        "{} support vectors but {} dual coefficients",
                        support_vectors.len(),
                        dual_coefs.len()
                    )));
                }
                if support_vectors.iter().any(|sv| sv.len() != feature_len) {
                    return Err(Error::ModelLoad(
                        "Support vector length does not match feature count".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Immutable SVM classifier built from a validated [`ModelArtifact`].
///
/// Produces probabilities by passing the decision value through the
/// logistic sigmoid, matching the exported training pipeline.
#[derive(Debug, Clone)]
pub struct SvmClassifier {
    artifact: ModelArtifact,
}

impl SvmClassifier {
    pub(crate) fn new(artifact: ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Raw decision value for a scaled feature vector.
    fn decision_value(&self, features: &[f64]) -> f64 {
        match &self.artifact.kernel {
            Kernel::Linear { weights } => {
                let dot: f64 = weights.iter().zip(features).map(|(w, x)| w * x).sum();
                dot + self.artifact.bias
            }
            Kernel::Rbf {
                gamma,
                support_vectors,
                dual_coefs,
            } => {
                let sum: f64 = support_vectors
                    .iter()
                    .zip(dual_coefs)
                    .map(|(sv, coef)| {
                        let dist_sq: f64 = sv
                            .iter()
                            .zip(features)
                            .map(|(a, b)| (a - b) * (a - b))
                            .sum();
                        coef * (-gamma * dist_sq).exp()
                    })
                    .sum();
                sum + self.artifact.bias
            }
        }
    }
}

impl Classifier for SvmClassifier {
    fn feature_len(&self) -> usize {
        self.artifact.feature_len
    }

    fn predict_proba(&self, features: &[f64]) -> f64 {
        let mut scaled = features.to_vec();
        self.artifact.scaler.transform(&mut scaled);
        sigmoid(self.decision_value(&scaled))
    }
}

/// Logistic sigmoid: maps any decision value into (0, 1).
fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Scaler;
    use approx::assert_relative_eq;

    fn linear_model(weights: Vec<f64>, bias: f64) -> SvmClassifier {
        let n = weights.len();
        ModelArtifact {
            feature_len: n,
            scaler: Scaler {
                mean: vec![0.0; n],
                std: vec![1.0; n],
            },
            kernel: Kernel::Linear { weights },
            bias,
        }
        .into_classifier()
        .unwrap()
    }

    #[test]
    fn sigmoid_endpoints() {
        assert_relative_eq!(sigmoid(0.0), 0.5, epsilon = 1e-12);
        assert!(sigmoid(30.0) > 0.999_999);
        assert!(sigmoid(-30.0) < 1e-6);
    }

    #[test]
    fn linear_decision_probability() {
        let model = linear_model(vec![2.0, -1.0], 0.5);
        // decision = 2*1 - 1*2 + 0.5 = 0.5
        let p = model.predict_proba(&[1.0, 2.0]);
        assert_relative_eq!(p, sigmoid(0.5), epsilon = 1e-12);
    }

    #[test]
    fn scaler_is_applied_before_decision() {
        let model = ModelArtifact {
            feature_len: 1,
            scaler: Scaler {
                mean: vec![10.0],
                std: vec![2.0],
            },
            kernel: Kernel::Linear {
                weights: vec![1.0],
            },
            bias: 0.0,
        }
        .into_classifier()
        .unwrap();

        // (10 - 10) / 2 = 0 -> probability 0.5
        assert_relative_eq!(model.predict_proba(&[10.0]), 0.5, epsilon = 1e-12);
        // (14 - 10) / 2 = 2 -> sigmoid(2)
        assert_relative_eq!(model.predict_proba(&[14.0]), sigmoid(2.0), epsilon = 1e-12);
    }

    #[test]
    fn rbf_decision_probability() {
        let model = ModelArtifact {
            feature_len: 1,
            scaler: Scaler {
                mean: vec![0.0],
                std: vec![1.0],
            },
            kernel: Kernel::Rbf {
                gamma: 1.0,
                support_vectors: vec![vec![0.0]],
                dual_coefs: vec![1.0],
            },
            bias: 0.0,
        }
        .into_classifier()
        .unwrap();

        // At the support vector: decision = exp(0) = 1
        assert_relative_eq!(model.predict_proba(&[0.0]), sigmoid(1.0), epsilon = 1e-12);
        // Far away the kernel vanishes: decision -> 0
        assert_relative_eq!(model.predict_proba(&[100.0]), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn probabilities_stay_in_unit_interval() {
        let model = linear_model(vec![5.0; 10], -3.0);
        for scale in [-100.0, -1.0, 0.0, 1.0, 100.0] {
            let p = model.predict_proba(&[scale; 10]);
            assert!((0.0..=1.0).contains(&p), "probability {} out of range", p);
        }
    }

    #[test]
    fn rbf_mismatched_coefs_rejected() {
        let artifact = ModelArtifact {
            feature_len: 1,
            scaler: Scaler {
                mean: vec![0.0],
                std: vec![1.0],
            },
            kernel: Kernel::Rbf {
                gamma: 0.5,
                support_vectors: vec![vec![0.0], vec![1.0]],
                dual_coefs: vec![1.0],
            },
            bias: 0.0,
        };
        assert!(artifact.into_classifier().is_err());
    }
}
