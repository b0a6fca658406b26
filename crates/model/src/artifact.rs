//! Classifier artifact deserialization

use crate::svm::{Kernel, SvmClassifier};
use crate::Classifier;
use droughtrisk_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Feature scaler applied before the SVM decision function.
///
/// Standard scaling: `(x - mean) / std`, per feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Scale a feature vector in place.
    pub fn transform(&self, features: &mut [f64]) {
        for (i, f) in features.iter_mut().enumerate() {
            *f = (*f - self.mean[i]) / self.std[i];
        }
    }

    fn validate(&self, feature_len: usize) -> Result<()> {
        if self.mean.len() != feature_len || self.std.len() != feature_len {
            return Err(Error::ModelLoad(format!(
                "Scaler length mismatch: {} means, {} stds, {} features",
                self.mean.len(),
                self.std.len(),
                feature_len
            )));
        }
        if self.std.iter().any(|&s| s <= 0.0 || !s.is_finite()) {
            return Err(Error::ModelLoad(
                "Scaler has a non-positive standard deviation".into(),
            ));
        }
        Ok(())
    }
}

/// The on-disk classifier artifact: scaler plus SVM parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Number of features per pixel the model was trained on
    pub feature_len: usize,
    pub scaler: Scaler,
    pub kernel: Kernel,
    /// Decision function intercept
    pub bias: f64,
}

impl ModelArtifact {
    /// Validate internal consistency and build the classifier.
    pub fn into_classifier(self) -> Result<SvmClassifier> {
        if self.feature_len == 0 {
            return Err(Error::ModelLoad("Model has zero features".into()));
        }
        self.scaler.validate(self.feature_len)?;
        self.kernel.validate(self.feature_len)?;
        Ok(SvmClassifier::new(self))
    }
}

/// Load the classifier artifact from a JSON file.
///
/// Called once at process start; any failure here is fatal
/// ([`Error::ModelLoad`]) and not recoverable per request.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<SvmClassifier> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::ModelLoad(format!("Cannot open {}: {}", path.display(), e))
    })?;
    let artifact: ModelArtifact = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::ModelLoad(format!("Cannot parse {}: {}", path.display(), e)))?;
    artifact.into_classifier()
}

/// Load the classifier artifact from an in-memory JSON buffer.
pub fn load_model_from_slice(data: &[u8]) -> Result<SvmClassifier> {
    let artifact: ModelArtifact = serde_json::from_slice(data)
        .map_err(|e| Error::ModelLoad(format!("Cannot parse model artifact: {}", e)))?;
    artifact.into_classifier()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn linear_artifact_json() -> String {
        serde_json::to_string(&ModelArtifact {
            feature_len: 2,
            scaler: Scaler {
                mean: vec![0.0, 0.0],
                std: vec![1.0, 1.0],
            },
            kernel: Kernel::Linear {
                weights: vec![1.0, -1.0],
            },
            bias: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(linear_artifact_json().as_bytes()).unwrap();

        let model = load_model(file.path()).unwrap();
        assert_eq!(model.feature_len(), 2);
        // Symmetric features cancel: decision value 0 -> probability 0.5
        assert_relative_eq!(model.predict_proba(&[0.3, 0.3]), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn missing_file_is_model_load_error() {
        let err = load_model("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn corrupt_json_is_model_load_error() {
        let err = load_model_from_slice(b"{ definitely not json").unwrap_err();
        assert!(matches!(err, Error::ModelLoad(_)));
    }

    #[test]
    fn scaler_length_mismatch_rejected() {
        let artifact = ModelArtifact {
            feature_len: 3,
            scaler: Scaler {
                mean: vec![0.0, 0.0],
                std: vec![1.0, 1.0],
            },
            kernel: Kernel::Linear {
                weights: vec![1.0, 1.0, 1.0],
            },
            bias: 0.0,
        };
        assert!(matches!(
            artifact.into_classifier(),
            Err(Error::ModelLoad(_))
        ));
    }

    #[test]
    fn zero_std_rejected() {
        let artifact = ModelArtifact {
            feature_len: 1,
            scaler: Scaler {
                mean: vec![0.5],
                std: vec![0.0],
            },
            kernel: Kernel::Linear {
                weights: vec![1.0],
            },
            bias: 0.0,
        };
        assert!(matches!(
            artifact.into_classifier(),
            Err(Error::ModelLoad(_))
        ));
    }
}
