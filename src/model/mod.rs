//! Pre-trained probabilistic classifiers behind a single capability trait.

mod logistic;
#[cfg(feature = "onnx")]
mod onnx;

pub use logistic::LogisticClassifier;
#[cfg(feature = "onnx")]
pub use onnx::OnnxClassifier;

use crate::error::ClassifierError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Anything that maps an ordered feature vector to the probability of the anomalous class.
pub trait Classifier: Send + Sync {
    /// Probability in [0, 1] of the positive class for one feature vector.
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError>;

    /// Input width, when the artifact declares one
    fn input_dim(&self) -> Option<usize> {
        None
    }
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        (**self).predict_proba(features)
    }

    fn input_dim(&self) -> Option<usize> {
        (**self).input_dim()
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn predict_proba(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        (**self).predict_proba(features)
    }

    fn input_dim(&self) -> Option<usize> {
        (**self).input_dim()
    }
}

/// Load a classifier, picking the format from the file extension.
pub fn load_classifier(path: &Path) -> Result<Box<dyn Classifier>, ClassifierError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "json" => Ok(Box::new(LogisticClassifier::load(path)?)),
        #[cfg(feature = "onnx")]
        "onnx" => Ok(Box::new(OnnxClassifier::load(path)?)),
        _ => Err(ClassifierError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Check the artifact's SHA-256 against a hex digest before trusting it.
pub fn verify_checksum(path: &Path, expected_hex: &str) -> Result<(), ClassifierError> {
    let bytes = std::fs::read(path).map_err(|e| ClassifierError::Load {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let actual = format!("{:x}", Sha256::digest(&bytes));
    if !actual.eq_ignore_ascii_case(expected_hex.trim()) {
        return Err(ClassifierError::Checksum {
            expected: expected_hex.to_string(),
            actual,
        });
    }
    tracing::debug!(path = %path.display(), "model checksum verified");
    Ok(())
}

/// Reject probabilities a well-behaved classifier cannot produce.
pub(crate) fn check_probability(p: f64) -> Result<f64, ClassifierError> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(ClassifierError::InvalidProbability(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl Classifier for Fixed {
        fn predict_proba(&self, _: &[f64]) -> Result<f64, ClassifierError> {
            Ok(self.0)
        }
    }

    #[test]
    fn boxed_and_borrowed_delegate() {
        let boxed: Box<dyn Classifier> = Box::new(Fixed(0.25));
        assert_eq!(boxed.predict_proba(&[]).unwrap(), 0.25);
        let fixed = Fixed(0.75);
        assert_eq!((&fixed).predict_proba(&[]).unwrap(), 0.75);
    }

    #[test]
    fn probability_bounds() {
        assert!(check_probability(0.0).is_ok());
        assert!(check_probability(1.0).is_ok());
        assert!(check_probability(1.01).is_err());
        assert!(check_probability(f64::NAN).is_err());
    }

    #[test]
    fn unsupported_extension() {
        assert!(matches!(
            load_classifier(Path::new("model.joblib")),
            Err(ClassifierError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn checksum_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, b"abc").unwrap();
        let digest = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";
        assert!(verify_checksum(&path, digest).is_ok());
        assert!(verify_checksum(&path, &digest.to_uppercase()).is_ok());
        assert!(matches!(
            verify_checksum(&path, "00"),
            Err(ClassifierError::Checksum { .. })
        ));
    }
}
