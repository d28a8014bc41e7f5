// ============================================================
// Layer 5 — Predictor
// ============================================================
// Wraps whichever classifier artifact was deployed. Loaded once at
// startup, then shared read-only by every prediction.
//
//   path is a directory → burn checkpoint (logistic model)
//   path is a file      → XGBoost JSON tree ensemble
//
// The wrapper adds exactly two checks around the model call:
//   before: vector width == model width     (ShapeMismatch)
//   after:  output is a finite value in [0,1] (InvalidModelOutput)

use std::path::{Path, PathBuf};

use crate::domain::traits::ChurnClassifier;
use crate::error::{ChurnError, Result};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::tree_ensemble::TreeEnsemble;

pub struct Predictor {
    classifier: Box<dyn ChurnClassifier>,
    source:     PathBuf,
}

impl Predictor {
    /// Load the artifact at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ChurnError::model_load(path, "no such file or directory"));
        }

        let classifier: Box<dyn ChurnClassifier> = if path.is_dir() {
            Box::new(CheckpointManager::new(path).load_classifier()?)
        } else {
            Box::new(TreeEnsemble::from_json_file(path)?)
        };

        tracing::info!(
            "Model loaded from '{}' ({}, {} features)",
            path.display(),
            classifier.kind(),
            classifier.num_features()
        );
        Ok(Self::from_classifier(classifier, path))
    }

    /// Wrap an already constructed classifier.
    pub fn from_classifier(classifier: Box<dyn ChurnClassifier>, source: impl Into<PathBuf>) -> Self {
        Self { classifier, source: source.into() }
    }

    pub fn kind(&self) -> &'static str {
        self.classifier.kind()
    }

    pub fn num_features(&self) -> usize {
        self.classifier.num_features()
    }

    pub fn feature_names(&self) -> &[String] {
        self.classifier.feature_names()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Churn probability for one encoded customer.
    pub fn predict_probability(&self, features: &[f32]) -> Result<f64> {
        let expected = self.classifier.num_features();
        if features.len() != expected {
            tracing::error!(
                "Feature vector width {} does not match model width {}",
                features.len(),
                expected
            );
            return Err(ChurnError::ShapeMismatch { expected, actual: features.len() });
        }

        let p = self.classifier.predict_probability(features)?;
        if !(0.0..=1.0).contains(&p) {
            return Err(ChurnError::InvalidModelOutput(p));
        }

        tracing::debug!("Predicted churn probability {:.4}", p);
        Ok(p)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::tree_ensemble::tests::stump_model;

    struct Fixed {
        width: usize,
        p:     f64,
    }

    impl ChurnClassifier for Fixed {
        fn kind(&self) -> &'static str {
            "fixed"
        }
        fn num_features(&self) -> usize {
            self.width
        }
        fn predict_probability(&self, _features: &[f32]) -> Result<f64> {
            Ok(self.p)
        }
    }

    #[test]
    fn test_shape_mismatch_is_reported_not_padded() {
        let predictor = Predictor::from_classifier(Box::new(Fixed { width: 32, p: 0.4 }), "fixed");
        assert!(matches!(
            predictor.predict_probability(&[0.0; 31]),
            Err(ChurnError::ShapeMismatch { expected: 32, actual: 31 })
        ));
        assert!(predictor.predict_probability(&[0.0; 33]).is_err());
        assert_eq!(predictor.predict_probability(&[0.0; 32]).unwrap(), 0.4);
    }

    #[test]
    fn test_rejects_non_probability_output() {
        for bad in [1.5, -0.1, f64::NAN] {
            let predictor = Predictor::from_classifier(Box::new(Fixed { width: 2, p: bad }), "fixed");
            assert!(matches!(
                predictor.predict_probability(&[0.0, 0.0]),
                Err(ChurnError::InvalidModelOutput(_))
            ));
        }
    }

    #[test]
    fn test_missing_artifact() {
        let err = Predictor::load("/nonexistent/churn_model.json").err().unwrap();
        assert!(matches!(err, ChurnError::ModelLoad { .. }));
    }

    #[test]
    fn test_loads_json_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("churn_model.json");
        std::fs::write(&path, stump_model(32)).unwrap();

        let predictor = Predictor::load(&path).unwrap();
        assert_eq!(predictor.kind(), "xgboost-json");
        assert_eq!(predictor.num_features(), 32);
        assert_eq!(predictor.source(), path.as_path());
    }

    #[test]
    fn test_corrupt_file_is_a_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("churn_model.json");
        std::fs::write(&path, b"\x80\x04pickle").unwrap();
        assert!(matches!(Predictor::load(&path), Err(ChurnError::ModelLoad { .. })));
    }

    #[test]
    fn test_directory_without_manifest_is_a_load_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(matches!(Predictor::load(tmp.path()), Err(ChurnError::ModelLoad { .. })));
    }
}
