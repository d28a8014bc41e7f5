// ============================================================
// Layer 2 — Inspect Use Case
// ============================================================
// Loads an artifact and compares its input width with the encoder,
// so a deployment can be checked without scoring anyone.

use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::encoder::FEATURE_COUNT;
use crate::ml::inferencer::Predictor;

#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub source:           String,
    pub kind:             &'static str,
    pub model_features:   usize,
    pub encoder_features: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feature_names:    Vec<String>,
}

impl ModelReport {
    pub fn from_predictor(predictor: &Predictor) -> Self {
        Self {
            source:           predictor.source().display().to_string(),
            kind:             predictor.kind(),
            model_features:   predictor.num_features(),
            encoder_features: FEATURE_COUNT,
            feature_names:    predictor.feature_names().to_vec(),
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.model_features == self.encoder_features
    }
}

impl fmt::Display for ModelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model:            {}", self.source)?;
        writeln!(f, "Format:           {}", self.kind)?;
        writeln!(f, "Model features:   {}", self.model_features)?;
        writeln!(f, "Encoder features: {}", self.encoder_features)?;
        if !self.feature_names.is_empty() {
            writeln!(f, "Trained columns:  {}", self.feature_names.join(", "))?;
        }
        write!(
            f,
            "Compatible:       {}",
            if self.is_compatible() { "yes" } else { "NO (predictions will fail)" }
        )
    }
}

pub struct InspectUseCase;

impl InspectUseCase {
    pub fn execute(model_path: &str) -> Result<ModelReport> {
        let predictor = Predictor::load(model_path)
            .with_context(|| format!("Cannot inspect '{model_path}'"))?;
        let report = ModelReport::from_predictor(&predictor);
        if !report.is_compatible() {
            tracing::warn!(
                "Model expects {} features, encoder produces {}",
                report.model_features,
                report.encoder_features
            );
        }
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::tree_ensemble::tests::stump_model;

    fn write_model(dir: &tempfile::TempDir, width: usize) -> String {
        let path = dir.path().join(format!("model_{width}.json"));
        std::fs::write(&path, stump_model(width)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_compatible_model() {
        let tmp = tempfile::tempdir().unwrap();
        let report = InspectUseCase::execute(&write_model(&tmp, 32)).unwrap();
        assert!(report.is_compatible());
        assert_eq!(report.kind, "xgboost-json");
        assert!(report.to_string().contains("Compatible:       yes"));
    }

    #[test]
    fn test_recorded_column_names_are_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("named.json");
        let json = stump_model(32).replace(r#""feature_names": []"#, r#""feature_names": ["Count", "Gender"]"#);
        std::fs::write(&path, json).unwrap();

        let report = InspectUseCase::execute(path.to_str().unwrap()).unwrap();
        assert_eq!(report.feature_names, vec!["Count", "Gender"]);
        assert!(report.to_string().contains("Trained columns:  Count, Gender"));
    }

    #[test]
    fn test_wider_model_is_flagged() {
        let tmp = tempfile::tempdir().unwrap();
        let report = InspectUseCase::execute(&write_model(&tmp, 40)).unwrap();
        assert!(!report.is_compatible());
        assert_eq!(report.model_features, 40);
    }
}
