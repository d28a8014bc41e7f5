// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Restores the logistic churn model from a checkpoint directory.
//
// Directory layout:
//   checkpoint/
//     manifest.json   ← format tag, schema version, feature count
//     model.<ext>     ← burn CompactRecorder record (weights); the
//                       extension is whatever the recorder reports
//
// The manifest is read first so the architecture can be rebuilt
// before the weights are loaded into it. Loading is refused when
//   - either file is missing or unreadable
//   - the format tag is not "burn-logistic"
//   - schema_version is not the one this build understands
//   - the restored weight matrix disagrees with num_features

use std::{
    fs,
    path::PathBuf,
};

use burn::{
    module::Module,
    record::{CompactRecorder, FileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};
use crate::ml::logistic::{InferBackend, InferDevice, LogisticChurnConfig, LogisticClassifier};

pub const MANIFEST_FILE: &str = "manifest.json";
/// Record stem; the recorder appends its own extension
pub const RECORD_STEM: &str = "model";

pub const FORMAT_TAG: &str = "burn-logistic";
pub const SCHEMA_VERSION: u32 = 1;

/// Everything needed to rebuild the model before loading weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub format:         String,
    pub schema_version: u32,
    pub num_features:   usize,
}

#[cfg(test)]
impl ArtifactManifest {
    pub fn new(num_features: usize) -> Self {
        Self { format: FORMAT_TAG.to_string(), schema_version: SCHEMA_VERSION, num_features }
    }
}

/// Reads (and in tests, writes) one checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the weight file as the recorder writes it
    pub fn record_path(&self) -> PathBuf {
        let ext = <CompactRecorder as FileRecorder<InferBackend>>::file_extension();
        self.dir.join(RECORD_STEM).with_extension(ext)
    }

    fn load_error(&self, reason: impl Into<String>) -> ChurnError {
        ChurnError::model_load(&self.dir, reason)
    }

    /// Read and check manifest.json.
    pub fn load_manifest(&self) -> Result<ArtifactManifest> {
        let path = self.dir.join(MANIFEST_FILE);
        let json = fs::read_to_string(&path)
            .map_err(|e| self.load_error(format!("cannot read {MANIFEST_FILE}: {e}")))?;
        let manifest: ArtifactManifest = serde_json::from_str(&json)
            .map_err(|e| self.load_error(format!("malformed {MANIFEST_FILE}: {e}")))?;

        if manifest.format != FORMAT_TAG {
            return Err(self.load_error(format!(
                "unsupported format '{}' (expected '{FORMAT_TAG}')",
                manifest.format
            )));
        }
        if manifest.schema_version != SCHEMA_VERSION {
            return Err(self.load_error(format!(
                "schema version {} is not supported (expected {SCHEMA_VERSION})",
                manifest.schema_version
            )));
        }
        if manifest.num_features == 0 {
            return Err(self.load_error("manifest declares zero features"));
        }
        Ok(manifest)
    }

    /// Rebuild the architecture from the manifest and restore its weights.
    pub fn load_classifier(&self) -> Result<LogisticClassifier> {
        let manifest = self.load_manifest()?;

        let record_path = self.record_path();
        if !record_path.is_file() {
            return Err(self.load_error(format!("{} not found", record_path.display())));
        }

        let device = InferDevice::default();
        let model = LogisticChurnConfig::new(manifest.num_features).init::<InferBackend>(&device);
        let record = CompactRecorder::new()
            .load(self.dir.join(RECORD_STEM), &device)
            .map_err(|e| self.load_error(format!("cannot read weights: {e}")))?;
        let model = model.load_record(record);

        let width = model.input_width();
        if width != manifest.num_features {
            return Err(self.load_error(format!(
                "weights expect {width} features but the manifest declares {}",
                manifest.num_features
            )));
        }

        tracing::info!(
            "Restored logistic model ({} features) from '{}'",
            width,
            self.dir.display()
        );
        Ok(LogisticClassifier::new(model, device))
    }

    /// Write a checkpoint; the offline exporter's counterpart of `load_classifier`.
    #[cfg(test)]
    pub fn save(
        &self,
        model: &crate::ml::logistic::LogisticChurnModel<InferBackend>,
        manifest: &ArtifactManifest,
    ) -> anyhow::Result<()> {
        use anyhow::Context;

        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(MANIFEST_FILE), serde_json::to_string_pretty(manifest)?)
            .with_context(|| format!("Cannot write manifest to '{}'", self.dir.display()))?;
        CompactRecorder::new()
            .record(model.clone().into_record(), self.dir.join(RECORD_STEM))
            .with_context(|| format!("Cannot write weights to '{}'", self.dir.display()))?;
        Ok(())
    }
}
