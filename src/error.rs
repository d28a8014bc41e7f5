// ============================================================
// Shared Error Type
// ============================================================
// Typed failures raised by the domain, data and ml layers.
// The application and CLI layers wrap these in anyhow with
// extra context; nothing below them sees anyhow.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChurnError>;

#[derive(Debug, Error)]
pub enum ChurnError {
    /// Artifact missing, corrupt, or written with an unsupported schema
    #[error("cannot load model from '{}': {reason}", path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// Encoder width and model width disagree
    #[error("feature vector has {actual} values but the model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Categorical value outside the field's fixed value set
    #[error("unknown {field} category '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    /// Numeric value outside the range the form allows
    #[error("invalid {field} value {value}: {constraint}")]
    InvalidAttributeValue {
        field:      &'static str,
        value:      f64,
        constraint: &'static str,
    },

    /// Customer records could not be read or parsed
    #[error("cannot read customers from '{}': {reason}", path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// The classifier produced something that is not a probability
    #[error("model returned {0}, which is not a probability in [0, 1]")]
    InvalidModelOutput(f64),
}

impl ChurnError {
    pub fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelLoad { path: path.into(), reason: reason.into() }
    }

    pub fn unknown_category(field: &'static str, value: &str) -> Self {
        Self::UnknownCategory { field, value: value.to_string() }
    }
}
