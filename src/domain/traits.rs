// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The two seams the rest of the system is written against:
//   - CustomerSource   → where customer records come from
//   - ChurnClassifier  → what turns a feature vector into a probability
//
// The predictor wrapper and use cases only see these traits, so a
// test can inject a fixed-probability classifier and a new artifact
// format only has to implement one trait.

use crate::domain::customer::CustomerAttributes;
use crate::error::Result;

// ─── CustomerSource ───────────────────────────────────────────────────────────
/// Anything that can produce validated customer records.
///
/// Implementations:
///   - JsonCustomerLoader → one object or an array of objects in a JSON file
pub trait CustomerSource {
    fn load_all(&self) -> Result<Vec<CustomerAttributes>>;
}

// ─── ChurnClassifier ──────────────────────────────────────────────────────────
/// A pre-trained binary classifier over a fixed-width feature vector.
///
/// Implementations:
///   - TreeEnsemble          → XGBoost JSON model
///   - LogisticChurnModel    → burn checkpoint directory
pub trait ChurnClassifier {
    /// Short name of the artifact format, for diagnostics
    fn kind(&self) -> &'static str;

    /// Number of input features the model was trained on
    fn num_features(&self) -> usize;

    /// Column names recorded with the artifact, if any
    fn feature_names(&self) -> &[String] {
        &[]
    }

    /// Probability of the positive (churn) class.
    /// Fails with ShapeMismatch when `features.len() != self.num_features()`.
    fn predict_probability(&self, features: &[f32]) -> Result<f64>;
}
