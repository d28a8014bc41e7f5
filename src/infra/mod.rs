// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Artifact persistence that the ml layer builds on:
//
//   checkpoint.rs — burn checkpoint directories (manifest.json +
//                   CompactRecorder weights) for the logistic model
//
// The XGBoost JSON format needs no infrastructure beyond reading
// one file, so it lives entirely in ml/tree_ensemble.rs.

/// Checkpoint manifest and weight loading
pub mod checkpoint;
