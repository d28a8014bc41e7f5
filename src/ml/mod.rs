// ============================================================
// Layer 5 — ML Layer
// ============================================================
// Every classifier backend and the wrapper in front of them.
// burn is only imported here and in infra/checkpoint.rs.
//
//   tree_ensemble.rs — XGBoost JSON gradient-boosted trees
//   logistic.rs      — burn logistic model (Linear + sigmoid)
//   inferencer.rs    — Predictor: load once, check width, predict

/// Native evaluation of XGBoost JSON models
pub mod tree_ensemble;

/// Logistic churn model on the burn ndarray backend
pub mod logistic;

/// The predictor wrapper used by the application layer
pub mod inferencer;
