// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates encoder, predictor and decision rule. No model
// math and no printing here; the CLI layer renders results.

// Score customers against a loaded model
pub mod predict_use_case;

// Describe an artifact and check it against the encoder
pub mod inspect_use_case;
