// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From customer records to the numeric vector the model reads:
//
//   JSON file / CLI flags
//       │
//       ▼
//   JsonCustomerLoader  → raw strings → CustomerAttributes (validated)
//       │
//       ▼
//   encoder::encode     → FeatureVector → [f32; 32]

/// Reads customer records from JSON files
pub mod loader;

/// Categorical-to-numeric feature encoding
pub mod encoder;
