// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing a customer, a prediction,
// and the classifier contract.
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//   - NO clap types

// Categorical enums and the per-submission customer record
pub mod customer;

// Probability, verdict and their rendering
pub mod prediction;

// Abstractions other layers implement
pub mod traits;
