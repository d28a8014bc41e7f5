// ============================================================
// Layer 3 — Prediction and Verdict
// ============================================================
// A churn probability plus the yes/no call derived from it.
//
// Decision rule: probability > 0.5 → likely to churn.
// The comparison is strict, so exactly 0.5 stays "not likely".

use std::fmt;

use serde::Serialize;

/// Probabilities strictly above this are called as churn
pub const CHURN_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    LikelyToChurn,
    NotLikelyToChurn,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::LikelyToChurn    => f.write_str("likely to churn"),
            Verdict::NotLikelyToChurn => f.write_str("not likely to churn"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChurnPrediction {
    pub probability: f64,
    pub verdict:     Verdict,
}

impl ChurnPrediction {
    pub fn from_probability(probability: f64) -> Self {
        let verdict = if probability > CHURN_THRESHOLD {
            Verdict::LikelyToChurn
        } else {
            Verdict::NotLikelyToChurn
        };
        Self { probability, verdict }
    }

    pub fn is_churn(&self) -> bool {
        self.verdict == Verdict::LikelyToChurn
    }

    /// Probability as a percentage with two decimals, e.g. "73.00%"
    pub fn percentage(&self) -> String {
        format!("{:.2}%", self.probability * 100.0)
    }

    /// Two-line human readable report
    pub fn render(&self) -> String {
        let marker = if self.is_churn() { "⚠️" } else { "✅" };
        format!(
            "📊 Churn Probability: {}\n{marker} This customer is {}.",
            self.percentage(),
            self.verdict,
        )
    }
}
