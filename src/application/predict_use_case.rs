// ============================================================
// Layer 2 — Predict Use Case
// ============================================================
// form values → encode → predictor → probability → verdict
//
// The predictor is loaded once in `new` and reused for every
// customer assessed through this use case.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::data::encoder::{self, FeatureVector, NamedFeature};
use crate::domain::customer::CustomerAttributes;
use crate::domain::prediction::ChurnPrediction;
use crate::domain::traits::CustomerSource;
use crate::ml::inferencer::Predictor;

/// Outcome of scoring one customer
#[derive(Debug, Clone)]
pub struct ChurnAssessment {
    pub features:   FeatureVector,
    pub prediction: ChurnPrediction,
}

/// JSON shape of an assessment for `--json` output
#[derive(Debug, Serialize)]
pub struct AssessmentReport {
    #[serde(flatten)]
    pub prediction: ChurnPrediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features:   Option<Vec<NamedFeature>>,
}

impl ChurnAssessment {
    pub fn report(&self, with_features: bool) -> AssessmentReport {
        AssessmentReport {
            prediction: self.prediction,
            features:   with_features.then(|| self.features.named()),
        }
    }
}

pub struct PredictUseCase {
    predictor: Predictor,
}

impl PredictUseCase {
    pub fn new(model_path: &str) -> Result<Self> {
        let predictor = Predictor::load(model_path)
            .with_context(|| "Model could not be loaded; refusing to start")?;
        tracing::warn!(
            "CLTV is not available at inference time and is encoded as 0; \
             predictions ignore the model's lifetime-value signal"
        );
        Ok(Self::with_predictor(predictor))
    }

    pub fn with_predictor(predictor: Predictor) -> Self {
        Self { predictor }
    }

    /// Score one customer.
    pub fn assess(&self, customer: &CustomerAttributes) -> Result<ChurnAssessment> {
        let features = encoder::encode(customer).context("Customer attributes rejected")?;
        let probability = self
            .predictor
            .predict_probability(&features.to_array())
            .context("Prediction failed")?;
        let prediction = ChurnPrediction::from_probability(probability);

        tracing::info!(
            "Churn probability {} → {}",
            prediction.percentage(),
            prediction.verdict
        );
        Ok(ChurnAssessment { features, prediction })
    }

    /// Score every customer a source yields, in order. Stops at the first failure.
    pub fn assess_all(&self, source: &dyn CustomerSource) -> Result<Vec<ChurnAssessment>> {
        let customers = source.load_all().context("Cannot load customers")?;
        customers
            .iter()
            .enumerate()
            .map(|(i, c)| self.assess(c).with_context(|| format!("Customer #{}", i + 1)))
            .collect()
    }
}
