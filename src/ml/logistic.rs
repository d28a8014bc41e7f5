// ============================================================
// Layer 5 — Logistic Churn Model (Burn)
// ============================================================
// A single linear layer followed by a sigmoid:
//
//   p(churn) = σ(w · x + b)      w: [num_features, 1], b: [1]
//
// Weights live in a burn record produced offline; this module
// only rebuilds the architecture and runs the forward pass.
// Inference runs on the CPU ndarray backend.

use burn::{
    nn::{Initializer, Linear, LinearConfig},
    prelude::*,
};

use crate::domain::traits::ChurnClassifier;
// Not imported as `Result`: the Config derive expands to a two-argument `Result`.
use crate::error::ChurnError;

pub type InferBackend = burn::backend::NdArray;
pub type InferDevice  = burn::backend::ndarray::NdArrayDevice;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct LogisticChurnConfig {
    pub num_features: usize,
}

impl LogisticChurnConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LogisticChurnModel<B> {
        // Weights are overwritten by the record; zeros keep an
        // un-restored model at a neutral 0.5.
        let linear = LinearConfig::new(self.num_features, 1)
            .with_initializer(Initializer::Zeros)
            .init(device);
        LogisticChurnModel { linear }
    }
}

#[derive(Module, Debug)]
pub struct LogisticChurnModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> LogisticChurnModel<B> {
    /// features: [batch, num_features] → probabilities: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        burn::tensor::activation::sigmoid(self.linear.forward(features))
    }

    /// Input width read from the weight matrix itself
    pub fn input_width(&self) -> usize {
        let [d_input, _d_output] = self.linear.weight.val().dims();
        d_input
    }
}

/// A restored logistic model bound to the device it runs on.
pub struct LogisticClassifier {
    model:  LogisticChurnModel<InferBackend>,
    device: InferDevice,
}

impl LogisticClassifier {
    pub fn new(model: LogisticChurnModel<InferBackend>, device: InferDevice) -> Self {
        Self { model, device }
    }
}

impl ChurnClassifier for LogisticClassifier {
    fn kind(&self) -> &'static str {
        "burn-logistic"
    }

    fn num_features(&self) -> usize {
        self.model.input_width()
    }

    fn predict_probability(&self, features: &[f32]) -> crate::error::Result<f64> {
        let width = self.num_features();
        if features.len() != width {
            return Err(ChurnError::ShapeMismatch { expected: width, actual: features.len() });
        }

        let input = Tensor::<InferBackend, 1>::from_floats(features, &self.device)
            .reshape([1, width]);
        let output: Vec<f32> = self
            .model
            .forward(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| {
                tracing::error!("Cannot read model output: {e:?}");
                ChurnError::InvalidModelOutput(f64::NAN)
            })?;

        output
            .first()
            .map(|&p| f64::from(p))
            .ok_or(ChurnError::InvalidModelOutput(f64::NAN))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn classifier_with(initializer: Initializer, num_features: usize) -> LogisticClassifier {
        let device = InferDevice::default();
        let linear = LinearConfig::new(num_features, 1)
            .with_initializer(initializer)
            .init(&device);
        LogisticClassifier::new(LogisticChurnModel { linear }, device)
    }

    #[test]
    fn test_fresh_model_is_neutral() {
        let device = InferDevice::default();
        let model = LogisticChurnConfig::new(32).init::<InferBackend>(&device);
        let clf = LogisticClassifier::new(model, device);
        assert_eq!(clf.num_features(), 32);
        let p = clf.predict_probability(&[1.0; 32]).unwrap();
        assert!((p - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_forward_matches_closed_form() {
        // every weight and the bias are 0.1 → σ(0.1 · Σx + 0.1)
        let clf = classifier_with(Initializer::Constant { value: 0.1 }, 4);
        let p = clf.predict_probability(&[1.0, 2.0, 0.0, 1.0]).unwrap();
        let expected = 1.0 / (1.0 + (-0.5f64).exp());
        assert!((p - expected).abs() < 1e-5, "got {p}, expected {expected}");
    }

    #[test]
    fn test_wrong_width_is_rejected() {
        let clf = classifier_with(Initializer::Zeros, 4);
        assert!(matches!(
            clf.predict_probability(&[0.0; 3]),
            Err(ChurnError::ShapeMismatch { expected: 4, actual: 3 })
        ));
    }
}
