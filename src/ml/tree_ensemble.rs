// ============================================================
// Layer 5 — Gradient-Boosted Tree Ensemble
// ============================================================
// Reads a model written by XGBoost's `Booster.save_model("*.json")`
// and evaluates it natively.
//
// Relevant parts of the document:
//   version                                  [major, minor, patch]
//   learner.learner_model_param.num_feature  "32"
//   learner.learner_model_param.base_score   "5E-1"  (or "[5E-1]")
//   learner.objective.name                   "binary:logistic"
//   learner.gradient_booster.name            "gbtree"
//   learner.gradient_booster.model.trees[]   parallel node arrays
//
// Per tree, node i is a leaf when left_children[i] == -1 and its
// value is split_conditions[i]. Otherwise the walk goes left when
// x[split_indices[i]] < split_conditions[i], and a missing (NaN)
// value follows default_left[i].
//
//   margin      = base_margin + Σ leaf(tree)
//   probability = sigmoid(margin)
//
// Reference: XGBoost "Introduction to Model IO", JSON schema

use std::{fs, path::Path};

use serde::Deserialize;

use crate::domain::traits::ChurnClassifier;
use crate::error::{ChurnError, Result};

// ─── Wire format ──────────────────────────────────────────────────────────────
#[derive(Debug, Deserialize)]
struct XgbDocument {
    version: Vec<u32>,
    learner: XgbLearner,
}

#[derive(Debug, Deserialize)]
struct XgbLearner {
    #[serde(default)]
    feature_names:       Vec<String>,
    gradient_booster:    XgbBooster,
    learner_model_param: XgbModelParam,
    objective:           XgbObjective,
}

#[derive(Debug, Deserialize)]
struct XgbBooster {
    name:  String,
    model: Option<XgbGbtree>,
}

#[derive(Debug, Deserialize)]
struct XgbGbtree {
    trees: Vec<XgbTree>,
}

#[derive(Debug, Deserialize)]
struct XgbTree {
    left_children:    Vec<i64>,
    right_children:   Vec<i64>,
    split_indices:    Vec<u64>,
    split_conditions: Vec<f32>,
    default_left:     Vec<Flag>,
    /// 0 = numerical, 1 = categorical; absent before categorical support
    #[serde(default)]
    split_type:       Vec<u8>,
}

/// default_left is written as 0/1 by some versions and as booleans by others
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(u8),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i)  => i != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct XgbModelParam {
    base_score:  String,
    num_feature: String,
}

#[derive(Debug, Deserialize)]
struct XgbObjective {
    name: String,
}

// ─── Evaluated form ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf(f32),
    Split {
        feature:      usize,
        threshold:    f32,
        left:         usize,
        right:        usize,
        default_left: bool,
    },
}

#[derive(Debug, Clone)]
struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    fn leaf_value(&self, features: &[f32]) -> f32 {
        // Children always sit after their parent, so this terminates
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split { feature, threshold, left, right, default_left } => {
                    let x = features[feature];
                    idx = if x.is_nan() {
                        if default_left { left } else { right }
                    } else if x < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// A binary-logistic gradient-boosted tree ensemble.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    num_features:  usize,
    base_margin:   f64,
    trees:         Vec<RegressionTree>,
    feature_names: Vec<String>,
}

const SUPPORTED_OBJECTIVES: [&str; 3] = ["binary:logistic", "reg:logistic", "binary:logitraw"];

impl TreeEnsemble {
    /// Load and validate an XGBoost JSON model file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| ChurnError::model_load(path, e.to_string()))?;
        Self::from_json_str(&text).map_err(|reason| ChurnError::model_load(path, reason))
    }

    /// Parse a model document; the error is the reason it was rejected.
    pub fn from_json_str(json: &str) -> std::result::Result<Self, String> {
        let doc: XgbDocument = serde_json::from_str(json)
            .map_err(|e| format!("not an XGBoost JSON model: {e}"))?;

        match doc.version.first() {
            Some(&major) if major >= 1 => {}
            _ => {
                return Err(format!(
                    "unsupported model schema version {:?} (need 1.0 or newer)",
                    doc.version
                ))
            }
        }

        let learner = doc.learner;
        let objective = learner.objective.name;
        if !SUPPORTED_OBJECTIVES.contains(&objective.as_str()) {
            return Err(format!("unsupported objective '{objective}'"));
        }
        if learner.gradient_booster.name != "gbtree" {
            return Err(format!(
                "unsupported booster '{}' (only gbtree)",
                learner.gradient_booster.name
            ));
        }
        let gbtree = learner
            .gradient_booster
            .model
            .ok_or_else(|| "gbtree booster has no model section".to_string())?;

        let num_features: usize = learner
            .learner_model_param
            .num_feature
            .trim()
            .parse()
            .map_err(|_| {
                format!("bad num_feature '{}'", learner.learner_model_param.num_feature)
            })?;

        let base_score = parse_base_score(&learner.learner_model_param.base_score)?;
        // All three objectives keep base_score in probability space;
        // logitraw only skips the sigmoid on XGBoost's own output.
        if !(base_score > 0.0 && base_score < 1.0) {
            return Err(format!("base_score {base_score} is not a probability"));
        }
        let base_margin = (base_score / (1.0 - base_score)).ln();

        let trees = gbtree
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| build_tree(t, num_features).map_err(|e| format!("tree {i}: {e}")))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            num_features,
            base_margin,
            trees,
            feature_names: learner.feature_names,
        })
    }

    /// Raw score; `features` must already be `num_features` wide
    fn margin(&self, features: &[f32]) -> f64 {
        self.trees
            .iter()
            .map(|t| f64::from(t.leaf_value(features)))
            .sum::<f64>()
            + self.base_margin
    }
}

impl ChurnClassifier for TreeEnsemble {
    fn kind(&self) -> &'static str {
        "xgboost-json"
    }

    fn num_features(&self) -> usize {
        self.num_features
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_probability(&self, features: &[f32]) -> Result<f64> {
        if features.len() != self.num_features {
            return Err(ChurnError::ShapeMismatch {
                expected: self.num_features,
                actual:   features.len(),
            });
        }
        Ok(sigmoid(self.margin(features)))
    }
}

pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// "5E-1", "0.5" and the bracketed "[5E-1]" of newer releases
fn parse_base_score(raw: &str) -> std::result::Result<f64, String> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let first = trimmed.split(',').next().unwrap_or_default().trim();
    first
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("bad base_score '{raw}'"))
}

fn build_tree(raw: XgbTree, num_features: usize) -> std::result::Result<RegressionTree, String> {
    let n = raw.left_children.len();
    if n == 0 {
        return Err("tree has no nodes".into());
    }
    if [
        raw.right_children.len(),
        raw.split_indices.len(),
        raw.split_conditions.len(),
        raw.default_left.len(),
    ]
    .iter()
    .any(|&len| len != n)
    {
        return Err("node arrays have different lengths".into());
    }
    if !raw.split_type.is_empty() && raw.split_type.len() != n {
        return Err("split_type has a different length than the node arrays".into());
    }
    if let Some(i) = raw.split_type.iter().position(|&t| t != 0) {
        return Err(format!("node {i} is a categorical split, which is not supported"));
    }

    let child = |parent: usize, c: i64| -> std::result::Result<usize, String> {
        usize::try_from(c)
            .ok()
            .filter(|&c| c > parent && c < n)
            .ok_or_else(|| format!("node {parent} has invalid child {c}"))
    };

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let (l, r) = (raw.left_children[i], raw.right_children[i]);
        if l == -1 {
            if r != -1 {
                return Err(format!("node {i} has only one child"));
            }
            nodes.push(Node::Leaf(raw.split_conditions[i]));
            continue;
        }
        let feature = usize::try_from(raw.split_indices[i])
            .ok()
            .filter(|&f| f < num_features)
            .ok_or_else(|| {
                format!("node {i} splits on feature {} of {num_features}", raw.split_indices[i])
            })?;
        nodes.push(Node::Split {
            feature,
            threshold:    raw.split_conditions[i],
            left:         child(i, l)?,
            right:        child(i, r)?,
            default_left: raw.default_left[i].is_set(),
        });
    }
    Ok(RegressionTree { nodes })
}
