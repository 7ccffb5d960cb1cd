use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::features::FEATURE_COUNT;

pub type Row = [f32; FEATURE_COUNT];

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact not found at {0}")]
    Missing(PathBuf),

    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model artifact: {0}")]
    Invalid(String),

    #[error("model received an empty input matrix")]
    EmptyInput,

    #[error("model produced {got} outputs for {expected} rows")]
    OutputShape { expected: usize, got: usize },
}

/// Anything that can turn feature rows into prices in lakhs.
///
/// Implementations are immutable after construction so one handle can be
/// shared for the whole process.
pub trait Regressor: Send + Sync {
    fn predict(&self, rows: &[Row]) -> Result<Vec<f32>, ModelError>;

    fn name(&self) -> &str;
}

pub type ModelHandle = Arc<dyn Regressor>;

// ---------- On-disk artifact ----------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn into_handle(self) -> ModelHandle {
        match self {
            ModelArtifact::Linear(m) => Arc::new(m),
            ModelArtifact::TreeEnsemble(m) => Arc::new(m),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::Linear(_) => "linear",
            ModelArtifact::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f32,
    pub coefficients: Vec<f32>,
}

impl LinearModel {
    fn validate(&self) -> Result<(), ModelError> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(ModelError::Invalid(format!(
                "linear model has {} coefficients, expected {}",
                self.coefficients.len(),
                FEATURE_COUNT
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Invalid("linear model has non-finite weights".into()));
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn predict(&self, rows: &[Row]) -> Result<Vec<f32>, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        Ok(rows
            .iter()
            .map(|row| {
                self.coefficients
                    .iter()
                    .zip(row.iter())
                    .fold(self.intercept, |acc, (w, x)| acc + w * x)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "linear"
    }
}

/// Gradient-boosted regression trees, XGBoost style: the prediction is
/// `base_score` plus one leaf value from every tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub base_score: f32,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f32,
    },
}

impl Tree {
    // Children always sit after their parent, so the walk terminates.
    fn validate(&self, idx: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {idx} has no nodes")));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split { feature, threshold, left, right } => {
                    if feature >= FEATURE_COUNT {
                        return Err(ModelError::Invalid(format!(
                            "tree {idx} node {i} splits on feature {feature}, only {FEATURE_COUNT} exist"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Invalid(format!(
                            "tree {idx} node {i} has a non-finite threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {idx} node {i} points to invalid child {child}"
                            )));
                        }
                    }
                }
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(ModelError::Invalid(format!(
                            "tree {idx} node {i} has a non-finite leaf"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    fn score(&self, row: &Row) -> Result<f32, ModelError> {
        let mut i = 0;
        loop {
            let node = self
                .nodes
                .get(i)
                .ok_or_else(|| ModelError::Invalid(format!("dangling node index {i}")))?;
            match *node {
                Node::Leaf { leaf } => return Ok(leaf),
                Node::Split { feature, threshold, left, right } => {
                    let x = row[feature];
                    // missing values take the left branch
                    let next = if x.is_nan() || x < threshold { left } else { right };
                    if next <= i {
                        return Err(ModelError::Invalid(format!("node {i} links backwards")));
                    }
                    i = next;
                }
            }
        }
    }
}

impl TreeEnsemble {
    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("tree ensemble has no trees".into()));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::Invalid("tree ensemble has a non-finite base_score".into()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx)?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn predict(&self, rows: &[Row]) -> Result<Vec<f32>, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        rows.iter()
            .map(|row| {
                self.trees
                    .iter()
                    .try_fold(self.base_score, |acc, t| Ok::<f32, ModelError>(acc + t.score(row)?))
            })
            .collect()
    }

    fn name(&self) -> &str {
        "tree_ensemble"
    }
}

// ---------- Fallback ----------

/// Year the placeholder treats as "now" when aging a car.
pub const PLACEHOLDER_REFERENCE_YEAR: f32 = 2024.0;

/// Stand-in scorer for when no artifact is available. Not a real model: it
/// ages the showroom price by 15% a year and 5% per previous owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderModel;

impl Regressor for PlaceholderModel {
    fn predict(&self, rows: &[Row]) -> Result<Vec<f32>, ModelError> {
        if rows.is_empty() {
            return Err(ModelError::EmptyInput);
        }
        Ok(rows
            .iter()
            .map(|row| {
                let age = (PLACEHOLDER_REFERENCE_YEAR - row[0]).max(0.0);
                let owners = row[6].max(0.0);
                (row[1] * 0.85f32.powf(age) * 0.95f32.powf(owners)).max(0.0)
            })
            .collect())
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

/// Where the live model handle came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSource {
    Artifact { path: PathBuf, kind: &'static str },
    Placeholder { reason: String },
    Unavailable { reason: String },
}

impl ModelSource {
    pub fn warning(&self) -> Option<String> {
        match self {
            ModelSource::Artifact { .. } => None,
            ModelSource::Placeholder { reason } => Some(format!(
                "Model could not be loaded ({reason}). Using a simplified placeholder estimate."
            )),
            ModelSource::Unavailable { reason } => {
                Some(format!("Model could not be loaded ({reason}). Predictions are unavailable."))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        [2014.0, 5.59, 27000.0, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn linear_is_dot_product_plus_intercept() {
        let m = LinearModel {
            intercept: 1.0,
            coefficients: vec![0.0, 0.5, 0.0, 0.0, 0.0, 0.0, -1.0],
        };
        let mut row = sample_row();
        row[6] = 1.0;
        let out = m.predict(&[row]).unwrap();
        assert_eq!(out.len(), 1);
        assert!((out[0] - (1.0 + 0.5 * 5.59 - 1.0)).abs() < 1e-5);
    }

    #[test]
    fn linear_rejects_wrong_width() {
        let m = ModelArtifact::Linear(LinearModel {
            intercept: 0.0,
            coefficients: vec![1.0; 6],
        });
        assert!(matches!(m.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn tree_goes_left_below_threshold() {
        let tree = Tree {
            nodes: vec![
                Node::Split { feature: 0, threshold: 2015.0, left: 1, right: 2 },
                Node::Leaf { leaf: 2.0 },
                Node::Leaf { leaf: 4.0 },
            ],
        };
        let ens = TreeEnsemble { base_score: 0.5, trees: vec![tree.clone(), tree] };
        let mut newer = sample_row();
        newer[0] = 2015.0;

        let out = ens.predict(&[sample_row(), newer]).unwrap();
        assert_eq!(out, vec![4.5, 8.5]);
    }

    #[test]
    fn tree_validation_catches_bad_links() {
        let backwards = TreeEnsemble {
            base_score: 0.0,
            trees: vec![Tree {
                nodes: vec![
                    Node::Leaf { leaf: 1.0 },
                    Node::Split { feature: 1, threshold: 3.0, left: 0, right: 2 },
                    Node::Leaf { leaf: 1.0 },
                ],
            }],
        };
        assert!(backwards.validate().is_err());

        let bad_feature = TreeEnsemble {
            base_score: 0.0,
            trees: vec![Tree {
                nodes: vec![
                    Node::Split { feature: 7, threshold: 3.0, left: 1, right: 2 },
                    Node::Leaf { leaf: 1.0 },
                    Node::Leaf { leaf: 1.0 },
                ],
            }],
        };
        assert!(bad_feature.validate().is_err());

        let empty = TreeEnsemble { base_score: 0.0, trees: vec![] };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn artifact_json_is_tagged_by_kind() {
        let json = r#"{
            "kind": "tree_ensemble",
            "base_score": 0.5,
            "trees": [
                { "nodes": [
                    { "feature": 1, "threshold": 5.0, "left": 1, "right": 2 },
                    { "leaf": 1.0 },
                    { "leaf": 3.0 }
                ] }
            ]
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.kind(), "tree_ensemble");
        artifact.validate().unwrap();

        let handle = artifact.into_handle();
        assert_eq!(handle.predict(&[sample_row()]).unwrap(), vec![3.5]);
    }

    #[test]
    fn placeholder_ages_the_showroom_price() {
        let mut row = sample_row();
        row[0] = PLACEHOLDER_REFERENCE_YEAR;
        assert!((PlaceholderModel.predict(&[row]).unwrap()[0] - 5.59).abs() < 1e-5);

        let older = PlaceholderModel.predict(&[sample_row()]).unwrap()[0];
        assert!(older < 5.59 && older > 0.0);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(PlaceholderModel.predict(&[]), Err(ModelError::EmptyInput)));
    }
}
