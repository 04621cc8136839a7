//! Gradient Boosted Trees
//!
//! Binary classifier backed by the `gbdt` crate with the `LogLikelyhood`
//! loss. The crate wants labels in {-1, 1} and returns the probability of
//! label 1, which here is the legitimate class.

use std::fmt;

use gbdt::config::{Config, Loss};
use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use super::classifier::{Classifier, ModelError};

/// Loss name understood by `gbdt::config::Config::set_loss`
const LOSS: &str = "LogLikelyhood";

/// Boosting hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoostingParams {
    pub n_estimators: usize,
    pub learning_rate: f32,
    pub max_depth: u32,
    pub min_leaf_size: usize,
}

impl Default for BoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_leaf_size: 1,
        }
    }
}

impl BoostingParams {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidParams("n_estimators must be at least 1".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(ModelError::InvalidParams(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.max_depth == 0 {
            return Err(ModelError::InvalidParams("max_depth must be at least 1".into()));
        }
        if self.min_leaf_size == 0 {
            return Err(ModelError::InvalidParams("min_leaf_size must be at least 1".into()));
        }
        Ok(())
    }

    fn to_config(self, n_features: usize) -> Config {
        let mut config = Config::new();
        config.set_feature_size(n_features);
        config.set_shrinkage(self.learning_rate);
        config.set_max_depth(self.max_depth);
        config.set_min_leaf_size(self.min_leaf_size);
        config.set_iterations(self.n_estimators);
        config.set_training_optimization_level(2);
        config.set_debug(false);
        config.set_loss(LOSS);
        config
    }
}

#[derive(Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    params: BoostingParams,
    n_features: usize,
    model: GBDT,
}

impl fmt::Debug for GradientBoostedTrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GradientBoostedTrees")
            .field("params", &self.params)
            .field("n_features", &self.n_features)
            .finish_non_exhaustive()
    }
}

impl GradientBoostedTrees {
    /// Fit on rows of `x` with targets in {-1, 1}
    pub fn fit(x: ArrayView2<'_, f32>, targets: &[f32], params: BoostingParams) -> Result<Self, ModelError> {
        params.validate()?;

        let n = x.nrows();
        if n == 0 || x.ncols() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if targets.len() != n {
            return Err(ModelError::ShapeMismatch {
                expected: n,
                actual: targets.len(),
            });
        }

        let positives = targets.iter().filter(|&&t| t > 0.0).count();
        if positives == 0 || positives == n {
            return Err(ModelError::SingleClass);
        }
        log::debug!(
            "Boosting {} rows x {} features, positive prior {:.3}",
            n,
            x.ncols(),
            positives as f64 / n as f64
        );

        let mut train_x: DataVec = x
            .rows()
            .into_iter()
            .zip(targets)
            .map(|(row, &t)| {
                let label = if t > 0.0 { 1.0 } else { -1.0 };
                Data::new_training_data(row.to_vec(), 1.0, label, None)
            })
            .collect();

        let mut model = GBDT::new(&params.to_config(x.ncols()));
        model.fit(&mut train_x);

        Ok(Self {
            params,
            n_features: x.ncols(),
            model,
        })
    }

    pub fn n_estimators(&self) -> usize {
        self.params.n_estimators
    }

    /// Structural check of a serialized ensemble, run before deserializing it.
    /// `gbdt` walks child indices without bounds or cycle checks, so a bad
    /// file would otherwise panic or loop on the first prediction.
    pub(crate) fn check_serialized(value: &serde_json::Value) -> Result<(), ModelError> {
        let shape = EnsembleShape::deserialize(value)?;
        let conf = &shape.model.conf;

        if shape.params.n_estimators == 0 || conf.iterations != shape.params.n_estimators {
            return Err(ModelError::Incompatible(format!(
                "{} estimators configured, {} in the ensemble config",
                shape.params.n_estimators, conf.iterations
            )));
        }
        if shape.model.trees.len() != conf.iterations {
            return Err(ModelError::Incompatible(format!(
                "ensemble has {} trees, expected {}",
                shape.model.trees.len(),
                conf.iterations
            )));
        }
        if conf.feature_size != shape.n_features {
            return Err(ModelError::Incompatible(format!(
                "ensemble built for {} features, model declares {}",
                conf.feature_size, shape.n_features
            )));
        }
        if conf.loss != Loss::LogLikelyhood {
            return Err(ModelError::Incompatible(format!("unsupported loss {:?}", conf.loss)));
        }
        if !shape.model.bias.is_finite() {
            return Err(ModelError::Incompatible("bias is not finite".into()));
        }

        for (t, tree) in shape.model.trees.iter().enumerate() {
            let nodes = &tree.tree.tree;
            if nodes.is_empty() {
                return Err(ModelError::Incompatible(format!("tree {} has no nodes", t)));
            }
            for (id, node) in nodes.iter().enumerate() {
                if node.value.is_leaf {
                    continue;
                }
                // children are always appended after their parent
                let in_range = |child: usize| child > id && child < nodes.len();
                if !in_range(node.left) || !in_range(node.right) {
                    return Err(ModelError::Incompatible(format!(
                        "tree {} node {} has invalid children ({}, {})",
                        t, id, node.left, node.right
                    )));
                }
                if node.value.feature_index >= shape.n_features {
                    return Err(ModelError::Incompatible(format!(
                        "tree {} splits on feature {} but the model has {} features",
                        t, node.value.feature_index, shape.n_features
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Classifier for GradientBoostedTrees {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, features: &[f32]) -> Result<f64, ModelError> {
        self.check_shape(features)?;
        let test_x: DataVec = vec![Data::new_test_data(features.to_vec(), None)];
        let probability = self
            .model
            .predict(&test_x)
            .first()
            .copied()
            .ok_or_else(|| ModelError::Incompatible("ensemble returned no prediction".into()))?;
        Ok(f64::from(probability).clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "gradient_boosted_trees"
    }
}

// Mirror of the `gbdt` serde layout, only the fields the check needs

#[derive(Deserialize)]
struct EnsembleShape {
    params: BoostingParams,
    n_features: usize,
    model: GbdtShape,
}

#[derive(Deserialize)]
struct GbdtShape {
    conf: ConfShape,
    trees: Vec<TreeShape>,
    bias: f32,
}

#[derive(Deserialize)]
struct ConfShape {
    feature_size: usize,
    iterations: usize,
    loss: Loss,
}

#[derive(Deserialize)]
struct TreeShape {
    tree: NodesShape,
}

#[derive(Deserialize)]
struct NodesShape {
    tree: Vec<NodeShape>,
}

#[derive(Deserialize)]
struct NodeShape {
    value: NodeValueShape,
    left: usize,
    right: usize,
}

#[derive(Deserialize)]
struct NodeValueShape {
    feature_index: usize,
    is_leaf: bool,
}
