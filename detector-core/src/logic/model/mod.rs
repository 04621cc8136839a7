//! Model Module - Phishing Classifier
//!
//! Gradient-boosted trees from the `gbdt` crate behind the [`Classifier`]
//! seam, and the artifact format that carries a fitted ensemble from
//! training to serving.

pub mod classifier;
pub mod boosting;
pub mod artifact;

// Re-export common types
pub use classifier::{Classifier, Label, ModelError, DECISION_THRESHOLD};
pub use boosting::{BoostingParams, GradientBoostedTrees};
pub use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
