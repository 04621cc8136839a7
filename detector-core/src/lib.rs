//! PhishGuard Core
//!
//! Shared by the `train` binary and the prediction server: the dataset
//! feature layout, URL feature extraction, the boosted-tree classifier and
//! its on-disk artifact.

pub mod constants;
pub mod logic;

pub use logic::features::{ExtractorConfig, FeatureError, FeatureVector, LayoutInfo, UrlFeatureExtractor};
pub use logic::model::{Classifier, GradientBoostedTrees, Label, ModelArtifact, ModelError};
pub use logic::training::{train, TrainingConfig, TrainingReport};
