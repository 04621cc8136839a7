//! Classifier seam
//!
//! The request path only sees this trait. The concrete ensemble in `boosting.rs`
//! wraps the `gbdt` crate and can be swapped without touching the server.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Probability above which a row is labelled positive
pub const DECISION_THRESHOLD: f64 = 0.5;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("feature shape mismatch: model expects {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("training set is empty")]
    EmptyTrainingSet,

    #[error("training labels contain a single class")]
    SingleClass,

    #[error("invalid model parameters: {0}")]
    InvalidParams(String),

    #[error("model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed model file: {0}")]
    Format(#[from] serde_json::Error),

    #[error("unsupported model format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("incompatible model: {0}")]
    Incompatible(String),
}

// ============================================================================
// LABEL
// ============================================================================

/// Binary verdict. `Positive` is the legitimate class (dataset value 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    pub fn from_probability(probability: f64) -> Self {
        if probability > DECISION_THRESHOLD {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Map a dataset label value; `positive` is the value of the legitimate class
    pub fn from_value(value: f32, positive: f32) -> Self {
        if value == positive {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    pub fn is_positive(self) -> bool {
        self == Label::Positive
    }

    /// Log-likelihood training label: 1.0 for positive, -1.0 for negative
    pub fn target(self) -> f32 {
        match self {
            Label::Positive => 1.0,
            Label::Negative => -1.0,
        }
    }
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Binary classifier over fixed-width feature rows
pub trait Classifier {
    /// Row width the model was trained on
    fn n_features(&self) -> usize;

    /// Probability of the positive class, in [0, 1]
    fn predict_proba(&self, features: &[f32]) -> Result<f64, ModelError>;

    fn predict(&self, features: &[f32]) -> Result<Label, ModelError> {
        Ok(Label::from_probability(self.predict_proba(features)?))
    }

    fn name(&self) -> &str {
        "classifier"
    }

    /// Reject rows of the wrong width instead of predicting on them
    fn check_shape(&self, features: &[f32]) -> Result<(), ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::ShapeMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        Ok(())
    }
}
