//! Dataset Module - Labelled Training Data
//!
//! Loads the phishing CSV (one row per URL, 30 signal columns and a `class`
//! label) into an ndarray matrix and splits it into train/holdout parts.

pub mod loader;
pub mod split;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use ndarray::{Array2, Axis};

use crate::logic::model::Label;

pub use loader::load_csv;
pub use split::train_test_split;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("label column '{0}' not found")]
    MissingLabelColumn(String),

    #[error("dataset has no feature columns")]
    NoFeatures,

    #[error("invalid value '{value}' at line {line}, column '{column}'")]
    InvalidValue {
        line: u64,
        column: String,
        value: String,
    },

    #[error("labels must be {positive} and one of -1/0, found {found:?}")]
    InvalidLabels { positive: f32, found: Vec<f32> },

    #[error("dataset is empty")]
    Empty,

    #[error("feature matrix: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("invalid split: {0}")]
    InvalidSplit(String),
}

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Column holding the class label
    pub label_column: String,
    /// Identifier columns that are not features
    pub drop_columns: Vec<String>,
    /// Label value of the legitimate class
    pub positive_label: f32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            label_column: "class".to_string(),
            drop_columns: vec!["Index".to_string()],
            positive_label: 1.0,
        }
    }
}

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Feature columns in file order
    pub feature_names: Vec<String>,
    /// One row per sample
    pub features: Array2<f32>,
    /// Raw label values as found in the file
    pub labels: Vec<f32>,
    pub positive_label: f32,
    pub negative_label: f32,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    pub fn label(&self, index: usize) -> Option<Label> {
        self.labels
            .get(index)
            .map(|&value| Label::from_value(value, self.positive_label))
    }

    /// Boosting targets: 1.0 for the legitimate class, -1.0 otherwise
    pub fn targets(&self) -> Vec<f32> {
        self.labels
            .iter()
            .map(|&value| Label::from_value(value, self.positive_label).target())
            .collect()
    }

    /// Rows picked by index, in the given order
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            features: self.features.select(Axis(0), indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            positive_label: self.positive_label,
            negative_label: self.negative_label,
        }
    }

    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&v| v == self.positive_label).count()
    }
}
