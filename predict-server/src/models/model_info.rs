//! Loaded model metadata

use chrono::{DateTime, Utc};
use phishguard_core::{Classifier, ModelArtifact};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub model: String,
    pub n_estimators: usize,
    pub feature_names: Vec<String>,
    pub layout_version: u8,
    pub layout_hash: u32,
    pub holdout_accuracy: f64,
    pub trained_at: DateTime<Utc>,
    pub checksum: Option<String>,
}

impl ModelInfo {
    pub fn from_artifact(artifact: &ModelArtifact) -> Self {
        let layout = &artifact.layout;
        Self {
            model: artifact.model.name().to_string(),
            n_estimators: artifact.model.n_estimators(),
            feature_names: layout.feature_names.clone(),
            layout_version: layout.version,
            layout_hash: layout.hash,
            holdout_accuracy: artifact.holdout_accuracy,
            trained_at: artifact.trained_at,
            checksum: artifact.checksum.clone(),
        }
    }
}
