//! Model Artifact
//!
//! The file written by training and read once by the server. A single JSON
//! document: metadata plus the fitted ensemble.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::boosting::GradientBoostedTrees;
use super::classifier::{Classifier, ModelError};
use crate::logic::features::LayoutInfo;

/// Bumped whenever the JSON shape changes incompatibly
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    /// Feature columns in training order
    pub layout: LayoutInfo,
    /// Dataset value of the legitimate class
    pub positive_label: f32,
    pub negative_label: f32,
    pub holdout_accuracy: f64,
    pub trained_at: DateTime<Utc>,
    pub model: GradientBoostedTrees,
    /// SHA-256 of the file this artifact was loaded from
    #[serde(skip)]
    pub checksum: Option<String>,
}

impl ModelArtifact {
    pub fn new(
        model: GradientBoostedTrees,
        layout: LayoutInfo,
        positive_label: f32,
        negative_label: f32,
        holdout_accuracy: f64,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            layout,
            positive_label,
            negative_label,
            holdout_accuracy,
            trained_at: Utc::now(),
            model,
            checksum: None,
        }
    }

    /// Write the artifact, replacing any existing file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ModelError> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(self)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ModelError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, &json).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!("Model saved to {} ({} bytes)", path.display(), json.len());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let checksum = hex::encode(Sha256::digest(&bytes));

        // Check the version and the tree structure before the full parse
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        let header = VersionHeader::deserialize(&value)?;
        if header.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                found: header.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        GradientBoostedTrees::check_serialized(&value["model"])?;

        let mut artifact: ModelArtifact = serde_json::from_value(value)?;
        let layout = &artifact.layout;
        if layout.feature_names.len() != layout.feature_count
            || layout.feature_count != artifact.model.n_features()
        {
            return Err(ModelError::Incompatible(format!(
                "layout of {} columns ({} names) for a model of {} features",
                layout.feature_count,
                layout.feature_names.len(),
                artifact.model.n_features()
            )));
        }

        log::info!(
            "Loaded model from {} (sha256 {}, {} trees, holdout accuracy {:.4})",
            path.display(),
            checksum,
            artifact.model.n_estimators(),
            artifact.holdout_accuracy
        );
        artifact.checksum = Some(checksum);
        Ok(artifact)
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.layout.feature_names
    }
}

#[derive(Deserialize)]
struct VersionHeader {
    format_version: u32,
}
