//! Training Module - Fit, Evaluate, Persist
//!
//! load CSV -> seeded split -> boost -> score on holdout -> write artifact.

pub mod config;
pub mod metrics;


use std::path::PathBuf;

use serde::Serialize;

use crate::logic::dataset::{self, Dataset, DatasetError};
use crate::logic::features::LayoutInfo;
use crate::logic::model::{Classifier, GradientBoostedTrees, Label, ModelArtifact, ModelError};

pub use config::TrainingConfig;
pub use metrics::ConfusionMatrix;

#[derive(Debug, thiserror::Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Outcome of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    /// Holdout accuracy in [0, 1]
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub train_size: usize,
    pub test_size: usize,
    pub n_estimators: usize,
    pub model_path: PathBuf,
}

/// Run the whole pipeline and save the artifact to `config.model_path`
pub fn train(config: &TrainingConfig) -> Result<TrainingReport, TrainingError> {
    let data = dataset::load_csv(&config.dataset_path, &config.dataset)?;
    let layout = LayoutInfo::from_columns(data.feature_names.as_slice());
    if let Err(e) = layout.validate() {
        log::warn!("{}; the server will reject this model", e);
    }

    let (train_set, test_set) = dataset::train_test_split(&data, config.test_size, config.seed)?;

    log::info!(
        "Training on {} rows ({} estimators, learning rate {}, max depth {})",
        train_set.n_samples(),
        config.boosting.n_estimators,
        config.boosting.learning_rate,
        config.boosting.max_depth
    );
    let model = GradientBoostedTrees::fit(train_set.features.view(), &train_set.targets(), config.boosting)?;

    let confusion = evaluate(&model, &test_set)?;
    let accuracy = confusion.accuracy();
    log::info!(
        "Holdout accuracy {:.4} (precision {:.4}, recall {:.4})",
        accuracy,
        confusion.precision(),
        confusion.recall()
    );

    let n_estimators = model.n_estimators();
    let artifact = ModelArtifact::new(
        model,
        layout,
        data.positive_label,
        data.negative_label,
        accuracy,
    );
    artifact.save(&config.model_path)?;

    Ok(TrainingReport {
        accuracy,
        confusion,
        train_size: train_set.n_samples(),
        test_size: test_set.n_samples(),
        n_estimators,
        model_path: config.model_path.clone(),
    })
}

/// Confusion matrix of `model` over every row of `data`
pub fn evaluate(model: &dyn Classifier, data: &Dataset) -> Result<ConfusionMatrix, ModelError> {
    let mut confusion = ConfusionMatrix::default();
    for (i, row) in data.features.rows().into_iter().enumerate() {
        let predicted = model.predict(&row.to_vec())?;
        let actual = Label::from_value(data.labels[i], data.positive_label);
        confusion.record(actual, predicted);
    }
    Ok(confusion)
}
