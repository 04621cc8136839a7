//! Training configuration

use std::path::PathBuf;

use crate::constants::{self, env_or};
use crate::logic::dataset::DatasetConfig;
use crate::logic::model::BoostingParams;

#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    /// Holdout fraction in (0, 1)
    pub test_size: f64,
    pub seed: u64,
    pub boosting: BoostingParams,
    pub dataset: DatasetConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(constants::DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(constants::DEFAULT_MODEL_PATH),
            test_size: constants::DEFAULT_TEST_SIZE,
            seed: constants::DEFAULT_RANDOM_SEED,
            boosting: BoostingParams::default(),
            dataset: DatasetConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Read overrides from the environment; unset or invalid values keep the defaults
    pub fn from_env() -> Self {
        let defaults = BoostingParams::default();
        Self {
            dataset_path: PathBuf::from(constants::get_dataset_path()),
            model_path: PathBuf::from(constants::get_model_path()),
            test_size: env_or("TEST_SIZE", constants::DEFAULT_TEST_SIZE),
            seed: env_or("RANDOM_SEED", constants::DEFAULT_RANDOM_SEED),
            boosting: BoostingParams {
                n_estimators: env_or("N_ESTIMATORS", defaults.n_estimators),
                learning_rate: env_or("LEARNING_RATE", defaults.learning_rate),
                max_depth: env_or("MAX_DEPTH", defaults.max_depth),
                min_leaf_size: env_or("MIN_LEAF_SIZE", defaults.min_leaf_size),
            },
            dataset: DatasetConfig::default(),
        }
    }
}
