//! Logic Module - Feature Extraction, Model, Training
//!
//! - `features/` - URL -> 30-signal feature vector (address bar, page, domain)
//! - `model/` - gradient-boosted trees, classifier seam, model artifact
//! - `dataset/` - CSV loading and train/holdout split
//! - `training/` - training pipeline and holdout metrics

pub mod features;
pub mod model;
pub mod dataset;
pub mod training;
