//! Training CLI
//!
//! Reads `phishing.csv`, fits the classifier and writes `model.json` next to
//! it. Paths and hyper-parameters come from the environment (see `.env`).

use anyhow::Context;
use phishguard_core::{constants, train, TrainingConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("{} trainer v{}", constants::APP_NAME, constants::APP_VERSION);

    let config = TrainingConfig::from_env();
    let report = train(&config)
        .with_context(|| format!("training on {} failed", config.dataset_path.display()))?;

    println!("Model trained with accuracy: {:.2}", report.accuracy);
    println!("Model saved to {}", report.model_path.display());
    log::debug!(
        "Confusion matrix: tp={} tn={} fp={} fn={}",
        report.confusion.true_positive,
        report.confusion.true_negative,
        report.confusion.false_positive,
        report.confusion.false_negative
    );
    Ok(())
}
