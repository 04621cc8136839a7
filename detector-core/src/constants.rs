//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every value can be overridden through the environment (or `.env`).

/// Default training data file, relative to the working directory
pub const DEFAULT_DATASET_PATH: &str = "phishing.csv";

/// Default model artifact file, shared by trainer and server
pub const DEFAULT_MODEL_PATH: &str = "model.json";

/// Default holdout fraction
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Default shuffle seed for the train/holdout split
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Default page fetch / DNS timeout (seconds)
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Redirects followed before a page fetch gives up
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Page bytes read for content signals; the rest of the body is dropped
pub const MAX_PAGE_BYTES: usize = 2 * 1024 * 1024;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "PhishGuard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Parse an environment variable, falling back to `default` when unset or invalid
pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Read a boolean flag; anything but `false`/`0` counts as enabled
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .map(|s| {
            let s = s.trim().to_lowercase();
            s != "false" && s != "0"
        })
        .unwrap_or(default)
}

/// Get dataset path from environment or use default
pub fn get_dataset_path() -> String {
    std::env::var("DATASET_PATH").unwrap_or_else(|_| DEFAULT_DATASET_PATH.to_string())
}

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var("MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}
