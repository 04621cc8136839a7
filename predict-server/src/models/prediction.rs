//! Prediction request/response

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    /// URL to classify; a missing field reads as empty
    #[serde(default)]
    #[validate(length(min = 1, message = "url is required"))]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(rename = "isSafe")]
    pub is_safe: bool,
    /// Probability of the legitimate class as a percentage, two decimals
    pub confidence: f64,
}

impl PredictResponse {
    pub fn new(is_safe: bool, probability: f64) -> Self {
        let percent = (probability * 100.0).clamp(0.0, 100.0);
        Self {
            is_safe,
            confidence: (percent * 100.0).round() / 100.0,
        }
    }
}
