//! Domain Reputation Features
//!
//! WHOIS age/registration, traffic rank, page rank and search index need
//! third-party services this extractor does not call. Those signals are
//! reported as phishing, the value the dataset generator recorded when a
//! lookup failed. DNS is resolved by the extractor and passed in.

use super::layout::{SIGNAL_LEGITIMATE, SIGNAL_PHISHING};
use super::vector::{FeatureExtractor, FeatureVector};

/// Signals without a local data source
pub const UNAVAILABLE_FEATURES: &[&str] = &[
    "DomainRegLen",
    "AgeofDomain",
    "WebsiteTraffic",
    "PageRank",
    "GoogleIndex",
];

/// Domain signals. `resolves` is `None` when resolution was skipped.
pub struct DomainFeatures {
    resolves: Option<bool>,
}

impl DomainFeatures {
    pub fn new(resolves: Option<bool>) -> Self {
        Self { resolves }
    }

    pub fn dns_recording(&self) -> f32 {
        match self.resolves {
            Some(true) => SIGNAL_LEGITIMATE,
            _ => SIGNAL_PHISHING,
        }
    }
}

impl FeatureExtractor for DomainFeatures {
    fn extract(&self, vector: &mut FeatureVector) {
        for name in UNAVAILABLE_FEATURES {
            vector.set_by_name(name, SIGNAL_PHISHING);
        }
        vector.set_by_name("DNSRecording", self.dns_recording());
    }
}
