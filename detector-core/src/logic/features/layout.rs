//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The order below is the column order of the phishing dataset the model
//! is trained on. A trained model only accepts rows in this exact order.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// SIGNAL ENCODING
// ============================================================================

/// Feature value for a legitimate-looking signal
pub const SIGNAL_LEGITIMATE: f32 = 1.0;

/// Feature value for a suspicious signal
pub const SIGNAL_SUSPICIOUS: f32 = 0.0;

/// Feature value for a phishing signal, also used when a signal is unavailable
pub const SIGNAL_PHISHING: f32 = -1.0;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Columns 0-8 ===
    "UsingIP",               // 0: Host is a raw IPv4/IPv6 address
    "LongURL",               // 1: URL length band
    "ShortURL",              // 2: Known URL shortening service
    "Symbol@",               // 3: '@' present in URL
    "Redirecting//",         // 4: '//' after the scheme separator
    "PrefixSuffix-",         // 5: '-' in host name
    "SubDomains",            // 6: Dot count band
    "HTTPS",                 // 7: https scheme
    "DomainRegLen",          // 8: Registration length (WHOIS)

    // === Columns 9-17 ===
    "Favicon",               // 9: Favicon loaded from another origin
    "NonStdPort",            // 10: Explicit port in authority
    "HTTPSDomainURL",        // 11: "https" token inside host name
    "RequestURL",            // 12: External embedded resources ratio
    "AnchorURL",             // 13: Unsafe anchor ratio
    "LinksInScriptTags",     // 14: External <link>/<script> ratio
    "ServerFormHandler",     // 15: Form action target
    "InfoEmail",             // 16: mailto / mail() submission
    "AbnormalURL",           // 17: Host identity anomaly

    // === Columns 18-22 ===
    "WebsiteForwarding",     // 18: Redirect count
    "StatusBarCust",         // 19: onmouseover status-bar tampering
    "DisableRightClick",     // 20: Right click disabled
    "UsingPopupWindow",      // 21: alert()/popup usage
    "IframeRedirection",     // 22: Invisible iframe

    // === Columns 23-29 ===
    "AgeofDomain",           // 23: Domain age (WHOIS)
    "DNSRecording",          // 24: Host resolves in DNS
    "WebsiteTraffic",        // 25: Traffic rank
    "PageRank",              // 26: Page rank
    "GoogleIndex",           // 27: Search index presence
    "LinksPointingToPage",   // 28: Anchor count band
    "StatsReport",           // 29: Known phishing host/IP
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 30;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over a layout version and an ordered list of column names
pub fn hash_columns<S: AsRef<str>>(version: u8, columns: &[S]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[version]);

    for name in columns {
        hasher.update(name.as_ref().as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Hash of the extractor layout
/// Used to detect layout mismatches at runtime
pub fn layout_hash() -> u32 {
    hash_columns(FEATURE_VERSION, FEATURE_LAYOUT)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self::from_columns(FEATURE_LAYOUT)
    }

    /// Describe the columns a model was trained on
    pub fn from_columns<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: hash_columns(FEATURE_VERSION, columns),
            feature_count: columns.len(),
            feature_names: columns.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }

    /// Check this layout against the one the extractor produces
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.hash)
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, thiserror::Error)]
#[error(
    "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count() {
        assert_eq!(FEATURE_COUNT, 30);
        assert_eq!(FEATURE_LAYOUT.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
        assert_ne!(hash_columns(FEATURE_VERSION, &["a", "b"]), hash_columns(FEATURE_VERSION, &["b", "a"]));
        assert_ne!(hash_columns(FEATURE_VERSION, &["ab"]), hash_columns(FEATURE_VERSION, &["a", "b"]));
    }

    #[test]
    fn test_validate_layout() {
        assert!(validate_layout(FEATURE_VERSION, layout_hash()).is_ok());
        assert!(validate_layout(FEATURE_VERSION + 1, layout_hash()).is_err());
        assert!(validate_layout(FEATURE_VERSION, layout_hash().wrapping_add(1)).is_err());
    }

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("UsingIP"), Some(0));
        assert_eq!(feature_index("HTTPS"), Some(7));
        assert_eq!(feature_index("StatsReport"), Some(29));
        assert_eq!(feature_index("Index"), None);
        assert_eq!(feature_index("DNSRecording"), Some(24));
    }

    #[test]
    fn test_column_order_matters() {
        let columns: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        assert!(LayoutInfo::from_columns(columns.as_slice()).validate().is_ok());

        let mut swapped = columns.clone();
        swapped.swap(0, 1);
        assert!(LayoutInfo::from_columns(swapped.as_slice()).validate().is_err());
        assert!(LayoutInfo::from_columns(&columns[..10]).validate().is_err());
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.hash, layout_hash());
        assert_eq!(info.feature_names.len(), FEATURE_COUNT);
        assert_eq!(info, LayoutInfo::default());
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_foreign_columns_fail_validation() {
        let info = LayoutInfo::from_columns(&["UsingIP", "LongURL", "HTTPS"]);
        assert_eq!(info.feature_count, 3);

        let err = info.validate().unwrap_err();
        assert_eq!(err.expected_hash, layout_hash());
        assert_eq!(err.actual_hash, info.hash);
    }
}
