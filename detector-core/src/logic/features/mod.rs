//! Features Module - URL Feature Extraction
//!
//! Splits the 30 dataset signals into address bar, page content and
//! domain reputation groups. Each group writes its slots of the shared
//! [`FeatureVector`]; the layout fixes the order.

pub mod layout;
pub mod vector;
pub mod lexical;
pub mod page;
pub mod domain;
pub mod extractor;


// Re-export common types
pub use layout::{LayoutInfo, LayoutMismatchError, FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::{FeatureExtractor, FeatureVector};
pub use page::PageSnapshot;
pub use extractor::{ExtractorConfig, FeatureError, UrlFeatureExtractor};
