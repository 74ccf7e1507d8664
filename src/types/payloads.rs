//! Payloads crossing the service boundary.

use serde::{Deserialize, Serialize};

/// Response payload for photo identification.
///
/// A low or zero score is a normal success response; non-success responses
/// are reserved for malformed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoIdentification {
    /// Best alias similarity on a 0–100 scale.
    pub score: f32,
    /// Matched product, unset when the score is below the accept threshold.
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
    /// Text lines extracted from the photo.
    pub lines: Vec<String>,
    /// Up to 3 distinct products for manual pick, best first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<ProductSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSuggestion {
    pub product_id: i64,
    pub name: String,
}

impl PhotoIdentification {
    pub fn no_match(lines: Vec<String>) -> Self {
        Self {
            score: 0.0,
            product_id: None,
            product_name: None,
            lines,
            suggestions: Vec::new(),
        }
    }
}
