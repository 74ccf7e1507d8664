//! Fuzzy photo matcher: OCR lines → catalog product via alias similarity.
//!
//! OCR output is fragmentary and order-scrambled, so aliases are scored
//! with a partial, substring-tolerant measure on a 0–100 scale instead of
//! whole-string similarity. The corpus is alias-level: near-ties between
//! aliases of the same product are expected, so acceptance uses a single
//! threshold without a runner-up gap.

use std::collections::HashSet;
use std::sync::Arc;

use log::warn;
use tokio::sync::Semaphore;

use crate::services::catalog::CanonicalProduct;
use crate::services::resolver::{decide, DecisionThresholds, MatchCandidate};
use crate::services::vision::{self, TextRecognizer};
use crate::types::errors::PhotoRequestError;
use crate::types::payloads::{PhotoIdentification, ProductSuggestion};

/// Content types accepted from the submission boundary.
pub const ACCEPTED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Max concurrent recognition calls. Recognition is CPU- or network-bound;
/// unbounded fan-out risks resource exhaustion.
static RECOGNITION_SEMAPHORE: Semaphore = Semaphore::const_new(4);

#[derive(Debug, Clone)]
pub struct PhotoMatchConfig {
    /// Similarity (0–100) at or above which the best match is accepted.
    pub score_threshold: f32,
    /// Distinct products returned as suggestions.
    pub max_suggestions: usize,
    /// Top-scoring aliases considered when collapsing to suggestions.
    pub alias_pool: usize,
    /// Upload size limit enforced before any processing.
    pub max_payload_bytes: usize,
}

impl Default for PhotoMatchConfig {
    fn default() -> Self {
        Self {
            score_threshold: 70.0,
            max_suggestions: 3,
            alias_pool: 10,
            max_payload_bytes: 8 * 1024 * 1024,
        }
    }
}

/// One human-readable alias string mapped back to its product.
#[derive(Debug, Clone)]
pub struct ProductAlias {
    pub product_id: i64,
    pub display_name: String,
    pub alias: String,
}

/// Build the alias corpus for one resolution call. Per product: "brand
/// name", "brand name <weight>g" when a weight is known, and the bare
/// product name.
pub fn build_alias_corpus(products: &[CanonicalProduct]) -> Vec<ProductAlias> {
    let mut corpus = Vec::new();
    for product in products {
        let display_name = product.display_name();
        let mut aliases: Vec<String> = vec![display_name.clone()];
        if let Some(weight) = product.weight_grams {
            aliases.push(format!("{display_name} {weight}g"));
        }
        if !product.brand.is_empty() && !product.name.is_empty() {
            aliases.push(product.name.clone());
        }

        let mut seen: HashSet<String> = HashSet::new();
        for alias in aliases {
            if seen.insert(alias.to_lowercase()) {
                corpus.push(ProductAlias {
                    product_id: product.id,
                    display_name: display_name.clone(),
                    alias,
                });
            }
        }
    }
    corpus
}

/// Partial similarity on a 0–100 scale: the best normalized Levenshtein
/// score of the needle against any needle-sized window of the haystack.
pub fn partial_ratio(needle: &str, haystack: &str) -> f32 {
    if needle.is_empty() || haystack.is_empty() {
        return 0.0;
    }

    let needle_chars: Vec<char> = needle.chars().collect();
    let haystack_chars: Vec<char> = haystack.chars().collect();

    if needle_chars.len() >= haystack_chars.len() {
        return (strsim::normalized_levenshtein(needle, haystack) * 100.0) as f32;
    }

    let window = needle_chars.len();
    let mut best = 0.0_f64;
    for start in 0..=(haystack_chars.len() - window) {
        let slice: String = haystack_chars[start..start + window].iter().collect();
        let score = strsim::normalized_levenshtein(needle, &slice);
        if score > best {
            best = score;
            if best >= 1.0 {
                break;
            }
        }
    }

    (best * 100.0) as f32
}

/// Score extracted lines against the alias corpus and build the response
/// payload. Pure; the caller owns text extraction and corpus lifetime.
pub fn match_photo_lines(
    lines: &[String],
    corpus: &[ProductAlias],
    config: &PhotoMatchConfig,
) -> PhotoIdentification {
    let haystack = lines.join(" ").to_lowercase();
    if haystack.trim().is_empty() || corpus.is_empty() {
        return PhotoIdentification::no_match(lines.to_vec());
    }

    let mut scored: Vec<(f32, &ProductAlias)> = corpus
        .iter()
        .map(|alias| (partial_ratio(&alias.alias.to_lowercase(), &haystack), alias))
        .collect();

    // Score desc → product id asc → alias asc, for reproducible output.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.product_id.cmp(&b.1.product_id))
            .then_with(|| a.1.alias.cmp(&b.1.alias))
    });

    let mut suggestions = Vec::new();
    let mut seen_products: HashSet<i64> = HashSet::new();
    for (score, alias) in scored.iter().take(config.alias_pool) {
        if *score <= 0.0 {
            break;
        }
        if seen_products.insert(alias.product_id) {
            suggestions.push(ProductSuggestion {
                product_id: alias.product_id,
                name: alias.display_name.clone(),
            });
            if suggestions.len() >= config.max_suggestions {
                break;
            }
        }
    }

    let (best_score, best_alias) = match scored.first() {
        Some((score, alias)) => (*score, *alias),
        None => return PhotoIdentification::no_match(lines.to_vec()),
    };

    // Same decision policy as filename matching, photo-specific gates.
    let decided = decide(
        vec![MatchCandidate {
            product_id: best_alias.product_id,
            display_name: best_alias.display_name.clone(),
            score: best_score,
        }],
        &DecisionThresholds::photo(config.score_threshold),
    );

    let accepted = decided.is_resolved();
    PhotoIdentification {
        score: best_score,
        product_id: accepted.then_some(best_alias.product_id),
        product_name: accepted.then(|| best_alias.display_name.clone()),
        lines: lines.to_vec(),
        suggestions,
    }
}

/// Identify the product on a submitted photo.
///
/// Validation failures surface immediately; everything past validation
/// degrades to a zero-score success payload rather than an error. The
/// decode + recognition work runs on the blocking pool, capped by a
/// semaphore.
pub async fn identify_photo(
    bytes: Vec<u8>,
    content_type: &str,
    products: Vec<CanonicalProduct>,
    recognizer: Arc<dyn TextRecognizer>,
    config: PhotoMatchConfig,
) -> Result<PhotoIdentification, PhotoRequestError> {
    validate_request(content_type, bytes.len(), &config)?;

    let _permit = match RECOGNITION_SEMAPHORE.acquire().await {
        Ok(permit) => permit,
        Err(error) => {
            warn!("[Photo] Recognition semaphore closed: {error}");
            return Ok(PhotoIdentification::no_match(Vec::new()));
        }
    };

    let worker = tokio::task::spawn_blocking(move || {
        let lines = vision::extract_text_lines(recognizer.as_ref(), &bytes);
        let corpus = build_alias_corpus(&products);
        match_photo_lines(&lines, &corpus, &config)
    });

    match worker.await {
        Ok(payload) => Ok(payload),
        Err(error) => {
            warn!("[Photo] Identification worker failed: {error}");
            Ok(PhotoIdentification::no_match(Vec::new()))
        }
    }
}

fn validate_request(
    content_type: &str,
    size: usize,
    config: &PhotoMatchConfig,
) -> Result<(), PhotoRequestError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if !ACCEPTED_CONTENT_TYPES.contains(&mime.as_str()) {
        return Err(PhotoRequestError::UnsupportedContentType(
            content_type.to_string(),
        ));
    }
    if size > config.max_payload_bytes {
        return Err(PhotoRequestError::PayloadTooLarge {
            size,
            limit: config.max_payload_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/photo_tests.rs"]
mod tests;
