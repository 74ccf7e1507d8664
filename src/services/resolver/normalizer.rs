//! Text normalization for observation and catalog strings.
//! Handles transliteration, tokenization, slugs, and weight extraction.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Regex;

/// Compiled regex for runs of non-alphanumeric characters.
static RE_NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("Invalid regex"));

/// `<number> <unit>` weight expressions, e.g. "500g", "1.5 kg", "2 kilos".
static RE_UNIT_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(kilograms?|kilos?|kgs?|grams?|g)\b")
        .expect("Invalid regex")
});

/// Bare 3–4 digit run not adjacent to other alphanumerics, e.g. "_500_".
static RE_BARE_WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^a-zA-Z0-9])(\d{3,4})(?:$|[^a-zA-Z0-9])").expect("Invalid regex")
});

/// Packaged-goods sanity bounds for extracted weights, in grams.
const MIN_WEIGHT_GRAMS: u32 = 50;
const MAX_WEIGHT_GRAMS: u32 = 2000;

/// Injectable token vocabulary.
///
/// Maps the collapsed form of a multi-word brand (e.g. "lewisroad") to its
/// sub-tokens so tokenizer splits still overlap with catalog tokens.
/// Substitute an empty or alternate table in tests; nothing here is global
/// state.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    brand_expansions: HashMap<String, Vec<String>>,
}

impl Vocabulary {
    pub fn empty() -> Self {
        Self {
            brand_expansions: HashMap::new(),
        }
    }

    pub fn with_brand(mut self, collapsed: &str, expansion: &[&str]) -> Self {
        self.brand_expansions.insert(
            collapsed.to_lowercase(),
            expansion.iter().map(|t| t.to_lowercase()).collect(),
        );
        self
    }

    fn expansion_for(&self, token: &str) -> Option<&[String]> {
        self.brand_expansions.get(token).map(Vec::as_slice)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::empty()
            .with_brand("lewisroad", &["lewis", "road"])
            .with_brand("paknsave", &["pak", "n", "save"])
            .with_brand("freshnfruity", &["fresh", "n", "fruity"])
    }
}

/// Normalize text into a token set.
///
/// Pipeline:
/// 1. Transliterate non-Latin characters to ASCII via deunicode
/// 2. Lowercase
/// 3. Collapse every run of non-alphanumerics to a single separator, split
/// 4. Expand known collapsed brand tokens into their sub-tokens
///
/// Empty input yields an empty set; the result is independent of word order.
pub fn normalize_tokens(text: &str, vocabulary: &Vocabulary) -> HashSet<String> {
    let latin = deunicode(text);
    let lower = latin.to_lowercase();

    let mut tokens: HashSet<String> = RE_NON_ALNUM
        .split(&lower)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect();

    let expansions: Vec<String> = tokens
        .iter()
        .filter_map(|token| vocabulary.expansion_for(token))
        .flat_map(|expansion| expansion.iter().cloned())
        .collect();
    tokens.extend(expansions);

    tokens
}

/// Hyphen-joined normalized form preserving word order, e.g.
/// "Anchor Pure Butter 500g" → "anchor-pure-butter-500g".
pub fn slugify(text: &str) -> String {
    let latin = deunicode(text);
    let lower = latin.to_lowercase();
    RE_NON_ALNUM
        .split(&lower)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract a package weight in grams from free text.
///
/// Matches `<number> kg|g|gram|kilo` first, then a bare 3–4 digit run not
/// followed by a letter. Kilo-units are converted ×1000 and rounded. Only
/// values in [50, 2000] g are accepted; anything else reads as "no weight
/// found", not an error.
pub fn extract_weight(text: &str) -> Option<u32> {
    for capture in RE_UNIT_WEIGHT.captures_iter(text) {
        let number = capture[1].replace(',', ".");
        let Ok(value) = number.parse::<f64>() else {
            continue;
        };
        let unit = capture[2].to_lowercase();
        let grams = if unit.starts_with('k') {
            (value * 1000.0).round()
        } else {
            value.round()
        };
        if let Some(grams) = in_bounds(grams) {
            return Some(grams);
        }
    }

    for capture in RE_BARE_WEIGHT.captures_iter(text) {
        let Ok(value) = capture[1].parse::<f64>() else {
            continue;
        };
        if let Some(grams) = in_bounds(value) {
            return Some(grams);
        }
    }

    None
}

fn in_bounds(grams: f64) -> Option<u32> {
    if grams < MIN_WEIGHT_GRAMS as f64 || grams > MAX_WEIGHT_GRAMS as f64 {
        return None;
    }
    Some(grams as u32)
}

#[cfg(test)]
#[path = "tests/normalizer_tests.rs"]
mod tests;
