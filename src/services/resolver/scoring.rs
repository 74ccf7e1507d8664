//! Compatibility scoring between one observation and one candidate.

use super::index::{CandidateIndex, IndexedProduct};
use super::{MatchCandidate, Observation};

/// Bonus table for the scoring matcher. Injectable so alternate weightings
/// can be exercised in tests; the defaults are the canonical values shared
/// by every entry point.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Both weights present and exactly equal.
    pub weight_exact_bonus: f32,
    /// Both weights present and within `weight_tolerance_grams`.
    pub weight_close_bonus: f32,
    pub weight_tolerance_grams: u32,
    /// Candidate brand slug appears in the observation token set.
    pub brand_token_bonus: f32,
    /// Observation base slug equals the candidate full slug.
    pub slug_exact_bonus: f32,
    /// Candidate brand appears as a raw case-insensitive substring.
    pub brand_substring_bonus: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            weight_exact_bonus: 10.0,
            weight_close_bonus: 5.0,
            weight_tolerance_grams: 50,
            brand_token_bonus: 5.0,
            slug_exact_bonus: 8.0,
            brand_substring_bonus: 3.0,
        }
    }
}

/// Score one candidate against one observation.
///
/// Base is the token-set intersection size; bonuses stack on top. Adding a
/// shared token to either side never decreases the score.
pub fn score_candidate(
    observation: &Observation,
    entry: &IndexedProduct,
    weights: &ScoreWeights,
) -> f32 {
    let profile = &entry.profile;
    let mut score = observation
        .tokens
        .intersection(&profile.tokens)
        .count() as f32;

    match (observation.weight_grams, profile.weight_grams) {
        (Some(observed), Some(known)) if observed == known => {
            score += weights.weight_exact_bonus;
        }
        (Some(observed), Some(known))
            if observed.abs_diff(known) <= weights.weight_tolerance_grams =>
        {
            score += weights.weight_close_bonus;
        }
        _ => {}
    }

    if !profile.brand_slug.is_empty() && observation.tokens.contains(&profile.brand_slug) {
        score += weights.brand_token_bonus;
    }

    if !profile.full_slug.is_empty() && observation.base_slug == profile.full_slug {
        score += weights.slug_exact_bonus;
    }

    if !entry.product.brand.is_empty()
        && observation
            .raw
            .to_lowercase()
            .contains(&entry.product.brand.to_lowercase())
    {
        score += weights.brand_substring_bonus;
    }

    score
}

/// Score the whole index and return retained candidates ranked best-first.
///
/// Only candidates with score > 0 are kept. Ties are broken by catalog id
/// ascending so runs are reproducible.
pub fn rank_candidates(
    observation: &Observation,
    index: &CandidateIndex,
    weights: &ScoreWeights,
) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> = index
        .entries()
        .iter()
        .filter_map(|entry| {
            let score = score_candidate(observation, entry, weights);
            if score <= 0.0 {
                return None;
            }
            #[cfg(feature = "debug_matcher")]
            log::debug!(
                "[Matcher] {:?} vs {} → {score}",
                observation.raw,
                entry.product.display_name()
            );
            Some(MatchCandidate {
                product_id: entry.product.id,
                display_name: entry.product.display_name(),
                score,
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });

    candidates
}

#[cfg(test)]
#[path = "tests/scoring_tests.rs"]
mod tests;
