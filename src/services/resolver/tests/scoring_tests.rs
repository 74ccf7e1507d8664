use super::*;
use crate::services::catalog::CanonicalProduct;
use crate::services::resolver::{CandidateIndex, Observation, Vocabulary};

fn product(id: i64, brand: &str, name: &str, weight: Option<u32>) -> CanonicalProduct {
    CanonicalProduct {
        id,
        brand: brand.to_string(),
        name: name.to_string(),
        weight_grams: weight,
        gtin: None,
        active: true,
    }
}

fn index_of(products: Vec<CanonicalProduct>) -> CandidateIndex {
    CandidateIndex::from_products(products, &Vocabulary::empty())
}

fn observe(text: &str) -> Observation {
    Observation::from_text(text, &Vocabulary::empty())
}

#[test]
fn test_token_intersection_base() {
    let index = index_of(vec![product(1, "Anchor", "Pure Butter", None)]);
    let observation = observe("anchor butter photo");
    // "anchor" + "butter" intersect; "photo" does not. Brand token +5 and
    // raw substring +3 also fire for "anchor".
    let score = score_candidate(&observation, &index.entries()[0], &ScoreWeights::default());
    assert_eq!(score, 2.0 + 5.0 + 3.0);
}

#[test]
fn test_weight_exact_bonus() {
    let index = index_of(vec![product(1, "Anchor", "Butter", Some(500))]);
    let with_exact = observe("butter_500g");
    let without = observe("butter");
    let weights = ScoreWeights::default();

    let exact = score_candidate(&with_exact, &index.entries()[0], &weights);
    let base = score_candidate(&without, &index.entries()[0], &weights);
    // butter + 500g tokens, +10 exact weight.
    assert_eq!(exact - base, 1.0 + 10.0);
}

#[test]
fn test_weight_close_bonus() {
    let index = index_of(vec![product(1, "Anchor", "Butter", Some(500))]);
    let observation = observe("butter 480 g");
    let score = score_candidate(&observation, &index.entries()[0], &ScoreWeights::default());
    // "butter" intersects; 480 vs 500 within 50 g → +5, no 480 token overlap.
    assert_eq!(score, 1.0 + 5.0);
}

#[test]
fn test_weight_far_no_bonus() {
    let index = index_of(vec![product(1, "Anchor", "Butter", Some(500))]);
    let observation = observe("butter 250 g");
    let score = score_candidate(&observation, &index.entries()[0], &ScoreWeights::default());
    assert_eq!(score, 1.0);
}

#[test]
fn test_brand_token_bonus() {
    let index = index_of(vec![product(1, "Anchor", "Butter", None)]);
    let weights = ScoreWeights::default();
    let with_brand = score_candidate(&observe("anchor spread"), &index.entries()[0], &weights);
    let without_brand = score_candidate(&observe("some spread"), &index.entries()[0], &weights);
    // +1 token, +5 brand slug in tokens, +3 raw substring.
    assert_eq!(with_brand - without_brand, 1.0 + 5.0 + 3.0);
}

#[test]
fn test_full_slug_bonus() {
    let index = index_of(vec![product(1, "Anchor", "Pure Butter", Some(500))]);
    let observation = observe("Anchor_Pure_Butter_500g");
    let score = score_candidate(&observation, &index.entries()[0], &ScoreWeights::default());
    // 4 shared tokens + exact weight 10 + brand 5 + slug 8 + substring 3.
    assert_eq!(score, 4.0 + 10.0 + 5.0 + 8.0 + 3.0);
}

#[test]
fn test_brand_substring_bonus_uses_raw_string() {
    // Brand with a space never survives tokenization, but the raw
    // substring check still sees it.
    let index = index_of(vec![product(1, "Lewis Road", "Milk", None)]);
    let observation = observe("lewis road milk bottle");
    let score = score_candidate(&observation, &index.entries()[0], &ScoreWeights::default());
    // lewis, road, milk tokens + substring 3.
    assert_eq!(score, 3.0 + 3.0);
}

#[test]
fn test_rank_drops_zero_scores() {
    let index = index_of(vec![
        product(1, "Anchor", "Butter", Some(500)),
        product(2, "Pams", "Frozen Peas", Some(1000)),
    ]);
    let ranked = rank_candidates(&observe("anchor butter"), &index, &ScoreWeights::default());
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].product_id, 1);
}

#[test]
fn test_rank_ties_break_by_id_ascending() {
    let index = index_of(vec![
        product(9, "Anchor", "Butter", Some(500)),
        product(3, "Anchor", "Butter", Some(500)),
    ]);
    let ranked = rank_candidates(&observe("anchor butter"), &index, &ScoreWeights::default());
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].score, ranked[1].score);
    assert_eq!(ranked[0].product_id, 3);
    assert_eq!(ranked[1].product_id, 9);
}

#[test]
fn test_score_monotonic_in_shared_tokens() {
    let weights = ScoreWeights::default();
    let observation = observe("anchor pure butter");

    let narrow = index_of(vec![product(1, "Anchor", "Butter", None)]);
    let wide = index_of(vec![product(1, "Anchor", "Pure Butter", None)]);

    let narrow_score = score_candidate(&observation, &narrow.entries()[0], &weights);
    let wide_score = score_candidate(&observation, &wide.entries()[0], &weights);
    assert!(wide_score >= narrow_score);
}
