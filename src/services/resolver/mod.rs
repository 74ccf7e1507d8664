//! Product resolution pipeline.
//!
//! One pass, no retries: Observation → Scoring → Decision →
//! {Resolved | Ambiguous | Unresolved}. Re-running an observation is a
//! caller concern.

pub mod batch;
pub mod decision;
pub mod index;
pub mod normalizer;
pub mod scoring;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

pub use batch::{BatchConfig, BatchReport, BatchSummary, FileOutcome, FileResolution};
pub use decision::{decide, DecisionThresholds, MAX_REVIEW_CANDIDATES};
pub use index::{CandidateIndex, IndexedProduct, TokenProfile};
pub use normalizer::{extract_weight, normalize_tokens, slugify, Vocabulary};
pub use scoring::{rank_candidates, score_candidate, ScoreWeights};

/// A noisy signal to resolve: filename stem, label text, or similar.
/// Ephemeral; never persisted by this core.
#[derive(Debug, Clone)]
pub struct Observation {
    /// Original string as received.
    pub raw: String,
    /// Normalized token set.
    pub tokens: HashSet<String>,
    /// Slug of the whole raw string, for near-exact comparison.
    pub base_slug: String,
    /// Weight hint extracted from the raw string, if any.
    pub weight_grams: Option<u32>,
}

impl Observation {
    pub fn from_text(raw: &str, vocabulary: &Vocabulary) -> Self {
        Self {
            tokens: normalizer::normalize_tokens(raw, vocabulary),
            base_slug: normalizer::slugify(raw),
            weight_grams: normalizer::extract_weight(raw),
            raw: raw.to_string(),
        }
    }
}

/// A scored catalog product, valid within one resolution call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub product_id: i64,
    pub display_name: String,
    pub score: f32,
}

/// Why an observation produced no candidates at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// The observation normalized to an empty token set.
    EmptyObservation,
    /// No candidate scored above zero.
    NoCandidates,
    /// The observation source could not be read.
    SourceUnreadable,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnresolvedReason::EmptyObservation => write!(f, "empty observation"),
            UnresolvedReason::NoCandidates => write!(f, "no candidates"),
            UnresolvedReason::SourceUnreadable => write!(f, "source unreadable"),
        }
    }
}

/// Terminal outcome of one resolution call. Ambiguity is a first-class
/// outcome requiring a stronger signal or human adjudication, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResolutionResult {
    Resolved {
        product_id: i64,
        display_name: String,
        score: f32,
    },
    Ambiguous {
        /// Ranked best-first, capped at [`MAX_REVIEW_CANDIDATES`].
        candidates: Vec<MatchCandidate>,
    },
    Unresolved {
        reason: UnresolvedReason,
    },
}

impl ResolutionResult {
    pub fn is_resolved(&self) -> bool {
        matches!(self, ResolutionResult::Resolved { .. })
    }
}

/// Score an observation against the index and apply the decision policy.
pub fn resolve_observation(
    observation: &Observation,
    index: &CandidateIndex,
    weights: &ScoreWeights,
    thresholds: &DecisionThresholds,
) -> ResolutionResult {
    if observation.tokens.is_empty() {
        return ResolutionResult::Unresolved {
            reason: UnresolvedReason::EmptyObservation,
        };
    }
    let ranked = scoring::rank_candidates(observation, index, weights);
    decision::decide(ranked, thresholds)
}
