//! Decision policy shared by the matching entry points.

use super::{MatchCandidate, ResolutionResult, UnresolvedReason};

/// Candidates carried into an Ambiguous outcome for human review.
pub const MAX_REVIEW_CANDIDATES: usize = 5;

/// Accept gates for one entry point.
#[derive(Debug, Clone, Copy)]
pub struct DecisionThresholds {
    /// Best score below this never auto-resolves.
    pub min_score: f32,
    /// Required lead over the runner-up; 0 disables the gap requirement.
    pub min_separation: f32,
}

impl DecisionThresholds {
    /// Gates for filename matching.
    pub fn filename() -> Self {
        Self {
            min_score: 5.0,
            min_separation: 2.0,
        }
    }

    /// Gates for photo matching: a similarity threshold on the 0–100 scale
    /// with no runner-up gap, since the alias corpus makes near-ties
    /// between aliases of the same product routine.
    pub fn photo(score_threshold: f32) -> Self {
        Self {
            min_score: score_threshold,
            min_separation: 0.0,
        }
    }
}

/// Classify ranked candidates as Resolved, Ambiguous, or Unresolved.
///
/// The outcome is Ambiguous exactly when candidates exist but
/// NOT(best ≥ min_score AND best − runner_up ≥ min_separation); an
/// ambiguous outcome is never auto-committed.
pub fn decide(
    ranked: Vec<MatchCandidate>,
    thresholds: &DecisionThresholds,
) -> ResolutionResult {
    let Some(best) = ranked.first() else {
        return ResolutionResult::Unresolved {
            reason: UnresolvedReason::NoCandidates,
        };
    };

    let runner_up_score = ranked.get(1).map(|c| c.score).unwrap_or(0.0);
    let accepted = best.score >= thresholds.min_score
        && (best.score - runner_up_score) >= thresholds.min_separation;

    if !accepted {
        let mut candidates = ranked;
        candidates.truncate(MAX_REVIEW_CANDIDATES);
        return ResolutionResult::Ambiguous { candidates };
    }

    ResolutionResult::Resolved {
        product_id: best.product_id,
        display_name: best.display_name.clone(),
        score: best.score,
    }
}

#[cfg(test)]
#[path = "tests/decision_tests.rs"]
mod tests;
