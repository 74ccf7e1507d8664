use super::*;
use crate::services::resolver::MatchCandidate;

fn candidate(product_id: i64, score: f32) -> MatchCandidate {
    MatchCandidate {
        product_id,
        display_name: format!("Product {product_id}"),
        score,
    }
}

fn thresholds() -> DecisionThresholds {
    DecisionThresholds {
        min_score: 5.0,
        min_separation: 2.0,
    }
}

#[test]
fn test_resolved_when_both_gates_pass() {
    let result = decide(vec![candidate(1, 12.0), candidate(2, 6.0)], &thresholds());
    match result {
        super::ResolutionResult::Resolved {
            product_id, score, ..
        } => {
            assert_eq!(product_id, 1);
            assert_eq!(score, 12.0);
        }
        other => panic!("expected Resolved, got {other:?}"),
    }
}

#[test]
fn test_single_candidate_runner_up_counts_as_zero() {
    let result = decide(vec![candidate(1, 6.0)], &thresholds());
    assert!(result.is_resolved());
}

#[test]
fn test_ambiguous_below_min_score() {
    let result = decide(vec![candidate(1, 4.0)], &thresholds());
    match result {
        super::ResolutionResult::Ambiguous { candidates } => {
            assert_eq!(candidates.len(), 1);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[test]
fn test_ambiguous_when_gap_too_small() {
    let result = decide(vec![candidate(1, 12.0), candidate(2, 11.0)], &thresholds());
    match result {
        super::ResolutionResult::Ambiguous { candidates } => {
            assert_eq!(candidates[0].product_id, 1);
            assert_eq!(candidates[1].product_id, 2);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[test]
fn test_unresolved_without_candidates() {
    let result = decide(Vec::new(), &thresholds());
    match result {
        super::ResolutionResult::Unresolved { reason } => {
            assert_eq!(reason, super::UnresolvedReason::NoCandidates);
        }
        other => panic!("expected Unresolved, got {other:?}"),
    }
}

#[test]
fn test_ambiguous_caps_review_candidates() {
    let ranked: Vec<MatchCandidate> = (0..8).map(|i| candidate(i, 3.0)).collect();
    let result = decide(ranked, &thresholds());
    match result {
        super::ResolutionResult::Ambiguous { candidates } => {
            assert_eq!(candidates.len(), MAX_REVIEW_CANDIDATES);
        }
        other => panic!("expected Ambiguous, got {other:?}"),
    }
}

#[test]
fn test_photo_gates_use_threshold_only() {
    let gates = DecisionThresholds::photo(70.0);
    // Near-tie is fine for photo matching.
    assert!(decide(vec![candidate(1, 82.0), candidate(2, 81.5)], &gates).is_resolved());
    assert!(!decide(vec![candidate(1, 69.9)], &gates).is_resolved());
}

#[test]
fn test_zero_separation_disables_gap_gate() {
    let gates = DecisionThresholds {
        min_score: 5.0,
        min_separation: 0.0,
    };
    let result = decide(vec![candidate(1, 8.0), candidate(2, 8.0)], &gates);
    assert!(result.is_resolved());
}

// Resolved exactly when best ≥ min_score AND gap ≥ min_separation.
#[test]
fn test_decision_invariant_table() {
    let cases = [
        (12.0, 6.0, true),
        (12.0, 11.0, false),
        (4.9, 0.0, false),
        (5.0, 3.0, true),
        (5.0, 3.1, false),
        (7.0, 5.0, true),
    ];

    for (best, runner_up, expect_resolved) in cases {
        let result = decide(
            vec![candidate(1, best), candidate(2, runner_up)],
            &thresholds(),
        );
        let resolved = result.is_resolved();
        let gates_pass = best >= 5.0 && (best - runner_up) >= 2.0;
        assert_eq!(resolved, expect_resolved, "case ({best}, {runner_up})");
        assert_eq!(resolved, gates_pass, "invariant broken for ({best}, {runner_up})");
    }
}
