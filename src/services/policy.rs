//! Depth policy decisions.
//!
//! Every enforcement point funnels through here: create (reject up front),
//! edit (detect and repair after the fact), bulk assign (drop and count),
//! and the candidate sets a client renders (eligible parents, checklist
//! eligibility). Decisions are advisory values; callers apply them to the
//! tree and record notices.
//!
//! Boundary conventions, kept deliberately distinct:
//! - existing-depth checks are inclusive (`depth <= max` is in bounds);
//! - parent-eligibility checks are strict (`depth < max`, since a child of
//!   the candidate would land at `depth + 1`).

use crate::domain::models::TaxonomyPolicy;
use crate::forest::{self, Term};
use crate::services::depth;

#[derive(thiserror::Error, Debug)]
pub enum DepthError {
    #[error("cannot create a term at depth greater than {max} for {taxonomy}")]
    TooDeep { taxonomy: String, max: u32 },
}

#[derive(Debug, PartialEq, Eq)]
pub enum InsertDecision {
    Admit,
    Reject { max: u32 },
}

/// Pre-insertion check. Root inserts are always admitted; a child is admitted
/// iff it would land at or above the ceiling.
pub fn evaluate_insert(terms: &[Term], max: u32, parent: Option<u64>) -> InsertDecision {
    if max == 0 {
        return InsertDecision::Admit;
    }
    let Some(parent) = parent else {
        return InsertDecision::Admit;
    };
    if depth::depth_if_child_of(terms, parent) > max {
        InsertDecision::Reject { max }
    } else {
        InsertDecision::Admit
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    NoAction,
    Correct { max: u32 },
}

/// Post-hoc check for edits: the caller has already applied the reparent.
/// `Correct` means the caller must move the term back to root and record a
/// notice. Re-evaluating after that correction always yields `NoAction`,
/// since a root term is within every limit.
pub fn evaluate_move(terms: &[Term], max: u32, id: u64) -> MoveOutcome {
    if max == 0 {
        return MoveOutcome::NoAction;
    }
    let Some(term) = forest::get_term(terms, id) else {
        return MoveOutcome::NoAction;
    };
    if term.parent.is_none() {
        return MoveOutcome::NoAction;
    }
    if depth::depth_of(terms, id) > max {
        MoveOutcome::Correct { max }
    } else {
        MoveOutcome::NoAction
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct AssignOutcome {
    pub admitted: Vec<String>,
    pub removed: usize,
}

/// Filter a bulk-assignment candidate list, preserving input order.
/// Candidates that resolve to a term are admitted (normalized to their id)
/// iff the term is within the ceiling, otherwise dropped and counted.
/// Candidates that resolve to nothing pass through untouched: the engine
/// cannot safely drop what it cannot identify.
pub fn filter_assignable(terms: &[Term], max: u32, candidates: &[String]) -> AssignOutcome {
    if max == 0 {
        return AssignOutcome {
            admitted: candidates.to_vec(),
            removed: 0,
        };
    }
    let mut admitted = Vec::new();
    let mut removed = 0;
    for candidate in candidates {
        match forest::resolve_term(terms, candidate) {
            None => admitted.push(candidate.clone()),
            Some(term) => {
                if depth::depth_of(terms, term.id) <= max {
                    admitted.push(term.id.to_string());
                } else {
                    removed += 1;
                }
            }
        }
    }
    AssignOutcome { admitted, removed }
}

/// Terms eligible to parent a new child: strictly shallower than the
/// ceiling, so the child stays within it.
pub fn eligible_parents<'a>(terms: &'a [Term], max: u32) -> Vec<&'a Term> {
    terms
        .iter()
        .filter(|t| max == 0 || depth::depth_of(terms, t.id) < max)
        .collect()
}

/// Whether an existing term at `depth` may be assigned to an object.
pub fn assignable(max: u32, depth: u32) -> bool {
    max == 0 || depth <= max
}

/// Level label for a depth, when labels are enabled and a non-empty entry
/// exists at that index.
pub fn label_for(policy: &TaxonomyPolicy, depth: u32) -> Option<String> {
    if !policy.show_labels {
        return None;
    }
    policy
        .labels
        .get(depth as usize)
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}
