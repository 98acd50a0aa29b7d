//! Score Delta Resolver seam.
//!
//! The scoring rule that turns a (guess, match) pair into a point value is an
//! external collaborator. The engine consumes it through [`ScoreResolver`]
//! and never reimplements it.

use serde::{Deserialize, Serialize};

use crate::{
    game::{Guess, MatchResult},
    types::Points,
};

/// Resolved point value for one guess, with optional labelled components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Total points awarded; non-negative.
    pub total: Points,
    /// Labelled sub-scores, e.g. `("exact_score", 2)`. May be empty.
    pub detail: Vec<(String, Points)>,
}

impl ScoreBreakdown {
    /// Breakdown with a bare total and no components.
    pub fn of(total: Points) -> Self {
        Self {
            total,
            detail: Vec::new(),
        }
    }
}

/// External scoring rule.
///
/// Implementations must be pure and deterministic given their inputs, and
/// must return a non-negative total.
pub trait ScoreResolver: Send + Sync + 'static {
    /// Resolves the point value of `guess` against the ended `result`.
    fn resolve(&self, guess: &Guess, result: &MatchResult) -> ScoreBreakdown;
}

impl<F> ScoreResolver for F
where
    F: Fn(&Guess, &MatchResult) -> ScoreBreakdown + Send + Sync + 'static,
{
    fn resolve(&self, guess: &Guess, result: &MatchResult) -> ScoreBreakdown {
        self(guess, result)
    }
}
