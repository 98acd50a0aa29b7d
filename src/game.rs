//! Match and guess domain records consumed by the write path.
//!
//! These records are owned by external domains (match CRUD, guess intake);
//! the engine only reads them when a match ends.

use serde::{Deserialize, Serialize};

use crate::types::{MatchId, MatchStatus, MemberId, TournamentId};

/// Final (or pending) result of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Stable match identifier.
    pub match_id: MatchId,
    /// Tournament this match belongs to.
    pub tournament_id: TournamentId,
    /// Lifecycle state; deltas are only computed for [`MatchStatus::Ended`].
    pub status: MatchStatus,
    /// Home-side final score, meaningful once ended.
    pub home_score: u32,
    /// Away-side final score, meaningful once ended.
    pub away_score: u32,
}

impl MatchResult {
    /// True when the match carries a determinable final result.
    pub fn is_ended(&self) -> bool {
        self.status == MatchStatus::Ended
    }
}

/// A member's predicted score for one match.
///
/// Immutable once the match ends; guesses recorded afterwards are ignored by
/// the scoring path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    /// Member who made the guess.
    pub member_id: MemberId,
    /// Match the guess is about.
    pub match_id: MatchId,
    /// Predicted home-side score.
    pub home_guess: u32,
    /// Predicted away-side score.
    pub away_guess: u32,
}
