//! Shared primitive IDs and match lifecycle states.

use serde::{Deserialize, Serialize};

/// Opaque member identifier.
pub type MemberId = String;
/// Opaque tournament identifier.
pub type TournamentId = String;
/// Opaque league identifier.
pub type LeagueId = String;
/// Opaque match identifier.
pub type MatchId = String;
/// Cumulative or delta point value.
pub type Points = i64;

/// Match lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Guessing is still open; no final result exists.
    Open,
    /// The match has a final result and may be scored.
    Ended,
    /// The match was announced but never received a result.
    NotDefined,
}
