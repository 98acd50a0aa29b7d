//! Runtime event stream payloads.

use crate::types::{LeagueId, TournamentId};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardEvent {
    /// Point deltas were durably applied for a tournament.
    ScoresApplied {
        /// Tournament whose ledger was incremented.
        tournament_id: TournamentId,
        /// Distinct members incremented.
        members: usize,
    },
    /// The durable write succeeded but the cache mirror did not; the
    /// tournament's master scoreboard lags until the next hydration.
    CacheLagging {
        /// Tournament whose cache is behind the ledger.
        tournament_id: TournamentId,
    },
    /// A league's leaderboard projection was refreshed.
    LeagueRefreshed {
        /// Refreshed league.
        league_id: LeagueId,
    },
    /// A tournament's cache state was rebuilt from the ledger.
    TournamentHydrated {
        /// Hydrated tournament.
        tournament_id: TournamentId,
        /// Master scoreboard rows written.
        members: usize,
    },
}
