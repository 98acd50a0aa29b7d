//! Volatile ranking cache abstraction.
//!
//! The cache is an injected dependency with an explicit lifecycle, never a
//! singleton. [`memory::MemoryCache`] is the in-process implementation; a
//! networked sorted-set store can be dropped in behind [`RankingCache`]
//! using the same key shapes.

/// In-process cache keyed by the conventional key shapes.
pub mod memory;
/// Sorted-set primitive shared by cache implementations.
pub mod score_set;

use crate::types::{LeagueId, MemberId, Points, TournamentId};

/// Cache layer failure.
#[derive(Debug)]
pub enum CacheError {
    /// The cache backend could not be reached.
    Unavailable(String),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Conventional cache key shapes.
pub mod keys {
    use crate::types::{LeagueId, TournamentId};

    /// Master scoreboard sorted set for a tournament.
    pub fn master_scores(tournament_id: &TournamentId) -> String {
        format!("tournament:{tournament_id}:master_scores")
    }

    /// Membership set for a league.
    pub fn league_members(league_id: &LeagueId) -> String {
        format!("league:{league_id}:members")
    }

    /// Current leaderboard sorted set for a league.
    pub fn league_leaderboard(league_id: &LeagueId) -> String {
        format!("league:{league_id}:leaderboard")
    }

    /// Previous-cycle leaderboard snapshot for a league.
    pub fn league_leaderboard_prev(league_id: &LeagueId) -> String {
        format!("league:{league_id}:leaderboard:prev")
    }
}

/// Ranking cache operations used by the engine.
///
/// Writes mirror the durable ledger and are always reconstructible from it;
/// no method here is a source of truth.
pub trait RankingCache: Send {
    /// Applies per-member deltas to a tournament's master scoreboard in one
    /// batch. Absent members are created at their delta.
    fn increment_master(
        &mut self,
        tournament_id: &TournamentId,
        deltas: &[(MemberId, Points)],
    ) -> CacheResult<()>;

    /// Deletes the tournament's master scoreboard and repopulates it from
    /// `rows`. No stale member survives the rebuild.
    fn rebuild_master(
        &mut self,
        tournament_id: &TournamentId,
        rows: &[(MemberId, Points)],
    ) -> CacheResult<()>;

    /// Adds members to a league's membership set. Additive; the set may be
    /// shared across several tournaments' hydration runs.
    fn add_league_members(
        &mut self,
        league_id: &LeagueId,
        members: &[MemberId],
    ) -> CacheResult<()>;

    /// Renames the league's current leaderboard to the previous snapshot,
    /// replacing any older snapshot. Returns false when no current exists.
    fn snapshot_league(&mut self, league_id: &LeagueId) -> CacheResult<bool>;

    /// Recomputes the league's current leaderboard as the intersection of
    /// the tournament's master scoreboard and the league membership set.
    /// The projected score is the master score exactly (membership carries
    /// no weight). Returns the number of projected members.
    fn project_league(
        &mut self,
        league_id: &LeagueId,
        tournament_id: &TournamentId,
    ) -> CacheResult<usize>;

    /// Inclusive `[start, stop]` window over the current leaderboard in
    /// descending score order. Missing leaderboard reads as empty.
    fn leaderboard_range(
        &self,
        league_id: &LeagueId,
        start: usize,
        stop: usize,
    ) -> CacheResult<Vec<(MemberId, Points)>>;

    /// Zero-based descending rank and score in the current leaderboard.
    fn leaderboard_rank(
        &self,
        league_id: &LeagueId,
        member_id: &MemberId,
    ) -> CacheResult<Option<(usize, Points)>>;

    /// Zero-based descending rank in the previous snapshot.
    fn previous_rank(
        &self,
        league_id: &LeagueId,
        member_id: &MemberId,
    ) -> CacheResult<Option<usize>>;

    /// Cardinality of the current leaderboard.
    fn leaderboard_len(&self, league_id: &LeagueId) -> CacheResult<usize>;

    /// All master scoreboard rows for a tournament in descending order.
    fn master_rows(&self, tournament_id: &TournamentId) -> CacheResult<Vec<(MemberId, Points)>>;

    /// Cached master score for one member.
    fn master_score(
        &self,
        tournament_id: &TournamentId,
        member_id: &MemberId,
    ) -> CacheResult<Option<Points>>;
}
