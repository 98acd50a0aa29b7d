//! Durable ledger abstraction and SQLite implementation.

/// SQLite-backed ledger store.
pub mod sqlite;

use crate::{
    game::{Guess, MatchResult},
    types::{LeagueId, MatchId, MemberId, Points, TournamentId},
};

/// Ledger layer failure.
#[derive(Debug)]
pub enum LedgerError {
    /// Underlying SQLite failure.
    Sqlite(rusqlite::Error),
    /// A match was already scored; the guarded increment was refused.
    AlreadyProcessed(MatchId),
    /// Any other ledger failure.
    Message(String),
}

impl From<rusqlite::Error> for LedgerError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Authoritative relational store.
///
/// Covers the consumed interfaces of the core: guess/match reads, league
/// membership reads, and the atomic bulk point increment that is the single
/// source-of-truth write.
pub trait LedgerStore: Send {
    /// The match and every guess made on it, `None` for an unknown match.
    fn guesses_for_match(
        &self,
        match_id: &MatchId,
    ) -> LedgerResult<Option<(MatchResult, Vec<Guess>)>>;

    /// Atomically adds every delta to the `(member, tournament)` cumulative
    /// points rows, creating rows on first update. All-or-nothing.
    fn bulk_increment(
        &mut self,
        tournament_id: &TournamentId,
        deltas: &[(MemberId, Points)],
    ) -> LedgerResult<()>;

    /// Like [`LedgerStore::bulk_increment`], but first records `match_id` as
    /// processed inside the same transaction. Fails with
    /// [`LedgerError::AlreadyProcessed`] when the match was scored before,
    /// leaving the ledger untouched.
    fn bulk_increment_for_match(
        &mut self,
        tournament_id: &TournamentId,
        match_id: &MatchId,
        deltas: &[(MemberId, Points)],
    ) -> LedgerResult<()>;

    /// Every cumulative points row for a tournament.
    fn rows_for_tournament(
        &self,
        tournament_id: &TournamentId,
    ) -> LedgerResult<Vec<(MemberId, Points)>>;

    /// Every `(league, member)` pair for leagues tracking the tournament.
    fn memberships_for_tournament(
        &self,
        tournament_id: &TournamentId,
    ) -> LedgerResult<Vec<(LeagueId, MemberId)>>;
}
