//! Scoreboard engine: write path, projection, reads, and hydration.
//!
//! One [`ScoreboardEngine`] owns the durable ledger, the volatile ranking
//! cache, and the injected scoring rule. Each operation is a self-contained
//! unit of work; serializing them through a single writer (see
//! [`crate::runtime`]) is what makes the snapshot/projection sequence safe.

/// Hydration: full cache rebuild from the ledger.
pub mod hydrate;
/// Paginated leaderboard reads and rank movement.
pub mod leaderboard;
/// Snapshot-then-project league refresh.
pub mod projection;
/// Match scoring and delta application.
pub mod scoring;

use crate::{
    cache::{CacheError, RankingCache},
    ledger::{LedgerError, LedgerStore},
    resolver::ScoreResolver,
    types::MatchId,
};

/// Engine-level failure.
#[derive(Debug)]
pub enum EngineError {
    /// Durable write or read failed; fatal for the calling operation.
    Ledger(LedgerError),
    /// Cache failed during a maintenance write (projection, hydration).
    Cache(CacheError),
    /// Cache failed on the read path; there is no synchronous ledger
    /// fallback for ranking queries.
    LeaderboardUnavailable(CacheError),
    /// The match exists but carries no final result yet.
    MatchNotEnded(MatchId),
    /// The match was already scored; points were not applied again.
    MatchAlreadyScored(MatchId),
}

impl From<LedgerError> for EngineError {
    fn from(value: LedgerError) -> Self {
        match value {
            LedgerError::AlreadyProcessed(id) => Self::MatchAlreadyScored(id),
            other => Self::Ledger(other),
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Whether the cache mirrored the last durable write.
///
/// A lagging cache is an accepted condition, corrected by the next
/// hydration run; it is never an error on the write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSync {
    /// Cache increments were applied.
    Mirrored,
    /// The ledger is ahead of the cache.
    Lagging,
}

/// Scoreboard and leaderboard caching engine.
pub struct ScoreboardEngine<R: ScoreResolver> {
    ledger: Box<dyn LedgerStore>,
    cache: Box<dyn RankingCache>,
    resolver: R,
}

impl<R: ScoreResolver> ScoreboardEngine<R> {
    /// Builds an engine over an opened ledger, cache, and scoring rule.
    pub fn new(ledger: Box<dyn LedgerStore>, cache: Box<dyn RankingCache>, resolver: R) -> Self {
        Self {
            ledger,
            cache,
            resolver,
        }
    }

    /// Read access to the ranking cache.
    pub fn cache(&self) -> &dyn RankingCache {
        self.cache.as_ref()
    }

    /// Read access to the ledger.
    pub fn ledger(&self) -> &dyn LedgerStore {
        self.ledger.as_ref()
    }
}
