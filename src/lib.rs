//! Scoreboard and leaderboard caching engine for prediction games.
//!
//! Match results become durable point increments in a relational ledger,
//! mirrored into a read-optimized ranking cache; league leaderboards are
//! projected from the cache and served paginated with rank movement. The
//! cache is disposable: hydration rebuilds it wholesale from the ledger.
//!
//! # Examples
//!
//! Direct engine usage with an in-memory ledger and cache:
//! ```
//! use rankcache::{
//!     cache::memory::MemoryCache,
//!     engine::ScoreboardEngine,
//!     game::{Guess, MatchResult},
//!     ledger::sqlite::SqliteLedger,
//!     resolver::ScoreBreakdown,
//!     types::MatchStatus,
//! };
//!
//! let mut ledger = SqliteLedger::open_in_memory().expect("open ledger");
//! ledger
//!     .record_match(&MatchResult {
//!         match_id: "m1".into(),
//!         tournament_id: "t1".into(),
//!         status: MatchStatus::Ended,
//!         home_score: 2,
//!         away_score: 1,
//!     })
//!     .expect("record match");
//! ledger
//!     .record_guess(&Guess {
//!         member_id: "alice".into(),
//!         match_id: "m1".into(),
//!         home_guess: 2,
//!         away_guess: 1,
//!     })
//!     .expect("record guess");
//!
//! let exact_or_nothing = |guess: &Guess, result: &MatchResult| {
//!     if guess.home_guess == result.home_score && guess.away_guess == result.away_score {
//!         ScoreBreakdown::of(3)
//!     } else {
//!         ScoreBreakdown::of(0)
//!     }
//! };
//!
//! let mut engine = ScoreboardEngine::new(
//!     Box::new(ledger),
//!     Box::new(MemoryCache::new()),
//!     exact_or_nothing,
//! );
//! let outcome = engine
//!     .score_match(&"m1".to_string())
//!     .expect("score")
//!     .expect("known match");
//! assert_eq!(outcome.members, 1);
//! ```
//!
//! Runtime usage with an on-disk ledger:
//! ```no_run
//! use rankcache::{
//!     cache::memory::MemoryCache,
//!     engine::{ScoreboardEngine, leaderboard::LeaderboardQuery},
//!     ledger::sqlite::SqliteLedger,
//!     resolver::ScoreBreakdown,
//!     runtime::handle::{RuntimeConfig, spawn_scoreboard},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let ledger = SqliteLedger::open("ledger.db").expect("open ledger");
//! let engine = ScoreboardEngine::new(
//!     Box::new(ledger),
//!     Box::new(MemoryCache::new()),
//!     |_guess: &rankcache::game::Guess, _result: &rankcache::game::MatchResult| {
//!         ScoreBreakdown::of(1)
//!     },
//! );
//! let handle = spawn_scoreboard(engine, RuntimeConfig::default());
//! handle.hydrate_tournament("t1").await.expect("hydrate");
//! handle
//!     .refresh_league_ranking("friends", "t1")
//!     .await
//!     .expect("refresh");
//! let page = handle
//!     .league_leaderboard("friends", LeaderboardQuery::default())
//!     .await
//!     .expect("leaderboard");
//! println!("{} ranked members", page.meta.total);
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Volatile ranking cache: trait, key shapes, and in-process implementation.
pub mod cache;
/// Scoreboard engine services.
pub mod engine;
/// Match and guess domain records.
pub mod game;
/// Durable ledger abstraction and SQLite implementation.
pub mod ledger;
/// Score Delta Resolver seam.
pub mod resolver;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Shared primitive types and enums.
pub mod types;
