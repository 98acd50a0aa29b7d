use hashbrown::HashMap;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    engine::{
        CacheSync, EngineError, ScoreboardEngine,
        hydrate::HydrationReport,
        leaderboard::{LeaderboardPage, LeaderboardQuery},
        scoring::ApplyOutcome,
    },
    resolver::ScoreResolver,
    types::{LeagueId, MatchId, MemberId, Points, TournamentId},
};

use super::events::ScoreboardEvent;

/// Runtime-level failure.
#[derive(Debug)]
pub enum RuntimeError {
    /// The engine operation failed.
    Engine(EngineError),
    /// The runtime loop is gone.
    ChannelClosed,
}

impl From<EngineError> for RuntimeError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

/// Runtime tuning knobs.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the command queue feeding the single-writer loop.
    pub command_queue_bound: usize,
    /// Capacity of the broadcast event stream.
    pub events_capacity: usize,
    /// Upper bound applied to caller-supplied page limits.
    pub max_page_limit: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            events_capacity: 1024,
            max_page_limit: 100,
        }
    }
}

/// Cloneable async handle to the single-writer scoreboard loop.
pub struct ScoreboardHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ScoreboardEvent>,
}

impl Clone for ScoreboardHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    CalculatePoints {
        match_id: MatchId,
        resp: oneshot::Sender<Result<HashMap<MemberId, Points>, RuntimeError>>,
    },
    ScoreMatch {
        match_id: MatchId,
        resp: oneshot::Sender<Result<Option<ApplyOutcome>, RuntimeError>>,
    },
    ApplyUpdates {
        tournament_id: TournamentId,
        deltas: HashMap<MemberId, Points>,
        resp: oneshot::Sender<Result<ApplyOutcome, RuntimeError>>,
    },
    RefreshLeague {
        league_id: LeagueId,
        tournament_id: TournamentId,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Leaderboard {
        league_id: LeagueId,
        query: LeaderboardQuery,
        resp: oneshot::Sender<Result<LeaderboardPage, RuntimeError>>,
    },
    Hydrate {
        tournament_id: TournamentId,
        resp: oneshot::Sender<Result<HydrationReport, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer loop that owns `engine`.
///
/// Every operation, including league refreshes, runs to completion inside
/// one task, which is the crate's single-writer-per-league guarantee.
pub fn spawn_scoreboard<R: ScoreResolver>(
    engine: ScoreboardEngine<R>,
    config: RuntimeConfig,
) -> ScoreboardHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ScoreboardEvent>(config.events_capacity);

    let events_tx_loop = events_tx.clone();
    let max_page_limit = config.max_page_limit.max(1);

    tokio::spawn(async move {
        let mut engine = engine;
        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(cmd, &mut engine, &events_tx_loop, max_page_limit);
            if done {
                break;
            }
        }
    });

    ScoreboardHandle { cmd_tx, events_tx }
}

impl ScoreboardHandle {
    /// Subscribes to the runtime event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<ScoreboardEvent> {
        self.events_tx.subscribe()
    }

    /// See [`ScoreboardEngine::calculate_match_points`].
    pub async fn calculate_match_points(
        &self,
        match_id: impl Into<MatchId>,
    ) -> Result<HashMap<MemberId, Points>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::CalculatePoints {
                match_id: match_id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ScoreboardEngine::score_match`].
    pub async fn score_match(
        &self,
        match_id: impl Into<MatchId>,
    ) -> Result<Option<ApplyOutcome>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ScoreMatch {
                match_id: match_id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ScoreboardEngine::apply_score_updates`].
    pub async fn apply_score_updates(
        &self,
        tournament_id: impl Into<TournamentId>,
        deltas: HashMap<MemberId, Points>,
    ) -> Result<ApplyOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ApplyUpdates {
                tournament_id: tournament_id.into(),
                deltas,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ScoreboardEngine::refresh_league_ranking`].
    pub async fn refresh_league_ranking(
        &self,
        league_id: impl Into<LeagueId>,
        tournament_id: impl Into<TournamentId>,
    ) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RefreshLeague {
                league_id: league_id.into(),
                tournament_id: tournament_id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ScoreboardEngine::get_league_leaderboard`]. The limit is
    /// clamped to the configured maximum.
    pub async fn league_leaderboard(
        &self,
        league_id: impl Into<LeagueId>,
        query: LeaderboardQuery,
    ) -> Result<LeaderboardPage, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Leaderboard {
                league_id: league_id.into(),
                query,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// See [`ScoreboardEngine::hydrate_tournament`].
    pub async fn hydrate_tournament(
        &self,
        tournament_id: impl Into<TournamentId>,
    ) -> Result<HydrationReport, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Hydrate {
                tournament_id: tournament_id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Stops the runtime loop after draining in-flight commands.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }
}

fn handle_command<R: ScoreResolver>(
    cmd: Command,
    engine: &mut ScoreboardEngine<R>,
    events_tx: &broadcast::Sender<ScoreboardEvent>,
    max_page_limit: u32,
) -> bool {
    match cmd {
        Command::CalculatePoints { match_id, resp } => {
            let res = engine
                .calculate_match_points(&match_id)
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::ScoreMatch { match_id, resp } => {
            let res = engine.score_match(&match_id).map_err(RuntimeError::from);
            if let Ok(Some(outcome)) = &res {
                emit_apply_events(events_tx, outcome);
            }
            let _ = resp.send(res);
        }
        Command::ApplyUpdates {
            tournament_id,
            deltas,
            resp,
        } => {
            let res = engine
                .apply_score_updates(&tournament_id, &deltas)
                .map_err(RuntimeError::from);
            if let Ok(outcome) = &res {
                emit_apply_events(events_tx, outcome);
            }
            let _ = resp.send(res);
        }
        Command::RefreshLeague {
            league_id,
            tournament_id,
            resp,
        } => {
            let res = engine
                .refresh_league_ranking(&league_id, &tournament_id)
                .map_err(RuntimeError::from);
            if res.is_ok() {
                let _ = events_tx.send(ScoreboardEvent::LeagueRefreshed { league_id });
            }
            let _ = resp.send(res);
        }
        Command::Leaderboard {
            league_id,
            mut query,
            resp,
        } => {
            query.limit = query.limit.clamp(1, max_page_limit);
            let res = engine
                .get_league_leaderboard(&league_id, query)
                .map_err(RuntimeError::from);
            let _ = resp.send(res);
        }
        Command::Hydrate {
            tournament_id,
            resp,
        } => {
            let res = engine
                .hydrate_tournament(&tournament_id)
                .map_err(RuntimeError::from);
            if let Ok(report) = &res {
                let _ = events_tx.send(ScoreboardEvent::TournamentHydrated {
                    tournament_id,
                    members: report.members,
                });
            }
            let _ = resp.send(res);
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(());
            return true;
        }
    }

    false
}

fn emit_apply_events(events_tx: &broadcast::Sender<ScoreboardEvent>, outcome: &ApplyOutcome) {
    let _ = events_tx.send(ScoreboardEvent::ScoresApplied {
        tournament_id: outcome.tournament_id.clone(),
        members: outcome.members,
    });
    if outcome.cache == CacheSync::Lagging {
        let _ = events_tx.send(ScoreboardEvent::CacheLagging {
            tournament_id: outcome.tournament_id.clone(),
        });
    }
}
