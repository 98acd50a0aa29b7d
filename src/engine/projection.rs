//! League leaderboard projection: snapshot the current view, then rebuild it
//! from the master scoreboard and the league membership set.

use tracing::debug;

use crate::{
    resolver::ScoreResolver,
    types::{LeagueId, TournamentId},
};

use super::{EngineError, EngineResult, ScoreboardEngine};

impl<R: ScoreResolver> ScoreboardEngine<R> {
    /// Refreshes a league's ranked view from the tournament master.
    ///
    /// Step 1 renames the current leaderboard to the previous snapshot (a
    /// first run has no history and skips this). Step 2 projects a fresh
    /// current leaderboard as the intersection of the membership set and
    /// the master scoreboard; the projected score is the master score
    /// exactly.
    ///
    /// Callers must not refresh the same league concurrently; the runtime
    /// loop serializes refreshes for exactly this reason.
    pub fn refresh_league_ranking(
        &mut self,
        league_id: &LeagueId,
        tournament_id: &TournamentId,
    ) -> EngineResult<()> {
        let had_history = self
            .cache
            .snapshot_league(league_id)
            .map_err(EngineError::Cache)?;
        let projected = self
            .cache
            .project_league(league_id, tournament_id)
            .map_err(EngineError::Cache)?;
        debug!(
            league = %league_id,
            tournament = %tournament_id,
            projected,
            had_history,
            "league ranking refreshed"
        );
        Ok(())
    }
}
