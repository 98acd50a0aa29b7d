//! Hydration service: wholesale cache rebuild from the relational ledger.

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    resolver::ScoreResolver,
    types::{LeagueId, MemberId, TournamentId},
};

use super::{EngineError, EngineResult, ScoreboardEngine};

/// Counts from one hydration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HydrationReport {
    /// Ledger rows written into the master scoreboard.
    pub members: usize,
    /// Leagues whose membership sets were extended.
    pub leagues: usize,
}

impl<R: ScoreResolver> ScoreboardEngine<R> {
    /// Rebuilds the tournament's master scoreboard and the membership sets
    /// of every league tracking it, entirely from the ledger.
    ///
    /// The master set is deleted before repopulation so removed members do
    /// not survive. Membership sets are extended additively, since one set
    /// may be shared across several tournaments' hydration runs. League
    /// leaderboard projections are not refreshed here.
    ///
    /// Not atomic across its two halves: on failure the tournament may be
    /// left with an empty master set, and the fix is to re-run.
    pub fn hydrate_tournament(
        &mut self,
        tournament_id: &TournamentId,
    ) -> EngineResult<HydrationReport> {
        let rows = self.ledger.rows_for_tournament(tournament_id)?;
        self.cache
            .rebuild_master(tournament_id, &rows)
            .map_err(EngineError::Cache)?;

        let memberships = self.ledger.memberships_for_tournament(tournament_id)?;
        let mut by_league: HashMap<LeagueId, Vec<MemberId>> = HashMap::new();
        for (league_id, member_id) in memberships {
            by_league.entry(league_id).or_default().push(member_id);
        }

        let leagues = by_league.len();
        for (league_id, members) in &by_league {
            self.cache
                .add_league_members(league_id, members)
                .map_err(EngineError::Cache)?;
        }

        debug!(
            tournament = %tournament_id,
            members = rows.len(),
            leagues,
            "tournament hydrated from ledger"
        );
        Ok(HydrationReport {
            members: rows.len(),
            leagues,
        })
    }
}
