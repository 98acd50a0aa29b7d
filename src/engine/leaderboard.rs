//! Leaderboard read service: paginated league rankings with optional
//! per-member rank, points, and movement.

use serde::{Deserialize, Serialize};

use crate::{
    resolver::ScoreResolver,
    types::{LeagueId, MemberId, Points},
};

use super::{EngineError, EngineResult, ScoreboardEngine};

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_LIMIT: u32 = 25;

/// Leaderboard read parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardQuery {
    /// 1-based page number; values below 1 are clamped to 1.
    pub page: u32,
    /// Page size; values below 1 are clamped to 1.
    pub limit: u32,
    /// Member whose stats should be included, if any.
    pub member_id: Option<MemberId>,
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            member_id: None,
        }
    }
}

/// One ranked leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    /// Ranked member.
    pub member_id: MemberId,
    /// Cumulative points in the tracked tournament.
    pub points: Points,
    /// 1-based contiguous rank.
    pub rank: u64,
}

/// Pagination metadata for client-side controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-based page served.
    pub page: u32,
    /// Page size served.
    pub limit: u32,
    /// Full cardinality of the league's current leaderboard.
    pub total: u64,
}

/// Rank, points, and movement for one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberStats {
    /// 1-based rank in the current leaderboard.
    pub rank: u64,
    /// Cumulative points.
    pub points: Points,
    /// `previous_rank - current_rank`; positive means the member moved up.
    /// Zero for members absent from the previous snapshot.
    pub movement: i64,
}

/// One page of a league leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    /// Ranked entries in descending score order.
    pub data: Vec<LeaderboardRow>,
    /// Pagination metadata.
    pub meta: PageMeta,
    /// Stats for the requested member; `None` when no member was requested
    /// or the member never scored in this league.
    pub my_stats: Option<MemberStats>,
}

impl<R: ScoreResolver> ScoreboardEngine<R> {
    /// Serves one page of a league's current leaderboard.
    ///
    /// An unknown league reads as an empty page with `total = 0`; a cache
    /// failure surfaces as [`EngineError::LeaderboardUnavailable`] so
    /// callers never mistake "cache down" for "empty league".
    pub fn get_league_leaderboard(
        &self,
        league_id: &LeagueId,
        query: LeaderboardQuery,
    ) -> EngineResult<LeaderboardPage> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let start = (page as usize - 1) * limit as usize;
        let stop = start + limit as usize - 1;

        let rows = self
            .cache
            .leaderboard_range(league_id, start, stop)
            .map_err(EngineError::LeaderboardUnavailable)?;
        let total = self
            .cache
            .leaderboard_len(league_id)
            .map_err(EngineError::LeaderboardUnavailable)? as u64;

        let data = rows
            .into_iter()
            .enumerate()
            .map(|(idx, (member_id, points))| LeaderboardRow {
                member_id,
                points,
                rank: (start + idx + 1) as u64,
            })
            .collect();

        let my_stats = match &query.member_id {
            Some(member_id) => self.member_stats(league_id, member_id)?,
            None => None,
        };

        Ok(LeaderboardPage {
            data,
            meta: PageMeta { page, limit, total },
            my_stats,
        })
    }

    fn member_stats(
        &self,
        league_id: &LeagueId,
        member_id: &MemberId,
    ) -> EngineResult<Option<MemberStats>> {
        let Some((rank0, points)) = self
            .cache
            .leaderboard_rank(league_id, member_id)
            .map_err(EngineError::LeaderboardUnavailable)?
        else {
            return Ok(None);
        };

        let movement = match self
            .cache
            .previous_rank(league_id, member_id)
            .map_err(EngineError::LeaderboardUnavailable)?
        {
            Some(prev0) => prev0 as i64 - rank0 as i64,
            None => 0,
        };

        Ok(Some(MemberStats {
            rank: rank0 as u64 + 1,
            points,
            movement,
        }))
    }
}
