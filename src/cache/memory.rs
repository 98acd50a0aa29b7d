//! In-process implementation of [`RankingCache`].

use hashbrown::{HashMap, HashSet};

use crate::types::{LeagueId, MemberId, Points, TournamentId};

use super::{CacheResult, RankingCache, keys, score_set::ScoreSet};

/// Hash-map backed cache keyed by the conventional key shapes, so the layout
/// matches what a networked sorted-set store would hold.
#[derive(Debug, Default)]
pub struct MemoryCache {
    zsets: HashMap<String, ScoreSet>,
    sets: HashMap<String, HashSet<MemberId>>,
}

impl MemoryCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn zset(&self, key: &str) -> Option<&ScoreSet> {
        self.zsets.get(key)
    }
}

impl RankingCache for MemoryCache {
    fn increment_master(
        &mut self,
        tournament_id: &TournamentId,
        deltas: &[(MemberId, Points)],
    ) -> CacheResult<()> {
        let set = self
            .zsets
            .entry(keys::master_scores(tournament_id))
            .or_default();
        for (member, delta) in deltas {
            set.incr(member, *delta);
        }
        Ok(())
    }

    fn rebuild_master(
        &mut self,
        tournament_id: &TournamentId,
        rows: &[(MemberId, Points)],
    ) -> CacheResult<()> {
        let key = keys::master_scores(tournament_id);
        self.zsets.remove(&key);
        if rows.is_empty() {
            return Ok(());
        }
        let mut set = ScoreSet::new();
        for (member, points) in rows {
            set.set(member.clone(), *points);
        }
        self.zsets.insert(key, set);
        Ok(())
    }

    fn add_league_members(
        &mut self,
        league_id: &LeagueId,
        members: &[MemberId],
    ) -> CacheResult<()> {
        let set = self
            .sets
            .entry(keys::league_members(league_id))
            .or_default();
        set.extend(members.iter().cloned());
        Ok(())
    }

    fn snapshot_league(&mut self, league_id: &LeagueId) -> CacheResult<bool> {
        match self.zsets.remove(&keys::league_leaderboard(league_id)) {
            Some(current) => {
                self.zsets
                    .insert(keys::league_leaderboard_prev(league_id), current);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn project_league(
        &mut self,
        league_id: &LeagueId,
        tournament_id: &TournamentId,
    ) -> CacheResult<usize> {
        let leaderboard_key = keys::league_leaderboard(league_id);
        let members = self.sets.get(&keys::league_members(league_id));
        let master = self.zsets.get(&keys::master_scores(tournament_id));

        let mut projected = ScoreSet::new();
        if let (Some(members), Some(master)) = (members, master) {
            for member in members {
                if let Some(points) = master.score(member) {
                    projected.set(member.clone(), points);
                }
            }
        }

        // An empty intersection deletes the destination key, matching
        // sorted-set store semantics.
        let count = projected.len();
        if projected.is_empty() {
            self.zsets.remove(&leaderboard_key);
        } else {
            self.zsets.insert(leaderboard_key, projected);
        }
        Ok(count)
    }

    fn leaderboard_range(
        &self,
        league_id: &LeagueId,
        start: usize,
        stop: usize,
    ) -> CacheResult<Vec<(MemberId, Points)>> {
        Ok(self
            .zset(&keys::league_leaderboard(league_id))
            .map(|s| s.range_desc(start, stop))
            .unwrap_or_default())
    }

    fn leaderboard_rank(
        &self,
        league_id: &LeagueId,
        member_id: &MemberId,
    ) -> CacheResult<Option<(usize, Points)>> {
        let Some(set) = self.zset(&keys::league_leaderboard(league_id)) else {
            return Ok(None);
        };
        let Some(rank) = set.rank_desc(member_id) else {
            return Ok(None);
        };
        let points = set.score(member_id).unwrap_or(0);
        Ok(Some((rank, points)))
    }

    fn previous_rank(
        &self,
        league_id: &LeagueId,
        member_id: &MemberId,
    ) -> CacheResult<Option<usize>> {
        Ok(self
            .zset(&keys::league_leaderboard_prev(league_id))
            .and_then(|s| s.rank_desc(member_id)))
    }

    fn leaderboard_len(&self, league_id: &LeagueId) -> CacheResult<usize> {
        Ok(self
            .zset(&keys::league_leaderboard(league_id))
            .map(ScoreSet::len)
            .unwrap_or(0))
    }

    fn master_rows(&self, tournament_id: &TournamentId) -> CacheResult<Vec<(MemberId, Points)>> {
        Ok(self
            .zset(&keys::master_scores(tournament_id))
            .map(|s| s.iter_desc().map(|(m, p)| (m.clone(), p)).collect())
            .unwrap_or_default())
    }

    fn master_score(
        &self,
        tournament_id: &TournamentId,
        member_id: &MemberId,
    ) -> CacheResult<Option<Points>> {
        Ok(self
            .zset(&keys::master_scores(tournament_id))
            .and_then(|s| s.score(member_id)))
    }
}
