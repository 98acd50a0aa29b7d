//! Scoreboard write service: turns a finished match into durable point
//! deltas plus a best-effort cache mirror.

use hashbrown::HashMap;
use tracing::warn;

use crate::{
    game::{Guess, MatchResult},
    resolver::ScoreResolver,
    types::{MatchId, MemberId, Points, TournamentId},
};

use super::{CacheSync, EngineError, EngineResult, ScoreboardEngine};

/// Outcome of a durable scoring write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Tournament whose ledger rows were incremented.
    pub tournament_id: TournamentId,
    /// Distinct members durably incremented.
    pub members: usize,
    /// Whether the cache mirrored the write.
    pub cache: CacheSync,
}

impl<R: ScoreResolver> ScoreboardEngine<R> {
    /// Resolves every guess on a finished match into a per-member delta map.
    ///
    /// Unknown matches and matches without guesses yield an empty map. A
    /// known match without a final result is an input-constraint violation.
    pub fn calculate_match_points(
        &self,
        match_id: &MatchId,
    ) -> EngineResult<HashMap<MemberId, Points>> {
        let Some((result, guesses)) = self.ledger.guesses_for_match(match_id)? else {
            return Ok(HashMap::new());
        };
        if !result.is_ended() {
            return Err(EngineError::MatchNotEnded(match_id.clone()));
        }
        Ok(self.resolve_deltas(&result, &guesses))
    }

    /// Durably increments the ledger for every delta, then mirrors the
    /// non-zero deltas into the master scoreboard in one batch.
    ///
    /// The ledger write is authoritative and fatal on failure; the cache
    /// step never is.
    pub fn apply_score_updates(
        &mut self,
        tournament_id: &TournamentId,
        deltas: &HashMap<MemberId, Points>,
    ) -> EngineResult<ApplyOutcome> {
        let batch = sorted_batch(deltas);
        if batch.is_empty() {
            return Ok(ApplyOutcome {
                tournament_id: tournament_id.clone(),
                members: 0,
                cache: CacheSync::Mirrored,
            });
        }
        self.ledger.bulk_increment(tournament_id, &batch)?;
        let cache = self.mirror_deltas(tournament_id, &batch);
        Ok(ApplyOutcome {
            tournament_id: tournament_id.clone(),
            members: batch.len(),
            cache,
        })
    }

    /// Calculates and applies points for a finished match, guarded so a
    /// repeated match-ended trigger cannot double-count.
    ///
    /// Returns `None` for an unknown match. A second call for the same
    /// match fails with [`EngineError::MatchAlreadyScored`] and leaves both
    /// ledger and cache untouched.
    pub fn score_match(&mut self, match_id: &MatchId) -> EngineResult<Option<ApplyOutcome>> {
        let Some((result, guesses)) = self.ledger.guesses_for_match(match_id)? else {
            return Ok(None);
        };
        if !result.is_ended() {
            return Err(EngineError::MatchNotEnded(match_id.clone()));
        }

        let deltas = self.resolve_deltas(&result, &guesses);
        let batch = sorted_batch(&deltas);
        self.ledger
            .bulk_increment_for_match(&result.tournament_id, match_id, &batch)?;
        let cache = self.mirror_deltas(&result.tournament_id, &batch);
        Ok(Some(ApplyOutcome {
            tournament_id: result.tournament_id,
            members: batch.len(),
            cache,
        }))
    }

    fn resolve_deltas(
        &self,
        result: &MatchResult,
        guesses: &[Guess],
    ) -> HashMap<MemberId, Points> {
        let mut deltas = HashMap::new();
        for guess in guesses {
            let breakdown = self.resolver.resolve(guess, result);
            *deltas.entry(guess.member_id.clone()).or_insert(0) += breakdown.total;
        }
        deltas
    }

    // Runs strictly after the durable increment, so the only divergence it
    // can leave is ledger-ahead-of-cache.
    fn mirror_deltas(
        &mut self,
        tournament_id: &TournamentId,
        batch: &[(MemberId, Points)],
    ) -> CacheSync {
        let nonzero: Vec<(MemberId, Points)> = batch
            .iter()
            .filter(|(_, delta)| *delta != 0)
            .cloned()
            .collect();
        if nonzero.is_empty() {
            return CacheSync::Mirrored;
        }
        match self.cache.increment_master(tournament_id, &nonzero) {
            Ok(()) => CacheSync::Mirrored,
            Err(err) => {
                warn!(
                    tournament = %tournament_id,
                    ?err,
                    "cache increment failed; ledger is ahead until next hydration"
                );
                CacheSync::Lagging
            }
        }
    }
}

fn sorted_batch(deltas: &HashMap<MemberId, Points>) -> Vec<(MemberId, Points)> {
    let mut batch: Vec<(MemberId, Points)> = deltas
        .iter()
        .map(|(member, delta)| (member.clone(), *delta))
        .collect();
    batch.sort();
    batch
}
