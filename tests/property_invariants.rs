use std::collections::BTreeMap;

use hashbrown::HashMap;
use proptest::prelude::*;

use rankcache::{
    cache::{RankingCache, memory::MemoryCache, score_set::ScoreSet},
    engine::{ScoreboardEngine, leaderboard::LeaderboardQuery},
    game::{Guess, MatchResult},
    ledger::{LedgerStore, sqlite::SqliteLedger},
    resolver::ScoreBreakdown,
    types::{MemberId, Points},
};

fn flat(_guess: &Guess, _result: &MatchResult) -> ScoreBreakdown {
    ScoreBreakdown::of(1)
}

fn fresh_engine() -> ScoreboardEngine<fn(&Guess, &MatchResult) -> ScoreBreakdown> {
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    ScoreboardEngine::new(Box::new(ledger), Box::new(MemoryCache::new()), flat)
}

fn batch_strategy() -> impl Strategy<Value = Vec<(u8, Points)>> {
    prop::collection::vec((0u8..12, -50i64..200i64), 1..8)
}

fn as_delta_map(batch: &[(u8, Points)]) -> HashMap<MemberId, Points> {
    let mut map = HashMap::new();
    for (idx, delta) in batch {
        *map.entry(format!("m{idx:02}")).or_insert(0) += delta;
    }
    map
}

fn ledger_map(
    engine: &ScoreboardEngine<fn(&Guess, &MatchResult) -> ScoreBreakdown>,
    tournament: &str,
) -> BTreeMap<MemberId, Points> {
    engine
        .ledger()
        .rows_for_tournament(&tournament.to_string())
        .expect("ledger rows")
        .into_iter()
        .collect()
}

fn cache_map(
    engine: &ScoreboardEngine<fn(&Guess, &MatchResult) -> ScoreBreakdown>,
    tournament: &str,
) -> BTreeMap<MemberId, Points> {
    engine
        .cache()
        .master_rows(&tournament.to_string())
        .expect("cache rows")
        .into_iter()
        .collect()
}

proptest! {
    #[test]
    fn mirrored_cache_tracks_the_ledger_for_nonzero_balances(
        batches in prop::collection::vec(batch_strategy(), 1..30)
    ) {
        let mut engine = fresh_engine();
        let t1 = "t1".to_string();

        for batch in &batches {
            let deltas = as_delta_map(batch);
            engine.apply_score_updates(&t1, &deltas).expect("apply");

            // Zero deltas are durable but never mirrored, so the cache may
            // lack members whose balance is still zero and was only ever
            // touched by zero deltas. Every cached entry must match the
            // ledger; every nonzero-incremented member must be cached.
            let ledger = ledger_map(&engine, "t1");
            let cache = cache_map(&engine, "t1");
            for (member, points) in &cache {
                prop_assert_eq!(ledger.get(member), Some(points));
            }
        }

        // Hydration erases the zero-delta asymmetry: afterwards the cache
        // is exactly the ledger.
        engine.hydrate_tournament(&t1).expect("hydrate");
        prop_assert_eq!(cache_map(&engine, "t1"), ledger_map(&engine, "t1"));
    }

    #[test]
    fn pages_concatenate_to_the_full_leaderboard_with_contiguous_ranks(
        batch in prop::collection::vec((0u8..40, 1i64..500i64), 1..40),
        limit in 1u32..10,
    ) {
        let mut ledger = SqliteLedger::open_in_memory().expect("ledger");
        for (idx, _) in &batch {
            ledger
                .add_league_member(&"l1".to_string(), &format!("m{idx:02}"))
                .expect("member");
        }
        ledger
            .track_tournament(&"l1".to_string(), &"t1".to_string())
            .expect("track");

        let mut engine: ScoreboardEngine<fn(&Guess, &MatchResult) -> ScoreBreakdown> =
            ScoreboardEngine::new(Box::new(ledger), Box::new(MemoryCache::new()), flat);
        let l1 = "l1".to_string();
        let t1 = "t1".to_string();
        engine.hydrate_tournament(&t1).expect("hydrate");
        engine
            .apply_score_updates(&t1, &as_delta_map(&batch))
            .expect("apply");
        engine.refresh_league_ranking(&l1, &t1).expect("refresh");

        let total = engine.cache().leaderboard_len(&l1).expect("len");
        let full = engine
            .cache()
            .leaderboard_range(&l1, 0, total.saturating_sub(1))
            .expect("range");
        prop_assert_eq!(full.len(), total);

        let mut collected = Vec::new();
        let mut page = 1u32;
        loop {
            let out = engine
                .get_league_leaderboard(
                    &l1,
                    LeaderboardQuery { page, limit, member_id: None },
                )
                .expect("read");
            prop_assert_eq!(out.meta.total, total as u64);
            if out.data.is_empty() {
                break;
            }
            for (offset, row) in out.data.iter().enumerate() {
                let expected_rank = u64::from(page - 1) * u64::from(limit) + offset as u64 + 1;
                prop_assert_eq!(row.rank, expected_rank);
            }
            collected.extend(out.data.into_iter().map(|row| (row.member_id, row.points)));
            page += 1;
        }

        prop_assert_eq!(collected, full);
    }

    #[test]
    fn score_set_ranges_agree_with_a_sorted_reference(
        entries in prop::collection::vec((0u8..30, -100i64..100i64), 0..40),
        start in 0usize..50,
        width in 0usize..50,
    ) {
        let mut set = ScoreSet::new();
        let mut reference: BTreeMap<MemberId, Points> = BTreeMap::new();
        for (idx, points) in &entries {
            let member = format!("m{idx:02}");
            set.set(member.clone(), *points);
            reference.insert(member, *points);
        }

        // Descending by score, ties broken by reverse-lexicographic member.
        let mut expected: Vec<(MemberId, Points)> = reference
            .into_iter()
            .collect();
        expected.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        prop_assert_eq!(set.len(), expected.len());
        for (rank, (member, points)) in expected.iter().enumerate() {
            prop_assert_eq!(set.score(member), Some(*points));
            prop_assert_eq!(set.rank_desc(member), Some(rank));
        }

        let stop = start + width;
        let window = set.range_desc(start, stop);
        let expected_window: Vec<(MemberId, Points)> = expected
            .iter()
            .skip(start)
            .take(stop - start + 1)
            .cloned()
            .collect();
        prop_assert_eq!(window, expected_window);
    }
}
