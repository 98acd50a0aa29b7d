use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hashbrown::HashMap;

use rankcache::{
    cache::{memory::MemoryCache, score_set::ScoreSet},
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

fn delta_batch(members: usize, round: usize) -> HashMap<MemberId, Points> {
    (0..members)
        .map(|i| (format!("m{i:05}"), ((i + round) % 7) as Points + 1))
        .collect()
}

fn bench_apply_updates(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_updates");
    for members in [100usize, 1000usize] {
        group.bench_with_input(
            BenchmarkId::from_parameter(members),
            &members,
            |b, &members| {
                b.iter(|| {
                    let mut engine = fresh_engine();
                    let t1 = "t1".to_string();
                    for round in 0..10 {
                        engine
                            .apply_score_updates(&t1, &delta_batch(members, round))
                            .expect("apply");
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_score_set_incr(c: &mut Criterion) {
    c.bench_function("score_set_incr_50k", |b| {
        b.iter(|| {
            let mut set = ScoreSet::new();
            for i in 0..50_000u64 {
                set.incr(&format!("m{}", i % 10_000), (i % 13) as Points);
            }
        });
    });
}

fn bench_leaderboard_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard_page");

    for members in [1_000usize, 10_000usize] {
        let mut ledger = SqliteLedger::open_in_memory().expect("ledger");
        for i in 0..members {
            ledger
                .add_league_member(&"l1".to_string(), &format!("m{i:05}"))
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
            .apply_score_updates(&t1, &delta_batch(members, 0))
            .expect("apply");
        engine.refresh_league_ranking(&l1, &t1).expect("refresh");

        group.bench_with_input(
            BenchmarkId::from_parameter(members),
            &members,
            |b, &members| {
                b.iter(|| {
                    let page = (members / 25 / 2).max(1) as u32;
                    let _ = engine
                        .get_league_leaderboard(
                            &l1,
                            LeaderboardQuery {
                                page,
                                limit: 25,
                                member_id: Some("m00042".to_string()),
                            },
                        )
                        .expect("read");
                });
            },
        );
    }

    group.finish();
}

fn bench_hydration(c: &mut Criterion) {
    let mut group = c.benchmark_group("hydrate");

    for members in [1_000usize, 10_000usize] {
        let mut ledger = SqliteLedger::open_in_memory().expect("ledger");
        let rows: Vec<(MemberId, Points)> = (0..members)
            .map(|i| (format!("m{i:05}"), (i % 91) as Points))
            .collect();
        ledger.bulk_increment(&"t1".to_string(), &rows).expect("seed");

        let mut engine: ScoreboardEngine<fn(&Guess, &MatchResult) -> ScoreBreakdown> =
            ScoreboardEngine::new(Box::new(ledger), Box::new(MemoryCache::new()), flat);
        let t1 = "t1".to_string();

        group.bench_with_input(
            BenchmarkId::from_parameter(members),
            &members,
            |b, _| {
                b.iter(|| {
                    engine.hydrate_tournament(&t1).expect("hydrate");
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_updates,
    bench_score_set_incr,
    bench_leaderboard_page,
    bench_hydration
);
criterion_main!(benches);
