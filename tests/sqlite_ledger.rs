use rankcache::{
    game::{Guess, MatchResult},
    ledger::{LedgerError, LedgerStore, sqlite::SqliteLedger},
    types::MatchStatus,
};

fn seed(ledger: &mut SqliteLedger) {
    ledger
        .record_match(&MatchResult {
            match_id: "m1".to_string(),
            tournament_id: "t1".to_string(),
            status: MatchStatus::Open,
            home_score: 0,
            away_score: 0,
        })
        .expect("match");
    ledger
        .record_guess(&Guess {
            member_id: "x".to_string(),
            match_id: "m1".to_string(),
            home_guess: 2,
            away_guess: 1,
        })
        .expect("guess");
    ledger
        .add_league_member(&"l1".to_string(), &"x".to_string())
        .expect("member");
    ledger
        .track_tournament(&"l1".to_string(), &"t1".to_string())
        .expect("track");
}

#[test]
fn finish_match_flips_status_and_score() {
    let mut ledger = SqliteLedger::open_in_memory().expect("ledger");
    seed(&mut ledger);

    ledger.finish_match(&"m1".to_string(), 2, 1).expect("finish");
    let (result, guesses) = ledger
        .guesses_for_match(&"m1".to_string())
        .expect("query")
        .expect("known match");
    assert_eq!(result.status, MatchStatus::Ended);
    assert_eq!(result.home_score, 2);
    assert_eq!(result.away_score, 1);
    assert_eq!(guesses.len(), 1);

    let err = ledger
        .finish_match(&"missing".to_string(), 1, 0)
        .expect_err("unknown match");
    assert!(matches!(err, LedgerError::Message(_)));
}

#[test]
fn ledger_state_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ledger.db");

    {
        let mut ledger = SqliteLedger::open(&path).expect("open");
        seed(&mut ledger);
        ledger.finish_match(&"m1".to_string(), 2, 1).expect("finish");
        ledger
            .bulk_increment_for_match(
                &"t1".to_string(),
                &"m1".to_string(),
                &[("x".to_string(), 3)],
            )
            .expect("increment");
    }

    let mut ledger = SqliteLedger::open(&path).expect("reopen");
    assert_eq!(
        ledger.rows_for_tournament(&"t1".to_string()).expect("rows"),
        vec![("x".to_string(), 3)]
    );
    assert_eq!(
        ledger
            .member_points(&"t1".to_string(), &"x".to_string())
            .expect("points"),
        Some(3)
    );
    assert_eq!(
        ledger
            .memberships_for_tournament(&"t1".to_string())
            .expect("memberships"),
        vec![("l1".to_string(), "x".to_string())]
    );

    // The idempotency claim is durable too.
    let err = ledger
        .bulk_increment_for_match(
            &"t1".to_string(),
            &"m1".to_string(),
            &[("x".to_string(), 3)],
        )
        .expect_err("already processed");
    assert!(matches!(err, LedgerError::AlreadyProcessed(id) if id == "m1"));
}

#[test]
fn unknown_members_and_tournaments_read_as_absent() {
    let ledger = SqliteLedger::open_in_memory().expect("ledger");
    assert!(ledger.rows_for_tournament(&"t1".to_string()).expect("rows").is_empty());
    assert_eq!(
        ledger
            .member_points(&"t1".to_string(), &"x".to_string())
            .expect("points"),
        None
    );
    assert!(ledger.guesses_for_match(&"m1".to_string()).expect("query").is_none());
}
