//! SQLite-backed authoritative ledger.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    game::{Guess, MatchResult},
    types::{LeagueId, MatchId, MatchStatus, MemberId, Points, TournamentId},
};

use super::{LedgerError, LedgerResult, LedgerStore};

/// SQLite implementation of [`LedgerStore`].
///
/// Also carries the relational seeding surface (matches, guesses, league
/// membership and tracking rows) that the surrounding domains write and this
/// core reads.
pub struct SqliteLedger {
    conn: Connection,
}

impl SqliteLedger {
    /// Opens or creates a ledger database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory ledger.
    pub fn open_in_memory() -> LedgerResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> LedgerResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Inserts or replaces a match row.
    pub fn record_match(&mut self, result: &MatchResult) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO matches(match_id, tournament_id, status, home_score, away_score)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.match_id,
                result.tournament_id,
                status_to_i64(result.status),
                result.home_score,
                result.away_score,
            ],
        )?;
        Ok(())
    }

    /// Marks a match as ended with its final score.
    pub fn finish_match(
        &mut self,
        match_id: &MatchId,
        home_score: u32,
        away_score: u32,
    ) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE matches SET status = ?2, home_score = ?3, away_score = ?4 WHERE match_id = ?1",
            params![match_id, status_to_i64(MatchStatus::Ended), home_score, away_score],
        )?;
        if changed == 0 {
            return Err(LedgerError::Message(format!("unknown match: {match_id}")));
        }
        Ok(())
    }

    /// Records one member's guess for a match.
    pub fn record_guess(&mut self, guess: &Guess) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT INTO guesses(match_id, member_id, home_guess, away_guess)
             VALUES (?1, ?2, ?3, ?4)",
            params![guess.match_id, guess.member_id, guess.home_guess, guess.away_guess],
        )?;
        Ok(())
    }

    /// Adds a member to a league.
    pub fn add_league_member(
        &mut self,
        league_id: &LeagueId,
        member_id: &MemberId,
    ) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO league_members(league_id, member_id) VALUES (?1, ?2)",
            params![league_id, member_id],
        )?;
        Ok(())
    }

    /// Marks a tournament as tracked by a league.
    pub fn track_tournament(
        &mut self,
        league_id: &LeagueId,
        tournament_id: &TournamentId,
    ) -> LedgerResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO league_tournaments(league_id, tournament_id) VALUES (?1, ?2)",
            params![league_id, tournament_id],
        )?;
        Ok(())
    }

    /// Cumulative points for one `(member, tournament)` pair.
    pub fn member_points(
        &self,
        tournament_id: &TournamentId,
        member_id: &MemberId,
    ) -> LedgerResult<Option<Points>> {
        let points = self
            .conn
            .query_row(
                "SELECT points FROM performances WHERE tournament_id = ?1 AND member_id = ?2",
                params![tournament_id, member_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(points)
    }

    fn upsert_deltas(
        tx: &rusqlite::Transaction<'_>,
        tournament_id: &TournamentId,
        deltas: &[(MemberId, Points)],
    ) -> LedgerResult<()> {
        let mut stmt = tx.prepare(
            "INSERT INTO performances(tournament_id, member_id, points) VALUES (?1, ?2, ?3)
             ON CONFLICT(tournament_id, member_id) DO UPDATE SET points = points + excluded.points",
        )?;
        for (member_id, delta) in deltas {
            stmt.execute(params![tournament_id, member_id, delta])?;
        }
        Ok(())
    }
}

impl LedgerStore for SqliteLedger {
    fn guesses_for_match(
        &self,
        match_id: &MatchId,
    ) -> LedgerResult<Option<(MatchResult, Vec<Guess>)>> {
        let row = self
            .conn
            .query_row(
                "SELECT tournament_id, status, home_score, away_score FROM matches WHERE match_id = ?1",
                params![match_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, u32>(2)?,
                        row.get::<_, u32>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((tournament_id, status, home_score, away_score)) = row else {
            return Ok(None);
        };

        let result = MatchResult {
            match_id: match_id.clone(),
            tournament_id,
            status: status_from_i64(status)?,
            home_score,
            away_score,
        };

        let mut stmt = self.conn.prepare(
            "SELECT member_id, home_guess, away_guess FROM guesses WHERE match_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![match_id], |row| {
            Ok(Guess {
                member_id: row.get(0)?,
                match_id: match_id.clone(),
                home_guess: row.get(1)?,
                away_guess: row.get(2)?,
            })
        })?;

        let mut guesses = Vec::new();
        for row in rows {
            guesses.push(row?);
        }
        Ok(Some((result, guesses)))
    }

    fn bulk_increment(
        &mut self,
        tournament_id: &TournamentId,
        deltas: &[(MemberId, Points)],
    ) -> LedgerResult<()> {
        if deltas.is_empty() {
            return Ok(());
        }
        let tx = self.conn.transaction()?;
        Self::upsert_deltas(&tx, tournament_id, deltas)?;
        tx.commit()?;
        Ok(())
    }

    fn bulk_increment_for_match(
        &mut self,
        tournament_id: &TournamentId,
        match_id: &MatchId,
        deltas: &[(MemberId, Points)],
    ) -> LedgerResult<()> {
        let tx = self.conn.transaction()?;
        let claimed = tx.execute(
            "INSERT OR IGNORE INTO processed_matches(match_id, tournament_id, ts_ms) VALUES (?1, ?2, ?3)",
            params![match_id, tournament_id, now_ms() as i64],
        )?;
        if claimed == 0 {
            // Dropping the transaction rolls the claim attempt back.
            return Err(LedgerError::AlreadyProcessed(match_id.clone()));
        }
        Self::upsert_deltas(&tx, tournament_id, deltas)?;
        tx.commit()?;
        Ok(())
    }

    fn rows_for_tournament(
        &self,
        tournament_id: &TournamentId,
    ) -> LedgerResult<Vec<(MemberId, Points)>> {
        let mut stmt = self.conn.prepare(
            "SELECT member_id, points FROM performances WHERE tournament_id = ?1 ORDER BY member_id",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn memberships_for_tournament(
        &self,
        tournament_id: &TournamentId,
    ) -> LedgerResult<Vec<(LeagueId, MemberId)>> {
        let mut stmt = self.conn.prepare(
            "SELECT lm.league_id, lm.member_id
             FROM league_members lm
             JOIN league_tournaments lt ON lt.league_id = lm.league_id
             WHERE lt.tournament_id = ?1
             ORDER BY lm.league_id, lm.member_id",
        )?;
        let rows = stmt.query_map(params![tournament_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn status_to_i64(status: MatchStatus) -> i64 {
    match status {
        MatchStatus::Open => 0,
        MatchStatus::Ended => 1,
        MatchStatus::NotDefined => 2,
    }
}

fn status_from_i64(value: i64) -> LedgerResult<MatchStatus> {
    match value {
        0 => Ok(MatchStatus::Open),
        1 => Ok(MatchStatus::Ended),
        2 => Ok(MatchStatus::NotDefined),
        other => Err(LedgerError::Message(format!("unknown match status: {other}"))),
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
