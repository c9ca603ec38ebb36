use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::models::{Match, MatchHistoryRow};
use crate::domain::Pairing;

const MATCH_COLUMNS: &str = "id, session_id, field_number, player_a1_id, player_a2_id, player_b1_id, player_b2_id, score_a, score_b, winner1_id, winner2_id, submitted_at, rated_at";

/// Records a scheduled match with zeroed scores and no winner.
pub fn insert_match(
    conn: &Connection,
    session_id: i64,
    pairing: &Pairing<i64>,
    field_number: u32,
) -> Result<Match> {
    let (a1, a2, b1, b2) = slots(pairing);
    let sql = format!(
        "INSERT INTO matches (session_id, match_type, field_number, player_a1_id, player_a2_id, player_b1_id, player_b2_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![session_id, pairing.match_type(), field_number, a1, a2, b1, b2],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn slots(pairing: &Pairing<i64>) -> (i64, Option<i64>, i64, Option<i64>) {
    match pairing {
        Pairing::Singles { a, b } => (*a, None, *b, None),
        Pairing::Doubles { team_a, team_b } => (team_a.0, Some(team_a.1), team_b.0, Some(team_b.1)),
    }
}

/// Rows with both partner slots filled are doubles; anything else is read
/// back as singles between the first slot of each side.
fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    let a1: i64 = row.get(3)?;
    let a2: Option<i64> = row.get(4)?;
    let b1: i64 = row.get(5)?;
    let b2: Option<i64> = row.get(6)?;
    let pairing = match (a2, b2) {
        (Some(a2), Some(b2)) => Pairing::Doubles {
            team_a: (a1, a2),
            team_b: (b1, b2),
        },
        _ => Pairing::Singles { a: a1, b: b1 },
    };

    let winner1: Option<i64> = row.get(9)?;
    let winner2: Option<i64> = row.get(10)?;

    Ok(Match {
        id: row.get(0)?,
        session_id: row.get(1)?,
        field_number: row.get(2)?,
        pairing,
        score_a: row.get(7)?,
        score_b: row.get(8)?,
        winners: winner1.into_iter().chain(winner2).collect(),
        submitted_at: row.get(11)?,
        rated_at: row.get(12)?,
    })
}

/// Stores the reported scores and winners. `winners` is empty for a draw.
pub fn update_score(
    conn: &Connection,
    match_id: i64,
    score_a: u32,
    score_b: u32,
    winners: &[i64],
    submitted_at: NaiveDateTime,
) -> Result<()> {
    let sql = "UPDATE matches SET score_a = ?1, score_b = ?2, winner1_id = ?3, winner2_id = ?4, submitted_at = ?5 WHERE id = ?6";

    conn.execute(
        sql,
        params![
            score_a,
            score_b,
            winners.first(),
            winners.get(1),
            submitted_at,
            match_id
        ],
    )
    .context("Failed to update match score")
    .map(|_| ())
}

pub fn mark_rated(conn: &Connection, match_id: i64, rated_at: NaiveDateTime) -> Result<()> {
    conn.execute(
        "UPDATE matches SET rated_at = ?1 WHERE id = ?2",
        params![rated_at, match_id],
    )
    .context("Failed to mark match as rated")
    .map(|_| ())
}

/// Matches of one session in the order they were stored.
pub fn list_for_session(conn: &Connection, session_id: i64) -> Result<Vec<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE session_id = ?1 ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![session_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Deletes matches whose result was never submitted.
pub fn delete_unsubmitted(conn: &Connection) -> Result<usize> {
    conn.execute("DELETE FROM matches WHERE submitted_at IS NULL", [])
        .context("Failed to delete unsubmitted matches")
}

pub fn list_history(conn: &Connection) -> Result<Vec<MatchHistoryRow>> {
    let sql = "
        SELECT
            s.id,
            s.name,
            s.created_at,
            m.match_type,
            m.field_number,
            CASE
                WHEN m.player_a2_id IS NOT NULL THEN COALESCE(pa1.name, '(removed)') || ' & ' || COALESCE(pa2.name, '(removed)')
                ELSE COALESCE(pa1.name, '(removed)')
            END AS team_a_names,
            CASE
                WHEN m.player_b2_id IS NOT NULL THEN COALESCE(pb1.name, '(removed)') || ' & ' || COALESCE(pb2.name, '(removed)')
                ELSE COALESCE(pb1.name, '(removed)')
            END AS team_b_names,
            m.score_a,
            m.score_b,
            CASE
                WHEN m.winner1_id IS NULL THEN NULL
                WHEN m.winner2_id IS NULL THEN COALESCE(pw1.name, '(removed)')
                ELSE COALESCE(pw1.name, '(removed)') || ' & ' || COALESCE(pw2.name, '(removed)')
            END AS winner_team,
            m.submitted_at IS NOT NULL AS submitted
        FROM matches m
        JOIN sessions s ON m.session_id = s.id
        LEFT JOIN players pa1 ON m.player_a1_id = pa1.id
        LEFT JOIN players pa2 ON m.player_a2_id = pa2.id
        LEFT JOIN players pb1 ON m.player_b1_id = pb1.id
        LEFT JOIN players pb2 ON m.player_b2_id = pb2.id
        LEFT JOIN players pw1 ON m.winner1_id = pw1.id
        LEFT JOIN players pw2 ON m.winner2_id = pw2.id
        ORDER BY s.id DESC, m.field_number ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MatchHistoryRow {
                session_id: row.get(0)?,
                session_name: row.get(1)?,
                played_at: row.get(2)?,
                match_type: row.get(3)?,
                field_number: row.get(4)?,
                team_a: row.get(5)?,
                team_b: row.get(6)?,
                score_a: row.get(7)?,
                score_b: row.get(8)?,
                winner: row.get(9)?,
                submitted: row.get(10)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
