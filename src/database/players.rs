use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{PerformanceRow, Player};

const PLAYER_COLUMNS: &str = "id, name, rating, matches_played, last_played, created_at";

pub fn insert_player(conn: &Connection, name: &str, rating: f64) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (name, rating) VALUES (?1, ?2) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![name, rating], parse_player_row)
        .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        matches_played: row.get(3)?,
        last_played: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE name = ?1");

    conn.query_row(&sql, params![name], parse_player_row)
        .optional()
        .context("Failed to query player by name")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

/// Whole roster in name order.
pub fn list_all(conn: &Connection) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players ORDER BY name");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn get_rating(conn: &Connection, name: &str) -> Result<Option<f64>> {
    conn.query_row(
        "SELECT rating FROM players WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )
    .optional()
    .context("Failed to query player rating")
}

/// Adds `rating_delta` to the player's rating and stamps `last_played`.
/// Returns `false` when no player has that name.
pub fn apply_delta(
    conn: &Connection,
    name: &str,
    rating_delta: f64,
    increment_matches: bool,
    played_at: NaiveDateTime,
) -> Result<bool> {
    let sql = "UPDATE players SET rating = rating + ?1, matches_played = matches_played + ?2, last_played = ?3 WHERE name = ?4";

    let updated = conn
        .execute(
            sql,
            params![rating_delta, u32::from(increment_matches), played_at, name],
        )
        .context("Failed to apply rating delta")?;

    Ok(updated > 0)
}

pub fn delete_by_name(conn: &Connection, name: &str) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM players WHERE name = ?1", params![name])
        .context("Failed to delete player")?;

    Ok(deleted > 0)
}

/// Roster with win counts, strongest first.
pub fn list_performance(conn: &Connection) -> Result<Vec<PerformanceRow>> {
    let sql = "
        SELECT
            p.name,
            p.rating,
            p.matches_played,
            (SELECT COUNT(*) FROM matches m WHERE m.winner1_id = p.id OR m.winner2_id = p.id) AS wins,
            p.last_played
        FROM players p
        ORDER BY p.rating DESC, p.name ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(PerformanceRow {
                name: row.get(0)?,
                rating: row.get(1)?,
                matches_played: row.get(2)?,
                wins: row.get(3)?,
                last_played: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}
