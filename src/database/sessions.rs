use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Session;
use crate::domain::MatchType;

pub fn create_session(
    conn: &Connection,
    name: &str,
    match_type: MatchType,
    created_at: NaiveDateTime,
) -> Result<Session> {
    let sql = "INSERT INTO sessions (name, match_type, created_at) VALUES (?1, ?2, ?3) RETURNING id, name, match_type, created_at";

    conn.query_row(sql, params![name, match_type, created_at], parse_session_row)
        .context("Failed to insert session")
}

fn parse_session_row(row: &rusqlite::Row) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        name: row.get(1)?,
        match_type: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Session>> {
    let sql = "SELECT id, name, match_type, created_at FROM sessions WHERE id = ?1";

    conn.query_row(sql, params![id], parse_session_row)
        .optional()
        .context("Failed to query session by id")
}

/// Most recently created session.
pub fn find_latest(conn: &Connection) -> Result<Option<Session>> {
    let sql = "SELECT id, name, match_type, created_at FROM sessions ORDER BY id DESC LIMIT 1";

    conn.query_row(sql, [], parse_session_row)
        .optional()
        .context("Failed to query latest session")
}

/// Removes sessions that no longer own any match.
pub fn delete_empty(conn: &Connection) -> Result<usize> {
    let sql = "DELETE FROM sessions WHERE id NOT IN (SELECT DISTINCT session_id FROM matches)";

    conn.execute(sql, [])
        .context("Failed to delete empty sessions")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::setup::init_database;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_latest_session_wins() {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();

        assert!(find_latest(&conn).unwrap().is_none());

        create_session(&conn, "first", MatchType::Singles, at(18)).unwrap();
        let second = create_session(&conn, "second", MatchType::Doubles, at(19)).unwrap();

        let latest = find_latest(&conn).unwrap().unwrap();
        assert_eq!(latest, second);
        assert_eq!(latest.match_type, MatchType::Doubles);
        assert_eq!(latest.created_at, at(19));
        assert_eq!(find_by_id(&conn, second.id).unwrap(), Some(second));
    }

    #[test]
    fn test_delete_empty_sessions() {
        let conn = Connection::open_in_memory().unwrap();
        init_database(&conn).unwrap();
        create_session(&conn, "empty", MatchType::Singles, at(18)).unwrap();

        assert_eq!(delete_empty(&conn).unwrap(), 1);
        assert!(find_latest(&conn).unwrap().is_none());
    }
}
