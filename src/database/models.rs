use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

use crate::domain::{MatchType, Pairing};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub rating: f64,
    pub matches_played: u32,
    pub last_played: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: i64,
    pub name: String,
    pub match_type: MatchType,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub id: i64,
    pub session_id: i64,
    pub field_number: u32,
    pub pairing: Pairing<i64>,
    pub score_a: u32,
    pub score_b: u32,
    pub winners: Vec<i64>,
    pub submitted_at: Option<NaiveDateTime>,
    pub rated_at: Option<NaiveDateTime>,
}

impl Match {
    pub fn match_type(&self) -> MatchType {
        self.pairing.match_type()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }

    pub fn is_rated(&self) -> bool {
        self.rated_at.is_some()
    }
}

// DTOs for joined queries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchHistoryRow {
    pub session_id: i64,
    pub session_name: String,
    pub played_at: NaiveDateTime,
    pub match_type: MatchType,
    pub field_number: u32,
    pub team_a: String,
    pub team_b: String,
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Option<String>,
    pub submitted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceRow {
    pub name: String,
    pub rating: f64,
    pub matches_played: u32,
    pub wins: u32,
    pub last_played: Option<NaiveDateTime>,
}

impl ToSql for MatchType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MatchType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        MatchType::parse(text)
            .ok_or_else(|| FromSqlError::Other(format!("Unknown match type: {text}").into()))
    }
}
