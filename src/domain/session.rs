use chrono::NaiveDateTime;
use serde::Serialize;

use super::models::MatchType;

/// The session a caller is working against, passed explicitly from
/// scheduling to score submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionContext {
    pub session_id: i64,
    pub name: String,
    pub match_type: MatchType,
    pub created_at: NaiveDateTime,
}

impl SessionContext {
    pub fn label_for(match_type: MatchType, created_at: NaiveDateTime) -> String {
        format!("{} {}", match_type, created_at.format("%Y-%m-%d %H:%M"))
    }
}
