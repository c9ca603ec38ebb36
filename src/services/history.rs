use log::info;
use serde::Serialize;

use crate::database::{self, DbPool, MatchHistoryRow};
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupSummary {
    pub matches_removed: usize,
    pub sessions_removed: usize,
}

pub struct HistoryService {
    pool: DbPool,
}

impl HistoryService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Every match, newest session first.
    pub fn history(&self) -> Result<Vec<MatchHistoryRow>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(database::matches::list_history(&conn)?)
    }

    /// Drops matches that never got a result, then the sessions they leave empty.
    pub fn cleanup(&self) -> Result<CleanupSummary> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        let matches_removed = database::matches::delete_unsubmitted(&tx)?;
        let sessions_removed = database::sessions::delete_empty(&tx)?;
        tx.commit()?;

        info!(
            "Cleanup removed {} unsubmitted matches and {} empty sessions",
            matches_removed, sessions_removed
        );
        Ok(CleanupSummary {
            matches_removed,
            sessions_removed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use crate::domain::{MatchType, Pairing};
    use chrono::NaiveDate;

    #[test]
    fn test_cleanup_removes_abandoned_sessions() {
        let pool = create_memory_pool().unwrap();
        {
            let conn = database::get_connection(&pool).unwrap();
            let at = NaiveDate::from_ymd_opt(2024, 6, 3)
                .unwrap()
                .and_hms_opt(19, 0, 0)
                .unwrap();
            let ana = database::players::insert_player(&conn, "Ana", 1500.0).unwrap().id;
            let ben = database::players::insert_player(&conn, "Ben", 1500.0).unwrap().id;
            let pairing = Pairing::Singles { a: ana, b: ben };

            let played = database::sessions::create_session(&conn, "played", MatchType::Singles, at).unwrap();
            let kept = database::matches::insert_match(&conn, played.id, &pairing, 1).unwrap();
            database::matches::insert_match(&conn, played.id, &pairing, 2).unwrap();
            database::matches::update_score(&conn, kept.id, 21, 8, &[ana], at).unwrap();

            let abandoned = database::sessions::create_session(&conn, "abandoned", MatchType::Singles, at).unwrap();
            database::matches::insert_match(&conn, abandoned.id, &pairing, 1).unwrap();
        }
        let service = HistoryService::new(pool);

        assert_eq!(service.history().unwrap().len(), 3);

        let summary = service.cleanup().unwrap();

        assert_eq!(
            summary,
            CleanupSummary {
                matches_removed: 2,
                sessions_removed: 1,
            }
        );
        let history = service.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].session_name, "played");
        assert_eq!(history[0].winner.as_deref(), Some("Ana"));

        assert_eq!(service.cleanup().unwrap().matches_removed, 0);
    }
}
