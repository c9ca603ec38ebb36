use chrono::NaiveDateTime;
use log::{info, warn};
use serde::Serialize;

use crate::config::settings::RatingSettings;
use crate::database::{self, DbPool, Player};
use crate::errors::{LadderError, Result};
use crate::rating::ConfidenceLevel;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub rating: f64,
    pub matches_played: u32,
    pub wins: u32,
    pub win_rate: Option<f64>,
    pub confidence: ConfidenceLevel,
    pub last_played: Option<NaiveDateTime>,
}

pub struct RosterService {
    pool: DbPool,
    settings: RatingSettings,
}

impl RosterService {
    pub fn new(pool: DbPool, settings: RatingSettings) -> Self {
        Self { pool, settings }
    }

    /// Adds a player at `rating`, or at the starter rating when none is given.
    pub fn add_player(&self, name: &str, rating: Option<f64>) -> Result<Player> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LadderError::EmptyPlayerName);
        }

        let conn = database::get_connection(&self.pool)?;
        if database::players::find_by_name(&conn, name)?.is_some() {
            return Err(LadderError::DuplicatePlayer(name.to_string()));
        }

        let rating = rating.unwrap_or(self.settings.starter_rating);
        let player = database::players::insert_player(&conn, name, rating)?;
        info!("Added player {} at {:.0}", player.name, player.rating);
        Ok(player)
    }

    pub fn remove_player(&self, name: &str) -> Result<()> {
        let name = name.trim();
        let conn = database::get_connection(&self.pool)?;
        if !database::players::delete_by_name(&conn, name)? {
            warn!("Cannot remove unknown player {}", name);
            return Err(LadderError::UnknownPlayer(name.to_string()));
        }
        info!("Removed player {}", name);
        Ok(())
    }

    pub fn list_players(&self) -> Result<Vec<Player>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(database::players::list_all(&conn)?)
    }

    pub fn rating_of(&self, name: &str) -> Result<f64> {
        let conn = database::get_connection(&self.pool)?;
        database::players::get_rating(&conn, name)?
            .ok_or_else(|| LadderError::UnknownPlayer(name.to_string()))
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let conn = database::get_connection(&self.pool)?;
        let rows = database::players::list_performance(&conn)?;

        Ok(rows
            .into_iter()
            .zip(1..)
            .map(|(row, rank)| LeaderboardEntry {
                rank,
                win_rate: (row.matches_played > 0)
                    .then(|| f64::from(row.wins) / f64::from(row.matches_played)),
                confidence: ConfidenceLevel::from_matches_played(
                    row.matches_played,
                    self.settings.established_matches,
                ),
                name: row.name,
                rating: row.rating,
                matches_played: row.matches_played,
                wins: row.wins,
                last_played: row.last_played,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::create_memory_pool;
    use chrono::NaiveDate;

    fn service() -> RosterService {
        RosterService::new(create_memory_pool().unwrap(), RatingSettings::default())
    }

    #[test]
    fn test_add_player_defaults_and_trims() {
        let roster = service();

        let ana = roster.add_player("  Ana ", None).unwrap();
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.rating, 1500.0);

        let ben = roster.add_player("Ben", Some(1720.0)).unwrap();
        assert_eq!(ben.rating, 1720.0);
        assert_eq!(roster.rating_of("Ben").unwrap(), 1720.0);
    }

    #[test]
    fn test_add_player_rejects_empty_and_duplicate() {
        let roster = service();
        roster.add_player("Ana", None).unwrap();

        assert!(matches!(roster.add_player("   ", None), Err(LadderError::EmptyPlayerName)));
        assert!(matches!(
            roster.add_player("Ana", Some(1600.0)),
            Err(LadderError::DuplicatePlayer(ref name)) if name == "Ana"
        ));
    }

    #[test]
    fn test_remove_player() {
        let roster = service();
        roster.add_player("Ana", None).unwrap();
        roster.add_player("Ben", None).unwrap();

        roster.remove_player("Ana").unwrap();

        let names: Vec<String> = roster.list_players().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Ben"]);
        assert!(matches!(roster.remove_player("Ana"), Err(LadderError::UnknownPlayer(_))));
    }

    #[test]
    fn test_remove_player_trims_name() {
        let roster = service();
        roster.add_player("Ben", None).unwrap();

        roster.remove_player("  Ben ").unwrap();
        assert!(roster.list_players().unwrap().is_empty());

        assert!(matches!(
            roster.remove_player(" Ghost "),
            Err(LadderError::UnknownPlayer(ref name)) if name == "Ghost"
        ));
    }

    #[test]
    fn test_rating_of_unknown_is_resolution_error() {
        let roster = service();
        let err = roster.rating_of("Ghost").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Resolution);
    }

    #[test]
    fn test_leaderboard_ranks_and_rates() {
        let roster = service();
        roster.add_player("Low", Some(1400.0)).unwrap();
        roster.add_player("High", Some(1650.0)).unwrap();
        let played_at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(20, 0, 0)
            .unwrap();
        {
            let conn = database::get_connection(&roster.pool).unwrap();
            let high = database::players::find_by_name(&conn, "High").unwrap().unwrap();
            let low = database::players::find_by_name(&conn, "Low").unwrap().unwrap();
            let session = database::sessions::create_session(
                &conn,
                "s",
                crate::domain::MatchType::Singles,
                played_at,
            )
            .unwrap();
            let pairing = crate::domain::Pairing::Singles { a: high.id, b: low.id };
            for field in 1..=2 {
                let stored = database::matches::insert_match(&conn, session.id, &pairing, field).unwrap();
                let winner = if field == 1 { high.id } else { low.id };
                database::matches::update_score(&conn, stored.id, 21, 19, &[winner], played_at).unwrap();
            }
            let third = database::matches::insert_match(&conn, session.id, &pairing, 3).unwrap();
            database::matches::update_score(&conn, third.id, 21, 11, &[high.id], played_at).unwrap();
            for _ in 0..3 {
                database::players::apply_delta(&conn, "High", 0.0, true, played_at).unwrap();
            }
        }

        let board = roster.leaderboard().unwrap();

        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].name, "High");
        assert_eq!(board[0].wins, 2);
        assert!((board[0].win_rate.unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(board[0].confidence, ConfidenceLevel::Provisional);
        assert_eq!(board[1].rank, 2);
        assert_eq!(board[1].wins, 1);
        // wins recorded but no rated matches
        assert_eq!(board[1].win_rate, None);
    }
}
