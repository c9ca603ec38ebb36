use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::database::{MatchHistoryRow, Player};
use crate::domain::{Pairing, PlayerRef, Side};
use crate::rating::RatingChange;
use crate::services::{
    CleanupSummary, LeaderboardEntry, RecomputeSummary, ScheduledSession, SubmissionSummary,
};

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

fn side_names(pairing: &Pairing<PlayerRef>, side: Side) -> String {
    pairing
        .side(side)
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(" & ")
}

pub fn schedule_text(session: &ScheduledSession) -> String {
    let mut lines = vec![format!(
        "{} (session {}, {} tiers)",
        session.context.name.bold(),
        session.context.session_id,
        session.tier_count
    )];

    if session.matches.is_empty() {
        lines.push("  no matches could be formed".yellow().to_string());
    }
    for scheduled in &session.matches {
        lines.push(format!(
            "  Field {:>2}  {}  vs  {}",
            scheduled.field_number.to_string().cyan(),
            side_names(&scheduled.pairing, Side::A),
            side_names(&scheduled.pairing, Side::B)
        ));
    }

    if !session.bench.is_empty() {
        let bench: Vec<&str> = session.bench.iter().map(|p| p.name.as_str()).collect();
        lines.push(format!("  {} {}", "Bench:".dimmed(), bench.join(", ")));
    }
    lines.join("\n")
}

pub fn players_text(players: &[Player]) -> String {
    if players.is_empty() {
        return "No players on the roster".yellow().to_string();
    }
    players
        .iter()
        .map(|p| format!("{:<24} {:>7.1} {:>4} matches", p.name, p.rating, p.matches_played))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn leaderboard_text(entries: &[LeaderboardEntry]) -> String {
    let mut lines = vec![format!(
        "{:>3}  {:<24} {:>7} {:>7} {:>5} {:>6}  {}",
        "#", "Player", "Rating", "Matches", "Wins", "Win%", "Confidence"
    )
    .bold()
    .to_string()];

    for entry in entries {
        let win_rate = entry
            .win_rate
            .map(|rate| format!("{:.0}%", rate * 100.0))
            .unwrap_or_else(|| "-".to_string());
        let confidence = match entry.confidence {
            crate::rating::ConfidenceLevel::Provisional => entry.confidence.as_str().yellow(),
            crate::rating::ConfidenceLevel::Established => entry.confidence.as_str().green(),
        };
        lines.push(format!(
            "{:>3}  {:<24} {:>7.1} {:>7} {:>5} {:>6}  {}",
            entry.rank, entry.name, entry.rating, entry.matches_played, entry.wins, win_rate, confidence
        ));
    }
    lines.join("\n")
}

pub fn history_text(rows: &[MatchHistoryRow]) -> String {
    if rows.is_empty() {
        return "No matches recorded".yellow().to_string();
    }

    let mut lines = Vec::new();
    let mut current_session = None;
    for row in rows {
        if current_session != Some(row.session_id) {
            current_session = Some(row.session_id);
            lines.push(row.session_name.bold().to_string());
        }
        let result = if row.submitted {
            let score = format!("{}-{}", row.score_a, row.score_b);
            match &row.winner {
                Some(winner) => format!("{}  won by {}", score, winner.green()),
                None => format!("{}  draw", score),
            }
        } else {
            "not played".dimmed().to_string()
        };
        lines.push(format!(
            "  Field {:>2}  {}  vs  {}  {}",
            row.field_number, row.team_a, row.team_b, result
        ));
    }
    lines.join("\n")
}

fn change_line(change: &RatingChange) -> String {
    let delta = format!("{:+.1}", change.delta);
    let delta = if change.delta >= 0.0 { delta.green() } else { delta.red() };
    format!(
        "  {:<24} {:>7.1} -> {:>7.1} ({})",
        change.player,
        change.rating_before,
        change.rating_after(),
        delta
    )
}

pub fn recompute_text(session_id: i64, summary: &RecomputeSummary) -> String {
    let mut lines = vec![format!(
        "Rated {} matches in session {}",
        summary.matches_rated, session_id
    )];
    lines.extend(summary.changes.iter().map(change_line));
    lines.join("\n")
}

pub fn submission_text(summary: &SubmissionSummary) -> String {
    format!(
        "Recorded {} scores\n{}",
        summary.scores_recorded,
        recompute_text(summary.session_id, &summary.recompute)
    )
}

pub fn cleanup_text(summary: &CleanupSummary) -> String {
    format!(
        "Removed {} unsubmitted matches and {} empty sessions",
        summary.matches_removed, summary.sessions_removed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchType, SessionContext};
    use crate::rating::ConfidenceLevel;
    use crate::services::SessionMatch;
    use chrono::NaiveDate;

    fn plain() {
        colored::control::set_override(false);
    }

    fn session() -> ScheduledSession {
        let created_at = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(19, 0, 0)
            .unwrap();
        let player = |id: i64, name: &str| PlayerRef::new(id, name, 1500.0);
        ScheduledSession {
            context: SessionContext {
                session_id: 4,
                name: SessionContext::label_for(MatchType::Doubles, created_at),
                match_type: MatchType::Doubles,
                created_at,
            },
            tier_count: 2,
            matches: vec![SessionMatch {
                match_id: 10,
                field_number: 1,
                pairing: Pairing::Doubles {
                    team_a: (player(1, "Ana"), player(2, "Ben")),
                    team_b: (player(3, "Cleo"), player(4, "Dan")),
                },
            }],
            bench: vec![player(5, "Eve")],
        }
    }

    #[test]
    fn test_schedule_text() {
        plain();
        let text = schedule_text(&session());
        assert!(text.starts_with("Doubles 2024-06-03 19:00 (session 4, 2 tiers)"));
        assert!(text.contains("Field  1  Ana & Ben  vs  Cleo & Dan"));
        assert!(text.contains("Bench: Eve"));
    }

    #[test]
    fn test_schedule_json_tags_pairing() {
        let value: serde_json::Value = serde_json::from_str(&json(&session()).unwrap()).unwrap();
        assert_eq!(value["matches"][0]["pairing"]["type"], "doubles");
        assert_eq!(value["matches"][0]["pairing"]["team_a"][0]["name"], "Ana");
        assert_eq!(value["bench"][0]["name"], "Eve");
    }

    #[test]
    fn test_leaderboard_text_without_matches() {
        plain();
        let entries = vec![LeaderboardEntry {
            rank: 1,
            name: "Ana".to_string(),
            rating: 1512.5,
            matches_played: 0,
            wins: 0,
            win_rate: None,
            confidence: ConfidenceLevel::Provisional,
            last_played: None,
        }];
        let text = leaderboard_text(&entries);
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains("Ana"));
        assert!(row.contains("1512.5"));
        assert!(row.contains(" - "));
        assert!(row.ends_with("provisional"));
    }

    #[test]
    fn test_change_line_signs_delta() {
        plain();
        let change = RatingChange {
            player: "Ben".to_string(),
            rating_before: 1500.0,
            delta: -20.0,
        };
        assert!(change_line(&change).ends_with("1500.0 ->  1480.0 (-20.0)"));
    }
}
