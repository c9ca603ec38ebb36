use std::collections::HashSet;

use chrono::{NaiveDateTime, Utc};
use log::{debug, info, warn};
use rusqlite::Connection;
use serde::Serialize;

use crate::config::settings::RatingSettings;
use crate::database::{self, DbPool, Match, Session};
use crate::domain::{ScoreReport, SessionContext};
use crate::errors::{LadderError, Result};
use crate::rating::{self, Competitor, Outcome, RatingChange};

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummary {
    pub session_id: i64,
    pub scores_recorded: usize,
    pub recompute: RecomputeSummary,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RecomputeSummary {
    pub matches_rated: usize,
    pub changes: Vec<RatingChange>,
}

pub struct ResultsService {
    pool: DbPool,
    settings: RatingSettings,
}

impl ResultsService {
    pub fn new(pool: DbPool, settings: RatingSettings) -> Self {
        Self { pool, settings }
    }

    /// The most recently scheduled session.
    pub fn active_session(&self) -> Result<SessionContext> {
        let conn = database::get_connection(&self.pool)?;
        database::sessions::find_latest(&conn)?
            .map(to_context)
            .ok_or(LadderError::NoSession)
    }

    pub fn session(&self, session_id: i64) -> Result<SessionContext> {
        let conn = database::get_connection(&self.pool)?;
        database::sessions::find_by_id(&conn, session_id)?
            .map(to_context)
            .ok_or(LadderError::UnknownSession(session_id))
    }

    /// Records every reported row against the session, then rates the
    /// session's submitted matches. All rows are validated before anything
    /// is written, and the whole batch commits or rolls back together.
    pub fn submit_scores(
        &self,
        session: &SessionContext,
        reports: &[ScoreReport],
    ) -> Result<SubmissionSummary> {
        if reports.is_empty() {
            return Err(LadderError::NoScores);
        }

        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;

        let stored = database::matches::list_for_session(&tx, session.session_id)?;
        let targets = match_reports(session.session_id, &stored, reports)?;

        let now = Utc::now().naive_utc();
        for (stored_match, report) in &targets {
            let winners: Vec<i64> = Outcome::from_scores(report.score_a, report.score_b)
                .winner()
                .map(|side| stored_match.pairing.side(side).into_iter().copied().collect())
                .unwrap_or_default();

            database::matches::update_score(
                &tx,
                stored_match.id,
                report.score_a,
                report.score_b,
                &winners,
                now,
            )?;
        }

        let recompute = recompute_session(&tx, session.session_id, &self.settings, now)?;
        tx.commit()?;

        info!(
            "Recorded {} scores for session {}, rated {} matches",
            targets.len(),
            session.session_id,
            recompute.matches_rated
        );

        Ok(SubmissionSummary {
            session_id: session.session_id,
            scores_recorded: targets.len(),
            recompute,
        })
    }

    /// Rates any submitted match of the session that has not been rated yet.
    pub fn recompute_ratings(&self, session: &SessionContext) -> Result<RecomputeSummary> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction()?;
        let now = Utc::now().naive_utc();
        let summary = recompute_session(&tx, session.session_id, &self.settings, now)?;
        tx.commit()?;

        info!(
            "Recomputed ratings for session {}: {} matches rated",
            session.session_id, summary.matches_rated
        );
        Ok(summary)
    }
}

fn to_context(session: Session) -> SessionContext {
    SessionContext {
        session_id: session.id,
        name: session.name,
        match_type: session.match_type,
        created_at: session.created_at,
    }
}

/// Pairs each report with its stored match, rejecting the whole batch on the
/// first bad row.
fn match_reports<'a>(
    session_id: i64,
    stored: &'a [Match],
    reports: &[ScoreReport],
) -> Result<Vec<(&'a Match, ScoreReport)>> {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(reports.len());

    for report in reports {
        if !seen.insert(report.field_number) {
            return Err(LadderError::DuplicateField(report.field_number));
        }
        let stored_match = stored
            .iter()
            .find(|m| m.field_number == report.field_number)
            .ok_or(LadderError::UnknownField {
                session_id,
                field: report.field_number,
            })?;
        if stored_match.is_submitted() {
            return Err(LadderError::AlreadySubmitted(report.field_number));
        }
        targets.push((stored_match, *report));
    }

    Ok(targets)
}

/// Feeds submitted, unrated matches into the rating model in stored order.
/// Each match reads the roster fresh, so earlier matches of the session
/// affect the ratings used by later ones.
fn recompute_session(
    conn: &Connection,
    session_id: i64,
    config: &RatingSettings,
    rated_at: NaiveDateTime,
) -> Result<RecomputeSummary> {
    let mut summary = RecomputeSummary::default();

    for stored_match in database::matches::list_for_session(conn, session_id)? {
        if !stored_match.is_submitted() || stored_match.is_rated() {
            continue;
        }

        let competitors = stored_match.pairing.try_map(|id| resolve_competitor(conn, *id))?;
        let outcome = Outcome::from_scores(stored_match.score_a, stored_match.score_b);
        let changes = rating::update_ratings(&competitors, outcome, config);

        for change in &changes {
            let applied =
                database::players::apply_delta(conn, &change.player, change.delta, true, rated_at)?;
            if !applied {
                warn!("Player {} vanished while rating match {}", change.player, stored_match.id);
                return Err(LadderError::UnknownPlayer(change.player.clone()));
            }
            debug!(
                "Match {}: {} {:.1} -> {:.1}",
                stored_match.id,
                change.player,
                change.rating_before,
                change.rating_after()
            );
        }

        database::matches::mark_rated(conn, stored_match.id, rated_at)?;
        summary.matches_rated += 1;
        summary.changes.extend(changes);
    }

    Ok(summary)
}

fn resolve_competitor(conn: &Connection, player_id: i64) -> Result<Competitor> {
    match database::players::find_by_id(conn, player_id)? {
        Some(player) => Ok(Competitor::new(player.name, player.rating, player.matches_played)),
        None => {
            warn!("Cannot rate match with unknown player id {}", player_id);
            Err(LadderError::UnknownPlayerId(player_id))
        }
    }
}
