use chrono::Utc;
use log::{info, warn};
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;

use crate::config::settings::SchedulerSettings;
use crate::database::{self, DbPool, Match};
use crate::domain::{MatchType, Pairing, PlayerRef, SessionContext};
use crate::errors::{LadderError, Result};
use crate::scheduling::{self, Schedule};

#[derive(Debug, Clone, Serialize)]
pub struct ScheduledSession {
    pub context: SessionContext,
    pub tier_count: usize,
    pub matches: Vec<SessionMatch>,
    pub bench: Vec<PlayerRef>,
}

/// A persisted match together with the player views it was built from
#[derive(Debug, Clone, Serialize)]
pub struct SessionMatch {
    pub match_id: i64,
    pub field_number: u32,
    pub pairing: Pairing<PlayerRef>,
}

pub struct SchedulingService {
    pool: DbPool,
    settings: SchedulerSettings,
}

impl SchedulingService {
    pub fn new(pool: DbPool, settings: SchedulerSettings) -> Self {
        Self { pool, settings }
    }

    /// Schedules the named players and records the new session with its
    /// matches in one transaction.
    pub fn run<R: Rng + ?Sized>(
        &self,
        player_names: &[String],
        match_type: MatchType,
        field_count: u32,
        rng: &mut R,
    ) -> Result<ScheduledSession> {
        if player_names.is_empty() {
            return Err(LadderError::EmptyPlayerPool);
        }
        if field_count < 1 {
            return Err(LadderError::InvalidFieldCount(field_count));
        }

        let mut conn = database::get_connection(&self.pool)?;
        let available = resolve_players(&conn, player_names)?;

        let schedule =
            scheduling::schedule(available, match_type, field_count, &self.settings, rng)?;

        let tx = conn.transaction()?;
        let session = persist_schedule(&tx, &schedule, match_type)?;
        tx.commit()?;

        info!(
            "Created session {} with {} matches, {} players on the bench",
            session.context.session_id,
            session.matches.len(),
            session.bench.len()
        );
        Ok(session)
    }

    /// Schedules every player on the roster.
    pub fn run_all<R: Rng + ?Sized>(
        &self,
        match_type: MatchType,
        field_count: u32,
        rng: &mut R,
    ) -> Result<ScheduledSession> {
        let names: Vec<String> = {
            let conn = database::get_connection(&self.pool)?;
            database::players::list_all(&conn)?
                .into_iter()
                .map(|p| p.name)
                .collect()
        };
        self.run(&names, match_type, field_count, rng)
    }
}

fn resolve_players(conn: &Connection, names: &[String]) -> Result<Vec<PlayerRef>> {
    names
        .iter()
        .map(|name| match database::players::find_by_name(conn, name)? {
            Some(player) => Ok(PlayerRef::new(player.id, player.name, player.rating)),
            None => {
                warn!("Cannot schedule unknown player {}", name);
                Err(LadderError::UnknownPlayer(name.clone()))
            }
        })
        .collect()
}

fn persist_schedule(
    conn: &Connection,
    schedule: &Schedule,
    match_type: MatchType,
) -> Result<ScheduledSession> {
    let created_at = Utc::now().naive_utc();
    let name = SessionContext::label_for(match_type, created_at);
    let session = database::sessions::create_session(conn, &name, match_type, created_at)?;

    let mut matches = Vec::with_capacity(schedule.matches.len());
    for scheduled in &schedule.matches {
        let ids = scheduled.pairing.map(|p| p.id);
        let stored: Match =
            database::matches::insert_match(conn, session.id, &ids, scheduled.field_number)?;
        matches.push(SessionMatch {
            match_id: stored.id,
            field_number: stored.field_number,
            pairing: scheduled.pairing.clone(),
        });
    }

    Ok(ScheduledSession {
        context: SessionContext {
            session_id: session.id,
            name: session.name,
            match_type: session.match_type,
            created_at: session.created_at,
        },
        tier_count: schedule.tier_count,
        matches,
        bench: schedule.bench.clone(),
    })
}
