pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod report;
pub mod scheduling;
pub mod services;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::domain::{MatchType, ScoreReport, SessionContext};
use crate::services::{HistoryService, ResultsService, RosterService, SchedulingService};

pub fn interpret() -> Cli {
    Cli::parse()
}

pub fn execute(cli: &Cli) -> Result<()> {
    let config = AppConfig::new().with_database_path(cli.database.clone());
    let output = Output { json: cli.json };

    match &cli.command {
        Command::AddPlayer { name, rating } => handle_add_player(&config, output, name, *rating),
        Command::RemovePlayer { name } => handle_remove_player(&config, name),
        Command::Players => handle_players(&config, output),
        Command::Schedule {
            names,
            all,
            match_type,
            fields,
            seed,
        } => handle_schedule(&config, output, names, *all, *match_type, *fields, *seed),
        Command::Submit { scores, session } => handle_submit(&config, output, scores, *session),
        Command::Recompute { session } => handle_recompute(&config, output, *session),
        Command::History => handle_history(&config, output),
        Command::Leaderboard => handle_leaderboard(&config, output),
        Command::Cleanup => handle_cleanup(&config, output),
        Command::Completions { shell } => {
            handle_completions(*shell);
            Ok(())
        }
    }
}

/// Whether results are printed as text or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

impl Output {
    fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<()> {
        if self.json {
            println!("{}", report::json(value)?);
        } else {
            println!("{}", text(value));
        }
        Ok(())
    }
}

fn open(config: &AppConfig) -> Result<DbPool> {
    database::open_pool(&config.database.path)
}

pub fn handle_add_player(
    config: &AppConfig,
    output: Output,
    name: &str,
    rating: Option<f64>,
) -> Result<()> {
    let roster = RosterService::new(open(config)?, config.rating.clone());
    let player = roster.add_player(name, rating)?;
    output.emit(&player, |p| format!("Added {} at {:.1}", p.name, p.rating))
}

pub fn handle_remove_player(config: &AppConfig, name: &str) -> Result<()> {
    let roster = RosterService::new(open(config)?, config.rating.clone());
    roster.remove_player(name)?;
    println!("Removed {}", name);
    Ok(())
}

pub fn handle_players(config: &AppConfig, output: Output) -> Result<()> {
    let roster = RosterService::new(open(config)?, config.rating.clone());
    let players = roster.list_players()?;
    output.emit(players.as_slice(), report::players_text)
}

pub fn handle_schedule(
    config: &AppConfig,
    output: Output,
    names: &[String],
    all: bool,
    match_type: MatchType,
    fields: Option<u32>,
    seed: Option<u64>,
) -> Result<()> {
    let service = SchedulingService::new(open(config)?, config.scheduler.clone());
    let field_count = fields.unwrap_or(config.scheduler.default_fields);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let session = if all {
        service.run_all(match_type, field_count, &mut rng)?
    } else {
        service.run(names, match_type, field_count, &mut rng)?
    };
    output.emit(&session, report::schedule_text)
}

fn resolve_session(service: &ResultsService, session_id: Option<i64>) -> Result<SessionContext> {
    let context = match session_id {
        Some(id) => service.session(id)?,
        None => service.active_session()?,
    };
    Ok(context)
}

pub fn handle_submit(
    config: &AppConfig,
    output: Output,
    scores: &[ScoreReport],
    session_id: Option<i64>,
) -> Result<()> {
    let service = ResultsService::new(open(config)?, config.rating.clone());
    let session = resolve_session(&service, session_id)?;
    let summary = service.submit_scores(&session, scores)?;
    output.emit(&summary, report::submission_text)
}

pub fn handle_recompute(config: &AppConfig, output: Output, session_id: Option<i64>) -> Result<()> {
    let service = ResultsService::new(open(config)?, config.rating.clone());
    let session = resolve_session(&service, session_id)?;
    let summary = service.recompute_ratings(&session)?;
    output.emit(&summary, |s| report::recompute_text(session.session_id, s))
}

pub fn handle_history(config: &AppConfig, output: Output) -> Result<()> {
    let service = HistoryService::new(open(config)?);
    let rows = service.history()?;
    output.emit(rows.as_slice(), report::history_text)
}

pub fn handle_leaderboard(config: &AppConfig, output: Output) -> Result<()> {
    let roster = RosterService::new(open(config)?, config.rating.clone());
    let entries = roster.leaderboard()?;
    output.emit(entries.as_slice(), report::leaderboard_text)
}

pub fn handle_cleanup(config: &AppConfig, output: Output) -> Result<()> {
    let service = HistoryService::new(open(config)?);
    let summary = service.cleanup()?;
    output.emit(&summary, report::cleanup_text)
}

pub fn handle_completions(shell: clap_complete::Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
}
