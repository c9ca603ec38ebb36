use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::domain::{MatchType, ScoreReport};

#[derive(Parser, Debug)]
#[command(author, version, about = "Badminton club ladder: tiered scheduling and Elo ratings")]
pub struct Cli {
    /// SQLite database file (defaults to $DATABASE_PATH or badminton_ladder.db)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Add a player to the roster
    AddPlayer {
        name: String,
        /// Starting rating (defaults to the starter rating)
        #[arg(short, long)]
        rating: Option<f64>,
    },
    /// Remove a player from the roster
    RemovePlayer { name: String },
    /// List the roster
    Players,
    /// Build a new session and assign matches to fields
    Schedule {
        /// Players available tonight
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        names: Vec<String>,
        /// Schedule every player on the roster
        #[arg(long)]
        all: bool,
        #[arg(short = 't', long = "type", value_enum, default_value_t = MatchType::Doubles)]
        match_type: MatchType,
        /// Number of courts (defaults to the configured field count)
        #[arg(short, long)]
        fields: Option<u32>,
        /// Seed for a reproducible schedule
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Record scores as FIELD:A-B, e.g. 1:21-15, then update ratings
    Submit {
        #[arg(required = true)]
        scores: Vec<ScoreReport>,
        /// Session to score (defaults to the latest)
        #[arg(short, long)]
        session: Option<i64>,
    },
    /// Rate any submitted matches that have not been rated yet
    Recompute {
        #[arg(short, long)]
        session: Option<i64>,
    },
    /// Show every recorded match
    History,
    /// Show players ranked by rating
    Leaderboard,
    /// Delete matches that were never played and sessions left empty
    Cleanup,
    /// Print shell completions
    Completions { shell: Shell },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_schedule() {
        let cli = Cli::parse_from(["ladder", "schedule", "--type", "singles", "-f", "3", "Ana", "Ben"]);
        assert_eq!(
            cli.command,
            Command::Schedule {
                names: vec!["Ana".to_string(), "Ben".to_string()],
                all: false,
                match_type: MatchType::Singles,
                fields: Some(3),
                seed: None,
            }
        );
    }

    #[test]
    fn test_schedule_needs_names_or_all() {
        assert!(Cli::try_parse_from(["ladder", "schedule"]).is_err());
        assert!(Cli::try_parse_from(["ladder", "schedule", "--all", "Ana"]).is_err());

        let cli = Cli::try_parse_from(["ladder", "--database", "club.db", "schedule", "--all"]).unwrap();
        assert_eq!(cli.database.as_deref(), Some("club.db"));
        assert!(matches!(
            cli.command,
            Command::Schedule { all: true, match_type: MatchType::Doubles, .. }
        ));
    }

    #[test]
    fn test_parse_submit_reports() {
        let cli = Cli::parse_from(["ladder", "submit", "1:21-15", "2:19-21", "--json"]);
        assert!(cli.json);
        assert_eq!(
            cli.command,
            Command::Submit {
                scores: vec![ScoreReport::new(1, 21, 15), ScoreReport::new(2, 19, 21)],
                session: None,
            }
        );
        assert!(Cli::try_parse_from(["ladder", "submit", "1:21-x"]).is_err());
    }
}
