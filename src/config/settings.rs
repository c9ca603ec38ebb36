use crate::rating::TeamRating;
use crate::scheduling::TierOrder;

#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub starter_rating: f64,
    pub provisional_k_factor: f64,
    pub established_k_factor: f64,
    /// Players (or teams, by combined count) below this many matches use the provisional K.
    pub established_matches: u32,
    pub rating_scale: f64,
    pub team_rating: TeamRating,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            starter_rating: 1500.0,
            provisional_k_factor: 40.0,
            established_k_factor: 20.0,
            established_matches: 30,
            rating_scale: 400.0,
            team_rating: TeamRating::Sum,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    pub min_tiers: usize,
    pub max_tiers: usize,
    pub default_fields: u32,
    pub tier_order: TierOrder,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            min_tiers: 2,
            max_tiers: 4,
            default_fields: 4,
            tier_order: TierOrder::WeakestFirst,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl DatabaseSettings {
    pub fn from_env() -> Self {
        let path = std::env::var("DATABASE_PATH")
            .unwrap_or_else(|_| "badminton_ladder.db".to_string());
        Self { path }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub scheduler: SchedulerSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            scheduler: SchedulerSettings::default(),
            database: DatabaseSettings::from_env(),
        }
    }

    pub fn with_database_path(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.database.path = path;
        }
        self
    }
}
