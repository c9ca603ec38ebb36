pub mod elo;
pub mod types;

pub use elo::{expected_score, k_factor, update_ratings};
pub use types::{Competitor, ConfidenceLevel, Outcome, RatingChange, RatingValue, TeamRating};
