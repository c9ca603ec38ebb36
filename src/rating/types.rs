use serde::{Deserialize, Serialize};

use crate::domain::Side;

pub type RatingValue = f64;

/// How teammates' ratings are folded into one side rating for the expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamRating {
    /// Teammates' ratings are added (a 1500 + 1500 pair plays as 3000).
    Sum,
    Average,
}

impl TeamRating {
    pub fn combine(&self, ratings: &[RatingValue]) -> RatingValue {
        let total: RatingValue = ratings.iter().sum();
        match self {
            TeamRating::Sum => total,
            TeamRating::Average if ratings.is_empty() => 0.0,
            TeamRating::Average => total / ratings.len() as RatingValue,
        }
    }
}

/// A resolved participant, as read from the roster right before rating
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub name: String,
    pub rating: RatingValue,
    pub matches_played: u32,
}

impl Competitor {
    pub fn new(name: impl Into<String>, rating: RatingValue, matches_played: u32) -> Self {
        Self {
            name: name.into(),
            rating,
            matches_played,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Win(Side),
    Draw,
}

impl Outcome {
    pub fn from_scores(score_a: u32, score_b: u32) -> Self {
        match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Outcome::Win(Side::A),
            std::cmp::Ordering::Less => Outcome::Win(Side::B),
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Win(side) => Some(*side),
            Outcome::Draw => None,
        }
    }

    pub fn actual_score(&self, side: Side) -> f64 {
        match self {
            Outcome::Win(winner) if *winner == side => 1.0,
            Outcome::Win(_) => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingChange {
    pub player: String,
    pub rating_before: RatingValue,
    pub delta: RatingValue,
}

impl RatingChange {
    pub fn rating_after(&self) -> RatingValue {
        self.rating_before + self.delta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Provisional, // still on the fast K-factor
    Established,
}

impl ConfidenceLevel {
    pub fn from_matches_played(matches: u32, established_matches: u32) -> Self {
        if matches < established_matches {
            ConfidenceLevel::Provisional
        } else {
            ConfidenceLevel::Established
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConfidenceLevel::Provisional => "provisional",
            ConfidenceLevel::Established => "established",
        }
    }
}
