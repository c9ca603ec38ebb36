use super::types::{Competitor, Outcome, RatingChange, RatingValue};
use crate::config::settings::RatingSettings;
use crate::domain::{Pairing, Side};

/// Logistic expectation that side A beats side B.
pub fn expected_score(
    rating_a: RatingValue,
    rating_b: RatingValue,
    config: &RatingSettings,
) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / config.rating_scale))
}

pub fn k_factor(matches_played: u32, config: &RatingSettings) -> f64 {
    if matches_played < config.established_matches {
        config.provisional_k_factor
    } else {
        config.established_k_factor
    }
}

/// Computes one rating change per participant. Teammates always receive the
/// same delta; each side's K uses the side's combined match count.
pub fn update_ratings(
    pairing: &Pairing<Competitor>,
    outcome: Outcome,
    config: &RatingSettings,
) -> Vec<RatingChange> {
    let side_a = pairing.side(Side::A);
    let side_b = pairing.side(Side::B);

    let rating_a = side_rating(&side_a, config);
    let rating_b = side_rating(&side_b, config);
    let expected_a = expected_score(rating_a, rating_b, config);
    let expected_b = 1.0 - expected_a;

    let delta_a = side_delta(&side_a, outcome.actual_score(Side::A), expected_a, config);
    let delta_b = side_delta(&side_b, outcome.actual_score(Side::B), expected_b, config);

    side_a
        .iter()
        .map(|c| change_for(c, delta_a))
        .chain(side_b.iter().map(|c| change_for(c, delta_b)))
        .collect()
}

fn side_rating(members: &[&Competitor], config: &RatingSettings) -> RatingValue {
    let ratings: Vec<RatingValue> = members.iter().map(|c| c.rating).collect();
    config.team_rating.combine(&ratings)
}

fn side_delta(
    members: &[&Competitor],
    actual: f64,
    expected: f64,
    config: &RatingSettings,
) -> RatingValue {
    let combined_matches = members.iter().map(|c| c.matches_played).sum();
    k_factor(combined_matches, config) * (actual - expected)
}

fn change_for(competitor: &Competitor, delta: RatingValue) -> RatingChange {
    RatingChange {
        player: competitor.name.clone(),
        rating_before: competitor.rating,
        delta,
    }
}
