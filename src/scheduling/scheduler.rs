use std::collections::HashSet;

use log::{debug, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use super::tiers::{partition, sort_by_rating};
use crate::config::settings::SchedulerSettings;
use crate::domain::{MatchType, Pairing, PlayerRef};
use crate::errors::{LadderError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledMatch {
    pub field_number: u32,
    pub pairing: Pairing<PlayerRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub tier_count: usize,
    pub matches: Vec<ScheduledMatch>,
    pub bench: Vec<PlayerRef>,
}

/// Tiered matchmaking over one pool of available players.
///
/// Players are sorted by rating and cut into 2-4 tiers; inside a tier the
/// pairing is random. Odd players cascade into the next tier, the bench is
/// reclaimed into extra matches, and the shuffled result is truncated to
/// `field_count` with overflow players going back to the bench.
pub fn schedule<R: Rng + ?Sized>(
    available: Vec<PlayerRef>,
    match_type: MatchType,
    field_count: u32,
    settings: &SchedulerSettings,
    rng: &mut R,
) -> Result<Schedule> {
    if available.is_empty() {
        return Err(LadderError::EmptyPlayerPool);
    }
    if field_count < 1 {
        return Err(LadderError::InvalidFieldCount(field_count));
    }

    let mut players = dedup_by_name(available);
    sort_by_rating(&mut players, settings.tier_order);

    let tier_count = pick_tier_count(settings, rng);
    debug!("Splitting {} players into {} tiers", players.len(), tier_count);

    let mut pairings = Vec::new();
    let mut bench = Vec::new();
    let mut carried: Option<PlayerRef> = None;

    for (idx, mut tier) in partition(players, tier_count).into_iter().enumerate() {
        if let Some(player) = carried.take() {
            tier.push(player);
        }
        debug!("Tier {} has {} players", idx + 1, tier.len());

        carried = match match_type {
            MatchType::Doubles => pair_doubles_tier(tier, rng, &mut pairings, &mut bench),
            MatchType::Singles => pair_singles_tier(tier, rng, &mut pairings),
        };
        if let Some(player) = &carried {
            debug!("Leftover player in tier {}: {}", idx + 1, player.name);
        }
    }
    bench.extend(carried);

    reclaim_bench(&mut bench, &mut pairings, match_type, field_count as usize);

    pairings.shuffle(rng);
    if pairings.len() > field_count as usize {
        let overflow = pairings.split_off(field_count as usize);
        debug!("{} matches exceed {} fields", overflow.len(), field_count);
        bench.extend(overflow.into_iter().flat_map(Pairing::into_players));
    }

    let matches = pairings
        .into_iter()
        .zip(1..)
        .map(|(pairing, field_number)| ScheduledMatch {
            field_number,
            pairing,
        })
        .collect();

    Ok(Schedule {
        tier_count,
        matches,
        bench,
    })
}

fn dedup_by_name(players: Vec<PlayerRef>) -> Vec<PlayerRef> {
    let mut seen = HashSet::new();
    players
        .into_iter()
        .filter(|p| {
            let fresh = seen.insert(p.name.clone());
            if !fresh {
                warn!("Player {} listed more than once, ignoring duplicate", p.name);
            }
            fresh
        })
        .collect()
}

fn pick_tier_count<R: Rng + ?Sized>(settings: &SchedulerSettings, rng: &mut R) -> usize {
    let min = settings.min_tiers.max(1);
    let max = settings.max_tiers.max(min);
    rng.random_range(min..=max)
}

/// Pairs a tier into teams and teams into matches. A trailing single player
/// is returned for the next tier; a trailing team goes to the bench whole.
fn pair_doubles_tier<R: Rng + ?Sized>(
    mut tier: Vec<PlayerRef>,
    rng: &mut R,
    pairings: &mut Vec<Pairing<PlayerRef>>,
    bench: &mut Vec<PlayerRef>,
) -> Option<PlayerRef> {
    tier.shuffle(rng);

    let mut teams = Vec::new();
    let mut members = tier.into_iter();
    let leftover = loop {
        match (members.next(), members.next()) {
            (Some(first), Some(second)) => teams.push((first, second)),
            (single, _) => break single,
        }
    };

    teams.shuffle(rng);
    let mut teams = teams.into_iter();
    loop {
        match (teams.next(), teams.next()) {
            (Some(team_a), Some(team_b)) => pairings.push(Pairing::Doubles { team_a, team_b }),
            (Some((first, second)), None) => {
                debug!("Leftover team benched: {} & {}", first.name, second.name);
                bench.push(first);
                bench.push(second);
                break;
            }
            _ => break,
        }
    }

    leftover
}

fn pair_singles_tier<R: Rng + ?Sized>(
    mut tier: Vec<PlayerRef>,
    rng: &mut R,
    pairings: &mut Vec<Pairing<PlayerRef>>,
) -> Option<PlayerRef> {
    tier.shuffle(rng);

    let mut members = tier.into_iter();
    loop {
        match (members.next(), members.next()) {
            (Some(a), Some(b)) => pairings.push(Pairing::Singles { a, b }),
            (single, _) => return single,
        }
    }
}

/// Turns bench players back into matches: fours into doubles (doubles
/// sessions only), then pairs into singles while fields remain.
fn reclaim_bench(
    bench: &mut Vec<PlayerRef>,
    pairings: &mut Vec<Pairing<PlayerRef>>,
    match_type: MatchType,
    field_count: usize,
) {
    if match_type == MatchType::Doubles {
        while bench.len() >= 4 {
            let mut four = bench.drain(..4);
            if let (Some(a1), Some(a2), Some(b1), Some(b2)) =
                (four.next(), four.next(), four.next(), four.next())
            {
                pairings.push(Pairing::Doubles {
                    team_a: (a1, a2),
                    team_b: (b1, b2),
                });
            }
        }
    }

    while bench.len() >= 2 && pairings.len() < field_count {
        let mut two = bench.drain(..2);
        if let (Some(a), Some(b)) = (two.next(), two.next()) {
            pairings.push(Pairing::Singles { a, b });
        }
    }
}
