use serde::{Deserialize, Serialize};

use crate::domain::PlayerRef;

/// Which end of the rating range forms the first tier.
///
/// Leftover players cascade from each tier into the next one, so with
/// `WeakestFirst` an odd player moves up towards stronger opponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierOrder {
    WeakestFirst,
    StrongestFirst,
}

/// Sorts by rating in tier order. Equal ratings fall back to name order so a
/// seeded run does not depend on how the pool was listed.
pub fn sort_by_rating(players: &mut [PlayerRef], order: TierOrder) {
    players.sort_by(|a, b| {
        let by_rating = match order {
            TierOrder::WeakestFirst => a.rating.total_cmp(&b.rating),
            TierOrder::StrongestFirst => b.rating.total_cmp(&a.rating),
        };
        by_rating.then_with(|| a.name.cmp(&b.name))
    });
}

/// Splits an already sorted pool into `tier_count` contiguous tiers. The first
/// `len % tier_count` tiers get one extra player.
pub fn partition(players: Vec<PlayerRef>, tier_count: usize) -> Vec<Vec<PlayerRef>> {
    let tier_count = tier_count.max(1);
    let base_size = players.len() / tier_count;
    let remainder = players.len() % tier_count;

    let mut remaining = players.into_iter();
    (0..tier_count)
        .map(|idx| {
            let size = base_size + usize::from(idx < remainder);
            remaining.by_ref().take(size).collect()
        })
        .collect()
}
