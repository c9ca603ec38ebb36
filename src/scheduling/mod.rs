pub mod scheduler;
pub mod tiers;

pub use scheduler::{schedule, Schedule, ScheduledMatch};
pub use tiers::TierOrder;
