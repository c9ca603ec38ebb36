pub mod history;
pub mod results;
pub mod roster;
pub mod scheduling;

pub use history::{CleanupSummary, HistoryService};
pub use results::{RecomputeSummary, ResultsService, SubmissionSummary};
pub use roster::{LeaderboardEntry, RosterService};
pub use scheduling::{ScheduledSession, SchedulingService, SessionMatch};
