pub mod models;
pub mod scores;
pub mod session;

pub use models::{MatchType, Pairing, PlayerRef, Side};
pub use scores::ScoreReport;
pub use session::SessionContext;
