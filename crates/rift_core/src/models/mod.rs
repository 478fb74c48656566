pub mod match_result;
pub mod match_setup;
pub mod series;
pub mod team;

pub use match_result::{MatchResult, SetResult};
pub use match_setup::MatchSetup;
pub use series::{SeriesFormat, SeriesScore, TeamSide, MAX_WINS_REQUIRED};
pub use team::{Player, Role, Team, TeamId};
