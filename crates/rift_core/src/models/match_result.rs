//! Match Result Data Structures
//!
//! Output of the resolution step. `SetResult` is produced once per set at the
//! `End` phase; `MatchResult` is assembled when the series is decided and is
//! handed to the season service exactly once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::series::{SeriesScore, TeamSide};
use super::team::TeamId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetResult {
    /// 1-based set number within the series
    pub set_number: u32,
    pub winner: TeamId,
    pub winning_side: TeamSide,
    pub duration_minutes: u32,
    /// Clamped home win probability the draw was made against
    pub home_win_probability: f64,
    /// Ledger sum for the home team
    pub home_adjustment: f64,
    /// Ledger sum for the away team
    pub away_adjustment: f64,
    pub player_of_the_game: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_id: String,
    pub home: TeamId,
    pub away: TeamId,
    pub winner: TeamId,
    pub score: SeriesScore,
    pub sets: Vec<SetResult>,
    pub completed_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn loser(&self) -> &TeamId {
        if self.winner == self.home {
            &self.away
        } else {
            &self.home
        }
    }

    /// Total minutes played across all sets.
    pub fn total_duration_minutes(&self) -> u32 {
        self.sets.iter().map(|s| s.duration_minutes).sum()
    }

    pub fn sets_won_by(&self, team: &TeamId) -> usize {
        self.sets.iter().filter(|s| &s.winner == team).count()
    }
}
