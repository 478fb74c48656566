use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Upper bound on series length; longer formats are not played in any league we model.
pub const MAX_WINS_REQUIRED: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    pub const fn opposite(self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// Best-of-N structure, stored as the number of set wins that clinches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesFormat {
    pub wins_required: u8,
}

impl Default for SeriesFormat {
    fn default() -> Self {
        Self { wins_required: 1 }
    }
}

impl SeriesFormat {
    /// First team to `wins` set wins takes the match.
    pub fn first_to(wins: u8) -> Result<Self> {
        let format = Self { wins_required: wins };
        format.validate()?;
        Ok(format)
    }

    /// Best-of-`sets`; `sets` must be odd.
    pub fn best_of(sets: u8) -> Result<Self> {
        if sets % 2 == 0 {
            return Err(SimError::InvalidSetup(format!("best-of-{sets} has no decisive majority")));
        }
        Self::first_to(sets / 2 + 1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.wins_required == 0 || self.wins_required > MAX_WINS_REQUIRED {
            return Err(SimError::InvalidSetup(format!(
                "wins_required must be 1..={MAX_WINS_REQUIRED}, got {}",
                self.wins_required
            )));
        }
        Ok(())
    }

    pub fn max_sets(&self) -> u8 {
        self.wins_required * 2 - 1
    }
}

/// Running set score of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeriesScore {
    pub home_wins: u8,
    pub away_wins: u8,
}

impl SeriesScore {
    pub fn record(&mut self, side: TeamSide) {
        match side {
            TeamSide::Home => self.home_wins += 1,
            TeamSide::Away => self.away_wins += 1,
        }
    }

    pub fn sets_played(&self) -> u8 {
        self.home_wins + self.away_wins
    }

    pub fn leader(&self) -> Option<TeamSide> {
        match self.home_wins.cmp(&self.away_wins) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// The side that has clinched the series, if any.
    pub fn winner(&self, format: SeriesFormat) -> Option<TeamSide> {
        if self.home_wins >= format.wins_required {
            Some(TeamSide::Home)
        } else if self.away_wins >= format.wins_required {
            Some(TeamSide::Away)
        } else {
            None
        }
    }
}
