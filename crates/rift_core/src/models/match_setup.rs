use serde::{Deserialize, Serialize};

use super::series::{SeriesFormat, TeamSide};
use super::team::TeamId;
use crate::error::{Result, SimError};

/// Everything the season service supplies when a match starts simulating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub match_id: String,
    pub home: TeamId,
    pub away: TeamId,
    /// Team whose manager makes the phase decisions
    pub managed_team: TeamId,
    #[serde(default)]
    pub format: SeriesFormat,
    /// Overrides the configured default seed
    #[serde(default)]
    pub seed: Option<u64>,
}

impl MatchSetup {
    pub fn new(match_id: impl Into<String>, home: TeamId, away: TeamId) -> Self {
        Self {
            match_id: match_id.into(),
            managed_team: home.clone(),
            home,
            away,
            format: SeriesFormat::default(),
            seed: None,
        }
    }

    pub fn with_format(mut self, format: SeriesFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn managed_by(mut self, team: TeamId) -> Self {
        self.managed_team = team;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.match_id.trim().is_empty() {
            return Err(SimError::InvalidSetup("match_id must not be empty".into()));
        }
        if self.home == self.away {
            return Err(SimError::InvalidSetup(format!("team {} cannot play itself", self.home)));
        }
        self.format.validate()?;
        self.managed_side().map(|_| ())
    }

    /// Side of the managed team; unknown if it is neither competitor.
    pub fn managed_side(&self) -> Result<TeamSide> {
        if self.managed_team == self.home {
            Ok(TeamSide::Home)
        } else if self.managed_team == self.away {
            Ok(TeamSide::Away)
        } else {
            Err(SimError::UnknownTeam(self.managed_team.clone()))
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamId {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }
}
