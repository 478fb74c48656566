use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Result, SimError};
use crate::models::{Team, TeamId};

/// Read access to the team database.
pub trait TeamLookup {
    fn team_by_id(&self, id: &TeamId) -> Option<&Team>;

    fn require_team(&self, id: &TeamId) -> Result<&Team> {
        self.team_by_id(id).ok_or_else(|| SimError::UnknownTeam(id.clone()))
    }

    /// Baseline strength of a known team.
    fn baseline_strength(&self, id: &TeamId) -> Result<f64> {
        self.require_team(id)?.baseline_strength()
    }
}

/// In-memory team database, used by the CLI and tests.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    teams: HashMap<TeamId, Team>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        let mut roster = Self::new();
        for team in teams {
            roster.insert(team);
        }
        roster
    }

    /// Parse a JSON array of teams.
    pub fn from_json(json: &str) -> std::result::Result<Self, ConfigError> {
        let teams: Vec<Team> = serde_json::from_str(json)?;
        Ok(Self::from_teams(teams))
    }

    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let roster = Self::from_json(&content)?;
        tracing::debug!("Loaded {} teams from {:?}", roster.len(), path.as_ref());
        Ok(roster)
    }

    /// Insert or replace a team; returns the previous entry.
    pub fn insert(&mut self, team: Team) -> Option<Team> {
        self.teams.insert(team.id.clone(), team)
    }

    pub fn remove(&mut self, id: &TeamId) -> Option<Team> {
        self.teams.remove(id)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Team ids in sorted order.
    pub fn team_ids(&self) -> Vec<&TeamId> {
        let mut ids: Vec<&TeamId> = self.teams.keys().collect();
        ids.sort();
        ids
    }
}

impl TeamLookup for Roster {
    fn team_by_id(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }
}

impl<T: TeamLookup + ?Sized> TeamLookup for &T {
    fn team_by_id(&self, id: &TeamId) -> Option<&Team> {
        (**self).team_by_id(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Player, Role};
    use std::io::Write;

    fn team(id: &str, rating: u8) -> Team {
        Team::new(id, id.to_uppercase(), vec![Player::new(format!("{id}-mid"), Role::Mid, rating)])
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let roster = Roster::from_teams([team("blue", 70), team("red", 60)]);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.baseline_strength(&TeamId::new("blue")).unwrap(), 70.0);
        assert_eq!(
            roster.require_team(&TeamId::new("green")).unwrap_err(),
            SimError::UnknownTeam(TeamId::new("green"))
        );
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut roster = Roster::new();
        assert!(roster.insert(team("blue", 70)).is_none());
        let previous = roster.insert(team("blue", 80)).unwrap();
        assert_eq!(previous.players[0].rating, 70);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"blue","name":"Blue","players":[{{"name":"a","role":"top","rating":66}}]}}]"#
        )
        .unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.team_ids(), vec![&TeamId::new("blue")]);
        assert_eq!(roster.baseline_strength(&TeamId::new("blue")).unwrap(), 66.0);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(Roster::from_json("{not json"), Err(ConfigError::Parse(_))));
    }
}
