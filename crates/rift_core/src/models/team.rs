use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SimError};

/// Opaque team identifier handed out by the season service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Bot,
    Support,
}

pub const MIN_RATING: u8 = 0;
pub const MAX_RATING: u8 = 100;
pub const FORM_LIMIT: i8 = 10;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub name: String,
    pub role: Role,
    /// Overall rating (0-100)
    pub rating: u8,
    /// Short-term form swing (-10..=10)
    #[serde(default)]
    pub form: i8,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, rating: u8) -> Self {
        Self { name: name.into(), role, rating: rating.min(MAX_RATING), form: 0 }
    }

    pub fn with_form(mut self, form: i8) -> Self {
        self.form = form.clamp(-FORM_LIMIT, FORM_LIMIT);
        self
    }

    /// Rating adjusted by form, never negative.
    pub fn effective_rating(&self) -> f64 {
        let form = self.form.clamp(-FORM_LIMIT, FORM_LIMIT) as f64;
        (self.rating.min(MAX_RATING) as f64 + form).max(MIN_RATING as f64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    pub players: Vec<Player>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>, players: Vec<Player>) -> Self {
        Self { id: TeamId::new(id), name: name.into(), short_name: None, players }
    }

    /// Label for scoreboards; falls back to the full name.
    pub fn display_name(&self) -> &str {
        self.short_name.as_deref().unwrap_or(&self.name)
    }

    /// Baseline strength fed into set resolution: mean effective rating.
    pub fn baseline_strength(&self) -> Result<f64> {
        if self.players.is_empty() {
            return Err(SimError::EmptyRoster(self.id.clone()));
        }
        let total: f64 = self.players.iter().map(Player::effective_rating).sum();
        Ok(total / self.players.len() as f64)
    }
}
