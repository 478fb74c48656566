use thiserror::Error;

use crate::models::TeamId;
use crate::simulation::Phase;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid choice '{choice_id}': {reason}")]
    InvalidChoice { choice_id: String, reason: String },

    #[error("Unknown team: {0}")]
    UnknownTeam(TeamId),

    #[error("Team {0} has no players to rate")]
    EmptyRoster(TeamId),

    #[error("Illegal transition from {from:?}: {reason}")]
    IllegalTransition { from: Option<Phase>, reason: String },

    #[error("Invalid match setup: {0}")]
    InvalidSetup(String),
}

impl SimError {
    /// Stable error code used by the JSON command surface.
    pub fn code(&self) -> &'static str {
        match self {
            SimError::InvalidChoice { .. } => "INVALID_CHOICE",
            SimError::UnknownTeam(_) => "UNKNOWN_TEAM",
            SimError::EmptyRoster(_) => "EMPTY_ROSTER",
            SimError::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            SimError::InvalidSetup(_) => "INVALID_SETUP",
        }
    }

    /// Caller mistakes can be corrected and retried; the rest end the simulation.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimError::InvalidChoice { .. } => true,
            SimError::InvalidSetup(_) => true,
            SimError::UnknownTeam(_) => false,
            SimError::EmptyRoster(_) => false,
            SimError::IllegalTransition { .. } => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SimError>;
