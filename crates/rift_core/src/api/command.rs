//! JSON command API for an active match simulation.
//!
//! Every command returns an [`ApiResponse`] envelope; failures carry a stable
//! error code from [`SimError::code`] so callers can tell a bad choice (retry
//! with another id) from a fatal one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::data::TeamLookup;
use crate::error::SimError;
use crate::models::MatchSetup;
use crate::simulation::{ChoiceView, MatchSimulator};

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string() }
    }
}

impl From<SimError> for ApiError {
    fn from(err: SimError) -> Self {
        Self::new(err.code(), &err.to_string())
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    BeginMatch(MatchSetup),
    SubmitDecision { choice_id: String },
    GetState,
    GetChoices,
    Abandon,
}

/// Owns the simulator on behalf of the host and answers JSON commands.
pub struct CommandSurface<L> {
    simulator: MatchSimulator<L>,
}

impl<L: TeamLookup> CommandSurface<L> {
    pub fn new(simulator: MatchSimulator<L>) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &MatchSimulator<L> {
        &self.simulator
    }

    pub fn simulator_mut(&mut self) -> &mut MatchSimulator<L> {
        &mut self.simulator
    }

    /// Parse and run one command, returning the serialized response envelope.
    pub fn send_command(&mut self, command_json: &str) -> String {
        let response = match serde_json::from_str::<Command>(command_json) {
            Ok(command) => match self.execute(command) {
                Ok(data) => ApiResponse::success(data),
                Err(error) => ApiResponse::error(error),
            },
            Err(e) => {
                error!("Failed to parse command: {}", e);
                ApiResponse::error(ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e)))
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn execute(&mut self, command: Command) -> Result<Value, ApiError> {
        match command {
            Command::BeginMatch(setup) => {
                info!("Processing begin_match for {}", setup.match_id);
                self.simulator.begin_match(setup).map_err(log_rejection)?;
                to_value(&self.simulator.snapshot())
            }
            Command::SubmitDecision { choice_id } => {
                debug!("Processing submit_decision '{}'", choice_id);
                let outcome = self.simulator.submit_decision(&choice_id).map_err(log_rejection)?;
                Ok(json!({
                    "outcome": to_value(&outcome)?,
                    "state": to_value(&self.simulator.snapshot())?,
                }))
            }
            Command::GetState => to_value(&self.simulator.snapshot()),
            Command::GetChoices => {
                if !self.simulator.state().is_active() {
                    return Err(ApiError::new("NO_ACTIVE_MATCH", "no match is being simulated"));
                }
                let choices: Vec<ChoiceView> =
                    self.simulator.available_choices().iter().map(ChoiceView::from).collect();
                to_value(&choices)
            }
            Command::Abandon => {
                let abandoned = self.simulator.abandon();
                Ok(json!({ "abandoned": abandoned }))
            }
        }
    }
}

fn log_rejection(err: SimError) -> ApiError {
    if err.is_recoverable() {
        warn!("Command rejected: {}", err);
    } else {
        error!("Command failed: {}", err);
    }
    ApiError::from(err)
}

fn to_value<T: Serialize>(data: &T) -> Result<Value, ApiError> {
    serde_json::to_value(data)
        .map_err(|e| ApiError::new("SERIALIZATION_ERROR", &format!("Failed to serialize: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::data::Roster;
    use crate::models::{Player, Role, Team};

    fn surface() -> CommandSurface<Roster> {
        let team = |id: &str| Team::new(id, id, vec![Player::new(format!("{id}-mid"), Role::Mid, 70)]);
        let roster = Roster::from_teams([team("blue"), team("red")]);
        CommandSurface::new(MatchSimulator::new(roster, SimulationConfig::default()).unwrap())
    }

    fn send(surface: &mut CommandSurface<Roster>, command: Value) -> Value {
        serde_json::from_str(&surface.send_command(&command.to_string())).unwrap()
    }

    fn begin(surface: &mut CommandSurface<Roster>) -> Value {
        send(
            surface,
            json!({
                "command": "begin_match",
                "match_id": "m1",
                "home": "blue",
                "away": "red",
                "managed_team": "blue",
                "format": { "wins_required": 1 },
                "seed": 7
            }),
        )
    }

    #[test]
    fn test_begin_match_returns_snapshot() {
        let mut surface = surface();
        let response = begin(&mut surface);
        assert_eq!(response["success"], true);
        assert_eq!(response["schema_version"], API_VERSION);
        assert_eq!(response["data"]["current_phase"], "DRAFT");
        assert_eq!(response["data"]["is_waiting_for_user"], true);
        assert_eq!(response["data"]["current_set"], 1);
    }

    #[test]
    fn test_full_single_set_over_json() {
        let mut surface = surface();
        begin(&mut surface);

        let mut responses = Vec::new();
        for _ in 0..4 {
            let choices = send(&mut surface, json!({ "command": "get_choices" }));
            let choice_id = choices["data"][0]["id"].as_str().unwrap().to_string();
            let response =
                send(&mut surface, json!({ "command": "submit_decision", "choice_id": choice_id }));
            assert_eq!(response["success"], true);
            responses.push(response);
        }

        let last = responses.pop().unwrap();
        assert_eq!(last["data"]["outcome"]["kind"], "match_completed");
        let winner = last["data"]["outcome"]["result"]["winner"].as_str().unwrap();
        assert!(winner == "blue" || winner == "red");
        assert_eq!(last["data"]["state"]["status"], "completed");
    }

    #[test]
    fn test_invalid_choice_error_code() {
        let mut surface = surface();
        begin(&mut surface);
        let response =
            send(&mut surface, json!({ "command": "submit_decision", "choice_id": "late_baron_call" }));
        assert_eq!(response["success"], false);
        assert_eq!(response["error"]["code"], "INVALID_CHOICE");
        assert!(response["data"].is_null());
    }

    #[test]
    fn test_unknown_team_error_code() {
        let mut surface = surface();
        let response = send(
            &mut surface,
            json!({
                "command": "begin_match",
                "match_id": "m1",
                "home": "blue",
                "away": "ghost",
                "managed_team": "blue"
            }),
        );
        assert_eq!(response["error"]["code"], "UNKNOWN_TEAM");
    }

    #[test]
    fn test_choices_without_match() {
        let mut surface = surface();
        let response = send(&mut surface, json!({ "command": "get_choices" }));
        assert_eq!(response["error"]["code"], "NO_ACTIVE_MATCH");

        let response = send(&mut surface, json!({ "command": "submit_decision", "choice_id": "x" }));
        assert_eq!(response["error"]["code"], "ILLEGAL_TRANSITION");
    }

    #[test]
    fn test_malformed_command() {
        let mut surface = surface();
        let response: Value = serde_json::from_str(&surface.send_command("{\"command\":")).unwrap();
        assert_eq!(response["error"]["code"], "INVALID_JSON");

        let response = send(&mut surface, json!({ "command": "advance_day" }));
        assert_eq!(response["error"]["code"], "INVALID_JSON");
    }

    #[test]
    fn test_abandon_over_json() {
        let mut surface = surface();
        begin(&mut surface);
        let response = send(&mut surface, json!({ "command": "abandon" }));
        assert_eq!(response["data"]["abandoned"], true);
        let response = send(&mut surface, json!({ "command": "get_state" }));
        assert_eq!(response["data"]["status"], "idle");
        assert!(response["data"]["current_phase"].is_null());
    }
}
