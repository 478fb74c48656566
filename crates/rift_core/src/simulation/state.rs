use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::SimulationChoice;
use super::modifier::ModifierLedger;
use super::phase::Phase;
use crate::models::{SeriesFormat, SeriesScore, SetResult, TeamId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub phase: Phase,
    pub choice_id: String,
    /// Set the decision was made in
    pub set_number: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// No match has been started, or the last one was abandoned
    #[default]
    Idle,
    AwaitingDecision,
    Completed,
}

/// Full observable state of one match simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulationState {
    pub current_phase: Option<Phase>,
    pub is_waiting_for_user: bool,
    pub win_rate_modifiers: ModifierLedger,
    pub current_choices: Vec<SimulationChoice>,
    pub match_id: Option<String>,
    /// 1-based; 0 only while idle
    pub current_set: u32,
    pub phase_history: Vec<PhaseRecord>,
    pub status: SimulationStatus,
    pub home: Option<TeamId>,
    pub away: Option<TeamId>,
    pub managed_team: Option<TeamId>,
    pub format: SeriesFormat,
    pub score: SeriesScore,
    pub set_results: Vec<SetResult>,
}

impl SimulationState {
    pub fn is_active(&self) -> bool {
        self.status == SimulationStatus::AwaitingDecision
    }

    pub fn is_completed(&self) -> bool {
        self.status == SimulationStatus::Completed
    }

    pub fn has_choice(&self, choice_id: &str) -> bool {
        self.current_choices.iter().any(|c| c.id == choice_id)
    }

    /// Read-only projection for rendering.
    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot {
            match_id: self.match_id.clone(),
            status: self.status,
            current_phase: self.current_phase,
            phase_label: self.current_phase.map(Phase::label),
            phase_icon: self.current_phase.map(Phase::icon),
            is_waiting_for_user: self.is_waiting_for_user,
            current_choices: self.current_choices.iter().map(ChoiceView::from).collect(),
            current_set: self.current_set,
            score: self.score,
            wins_required: self.format.wins_required,
            modifier_count: self.win_rate_modifiers.len(),
            decisions_made: self.phase_history.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceView {
    pub id: String,
    pub label: String,
    pub description: String,
}

impl From<&SimulationChoice> for ChoiceView {
    fn from(choice: &SimulationChoice) -> Self {
        Self {
            id: choice.id.clone(),
            label: choice.label.clone(),
            description: choice.description.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub match_id: Option<String>,
    pub status: SimulationStatus,
    pub current_phase: Option<Phase>,
    pub phase_label: Option<&'static str>,
    pub phase_icon: Option<&'static str>,
    pub is_waiting_for_user: bool,
    pub current_choices: Vec<ChoiceView>,
    pub current_set: u32,
    pub score: SeriesScore,
    pub wins_required: u8,
    pub modifier_count: usize,
    pub decisions_made: usize,
}
