//! Match Simulator
//!
//! Phase state machine for one best-of-N match. The machine is driven only by
//! external calls: [`MatchSimulator::begin_match`] and
//! [`MatchSimulator::submit_decision`]. Between calls it rests with
//! `is_waiting_for_user = true` and the current phase's choices exposed; that
//! is the single suspension point. Reaching `End` resolves the set without
//! waiting, then either completes the match or moves to `Feedback` for the
//! next set.
//!
//! Every transition is atomic: fallible work (team lookups) runs before any
//! field of the state is touched.

use chrono::Utc;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::{ChoiceCatalog, SimulationChoice};
use super::modifier::WinRateModifier;
use super::phase::Phase;
use super::resolution::resolve_set;
use super::state::{PhaseRecord, SimulationSnapshot, SimulationState, SimulationStatus};
use crate::config::SimulationConfig;
use crate::data::TeamLookup;
use crate::error::{ConfigError, Result, SimError};
use crate::models::{MatchResult, MatchSetup, SetResult, TeamId, TeamSide};

/// What a successful decision led to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionOutcome {
    /// Moved to the next phase of the same set and is waiting again
    Advanced { phase: Phase },
    /// Set resolved, series continues; now waiting in `Feedback`
    SetCompleted { result: SetResult, next_set: u32 },
    /// Series decided. This is the only place the match result is delivered
    MatchCompleted { result: MatchResult },
}

pub struct MatchSimulator<L> {
    lookup: L,
    catalog: &'static ChoiceCatalog,
    config: SimulationConfig,
    state: SimulationState,
    rng: ChaCha8Rng,
}

impl<L: TeamLookup> MatchSimulator<L> {
    pub fn new(lookup: L, config: SimulationConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_catalog(lookup, config, ChoiceCatalog::standard())
    }

    pub fn with_catalog(
        lookup: L,
        config: SimulationConfig,
        catalog: &'static ChoiceCatalog,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        catalog.validate().map_err(ConfigError::Invalid)?;
        let rng = ChaCha8Rng::seed_from_u64(config.default_seed);
        Ok(Self { lookup, catalog, config, state: SimulationState::default(), rng })
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        self.state.snapshot()
    }

    /// Choices offered right now; empty unless waiting for a decision.
    pub fn available_choices(&self) -> &[SimulationChoice] {
        &self.state.current_choices
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Roster access for the host between matches.
    pub fn lookup_mut(&mut self) -> &mut L {
        &mut self.lookup
    }

    /// Start simulating a match and suspend at the first draft decision.
    pub fn begin_match(&mut self, setup: MatchSetup) -> Result<&SimulationState> {
        if self.state.is_active() {
            return Err(SimError::IllegalTransition {
                from: self.state.current_phase,
                reason: format!(
                    "match {} is still in progress",
                    self.state.match_id.as_deref().unwrap_or("?")
                ),
            });
        }
        setup.validate()?;
        self.lookup.baseline_strength(&setup.home)?;
        self.lookup.baseline_strength(&setup.away)?;

        let seed = setup.seed.unwrap_or(self.config.default_seed);
        info!(
            match_id = %setup.match_id,
            home = %setup.home,
            away = %setup.away,
            wins_required = setup.format.wins_required,
            seed,
            "match simulation started"
        );

        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.state = SimulationState {
            current_phase: Some(Phase::Draft),
            is_waiting_for_user: false,
            match_id: Some(setup.match_id),
            current_set: 1,
            status: SimulationStatus::AwaitingDecision,
            home: Some(setup.home),
            away: Some(setup.away),
            managed_team: Some(setup.managed_team),
            format: setup.format,
            ..SimulationState::default()
        };
        self.advance();
        Ok(&self.state)
    }

    /// Expose the current phase's catalog slice and suspend.
    fn advance(&mut self) {
        let Some(phase) = self.state.current_phase else {
            return;
        };
        self.state.current_choices = self.catalog.choices_for(phase).to_vec();
        self.state.is_waiting_for_user = !self.state.current_choices.is_empty();
        debug!(
            ?phase,
            set = self.state.current_set,
            choices = self.state.current_choices.len(),
            "awaiting decision"
        );
    }

    /// Apply the manager's choice for the current phase and move on.
    pub fn submit_decision(&mut self, choice_id: &str) -> Result<DecisionOutcome> {
        match self.state.status {
            SimulationStatus::Idle => {
                return Err(SimError::IllegalTransition {
                    from: None,
                    reason: "no match in progress".into(),
                });
            }
            SimulationStatus::Completed => {
                return Err(SimError::IllegalTransition {
                    from: self.state.current_phase,
                    reason: "match already completed".into(),
                });
            }
            SimulationStatus::AwaitingDecision => {}
        }

        let phase = self.state.current_phase.ok_or_else(|| SimError::IllegalTransition {
            from: None,
            reason: "active match has no phase".into(),
        })?;

        if !self.state.is_waiting_for_user {
            warn!(choice_id, ?phase, "decision submitted while none pending");
            return Err(SimError::InvalidChoice {
                choice_id: choice_id.to_string(),
                reason: "no decision pending".into(),
            });
        }

        let Some(choice) = self.state.current_choices.iter().find(|c| c.id == choice_id) else {
            warn!(choice_id, ?phase, "choice not offered");
            return Err(SimError::InvalidChoice {
                choice_id: choice_id.to_string(),
                reason: format!("not offered during {phase:?}"),
            });
        };

        let next = phase.next_in_set().ok_or_else(|| SimError::IllegalTransition {
            from: Some(phase),
            reason: "no successor phase".into(),
        })?;

        let modifiers = self.bind_modifiers(choice)?;
        if let Some(dup) = self.first_duplicate(&modifiers) {
            return Err(SimError::InvalidChoice {
                choice_id: choice_id.to_string(),
                reason: format!("'{}' already applied to {} this set", dup.source(), dup.team()),
            });
        }

        debug!(choice_id, ?phase, ?next, modifiers = modifiers.len(), "decision accepted");

        if next == Phase::End {
            let mut ledger = self.state.win_rate_modifiers.clone();
            ledger.extend(modifiers);
            let (home, away) = {
                let (home, away) = self.competitors()?;
                (home.clone(), away.clone())
            };
            let set_result = resolve_set(
                &self.lookup,
                &home,
                &away,
                &ledger,
                self.state.current_set,
                &self.config,
                &mut self.rng,
            )?;

            self.state.win_rate_modifiers = ledger;
            self.commit_decision(phase, choice_id, Phase::End);
            return Ok(self.finish_set(set_result));
        }

        self.state.win_rate_modifiers.extend(modifiers);
        self.commit_decision(phase, choice_id, next);
        if next == Phase::Draft {
            info!(set = self.state.current_set, "next set drafting");
        }
        self.advance();
        Ok(DecisionOutcome::Advanced { phase: next })
    }

    /// Drop the match in progress. Nothing has been reported outside the
    /// simulator, so this is always safe. Returns whether anything was dropped.
    pub fn abandon(&mut self) -> bool {
        if self.state.status == SimulationStatus::Idle {
            return false;
        }
        info!(
            match_id = self.state.match_id.as_deref().unwrap_or("?"),
            completed = self.state.is_completed(),
            "match simulation discarded"
        );
        self.state = SimulationState::default();
        true
    }

    fn competitors(&self) -> Result<(&TeamId, &TeamId)> {
        match (&self.state.home, &self.state.away) {
            (Some(home), Some(away)) => Ok((home, away)),
            _ => Err(SimError::IllegalTransition {
                from: self.state.current_phase,
                reason: "competitors not set".into(),
            }),
        }
    }

    fn bind_modifiers(&self, choice: &SimulationChoice) -> Result<Vec<WinRateModifier>> {
        let (home, away) = self.competitors()?;
        let managed = self.state.managed_team.as_ref().unwrap_or(home);
        let opponent = if managed == home { away } else { home };
        Ok(choice
            .modifiers
            .iter()
            .map(|m| m.resolve(managed, opponent, &m.source_for(&choice.id)))
            .collect())
    }

    /// First entry whose (source, team) pair is already in the ledger or
    /// appears earlier in the same batch.
    fn first_duplicate<'a>(&self, batch: &'a [WinRateModifier]) -> Option<&'a WinRateModifier> {
        batch.iter().enumerate().find_map(|(i, m)| {
            let in_ledger = self.state.win_rate_modifiers.contains(m.source(), m.team());
            let in_batch =
                batch[..i].iter().any(|prev| prev.source() == m.source() && prev.team() == m.team());
            (in_ledger || in_batch).then_some(m)
        })
    }

    fn commit_decision(&mut self, phase: Phase, choice_id: &str, next: Phase) {
        self.state.phase_history.push(PhaseRecord {
            phase,
            choice_id: choice_id.to_string(),
            set_number: self.state.current_set,
            timestamp: Utc::now(),
        });
        self.state.current_choices.clear();
        self.state.is_waiting_for_user = false;
        self.state.current_phase = Some(next);
    }

    /// Fold a resolved set into the series; either finish the match or open
    /// the feedback phase for the next set with a fresh ledger.
    fn finish_set(&mut self, set_result: SetResult) -> DecisionOutcome {
        self.state.score.record(set_result.winning_side);
        self.state.set_results.push(set_result.clone());

        info!(
            set = set_result.set_number,
            winner = %set_result.winner,
            home_wins = self.state.score.home_wins,
            away_wins = self.state.score.away_wins,
            "set finished"
        );

        if let Some(side) = self.state.score.winner(self.state.format) {
            self.state.status = SimulationStatus::Completed;
            self.state.current_choices.clear();
            self.state.is_waiting_for_user = false;
            let result = self.build_result(side);
            info!(match_id = %result.match_id, winner = %result.winner, "match completed");
            return DecisionOutcome::MatchCompleted { result };
        }

        self.state.win_rate_modifiers.clear();
        self.state.current_set += 1;
        self.state.current_phase = Some(Phase::Feedback);
        self.advance();
        DecisionOutcome::SetCompleted { result: set_result, next_set: self.state.current_set }
    }

    fn build_result(&self, side: TeamSide) -> MatchResult {
        let home = self.state.home.clone().unwrap_or_default();
        let away = self.state.away.clone().unwrap_or_default();
        let winner = match side {
            TeamSide::Home => home.clone(),
            TeamSide::Away => away.clone(),
        };
        MatchResult {
            match_id: self.state.match_id.clone().unwrap_or_default(),
            home,
            away,
            winner,
            score: self.state.score,
            sets: self.state.set_results.clone(),
            completed_at: Utc::now(),
        }
    }
}
