//! Scripted decision makers for headless runs.

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use rift_core::simulation::ModifierTarget;
use rift_core::{
    DecisionOutcome, MatchResult, MatchSetup, MatchSimulator, SimError, SimulationChoice,
    TeamLookup,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Always take the first listed option
    First,
    /// Take the option with the best net swing for the managed team
    Greedy,
    /// Pick uniformly at random
    Random,
}

/// Own-team gain minus opponent gain.
pub fn net_effect(choice: &SimulationChoice) -> f64 {
    choice
        .modifiers
        .iter()
        .map(|m| match m.target {
            ModifierTarget::Own => m.value,
            ModifierTarget::Opponent => -m.value,
        })
        .sum()
}

pub struct Autopilot {
    strategy: Strategy,
    rng: ChaCha8Rng,
}

impl Autopilot {
    pub fn new(strategy: Strategy, seed: u64) -> Self {
        Self { strategy, rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn pick<'a>(&mut self, choices: &'a [SimulationChoice]) -> Option<&'a SimulationChoice> {
        match self.strategy {
            Strategy::First => choices.first(),
            // ties keep the earlier option
            Strategy::Greedy => choices.iter().fold(None, |best: Option<&SimulationChoice>, c| {
                match best {
                    Some(b) if net_effect(b) >= net_effect(c) => Some(b),
                    _ => Some(c),
                }
            }),
            Strategy::Random => choices.choose(&mut self.rng),
        }
    }

    /// Play a whole match, answering every decision.
    pub fn play_match<L: TeamLookup>(
        &mut self,
        simulator: &mut MatchSimulator<L>,
        setup: MatchSetup,
    ) -> Result<MatchResult, SimError> {
        simulator.begin_match(setup)?;
        loop {
            let choice_id = match self.pick(simulator.available_choices()) {
                Some(choice) => choice.id.clone(),
                None => {
                    return Err(SimError::IllegalTransition {
                        from: simulator.state().current_phase,
                        reason: "no choices offered".into(),
                    });
                }
            };
            debug!(choice = %choice_id, "autopilot decision");

            match simulator.submit_decision(&choice_id)? {
                DecisionOutcome::Advanced { .. } => {}
                DecisionOutcome::SetCompleted { result, next_set } => {
                    info!(set = result.set_number, winner = %result.winner, next_set, "set done");
                }
                DecisionOutcome::MatchCompleted { result } => return Ok(result),
            }
        }
    }
}
