//! Choice Catalog
//!
//! Static strategic options offered in each phase. Every option carries fixed
//! modifier data so the same choice always grants the same effect; all
//! randomness lives in set resolution.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::modifier::{ModifierTemplate, MODIFIER_LIMIT};
use super::phase::Phase;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationChoice {
    pub id: String,
    pub label: String,
    pub description: String,
    pub phase: Phase,
    pub modifiers: Vec<ModifierTemplate>,
}

impl SimulationChoice {
    fn new(id: &str, label: &str, description: &str, phase: Phase) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            phase,
            modifiers: Vec::new(),
        }
    }

    fn with(mut self, modifier: ModifierTemplate) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChoiceCatalog {
    by_phase: HashMap<Phase, Vec<SimulationChoice>>,
}

static STANDARD_CATALOG: Lazy<ChoiceCatalog> = Lazy::new(ChoiceCatalog::build_standard);

impl ChoiceCatalog {
    /// Shared built-in catalog.
    pub fn standard() -> &'static ChoiceCatalog {
        &STANDARD_CATALOG
    }

    pub fn from_choices(choices: impl IntoIterator<Item = SimulationChoice>) -> Self {
        let mut by_phase: HashMap<Phase, Vec<SimulationChoice>> = HashMap::new();
        for choice in choices {
            by_phase.entry(choice.phase).or_default().push(choice);
        }
        Self { by_phase }
    }

    /// Ordered options for `phase`; empty for phases that never suspend.
    pub fn choices_for(&self, phase: Phase) -> &[SimulationChoice] {
        self.by_phase.get(&phase).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, choice_id: &str) -> Option<&SimulationChoice> {
        self.by_phase.values().flatten().find(|c| c.id == choice_id)
    }

    pub fn len(&self) -> usize {
        self.by_phase.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural checks: unique ids, choices filed under their own phase,
    /// every decision phase populated, values inside the modifier band, and
    /// no two effects of one choice sharing a (source, target) pair.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for (phase, choices) in &self.by_phase {
            for choice in choices {
                if !seen.insert(choice.id.as_str()) {
                    return Err(format!("duplicate choice id '{}'", choice.id));
                }
                if choice.phase != *phase {
                    return Err(format!("choice '{}' filed under {:?}", choice.id, phase));
                }
                if let Some(m) = choice.modifiers.iter().find(|m| m.value.abs() > MODIFIER_LIMIT) {
                    return Err(format!("choice '{}' modifier {} out of band", choice.id, m.value));
                }
                let mut bound = HashSet::new();
                for m in &choice.modifiers {
                    if !bound.insert((m.source_for(&choice.id), m.target)) {
                        return Err(format!(
                            "choice '{}' binds {:?} twice under source '{}'",
                            choice.id,
                            m.target,
                            m.source_for(&choice.id)
                        ));
                    }
                }
            }
        }
        for phase in Phase::ALL {
            let offered = self.choices_for(phase).len();
            if phase.awaits_decision() && offered == 0 {
                return Err(format!("phase {phase:?} offers no choices"));
            }
            if !phase.awaits_decision() && offered > 0 {
                return Err(format!("phase {phase:?} never suspends but offers choices"));
            }
        }
        Ok(())
    }

    fn build_standard() -> Self {
        use ModifierTemplate as M;
        use Phase::*;

        Self::from_choices([
            // Pick & ban
            SimulationChoice::new(
                "draft_comfort_picks",
                "Comfort Picks",
                "Let the players lock in what they know best.",
                Draft,
            )
            .with(M::own(4.0, "Players on signature champions")),
            SimulationChoice::new(
                "draft_counter_pick",
                "Counter-Pick the Carry",
                "Hold last pick to answer their strongest lane.",
                Draft,
            )
            .with(M::own(3.0, "Favourable lane matchup"))
            .with(M::opponent(-3.0, "Carry champion countered")),
            SimulationChoice::new(
                "draft_scaling_comp",
                "Scaling Composition",
                "Concede the early game for an unbeatable late game.",
                Draft,
            )
            .with(M::own(-2.0, "Weak early spikes"))
            .with(M::own(7.0, "Late-game scaling").tagged("scaling")),
            // Early game
            SimulationChoice::new(
                "early_invade",
                "Level 1 Invade",
                "Contest the enemy jungle before minions spawn.",
                Early,
            )
            .with(M::own(5.0, "Jungle tempo stolen"))
            .with(M::opponent(-2.0, "Enemy jungler set behind")),
            SimulationChoice::new(
                "early_farm_safe",
                "Play for Farm",
                "Trade nothing, hit every spike on time.",
                Early,
            )
            .with(M::own(2.0, "Clean gold curve")),
            SimulationChoice::new(
                "early_bot_dive",
                "Dive Bot Lane",
                "Three-man dive under the bot tower.",
                Early,
            )
            .with(M::own(6.0, "First blood in bot lane"))
            .with(M::own(-3.0, "Top lane left on an island").tagged("top_side")),
            // Mid game
            SimulationChoice::new(
                "mid_dragon_stack",
                "Stack Dragons",
                "Prioritise every drake for the soul.",
                Mid,
            )
            .with(M::own(5.0, "Dragon stacks secured")),
            SimulationChoice::new(
                "mid_herald_push",
                "Herald and Towers",
                "Crash Herald into mid and open the map.",
                Mid,
            )
            .with(M::own(4.0, "Plates and first tower"))
            .with(M::opponent(-2.0, "Map pressure lost")),
            SimulationChoice::new(
                "mid_vision_control",
                "Vision Control",
                "Sweep and ward the river before committing.",
                Mid,
            )
            .with(M::own(2.0, "River vision"))
            .with(M::opponent(-3.0, "Picks denied")),
            // Late game
            SimulationChoice::new(
                "late_baron_call",
                "Start Baron",
                "Force the issue at Baron Nashor.",
                Late,
            )
            .with(M::own(8.0, "Baron buff"))
            .with(M::own(-4.0, "Exposed to a steal").tagged("steal_risk")),
            SimulationChoice::new(
                "late_split_push",
                "Split Push",
                "Send the side laner while four hold mid.",
                Late,
            )
            .with(M::own(4.0, "Side-lane pressure")),
            SimulationChoice::new(
                "late_siege",
                "Siege Base",
                "Group as five and grind down the inhibitors.",
                Late,
            )
            .with(M::own(3.0, "Inhibitor pressure"))
            .with(M::opponent(-2.0, "Forced to defend")),
            // Between games
            SimulationChoice::new(
                "feedback_continue",
                "Next Game",
                "Review the last game with the team and head back to the draft.",
                Feedback,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_is_valid() {
        assert_eq!(ChoiceCatalog::standard().validate(), Ok(()));
    }

    #[test]
    fn test_every_decision_phase_has_choices() {
        let catalog = ChoiceCatalog::standard();
        for phase in [Phase::Draft, Phase::Early, Phase::Mid, Phase::Late] {
            assert!(catalog.choices_for(phase).len() >= 2, "{phase:?} should offer a real choice");
        }
        assert!(catalog.choices_for(Phase::End).is_empty());
        assert_eq!(catalog.choices_for(Phase::Feedback).len(), 1);
    }

    #[test]
    fn test_feedback_choice_carries_no_modifiers() {
        let catalog = ChoiceCatalog::standard();
        assert!(catalog.choices_for(Phase::Feedback)[0].modifiers.is_empty());
    }

    #[test]
    fn test_find_by_id() {
        let catalog = ChoiceCatalog::standard();
        let choice = catalog.find("mid_dragon_stack").unwrap();
        assert_eq!(choice.phase, Phase::Mid);
        assert!(catalog.find("no_such_choice").is_none());
    }

    #[test]
    fn test_order_is_stable() {
        let ids: Vec<&str> =
            ChoiceCatalog::standard().choices_for(Phase::Draft).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["draft_comfort_picks", "draft_counter_pick", "draft_scaling_comp"]);
    }

    #[test]
    fn test_validate_catches_duplicates() {
        let dup = SimulationChoice::new("x", "X", "", Phase::Draft);
        let catalog = ChoiceCatalog::from_choices([dup.clone(), dup]);
        assert!(catalog.validate().unwrap_err().contains("duplicate"));
    }

    #[test]
    fn test_standard_choices_bind_unique_sources() {
        let catalog = ChoiceCatalog::standard();
        for phase in Phase::ALL {
            for choice in catalog.choices_for(phase) {
                let mut seen = HashSet::new();
                for m in &choice.modifiers {
                    assert!(seen.insert((m.source_for(&choice.id), m.target)), "{}", choice.id);
                }
            }
        }
    }

    #[test]
    fn test_validate_catches_untagged_same_side_effects() {
        let mut choices: Vec<SimulationChoice> = ChoiceCatalog::standard()
            .by_phase
            .values()
            .flatten()
            .filter(|c| c.id != "late_siege")
            .cloned()
            .collect();
        choices.push(
            SimulationChoice::new("late_siege", "Siege Base", "", Phase::Late)
                .with(ModifierTemplate::own(3.0, "Inhibitor pressure"))
                .with(ModifierTemplate::own(1.0, "Vision around base")),
        );
        let err = ChoiceCatalog::from_choices(choices.clone()).validate().unwrap_err();
        assert!(err.contains("binds Own twice"), "{err}");

        let last = choices.len() - 1;
        choices[last].modifiers[1] = ModifierTemplate::own(1.0, "Vision around base").tagged("vision");
        assert_eq!(ChoiceCatalog::from_choices(choices).validate(), Ok(()));
    }

    #[test]
    fn test_validate_catches_out_of_band_values() {
        let mut choices: Vec<SimulationChoice> = ChoiceCatalog::standard()
            .by_phase
            .values()
            .flatten()
            .cloned()
            .collect();
        choices.push(
            SimulationChoice::new("cheat", "Cheat", "", Phase::Mid)
                .with(ModifierTemplate::own(90.0, "too strong")),
        );
        let catalog = ChoiceCatalog::from_choices(choices);
        assert!(catalog.validate().unwrap_err().contains("out of band"));
    }
}
