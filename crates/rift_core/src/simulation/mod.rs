//! Match simulation engine: phases, choices, modifiers and set resolution.

pub mod catalog;
pub mod engine;
pub mod modifier;
pub mod phase;
pub mod resolution;
pub mod state;

pub use catalog::{ChoiceCatalog, SimulationChoice};
pub use engine::{DecisionOutcome, MatchSimulator};
pub use modifier::{ModifierLedger, ModifierTarget, ModifierTemplate, WinRateModifier, MODIFIER_LIMIT};
pub use phase::Phase;
pub use resolution::{home_win_probability, resolve_set, win_probability, Matchup};
pub use state::{ChoiceView, PhaseRecord, SimulationSnapshot, SimulationState, SimulationStatus};
