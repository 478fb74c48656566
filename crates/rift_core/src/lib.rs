//! # rift_core - Decision-Driven Esports Match Simulation
//!
//! Advances a best-of-N match set by set through
//! Draft → Early → Mid → Late → End, pausing at every phase for the managing
//! user's strategic choice. Choices add fixed win-rate modifiers to a per-set
//! ledger; at End the ledger and both rosters' baseline strength feed a
//! clamped logistic win probability and a seeded draw decides the set.
//!
//! ## Features
//! - Deterministic: same seed and same decisions give the same result
//! - Atomic transitions: a rejected decision never changes state
//! - JSON command surface for the presentation layer

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod simulation;

pub use api::{ApiError, ApiResponse, Command, CommandSurface};
pub use config::SimulationConfig;
pub use data::{Roster, TeamLookup};
pub use error::{ConfigError, Result, SimError};
pub use models::{
    MatchResult, MatchSetup, Player, Role, SeriesFormat, SeriesScore, SetResult, Team, TeamId,
    TeamSide,
};
pub use simulation::{
    ChoiceCatalog, DecisionOutcome, MatchSimulator, Phase, SimulationChoice, SimulationSnapshot,
    SimulationState, WinRateModifier,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
