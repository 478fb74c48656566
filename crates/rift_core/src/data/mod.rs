//! Team data consumed by the engine.
//!
//! Rosters are owned by the management layer; the engine only reads them
//! through [`TeamLookup`] to derive baseline strength.

pub mod roster;

pub use roster::{Roster, TeamLookup};
