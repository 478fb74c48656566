//! Command surface for the host application.
//!
//! The presentation layer talks to the engine through JSON commands so it
//! never holds engine types directly.

pub mod command;

pub use command::{ApiError, ApiResponse, Command, CommandSurface, API_VERSION};
