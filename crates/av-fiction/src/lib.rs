//! Interactive fiction engine for Authventure.
//!
//! A handful of locations connected by free-text verbs. The player picks up
//! an authentication device in the well house, shows it to the knight at the
//! cave and finally convinces the robed man to read out a one-time code from
//! one of the device's OATH credentials.
//!
//! The engine never prints or reads on its own: narration goes through a
//! [`Narrator`] and answers come from a [`LineReader`], both supplied by the
//! driving shell.

/// Error types for the fiction engine.
pub mod error;
/// Locations and the per-command context they act on.
pub mod location;
/// Narration and input contracts, and spoken-word formatting.
pub mod narrator;
/// Command parsing.
pub mod parser;
/// Command dispatch over the current location.
pub mod session;
/// Session state shared by every location.
pub mod state;

pub use error::{FictionError, FictionResult};
pub use location::{Context, Location, Place};
pub use narrator::{LineReader, Narrator, format_code};
pub use parser::{Command, Verb, parse_command};
pub use session::{GameSession, Outcome};
pub use state::SessionState;
