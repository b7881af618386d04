//! Interactive console session
//!
//! Reads one command per line and turns it into list intents and form edits
//! on the active slice's page controller.

mod command;
mod runner;

pub use runner::Session;
