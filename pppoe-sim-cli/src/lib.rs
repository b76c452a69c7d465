//! CLI interface for the PPPoE simulator
//!
//! This crate provides argument parsing, the interactive interface menu and
//! the credential banner printed after each session.

pub mod args;
pub mod menu;

pub use args::{Cli, Commands};
