//! Command-line interface module.
//!
//! This module provides the argument parser, prompts, reports and the
//! session flow of the tabula binary.

mod commands;
mod prompt;
mod report;
mod run;
mod selection;

pub use commands::Cli;
pub use run::run_session;
