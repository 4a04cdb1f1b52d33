//! CLI module for kartei - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for deck and card
//! management, study sessions, and git sync.

pub mod commands;

pub use commands::Cli;
