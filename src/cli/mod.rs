//! CLI module for slotwatch - command-line interface and subcommands.
//!
//! The command line is the operator console: it picks target dates and the
//! poll interval, prints the loop's event stream, and turns Ctrl-C into a
//! stop request.

pub mod commands;

pub use commands::Cli;
