//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - watch: poll until one of the chosen dates is booked
//! - query: show what is open right now, without booking
//! - dates: list the candidate Monday dates

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Slotwatch - book an onboarding slot the moment it opens
#[derive(Parser, Debug)]
#[command(name = "slotwatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show endpoints and credential file in use)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll for open slots and book the first target date that appears
    Watch {
        /// Target date (YYYY-MM-DD); repeat for several
        #[arg(short, long = "date", value_name = "DATE")]
        dates: Vec<String>,

        /// Target every Monday in the configured calendar
        #[arg(long)]
        all_mondays: bool,

        /// Seconds between polls (1-3600); defaults to the config value
        #[arg(short, long)]
        interval: Option<u64>,

        /// Authorization token overriding the credential file
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Query open dates and cities once, without booking
    Query {
        /// Authorization token overriding the credential file
        #[arg(short, long)]
        token: Option<String>,
    },

    /// List the candidate Monday dates from the configured calendar
    Dates,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["slotwatch"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["slotwatch", "-v", "-c", "/etc/slotwatch.yml", "dates"]).unwrap();
        assert!(cli.is_verbose());
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/etc/slotwatch.yml")));
        assert!(matches!(cli.command, Commands::Dates));
    }

    #[test]
    fn test_watch_with_repeated_dates() {
        let cli = Cli::try_parse_from([
            "slotwatch",
            "watch",
            "-d",
            "2025-06-09",
            "--date",
            "2025-06-16",
            "--interval",
            "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Watch {
                dates,
                all_mondays,
                interval,
                token,
            } => {
                assert_eq!(dates, vec!["2025-06-09", "2025-06-16"]);
                assert!(!all_mondays);
                assert_eq!(interval, Some(5));
                assert!(token.is_none());
            }
            _ => panic!("Expected watch command"),
        }
    }

    #[test]
    fn test_watch_all_mondays_with_token() {
        let cli = Cli::try_parse_from(["slotwatch", "watch", "--all-mondays", "-t", "abc"]).unwrap();
        match cli.command {
            Commands::Watch {
                dates,
                all_mondays,
                token,
                ..
            } => {
                assert!(dates.is_empty());
                assert!(all_mondays);
                assert_eq!(token.as_deref(), Some("abc"));
            }
            _ => panic!("Expected watch command"),
        }
    }

    #[test]
    fn test_query_command() {
        let cli = Cli::try_parse_from(["slotwatch", "query"]).unwrap();
        assert!(matches!(cli.command, Commands::Query { token: None }));
    }

    #[test]
    fn test_help_works() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        // Version flag causes early exit with error (expected)
        assert!(Cli::try_parse_from(["slotwatch", "--version"]).is_err());
    }
}
