//! Command-line interface for flightinfo.
//!
//! This module provides the CLI structure for the `flightinfo` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, ImportCommand, ServeCommand, StatsCommand};

/// flightinfo - Read-only flight information service
///
/// Serves flight records from a `SQLite` database over HTTP, with search by
/// departure city and summary statistics.
#[derive(Debug, Parser)]
#[command(name = "flightinfo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Import flights from a JSON file into the database
    Import(ImportCommand),

    /// Print statistics for the stored flights
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "flightinfo");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["flightinfo", "serve"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["flightinfo", "-v", "serve"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["flightinfo", "-vv", "serve"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["flightinfo", "-q", "serve"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_quiet_wins_over_verbose() {
        let cli = parse(&["flightinfo", "-q", "-v", "serve"]);
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = parse(&["flightinfo", "serve"]);
        match cli.command {
            Command::Serve(cmd) => {
                assert!(cmd.addr.is_none());
                assert!(cmd.fixture.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_with_addr() {
        let cli = parse(&["flightinfo", "serve", "--addr", "0.0.0.0:9090"]);
        match cli.command {
            Command::Serve(cmd) => assert_eq!(cmd.addr, "0.0.0.0:9090".parse().ok()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_rejects_bad_addr() {
        assert!(Cli::try_parse_from(["flightinfo", "serve", "--addr", "nowhere"]).is_err());
    }

    #[test]
    fn test_parse_import() {
        let cli = parse(&["flightinfo", "import", "flights.json"]);
        match cli.command {
            Command::Import(cmd) => assert_eq!(cmd.file, PathBuf::from("flights.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stats_json() {
        let cli = parse(&["flightinfo", "stats", "--json"]);
        assert!(matches!(cli.command, Command::Stats(StatsCommand { json: true })));
    }

    #[test]
    fn test_parse_config_validate() {
        let cli = parse(&["flightinfo", "config", "validate", "/tmp/c.toml"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["flightinfo", "-c", "/custom/config.toml", "stats"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
