//! Command-line interface for flightcatalog.
//!
//! This module provides the CLI structure for the `flightcat` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, ExportCommand, ListCommand, OutputFormat, RemoveCommand,
    SearchCommand, SearchQuery, StatsCommand, StatusArg,
};

/// flightcat - Browse and edit a flight catalog
///
/// Loads flights from a JSON document, searches them, and writes changes back
/// out as JSON.
#[derive(Debug, Parser)]
#[command(name = "flightcat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Flight document to load (overrides the configured data file)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub file: Option<PathBuf>,

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
    /// List every flight in catalog order
    List(ListCommand),

    /// Search flights
    Search(SearchCommand),

    /// Add a flight and save the catalog
    Add(AddCommand),

    /// Remove a flight and save the catalog
    Remove(RemoveCommand),

    /// Write the catalog as a JSON array
    Export(ExportCommand),

    /// Load the data file and report rejected records
    Check,

    /// Show catalog statistics
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
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "flightcat");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        use crate::logging::Verbosity;

        assert_eq!(parse(&["flightcat", "check"]).verbosity(), Verbosity::Normal);
        assert_eq!(
            parse(&["flightcat", "-v", "check"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(
            parse(&["flightcat", "-vv", "check"]).verbosity(),
            Verbosity::Trace
        );
        assert_eq!(
            parse(&["flightcat", "-q", "-v", "check"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_global_paths() {
        let cli = parse(&[
            "flightcat",
            "list",
            "-c",
            "/custom/config.toml",
            "--file",
            "today.json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.file, Some(PathBuf::from("today.json")));
    }

    #[test]
    fn test_parse_search_airline() {
        let cli = parse(&["flightcat", "search", "--format", "table", "airline", "MAU"]);
        match cli.command {
            Command::Search(search) => {
                assert_eq!(search.format, OutputFormat::Table);
                assert!(matches!(search.query, SearchQuery::Airline { ref airline } if airline == "MAU"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_range() {
        let cli = parse(&[
            "flightcat",
            "search",
            "range",
            "--from",
            "2023-03-07T06:00:00",
            "--to",
            "2023-03-07 07:00",
            "-d",
            "Odesa",
        ]);
        let Command::Search(search) = cli.command else {
            panic!("expected search");
        };
        let SearchQuery::Range {
            from,
            to,
            destination,
        } = search.query
        else {
            panic!("expected range query");
        };
        assert!(from < to);
        assert_eq!(destination, "Odesa");
    }

    #[test]
    fn test_parse_search_rejects_bad_date() {
        assert!(Cli::try_parse_from(["flightcat", "search", "date", "yesterday"]).is_err());
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "flightcat",
            "add",
            "AB123",
            "--airline",
            "Delta",
            "--destination",
            "NYC",
            "--departure",
            "2023-01-01T10:00:00",
            "--arrival",
            "2023-01-01T12:00:00",
            "--status",
            "in-flight",
        ]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.flight_number, "AB123");
        assert_eq!(add.status, StatusArg::InFlight);
        assert!(add.duration.is_none());
        assert!(add.aircraft.is_empty());
    }

    #[test]
    fn test_parse_remove_with_output() {
        let cli = parse(&["flightcat", "remove", "BA560", "-o", "out.json"]);
        let Command::Remove(remove) = cli.command else {
            panic!("expected remove");
        };
        assert_eq!(remove.flight_number, "BA560");
        assert_eq!(remove.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = parse(&["flightcat", "config", "show", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
