//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::{Args, Subcommand, ValueEnum};

use crate::record::{self, timespan, FlightStatus};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// What to search for
    #[command(subcommand)]
    pub query: SearchQuery,
}

/// The available searches.
#[derive(Debug, Subcommand)]
pub enum SearchQuery {
    /// Flights operated by an airline (exact match)
    Airline {
        /// Airline name
        airline: String,
    },

    /// Delayed flights
    Delayed,

    /// Flights departing on a date
    Date {
        /// Departure date (YYYY-MM-DD)
        #[arg(value_parser = date_arg)]
        date: NaiveDate,
    },

    /// Flights to a destination departing within a time range
    Range {
        /// Earliest departure, inclusive
        #[arg(long, value_parser = timestamp_arg)]
        from: NaiveDateTime,

        /// Latest departure, inclusive
        #[arg(long, value_parser = timestamp_arg)]
        to: NaiveDateTime,

        /// Destination (exact match)
        #[arg(short, long)]
        destination: String,
    },

    /// Flights that arrived in the hour before a moment
    Arrivals {
        /// End of the one-hour window
        #[arg(long, value_parser = timestamp_arg)]
        at: NaiveDateTime,
    },
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Flight number, e.g. AB123
    pub flight_number: String,

    /// Operating airline
    #[arg(long)]
    pub airline: String,

    /// Destination
    #[arg(long)]
    pub destination: String,

    /// Departure time (YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = timestamp_arg)]
    pub departure: NaiveDateTime,

    /// Arrival time (YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = timestamp_arg)]
    pub arrival: NaiveDateTime,

    /// Flight status
    #[arg(long, value_enum, default_value = "on-time")]
    pub status: StatusArg,

    /// Flight duration ([d.]hh:mm:ss); defaults to arrival minus departure
    #[arg(long, value_parser = duration_arg)]
    pub duration: Option<Duration>,

    /// Aircraft type
    #[arg(long, default_value = "")]
    pub aircraft: String,

    /// Terminal
    #[arg(long, default_value = "")]
    pub terminal: String,

    /// Write the updated catalog here instead of the configured export file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Flight number of the first matching record to remove
    pub flight_number: String,

    /// Write the updated catalog here instead of the configured export file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Destination file, or `-` for stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

/// Flight status argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// On schedule
    OnTime,
    /// Running late
    Delayed,
    /// Not operating
    Cancelled,
    /// Boarding
    Boarding,
    /// Airborne
    InFlight,
}

impl From<StatusArg> for FlightStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::OnTime => Self::OnTime,
            StatusArg::Delayed => Self::Delayed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Boarding => Self::Boarding,
            StatusArg::InFlight => Self::InFlight,
        }
    }
}

/// Output format for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per flight
    #[default]
    Plain,
    /// Aligned table with every field
    Table,
    /// JSON array
    Json,
}

fn timestamp_arg(s: &str) -> Result<NaiveDateTime, String> {
    record::parse_timestamp(s).map_err(|e| e.to_string())
}

fn date_arg(s: &str) -> Result<NaiveDate, String> {
    record::parse_date(s).map_err(|e| e.to_string())
}

fn duration_arg(s: &str) -> Result<Duration, String> {
    timespan::parse(s).map_err(|e| e.to_string())
}
