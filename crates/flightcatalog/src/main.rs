//! `flightcat` - CLI for flightcatalog
//!
//! This binary loads a flight document, runs one command against the catalog,
//! and prints or saves the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use flightcatalog::cli::{
    AddCommand, Cli, Command, ConfigCommand, ExportCommand, OutputFormat, RemoveCommand,
    SearchCommand, SearchQuery,
};
use flightcatalog::display::{self, Pager};
use flightcatalog::{init_logging, Catalog, Config, FlightRecord, LoadReport};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;
    let data_file = cli.file.clone().unwrap_or_else(|| config.data_file());

    match cli.command {
        Command::List(cmd) => {
            let catalog = open_catalog(&data_file)?;
            show(&config, cmd.format, catalog.records())
        }
        Command::Search(cmd) => handle_search(&config, &data_file, &cmd),
        Command::Add(cmd) => handle_add(&config, &data_file, cmd),
        Command::Remove(cmd) => handle_remove(&config, &data_file, &cmd),
        Command::Export(cmd) => handle_export(&config, &data_file, &cmd),
        Command::Check => handle_check(&data_file),
        Command::Stats(cmd) => handle_stats(&data_file, cmd.json),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load the data file, logging any rejected records.
fn open_catalog(path: &Path) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    let report = catalog
        .load_from_path(path)
        .with_context(|| format!("loading flights from {}", path.display()))?;
    if !report.is_clean() {
        warn!(
            "{} invalid record(s) skipped in {}",
            report.rejected_count(),
            path.display()
        );
    }
    Ok(catalog)
}

fn handle_search(config: &Config, data_file: &Path, cmd: &SearchCommand) -> Result<()> {
    let catalog = open_catalog(data_file)?;
    let found = match &cmd.query {
        SearchQuery::Airline { airline } => catalog.search_by_airline(airline),
        SearchQuery::Delayed => catalog.search_delayed(),
        SearchQuery::Date { date } => catalog.search_by_departure_date(*date),
        SearchQuery::Range {
            from,
            to,
            destination,
        } => catalog.search_by_time_range_and_destination(*from, *to, destination),
        SearchQuery::Arrivals { at } => catalog.search_recent_arrivals(*at),
    };
    show(config, cmd.format, &found)
}

fn handle_add(config: &Config, data_file: &Path, cmd: AddCommand) -> Result<()> {
    let mut catalog = open_catalog(data_file)?;

    let mut record = FlightRecord::new(
        cmd.flight_number,
        cmd.airline,
        cmd.destination,
        cmd.departure,
        cmd.arrival,
        cmd.status.into(),
    )
    .with_aircraft_type(cmd.aircraft)
    .with_terminal(cmd.terminal);
    if let Some(duration) = cmd.duration {
        record = record.with_duration(duration);
    }
    if !flightcatalog::validate(&record) {
        warn!(
            flight_number = %record.flight_number,
            "Added flight would be rejected when this file is loaded again"
        );
    }

    let number = record.flight_number.clone();
    catalog.add(record);
    let output = cmd.output.unwrap_or_else(|| config.export_file());
    save(&catalog, &output)?;
    println!("Added {number}; {} flight(s) written to {}", catalog.len(), output.display());
    Ok(())
}

fn handle_remove(config: &Config, data_file: &Path, cmd: &RemoveCommand) -> Result<()> {
    let mut catalog = open_catalog(data_file)?;
    if catalog.remove(&cmd.flight_number) {
        println!("Removed {}", cmd.flight_number);
    } else {
        println!("No flight {} in catalog", cmd.flight_number);
    }

    let output = cmd.output.clone().unwrap_or_else(|| config.export_file());
    save(&catalog, &output)?;
    println!("{} flight(s) written to {}", catalog.len(), output.display());
    Ok(())
}

fn handle_export(config: &Config, data_file: &Path, cmd: &ExportCommand) -> Result<()> {
    let catalog = open_catalog(data_file)?;
    let output = cmd.output.clone().unwrap_or_else(|| config.export_file());

    let pretty = config.catalog.pretty;
    if output == Path::new("-") {
        println!("{}", catalog.render_document(pretty)?);
    } else {
        catalog
            .write_document(&output, pretty)
            .with_context(|| format!("writing flights to {}", output.display()))?;
    }
    Ok(())
}

fn handle_check(data_file: &Path) -> Result<()> {
    let mut catalog = Catalog::new();
    let report = catalog
        .load_from_path(data_file)
        .with_context(|| format!("loading flights from {}", data_file.display()))?;
    print_report(data_file, &report);
    Ok(())
}

fn print_report(path: &Path, report: &LoadReport) {
    println!("{}", path.display());
    println!("  Accepted:  {}", report.accepted);
    println!("  Rejected:  {}", report.rejected_count());
    for rejected in &report.rejected {
        println!(
            "    #{:<4} {:<8} {}",
            rejected.index,
            rejected.flight_number.as_deref().unwrap_or("?"),
            rejected.reason
        );
    }
}

fn handle_stats(data_file: &Path, json: bool) -> Result<()> {
    let catalog = open_catalog(data_file)?;
    let stats = catalog.stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Catalog Statistics");
        println!("==================");
        println!("Flights:           {}", stats.total_flights);
        for (status, count) in &stats.by_status {
            println!("  {:<16} {count}", format!("{status}:"));
        }
        if let (Some(first), Some(last)) = (stats.earliest_departure, stats.latest_departure) {
            println!("Earliest departure: {first}");
            println!("Latest departure:   {last}");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Catalog]");
                println!("  Data file:          {}", config.data_file().display());
                println!("  Export file:        {}", config.export_file().display());
                println!("  Pretty JSON:        {}", config.catalog.pretty);
                println!();
                println!("[Display]");
                println!("  Page size:          {}", config.display.page_size);
                println!("  Timestamp format:   {}", config.display.timestamp_format);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn save(catalog: &Catalog, path: &Path) -> Result<()> {
    catalog
        .save_to_path(path)
        .with_context(|| format!("saving flights to {}", path.display()))
}

/// Print records in the requested format, paging on a terminal.
fn show(config: &Config, format: OutputFormat, records: &[FlightRecord]) -> Result<()> {
    let layout = &config.display.timestamp_format;
    let (header, rows) = match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
            return Ok(());
        }
        OutputFormat::Plain => (
            Vec::new(),
            records
                .iter()
                .map(|r| display::render_line(r, layout))
                .collect::<Vec<_>>(),
        ),
        OutputFormat::Table => display::render_table(records, layout),
    };

    if rows.is_empty() {
        println!("No flights found.");
        return Ok(());
    }

    let stdout = io::stdout();
    let page_size = if stdout.is_terminal() && io::stdin().is_terminal() {
        config.page_size()
    } else {
        None
    };
    let mut pager = Pager::new(io::stdin().lock(), stdout.lock(), page_size);
    pager.show(&header, &rows)?;
    pager.into_output().flush()?;
    Ok(())
}
