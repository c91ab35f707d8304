//! `flightcatalog` - An in-memory flight record catalog
//!
//! This library loads flight records from JSON documents, validates them,
//! answers search queries over the loaded set, and writes it back out as JSON.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod document;
pub mod error;
pub mod logging;
pub mod record;
pub mod validate;

pub use catalog::{Catalog, CatalogStats};
pub use config::Config;
pub use document::{LoadReport, RejectedRecord};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{FlightRecord, FlightStatus};
pub use validate::{validate, Rejection};
