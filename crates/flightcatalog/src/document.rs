//! JSON document loading and saving for the [`Catalog`].
//!
//! Input documents are objects of the form `{"flights": [...]}`. Loading is
//! two-staged: the document shape is checked first and a failure there leaves
//! the catalog untouched; each array element is then decoded and validated on
//! its own, and bad elements are skipped and reported in the [`LoadReport`].
//!
//! Output is a bare JSON array of records, pretty-printed unless a compact
//! rendering is asked for.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::record::FlightRecord;
use crate::validate::{self, Rejection};

/// Name of the array field in an input document.
pub const FLIGHTS_FIELD: &str = "flights";

#[derive(Deserialize)]
struct FlightDocument {
    flights: Vec<Value>,
}

/// A document element that did not make it into the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position of the element in the `flights` array.
    pub index: usize,
    /// The element's flight number, if it had a readable one.
    pub flight_number: Option<String>,
    /// Why it was refused.
    pub reason: Rejection,
}

/// Outcome of a successful document load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of records appended to the catalog.
    pub accepted: usize,
    /// Elements that were skipped, in document order.
    pub rejected: Vec<RejectedRecord>,
}

impl LoadReport {
    /// Number of skipped elements.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Whether every element was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl Catalog {
    /// Append the valid records of a `{"flights": [...]}` document.
    ///
    /// Valid records are appended in document order. Invalid ones are skipped
    /// and listed in the returned report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDocument`] if the text is not JSON, is not an
    /// object, or lacks a `flights` array. The catalog is unchanged in that case.
    pub fn load_from_document(&mut self, json: &str) -> Result<LoadReport> {
        let document: FlightDocument =
            serde_json::from_str(json).map_err(|e| Error::malformed(e.to_string()))?;

        let mut accepted = Vec::with_capacity(document.flights.len());
        let mut rejected = Vec::new();

        for (index, element) in document.flights.into_iter().enumerate() {
            let flight_number = element
                .get("flightNumber")
                .and_then(Value::as_str)
                .map(str::to_string);

            let outcome = serde_json::from_value::<FlightRecord>(element)
                .map_err(|e| Rejection::Unreadable {
                    message: e.to_string(),
                })
                .and_then(|record| validate::check(&record).map(|()| record));

            match outcome {
                Ok(record) => accepted.push(record),
                Err(reason) => {
                    warn!(index, flight_number = ?flight_number, %reason, "Invalid flight record skipped");
                    rejected.push(RejectedRecord {
                        index,
                        flight_number,
                        reason,
                    });
                }
            }
        }

        let report = LoadReport {
            accepted: accepted.len(),
            rejected,
        };
        self.extend(accepted);

        info!(
            accepted = report.accepted,
            rejected = report.rejected_count(),
            "Flights loaded"
        );
        Ok(report)
    }

    /// Read a document from `path` and load it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileRead`] if the file can't be read, otherwise as
    /// [`Catalog::load_from_document`].
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        debug!("Reading flights from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_from_document(&text)
    }

    /// Render every record, in catalog order, as a pretty-printed JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if rendering fails; no partial output
    /// is ever returned.
    pub fn serialize_to_document(&self) -> Result<String> {
        self.render_document(true)
    }

    /// Render every record as a JSON array, pretty-printed or on one line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if rendering fails.
    pub fn render_document(&self, pretty: bool) -> Result<String> {
        let rendered = if pretty {
            serde_json::to_string_pretty(self.records())
        } else {
            serde_json::to_string(self.records())
        };
        rendered.map_err(Error::Serialization)
    }

    /// Serialize the catalog and write it to `path`, pretty-printed.
    ///
    /// Parent directories are created as needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileWrite`] if the file or its directory can't be
    /// written, or [`Error::Serialization`] as for
    /// [`Catalog::serialize_to_document`].
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        self.write_document(path, true)
    }

    /// Write the catalog to `path` in the chosen rendering.
    ///
    /// # Errors
    ///
    /// As for [`Catalog::save_to_path`].
    pub fn write_document(&self, path: impl AsRef<Path>, pretty: bool) -> Result<()> {
        let path = path.as_ref();
        let text = self.render_document(pretty)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::FileWrite {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        fs::write(path, text).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
        info!(count = self.len(), pretty, "Flights saved to {}", path.display());
        Ok(())
    }
}
