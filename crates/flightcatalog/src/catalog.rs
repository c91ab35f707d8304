//! In-memory flight catalog.
//!
//! The [`Catalog`] owns an ordered sequence of [`FlightRecord`]s and answers
//! the search queries over it. Loading and saving documents lives in
//! [`crate::document`].

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::record::{FlightRecord, FlightStatus};

/// Width, in minutes, of the window used by [`Catalog::search_recent_arrivals`].
pub const RECENT_ARRIVAL_WINDOW_MINUTES: i64 = 60;

/// Ordered, owning collection of flight records.
///
/// No uniqueness is enforced on flight numbers. Searches return owned copies
/// sorted by the relevant timestamp; ties keep catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    flights: Vec<FlightRecord>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether the catalog holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Records in catalog order.
    #[must_use]
    pub fn records(&self) -> &[FlightRecord] {
        &self.flights
    }

    /// Iterate records in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, FlightRecord> {
        self.flights.iter()
    }

    /// Append a record. No validation or duplicate check is performed.
    pub fn add(&mut self, record: FlightRecord) {
        debug!(flight_number = %record.flight_number, "Adding flight");
        self.flights.push(record);
    }

    /// Append many records in order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = FlightRecord>) {
        self.flights.extend(records);
    }

    /// Remove the first record whose flight number equals `flight_number`.
    ///
    /// Returns `true` if a record was removed. A missing flight is not an error.
    pub fn remove(&mut self, flight_number: &str) -> bool {
        match self
            .flights
            .iter()
            .position(|f| f.flight_number == flight_number)
        {
            Some(index) => {
                self.flights.remove(index);
                debug!(flight_number, index, "Removed flight");
                true
            }
            None => {
                debug!(flight_number, "No flight to remove");
                false
            }
        }
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.flights.clear();
    }

    /// Flights operated by `airline` (exact match), by departure.
    #[must_use]
    pub fn search_by_airline(&self, airline: &str) -> Vec<FlightRecord> {
        self.select_by_departure(|f| f.airline == airline)
    }

    /// Flights with status [`FlightStatus::Delayed`], by departure.
    #[must_use]
    pub fn search_delayed(&self) -> Vec<FlightRecord> {
        self.select_by_departure(|f| f.status == FlightStatus::Delayed)
    }

    /// Flights departing on `date`, by departure. Time of day is ignored.
    #[must_use]
    pub fn search_by_departure_date(&self, date: NaiveDate) -> Vec<FlightRecord> {
        self.select_by_departure(|f| f.departure_date() == date)
    }

    /// Flights to `destination` departing within `[start, end]`, by departure.
    #[must_use]
    pub fn search_by_time_range_and_destination(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        destination: &str,
    ) -> Vec<FlightRecord> {
        self.select_by_departure(|f| {
            f.departure_time >= start && f.departure_time <= end && f.destination == destination
        })
    }

    /// Flights arriving within the hour ending at `reference`, by arrival.
    ///
    /// The window is `[reference - 1h, reference]`, both ends inclusive, and
    /// is derived from `reference` alone. Earlier versions of this query took
    /// a second "end" timestamp that was never used; it was dropped rather
    /// than given a meaning, so callers wanting an arbitrary range must filter
    /// themselves. Near the start of the representable calendar the window
    /// is clamped to [`NaiveDateTime::MIN`].
    #[must_use]
    pub fn search_recent_arrivals(&self, reference: NaiveDateTime) -> Vec<FlightRecord> {
        let start = reference
            .checked_sub_signed(Duration::minutes(RECENT_ARRIVAL_WINDOW_MINUTES))
            .unwrap_or(NaiveDateTime::MIN);
        let mut found = self.select(|f| f.arrival_time >= start && f.arrival_time <= reference);
        found.sort_by_key(|f| f.arrival_time);
        found
    }

    /// Summary counts over the current records.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        let mut by_status = BTreeMap::new();
        for flight in &self.flights {
            *by_status.entry(flight.status).or_insert(0) += 1;
        }

        CatalogStats {
            total_flights: self.flights.len(),
            by_status,
            earliest_departure: self.flights.iter().map(|f| f.departure_time).min(),
            latest_departure: self.flights.iter().map(|f| f.departure_time).max(),
        }
    }

    fn select(&self, predicate: impl Fn(&FlightRecord) -> bool) -> Vec<FlightRecord> {
        self.flights
            .iter()
            .filter(|f| predicate(f))
            .cloned()
            .collect()
    }

    fn select_by_departure(&self, predicate: impl Fn(&FlightRecord) -> bool) -> Vec<FlightRecord> {
        let mut found = self.select(predicate);
        found.sort_by_key(|f| f.departure_time);
        found
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a FlightRecord;
    type IntoIter = std::slice::Iter<'a, FlightRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<FlightRecord> for Catalog {
    fn from_iter<I: IntoIterator<Item = FlightRecord>>(iter: I) -> Self {
        Self {
            flights: iter.into_iter().collect(),
        }
    }
}

/// Statistics about the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    /// Total number of records.
    pub total_flights: usize,
    /// Record count per status; statuses with no records are absent.
    pub by_status: BTreeMap<FlightStatus, usize>,
    /// Earliest departure across all records.
    pub earliest_departure: Option<NaiveDateTime>,
    /// Latest departure across all records.
    pub latest_departure: Option<NaiveDateTime>,
}
