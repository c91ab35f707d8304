//! Structural checks applied to records entering the catalog from a document.
//!
//! Records added directly through [`Catalog::add`](crate::Catalog::add) are
//! never checked.

use chrono::Duration;
use thiserror::Error;

use crate::record::FlightRecord;

/// Why a record was refused during a bulk load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Flight number is not two letters followed by three digits.
    #[error("invalid flight number '{flight_number}'")]
    InvalidFlightNumber {
        /// The offending value.
        flight_number: String,
    },

    /// Airline is empty or absent.
    #[error("airline is empty")]
    MissingAirline,

    /// Destination is empty or absent.
    #[error("destination is empty")]
    MissingDestination,

    /// Stored duration disagrees with the span between the timestamps.
    #[error("duration {stored} does not match departure-to-arrival span {expected}")]
    DurationMismatch {
        /// Arrival minus departure.
        expected: Duration,
        /// The duration on the record.
        stored: Duration,
    },

    /// The array element could not be decoded as a record at all.
    #[error("unreadable record: {message}")]
    Unreadable {
        /// Decoder message.
        message: String,
    },
}

/// Whether `record` may enter the catalog.
#[must_use]
pub fn validate(record: &FlightRecord) -> bool {
    check(record).is_ok()
}

/// Check `record` against each rule in turn, reporting the first failure.
///
/// # Errors
///
/// Returns the [`Rejection`] for the first rule the record breaks.
pub fn check(record: &FlightRecord) -> Result<(), Rejection> {
    if !is_valid_flight_number(&record.flight_number) {
        return Err(Rejection::InvalidFlightNumber {
            flight_number: record.flight_number.clone(),
        });
    }

    if record.airline.is_empty() {
        return Err(Rejection::MissingAirline);
    }

    if record.destination.is_empty() {
        return Err(Rejection::MissingDestination);
    }

    // Only enforced when arrival is after departure.
    if record.arrival_time > record.departure_time {
        let expected = record.scheduled_span();
        if expected != record.duration {
            return Err(Rejection::DurationMismatch {
                expected,
                stored: record.duration,
            });
        }
    }

    Ok(())
}

/// Two alphabetic characters then three ASCII digits, any letter case.
#[must_use]
pub fn is_valid_flight_number(flight_number: &str) -> bool {
    let chars: Vec<char> = flight_number.chars().collect();
    chars.len() == 5
        && chars[..2].iter().all(|c| c.is_alphabetic())
        && chars[2..].iter().all(char::is_ascii_digit)
}
