//! Core record types for flightcatalog.
//!
//! This module defines [`FlightRecord`] and [`FlightStatus`], plus the text
//! codecs used for their timestamps and elapsed-time spans.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Operational status of a flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FlightStatus {
    /// Departing or arriving as scheduled.
    OnTime,
    /// Running behind schedule.
    Delayed,
    /// Will not operate.
    Cancelled,
    /// Passengers are boarding.
    Boarding,
    /// Airborne.
    InFlight,
}

impl FlightStatus {
    /// All statuses, indexed by their ordinal.
    pub const ALL: [Self; 5] = [
        Self::OnTime,
        Self::Delayed,
        Self::Cancelled,
        Self::Boarding,
        Self::InFlight,
    ];

    /// Serialized names, in ordinal order.
    pub const NAMES: &'static [&'static str] =
        &["OnTime", "Delayed", "Cancelled", "Boarding", "InFlight"];

    /// The serialized name of this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Look up a status by its numeric ordinal.
    #[must_use]
    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown flight status: {s}"))
    }
}

// Accepts the variant name or its ordinal; older exports wrote enums as integers.
impl<'de> Deserialize<'de> for FlightStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StatusVisitor;

        impl<'de> Visitor<'de> for StatusVisitor {
            type Value = FlightStatus;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flight status name or ordinal 0-4")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<FlightStatus, E> {
                v.parse()
                    .map_err(|_| E::unknown_variant(v, FlightStatus::NAMES))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<FlightStatus, E> {
                FlightStatus::from_ordinal(v)
                    .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}

/// A single flight entry.
///
/// `duration` is stored alongside the two timestamps and is not derived from
/// them; see [`crate::validate`] for when the two are required to agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightRecord {
    /// Two letters followed by three digits, e.g. `AB123`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flight_number: String,

    /// Operating airline.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub airline: String,

    /// Destination name or code.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub destination: String,

    /// Scheduled departure, local time.
    pub departure_time: NaiveDateTime,

    /// Scheduled arrival, local time.
    pub arrival_time: NaiveDateTime,

    /// Current status.
    pub status: FlightStatus,

    /// Elapsed flight time.
    #[serde(with = "timespan")]
    pub duration: Duration,

    /// Aircraft model, free-form.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub aircraft_type: String,

    /// Departure terminal, free-form.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub terminal: String,
}

impl FlightRecord {
    /// Create a record whose duration is the span between its timestamps.
    ///
    /// Aircraft type and terminal start empty.
    #[must_use]
    pub fn new(
        flight_number: impl Into<String>,
        airline: impl Into<String>,
        destination: impl Into<String>,
        departure_time: NaiveDateTime,
        arrival_time: NaiveDateTime,
        status: FlightStatus,
    ) -> Self {
        Self {
            flight_number: flight_number.into(),
            airline: airline.into(),
            destination: destination.into(),
            departure_time,
            arrival_time,
            status,
            duration: arrival_time - departure_time,
            aircraft_type: String::new(),
            terminal: String::new(),
        }
    }

    /// Replace the stored duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the aircraft type.
    #[must_use]
    pub fn with_aircraft_type(mut self, aircraft_type: impl Into<String>) -> Self {
        self.aircraft_type = aircraft_type.into();
        self
    }

    /// Set the terminal.
    #[must_use]
    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = terminal.into();
        self
    }

    /// Span between departure and arrival, independent of `duration`.
    #[must_use]
    pub fn scheduled_span(&self) -> Duration {
        self.arrival_time - self.departure_time
    }

    /// Calendar date of departure.
    #[must_use]
    pub fn departure_date(&self) -> NaiveDate {
        self.departure_time.date()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a naive local timestamp such as `2023-01-01T10:00:00`.
///
/// A space may replace the `T`, and seconds may be omitted.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] if no accepted layout matches.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| Error::invalid_timestamp(input))
}

/// Parse a calendar date such as `2023-01-01`.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if the input is not `YYYY-MM-DD`.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: input.to_string(),
    })
}

/// Text codec for elapsed time: `[-][d.]hh:mm:ss[.fffffff]`.
///
/// Used as `#[serde(with = "timespan")]` on [`FlightRecord::duration`].
pub mod timespan {
    use std::sync::OnceLock;

    use chrono::Duration;
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::error::{Error, Result};

    const NANOS_PER_TICK: i64 = 100;

    fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            Regex::new(r"^(-)?(?:(\d+)\.)?(\d{1,2}):(\d{1,2}):(\d{1,2})(?:\.(\d{1,9}))?$")
                .unwrap_or_else(|e| unreachable!("time-span pattern is valid: {e}"))
        })
    }

    /// Parse a time span such as `02:00:00` or `1.02:30:00.5`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDuration`] on malformed input or out-of-range
    /// hour/minute/second fields.
    pub fn parse(input: &str) -> Result<Duration> {
        let invalid = || Error::invalid_duration(input);
        let caps = pattern().captures(input.trim()).ok_or_else(invalid)?;

        let field = |i: usize| -> Result<i64> {
            caps.get(i)
                .map_or(Ok(0), |m| m.as_str().parse::<i64>().map_err(|_| invalid()))
        };
        let (days, hours, minutes, seconds) = (field(2)?, field(3)?, field(4)?, field(5)?);
        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(invalid());
        }

        let nanos = match caps.get(6) {
            Some(m) => {
                let digits = m.as_str();
                let scale = 10_i64.pow(9 - u32::try_from(digits.len()).map_err(|_| invalid())?);
                digits.parse::<i64>().map_err(|_| invalid())? * scale
            }
            None => 0,
        };

        let span = Duration::try_days(days)
            .and_then(|d| d.checked_add(&Duration::hours(hours)))
            .and_then(|d| d.checked_add(&Duration::minutes(minutes)))
            .and_then(|d| d.checked_add(&Duration::seconds(seconds)))
            .and_then(|d| d.checked_add(&Duration::nanoseconds(nanos)))
            .ok_or_else(invalid)?;

        Ok(if caps.get(1).is_some() { -span } else { span })
    }

    /// Render a time span; days and fraction appear only when non-zero.
    #[must_use]
    pub fn format(span: &Duration) -> String {
        let sign = if *span < Duration::zero() { "-" } else { "" };
        let abs = span.abs();
        let total = abs.num_seconds();
        let (days, hours, minutes, seconds) =
            (total / 86_400, total / 3_600 % 24, total / 60 % 60, total % 60);

        let mut out = String::from(sign);
        if days > 0 {
            out.push_str(&format!("{days}."));
        }
        out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));

        let nanos = i64::from(abs.subsec_nanos());
        if nanos != 0 {
            if nanos % NANOS_PER_TICK == 0 {
                out.push_str(&format!(".{:07}", nanos / NANOS_PER_TICK));
            } else {
                out.push_str(&format!(".{nanos:09}"));
            }
        }
        out
    }

    /// Serde serializer for [`format`].
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(span: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(span))
    }

    /// Serde deserializer for [`parse`].
    ///
    /// # Errors
    ///
    /// Fails if the value is not a string in time-span form.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FlightStatus::OnTime.to_string(), "OnTime");
        assert_eq!(FlightStatus::InFlight.to_string(), "InFlight");
    }

    #[test]
    fn test_status_from_str_case_insensitive() {
        assert_eq!("delayed".parse::<FlightStatus>(), Ok(FlightStatus::Delayed));
        assert_eq!("BOARDING".parse::<FlightStatus>(), Ok(FlightStatus::Boarding));
        assert!("Diverted".parse::<FlightStatus>().is_err());
    }

    #[test]
    fn test_status_from_ordinal() {
        assert_eq!(FlightStatus::from_ordinal(0), Some(FlightStatus::OnTime));
        assert_eq!(FlightStatus::from_ordinal(4), Some(FlightStatus::InFlight));
        assert_eq!(FlightStatus::from_ordinal(5), None);
    }

    #[test]
    fn test_status_deserialize_name_and_ordinal() {
        let by_name: FlightStatus = serde_json::from_str(r#""Cancelled""#).unwrap();
        let by_ordinal: FlightStatus = serde_json::from_str("2").unwrap();
        assert_eq!(by_name, FlightStatus::Cancelled);
        assert_eq!(by_ordinal, FlightStatus::Cancelled);

        assert!(serde_json::from_str::<FlightStatus>("9").is_err());
        assert!(serde_json::from_str::<FlightStatus>(r#""Lost""#).is_err());
    }

    #[test]
    fn test_status_serializes_as_name() {
        assert_eq!(
            serde_json::to_string(&FlightStatus::Delayed).unwrap(),
            r#""Delayed""#
        );
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(ts("2023-01-01T10:00:00"), expected);
        assert_eq!(ts("2023-01-01 10:00:00"), expected);
        assert_eq!(ts("2023-01-01T10:00"), expected);
        assert_eq!(ts(" 2023-01-01 10:00 "), expected);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("tomorrow").unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { .. }));
        assert!(parse_timestamp("2023-02-30T10:00:00").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2023-03-07").unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 7).unwrap()
        );
        assert!(matches!(
            parse_date("07/03/2023"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_timespan_parse() {
        assert_eq!(timespan::parse("02:00:00").unwrap(), Duration::hours(2));
        assert_eq!(
            timespan::parse("1.02:30:00").unwrap(),
            Duration::days(1) + Duration::hours(2) + Duration::minutes(30)
        );
        assert_eq!(
            timespan::parse("-00:45:00").unwrap(),
            -Duration::minutes(45)
        );
        assert_eq!(
            timespan::parse("00:00:01.5").unwrap(),
            Duration::milliseconds(1500)
        );
    }

    #[test]
    fn test_timespan_parse_rejects_out_of_range() {
        assert!(timespan::parse("24:00:00").is_err());
        assert!(timespan::parse("10:60:00").is_err());
        assert!(timespan::parse("2h").is_err());
        assert!(timespan::parse("").is_err());
    }

    #[test]
    fn test_timespan_format() {
        assert_eq!(timespan::format(&Duration::hours(2)), "02:00:00");
        assert_eq!(
            timespan::format(&(Duration::days(1) + Duration::minutes(5))),
            "1.00:05:00"
        );
        assert_eq!(timespan::format(&-Duration::minutes(30)), "-00:30:00");
        assert_eq!(
            timespan::format(&Duration::milliseconds(1500)),
            "00:00:01.5000000"
        );
    }

    #[test]
    fn test_timespan_format_parse_agree() {
        for span in [
            Duration::zero(),
            Duration::seconds(59),
            Duration::hours(13) + Duration::nanoseconds(123),
            -(Duration::days(3) + Duration::seconds(1)),
        ] {
            assert_eq!(timespan::parse(&timespan::format(&span)).unwrap(), span);
        }
    }

    #[test]
    fn test_record_new_derives_duration() {
        let record = FlightRecord::new(
            "AB123",
            "Delta",
            "NYC",
            ts("2023-01-01T10:00:00"),
            ts("2023-01-01T12:30:00"),
            FlightStatus::OnTime,
        );
        assert_eq!(record.duration, Duration::minutes(150));
        assert_eq!(record.scheduled_span(), record.duration);
        assert!(record.aircraft_type.is_empty());
        assert_eq!(
            record.departure_date(),
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_record_json_field_names() {
        let record = FlightRecord::new(
            "AB123",
            "Delta",
            "NYC",
            ts("2023-01-01T10:00:00"),
            ts("2023-01-01T12:00:00"),
            FlightStatus::OnTime,
        )
        .with_aircraft_type("737")
        .with_terminal("1");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["flightNumber"], "AB123");
        assert_eq!(value["departureTime"], "2023-01-01T10:00:00");
        assert_eq!(value["arrivalTime"], "2023-01-01T12:00:00");
        assert_eq!(value["status"], "OnTime");
        assert_eq!(value["duration"], "02:00:00");
        assert_eq!(value["aircraftType"], "737");
        assert_eq!(value["terminal"], "1");
    }

    #[test]
    fn test_record_missing_or_null_strings_become_empty() {
        let json = r#"{
            "flightNumber": "AB123",
            "airline": null,
            "departureTime": "2023-01-01T10:00:00",
            "arrivalTime": "2023-01-01T12:00:00",
            "status": "OnTime",
            "duration": "02:00:00"
        }"#;
        let record: FlightRecord = serde_json::from_str(json).unwrap();
        assert!(record.airline.is_empty());
        assert!(record.destination.is_empty());
        assert!(record.terminal.is_empty());
    }

    #[test]
    fn test_record_missing_timestamp_fails() {
        let json = r#"{"flightNumber": "AB123", "status": "OnTime", "duration": "02:00:00"}"#;
        assert!(serde_json::from_str::<FlightRecord>(json).is_err());
    }
}
