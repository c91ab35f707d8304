//! Rendering of flight records for the terminal.
//!
//! Nothing here touches the catalog; it only formats records handed to it and
//! pages the result onto any writer.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use chrono::NaiveDateTime;

use crate::record::{timespan, FlightRecord};

/// Prompt shown between pages.
pub const MORE_PROMPT: &str = "Press Enter for more...";

const TABLE_HEADERS: [&str; 9] = [
    "FLIGHT",
    "AIRLINE",
    "DESTINATION",
    "DEPARTURE",
    "ARRIVAL",
    "STATUS",
    "DURATION",
    "AIRCRAFT",
    "TERMINAL",
];

/// Format `ts` with a strftime `layout`, falling back to ISO form if the
/// layout can't be rendered.
#[must_use]
pub fn format_timestamp(ts: &NaiveDateTime, layout: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(layout)).is_err() {
        return ts.format("%Y-%m-%dT%H:%M:%S").to_string();
    }
    out
}

/// One-line summary: `number - airline - destination - departure - arrival - status`.
#[must_use]
pub fn render_line(record: &FlightRecord, layout: &str) -> String {
    format!(
        "{} - {} - {} - {} - {} - {}",
        record.flight_number,
        record.airline,
        record.destination,
        format_timestamp(&record.departure_time, layout),
        format_timestamp(&record.arrival_time, layout),
        record.status
    )
}

/// Aligned table: a header line, a rule, then one line per record.
///
/// Returns `(header, rows)` so a pager can repeat the header on each page.
#[must_use]
pub fn render_table(records: &[FlightRecord], layout: &str) -> (Vec<String>, Vec<String>) {
    let cells: Vec<[String; 9]> = records
        .iter()
        .map(|r| {
            [
                r.flight_number.clone(),
                r.airline.clone(),
                r.destination.clone(),
                format_timestamp(&r.departure_time, layout),
                format_timestamp(&r.arrival_time, layout),
                r.status.to_string(),
                timespan::format(&r.duration),
                r.aircraft_type.clone(),
                r.terminal.clone(),
            ]
        })
        .collect();

    let mut widths = TABLE_HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let join = |row: &[&str]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<w$}", w = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header = vec![
        join(&TABLE_HEADERS),
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    ];
    let rows = cells
        .iter()
        .map(|row| join(&row.iter().map(String::as_str).collect::<Vec<_>>()))
        .collect();

    (header, rows)
}

/// Writes lines in pages, waiting for a line of input between pages.
///
/// When the input is exhausted the remaining lines are written without
/// further prompts.
#[derive(Debug)]
pub struct Pager<R, W> {
    input: R,
    output: W,
    page_size: Option<usize>,
}

impl<R: BufRead, W: Write> Pager<R, W> {
    /// Create a pager. `None` writes everything at once.
    pub fn new(input: R, output: W, page_size: Option<usize>) -> Self {
        Self {
            input,
            output,
            page_size,
        }
    }

    /// Write `rows`, repeating `header` at the top of every page.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the reader or writer.
    pub fn show(&mut self, header: &[String], rows: &[String]) -> io::Result<()> {
        let page_size = match self.page_size {
            Some(size) if size > 0 && rows.len() > size => size,
            _ => return self.write_page(header, rows),
        };

        let mut pages = rows.chunks(page_size).peekable();
        while let Some(page) = pages.next() {
            self.write_page(header, page)?;
            if pages.peek().is_none() {
                break;
            }

            writeln!(self.output, "{MORE_PROMPT}")?;
            self.output.flush()?;
            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                for rest in pages.by_ref() {
                    self.write_lines(rest)?;
                }
                break;
            }
        }
        Ok(())
    }

    /// Give back the writer.
    pub fn into_output(self) -> W {
        self.output
    }

    fn write_page(&mut self, header: &[String], rows: &[String]) -> io::Result<()> {
        self.write_lines(header)?;
        self.write_lines(rows)
    }

    fn write_lines(&mut self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{parse_timestamp, FlightStatus};

    const LAYOUT: &str = "%Y-%m-%d %H:%M";

    fn record(number: &str) -> FlightRecord {
        FlightRecord::new(
            number,
            "MAU",
            "Odesa",
            parse_timestamp("2023-03-07T06:00:00").unwrap(),
            parse_timestamp("2023-03-07T07:30:00").unwrap(),
            FlightStatus::Delayed,
        )
        .with_aircraft_type("B738")
        .with_terminal("D")
    }

    fn lines(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("row {i}")).collect()
    }

    fn run_pager(input: &str, page_size: Option<usize>, header: &[String], rows: &[String]) -> String {
        let mut pager = Pager::new(input.as_bytes(), Vec::new(), page_size);
        pager.show(header, rows).unwrap();
        String::from_utf8(pager.into_output()).unwrap()
    }

    #[test]
    fn test_render_line() {
        assert_eq!(
            render_line(&record("MA100"), LAYOUT),
            "MA100 - MAU - Odesa - 2023-03-07 06:00 - 2023-03-07 07:30 - Delayed"
        );
    }

    #[test]
    fn test_format_timestamp_fallback() {
        let ts = parse_timestamp("2023-03-07T06:00:00").unwrap();
        assert_eq!(format_timestamp(&ts, "%H:%M"), "06:00");
        assert_eq!(format_timestamp(&ts, "%Q"), "2023-03-07T06:00:00");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let (header, rows) = render_table(&[record("MA100"), record("MA2")], LAYOUT);
        assert_eq!(header.len(), 2);
        assert!(header[0].starts_with("FLIGHT  AIRLINE  DESTINATION"));
        assert!(header[1].starts_with("------  -------"));
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("MA100   MAU      Odesa"));
        assert!(rows[0].contains("01:30:00"));
        assert!(rows[1].starts_with("MA2     MAU"));
        assert!(rows[0].ends_with('D'));
    }

    #[test]
    fn test_render_table_empty() {
        let (header, rows) = render_table(&[], LAYOUT);
        assert_eq!(header.len(), 2);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_pager_without_paging() {
        let out = run_pager("", None, &[], &lines(3));
        assert_eq!(out, "row 1\nrow 2\nrow 3\n");
    }

    #[test]
    fn test_pager_short_output_not_paged() {
        let out = run_pager("", Some(5), &["H".to_string()], &lines(3));
        assert_eq!(out, "H\nrow 1\nrow 2\nrow 3\n");
    }

    #[test]
    fn test_pager_prompts_between_pages() {
        let out = run_pager("\n\n", Some(2), &["H".to_string()], &lines(5));
        assert_eq!(
            out,
            format!("H\nrow 1\nrow 2\n{MORE_PROMPT}\nH\nrow 3\nrow 4\n{MORE_PROMPT}\nH\nrow 5\n")
        );
    }

    #[test]
    fn test_pager_dumps_rest_on_eof() {
        let out = run_pager("", Some(2), &[], &lines(5));
        assert_eq!(
            out,
            format!("row 1\nrow 2\n{MORE_PROMPT}\nrow 3\nrow 4\nrow 5\n")
        );
    }
}
