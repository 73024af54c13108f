//! Parser for line-oriented chat exports.
//!
//! Each record looks like `D.M.Y H:M:S,User: message body`. Only the comma
//! and the first colon after it are structural; the datestamp is scanned
//! leniently and never decides on its own whether a line is accepted,
//! unless strict timestamps are requested.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::aggregation::Histogram;
use crate::models::Message;


/// Nested optional groups: the scan stops at the first field that does not match.
/// Only ASCII digits count as numeric.
static DATESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([+-]?[0-9]+)(?:\.([+-]?[0-9]+)(?:\.([+-]?[0-9]+)(?:\s+([+-]?[0-9]+)(?::([+-]?[0-9]+)(?::([+-]?[0-9]+))?)?)?)?)?",
    )
    .expect("datestamp pattern compiles")
});


/// One of the six numeric fields of a datestamp, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampField {
    Day,
    Month,
    Year,
    Hour,
    Minute,
    Second,
}


impl TimestampField {
    const SCAN_ORDER: [TimestampField; 6] = [
        TimestampField::Day,
        TimestampField::Month,
        TimestampField::Year,
        TimestampField::Hour,
        TimestampField::Minute,
        TimestampField::Second,
    ];

    fn name(&self) -> &'static str {
        match self {
            TimestampField::Day => "day",
            TimestampField::Month => "month",
            TimestampField::Year => "year",
            TimestampField::Hour => "hour",
            TimestampField::Minute => "minute",
            TimestampField::Second => "second",
        }
    }
}


/// A datestamp field that could not be read and was left at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDefect {
    Missing(TimestampField),
    OutOfRange(TimestampField, String),
}


impl fmt::Display for FieldDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefect::Missing(field) => write!(f, "{} missing", field.name()),
            FieldDefect::OutOfRange(field, raw) => {
                write!(f, "{} '{}' out of range", field.name(), raw)
            }
        }
    }
}


/// Why a line was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("malformed record at line {line_number}, no comma after the datestamp: {line}")]
    MissingComma { line_number: usize, line: String },

    #[error("malformed record at line {line_number}, no colon after the user name: {line}")]
    MissingColon { line_number: usize, line: String },

    #[error("malformed record at line {line_number}, {} unreadable datestamp field(s): {line}", .defects.len())]
    InvalidTimestamp {
        line_number: usize,
        line: String,
        defects: Vec<FieldDefect>,
    },
}


/// A successfully parsed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    pub message: Message,
    /// Datestamp fields that were zero-filled.
    pub defects: Vec<FieldDefect>,
}


/// Options for turning lines into records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Reject records whose datestamp had any defect instead of counting them.
    pub strict_timestamps: bool,
}


/// Totals for one pass over an input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub lines_read: usize,
    pub records_counted: usize,
    pub malformed: usize,
    /// Records counted despite a defective datestamp.
    pub zero_filled: usize,
}


/// Parse a single line. `line_number` is 1-based and only used for reporting.
pub fn parse_line(line: &str, line_number: usize, options: ParseOptions) -> Result<ParsedRecord, RecordError> {
    let (fields, defects) = scan_datestamp(line);

    let Some((_, payload)) = line.split_once(',') else {
        return Err(RecordError::MissingComma {
            line_number,
            line: line.to_string(),
        });
    };

    let Some((user, body)) = payload.split_once(':') else {
        return Err(RecordError::MissingColon {
            line_number,
            line: line.to_string(),
        });
    };

    if options.strict_timestamps && !defects.is_empty() {
        return Err(RecordError::InvalidTimestamp {
            line_number,
            line: line.to_string(),
            defects,
        });
    }

    let [day, month, year, hour, minute, second] = fields;

    Ok(ParsedRecord {
        message: Message {
            body: body.to_string(),
            user: user.to_string(),
            day,
            month,
            year,
            hour,
            minute,
            second,
        },
        defects,
    })
}


/// Scan the leading `D.M.Y H:M:S` datestamp.
///
/// Fields after the first mismatch are reported missing; fields that do not
/// fit an `i32` are reported out of range. Both stay zero.
fn scan_datestamp(line: &str) -> ([i32; 6], Vec<FieldDefect>) {
    let mut fields = [0i32; 6];
    let mut defects = Vec::new();
    let captures = DATESTAMP.captures(line);

    for (idx, field) in TimestampField::SCAN_ORDER.into_iter().enumerate() {
        let raw = captures.as_ref().and_then(|c| c.get(idx + 1)).map(|m| m.as_str());

        match raw {
            Some(raw) => match raw.parse::<i32>() {
                Ok(value) => fields[idx] = value,
                Err(_) => defects.push(FieldDefect::OutOfRange(field, raw.to_string())),
            },
            None => defects.push(FieldDefect::Missing(field)),
        }
    }

    (fields, defects)
}


/// Parse every line of `reader` and count the valid records into `histogram`.
///
/// Malformed lines and lines that are not valid UTF-8 are logged and
/// skipped. Only a failing read aborts the pass.
pub fn ingest_reader<R: BufRead>(
    reader: R,
    histogram: &mut Histogram,
    options: ParseOptions,
) -> std::io::Result<IngestReport> {
    let mut report = IngestReport::default();

    for (idx, chunk) in reader.split(b'\n').enumerate() {
        let line_number = idx + 1;
        let bytes = chunk?;
        report.lines_read += 1;

        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line.strip_suffix('\r').unwrap_or(line),
            Err(e) => {
                warn!(line_number, error = %e, "skipping line that is not valid UTF-8");
                report.malformed += 1;
                continue;
            }
        };

        match parse_line(line, line_number, options) {
            Ok(record) => {
                if !record.defects.is_empty() {
                    let defects: Vec<String> = record.defects.iter().map(ToString::to_string).collect();
                    debug!(line_number, defects = %defects.join(", "), "datestamp zero-filled");
                    report.zero_filled += 1;
                }
                histogram.count(&record.message);
                report.records_counted += 1;
            }
            Err(e) => {
                warn!(line_number, line, "discarding {e}");
                report.malformed += 1;
            }
        }
    }

    Ok(report)
}


/// Open `file_path` and ingest it line by line.
pub fn ingest_file(file_path: &Path, histogram: &mut Histogram, options: ParseOptions) -> Result<IngestReport> {
    let file = File::open(file_path)
        .with_context(|| format!("Unable to access file: {}", file_path.display()))?;

    ingest_reader(BufReader::new(file), histogram, options)
        .with_context(|| format!("Failed reading {}", file_path.display()))
}
