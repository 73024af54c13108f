//! CSV tables of per-user counts, one row per bucket.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::aggregation::{Histogram, HistogramError, UserCounts};
use crate::models::{TimeBucket, Weekday};


/// Which end points of the observed range the absolute-hour table covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// From the first observed hour up to, but not including, the last one.
    #[default]
    HalfOpen,
    /// From the first observed hour through the last one.
    Closed,
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    pub counts: Vec<u64>,
}


impl Row {
    fn new(label: String, users: &[String], counts: Option<&UserCounts>) -> Self {
        let counts = users
            .iter()
            .map(|user| counts.and_then(|c| c.get(user)).copied().unwrap_or(0))
            .collect();
        Self { label, counts }
    }
}


/// Something that can be written out as a CSV table.
pub trait CsvTable {
    /// Write header and rows, returning the number of rows written.
    fn write_csv<W: Write>(self, writer: W) -> io::Result<usize>;
}


/// A dense bucket-by-user table over a small fixed domain.
/// Columns follow the histogram's user order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub label_header: String,
    pub users: Vec<String>,
    pub rows: Vec<Row>,
}


impl Table {
    fn new(label_header: &str, histogram: &Histogram) -> Self {
        Self {
            label_header: label_header.to_string(),
            users: histogram.users().map(String::from).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, label: String, counts: Option<&UserCounts>) {
        let row = Row::new(label, &self.users, counts);
        self.rows.push(row);
    }
}


impl CsvTable for &Table {
    fn write_csv<W: Write>(self, mut writer: W) -> io::Result<usize> {
        write_header(&mut writer, &self.label_header, &self.users)?;
        for row in &self.rows {
            write_row(&mut writer, row)?;
        }
        Ok(self.rows.len())
    }
}


/// Hour-by-hour rows between the first and last observed message.
///
/// Rows are produced on demand, so a span covering centuries costs no more
/// memory than a single row.
#[derive(Debug, Clone)]
pub struct HourlySpan<'a> {
    histogram: &'a Histogram,
    users: Vec<String>,
    next: Option<TimeBucket>,
    end: TimeBucket,
    policy: RangePolicy,
}


impl Iterator for HourlySpan<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let bucket = self.next?;
        let in_range = match self.policy {
            RangePolicy::HalfOpen => bucket.is_before(&self.end),
            RangePolicy::Closed => bucket <= self.end,
        };
        if !in_range {
            self.next = None;
            return None;
        }

        self.next = bucket.succ();
        Some(Row::new(
            bucket.to_string(),
            &self.users,
            self.histogram.by_absolute_hour().get(&bucket),
        ))
    }
}


impl CsvTable for HourlySpan<'_> {
    fn write_csv<W: Write>(self, mut writer: W) -> io::Result<usize> {
        write_header(&mut writer, "Timestamp", &self.users)?;
        let mut written = 0;
        for row in self {
            write_row(&mut writer, &row)?;
            written += 1;
        }
        Ok(written)
    }
}


/// Messages per hour of day, `00:00` through `23:00`.
///
/// Hours outside 0..=23 are still counted by the histogram but have no row.
pub fn hour_of_day_table(histogram: &Histogram) -> Table {
    let mut table = Table::new("Hour", histogram);
    for hour in 0..24 {
        table.push(format!("{hour:02}:00"), histogram.by_hour_of_day().get(&hour));
    }
    table
}


/// Messages per weekday, Sunday first.
pub fn weekday_table(histogram: &Histogram) -> Table {
    let mut table = Table::new("Weekday", histogram);
    for day in Weekday::ALL {
        table.push(day.name().to_string(), histogram.by_weekday().get(&day));
    }
    table
}


/// Messages per hour across the whole log, with silent hours filled as zero.
pub fn absolute_hour_span(histogram: &Histogram, policy: RangePolicy) -> Result<HourlySpan<'_>, HistogramError> {
    let (start, end) = histogram.bucket_range()?;

    Ok(HourlySpan {
        histogram,
        users: histogram.users().map(String::from).collect(),
        next: Some(start),
        end,
        policy,
    })
}


/// Write `table` to `output_path`, replacing any existing file.
/// Returns the number of rows written.
pub fn write_csv_file<T: CsvTable>(table: T, output_path: &Path) -> Result<usize> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    let rows = table
        .write_csv(&mut writer)
        .and_then(|rows| writer.flush().map(|()| rows))
        .with_context(|| format!("Failed to write CSV to {}", output_path.display()))?;

    Ok(rows)
}


/// Header row. User names are trimmed.
fn write_header<W: Write>(writer: &mut W, label_header: &str, users: &[String]) -> io::Result<()> {
    let mut header = vec![escape(label_header)];
    header.extend(users.iter().map(|user| escape(user.trim())));
    writeln!(writer, "{}", header.join(","))
}


fn write_row<W: Write>(writer: &mut W, row: &Row) -> io::Result<()> {
    let mut cells = vec![escape(&row.label)];
    cells.extend(row.counts.iter().map(u64::to_string));
    writeln!(writer, "{}", cells.join(","))
}


fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
