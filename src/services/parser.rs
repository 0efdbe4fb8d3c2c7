//! CSV transaction parser
//!
//! Turns raw CSV exports into typed [`ExpenseRecord`]s. Loading is fail-fast:
//! a single malformed row aborts the whole load and nothing is kept, so a
//! session never starts from a partially read file.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::debug;

use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{ExpenseRecord, Money};

/// Accepted date formats, tried in order
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// Column positions resolved from a header row
///
/// Header names are matched case-sensitively. A column that is absent yields
/// empty field values rather than an error; the field parsers decide whether
/// an empty value is acceptable.
#[derive(Debug, Clone, Copy, Default)]
struct HeaderColumns {
    date: Option<usize>,
    description: Option<usize>,
    amount: Option<usize>,
}

impl HeaderColumns {
    fn from_headers(headers: &StringRecord) -> Self {
        let mut columns = Self::default();
        for (idx, name) in headers.iter().enumerate() {
            match name.trim() {
                "Date" => columns.date = Some(idx),
                "Description" => columns.description = Some(idx),
                "Amount" => columns.amount = Some(idx),
                _ => {}
            }
        }
        columns
    }

    fn field<'r>(&self, record: &'r StringRecord, column: Option<usize>) -> &'r str {
        column
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .unwrap_or("")
    }
}

/// Load expense records from a sequence of CSV files
///
/// File order is preserved, and row order within each file is preserved.
pub fn load_expenses(paths: &[PathBuf]) -> ReconcileResult<Vec<ExpenseRecord>> {
    let mut expenses = Vec::new();
    for path in paths {
        let loaded = load_file(path)?;
        debug!(file = %path.display(), rows = loaded.len(), "parsed csv file");
        expenses.extend(loaded);
    }
    Ok(expenses)
}

fn load_file(path: &Path) -> ReconcileResult<Vec<ExpenseRecord>> {
    let file = File::open(path)
        .map_err(|e| ReconcileError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let headers = reader
        .headers()
        .map_err(|e| ReconcileError::Parse(format!("{}: {}", path.display(), e)))?
        .clone();
    let columns = HeaderColumns::from_headers(&headers);

    let mut expenses = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| ReconcileError::Parse(format!("{}: {}", path.display(), e)))?;

        let date = parse_date(columns.field(&record, columns.date))?;
        let description = columns.field(&record, columns.description);
        let amount = parse_amount(columns.field(&record, columns.amount))?;

        expenses.push(ExpenseRecord::new(date, description, amount).with_source(path));
    }
    Ok(expenses)
}

/// Parse a date string, trying the accepted formats in order
fn parse_date(s: &str) -> ReconcileResult<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(ReconcileError::Parse(format!(
        "Could not parse date: '{}'",
        s
    )))
}

/// Parse an amount string, handling comma grouping and parenthesized negatives
fn parse_amount(s: &str) -> ReconcileResult<Money> {
    Money::parse(s)
        .map_err(|e| ReconcileError::Parse(format!("Could not parse amount '{}': {}", s, e)))
}
