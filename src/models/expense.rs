//! Expense record and classification models
//!
//! An [`ExpenseRecord`] is one parsed CSV transaction. Classification attaches
//! exactly one [`Classification`] to it, producing an immutable
//! [`ClassifiedExpense`] that validation and layout consume read-only.

use chrono::NaiveDate;
use std::fmt;
use std::path::{Path, PathBuf};

use super::money::Money;

/// One parsed transaction awaiting classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    /// Transaction date (no time component)
    pub date: NaiveDate,

    /// Free-text description, trimmed
    pub description: String,

    /// Signed amount; income is recorded as a negative amount
    pub amount: Money,

    /// The CSV file this record came from, if known
    pub source_file: Option<PathBuf>,
}

impl ExpenseRecord {
    /// Create a new expense record
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Money) -> Self {
        Self {
            date,
            description: description.into().trim().to_string(),
            amount,
            source_file: None,
        }
    }

    /// Attach the source file the record was parsed from
    pub fn with_source(mut self, source_file: impl Into<PathBuf>) -> Self {
        self.source_file = Some(source_file.into());
        self
    }

    /// Name of the source file, for display
    pub fn source_name(&self) -> Option<&str> {
        self.source_file
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:30} {:>12}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount.to_string()
        )
    }
}

/// The class a transaction belongs to, set exactly once per record
///
/// A closed set of variants rules out the inconsistent states that independent
/// boolean flags would allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A regular purchase in one of the configured categories
    Regular { category: String },

    /// Money coming in; the amount must be negative
    Income,

    /// A transfer that nets out and must not affect any totals
    Payment,

    /// A high-impact one-off that breaks the regular spending pattern
    Miscellaneous,

    /// An instance of a configured recurring charge
    Recurring { key: String },
}

impl Classification {
    /// The display label for this classification
    pub fn label(&self) -> &str {
        match self {
            Self::Regular { category } => category,
            Self::Income => "Income",
            Self::Payment => "Payment",
            Self::Miscellaneous => "Miscellaneous",
            Self::Recurring { .. } => "Recurring",
        }
    }

    pub fn is_income(&self) -> bool {
        matches!(self, Self::Income)
    }

    pub fn is_payment(&self) -> bool {
        matches!(self, Self::Payment)
    }

    pub fn is_miscellaneous(&self) -> bool {
        matches!(self, Self::Miscellaneous)
    }

    /// The configured recurring key, if this is a recurring expense
    pub fn recurring_key(&self) -> Option<&str> {
        match self {
            Self::Recurring { key } => Some(key),
            _ => None,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recurring { key } => write!(f, "Recurring ({})", key),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// An expense record with its classification attached
///
/// Constructed once by the classifier; fields are private so no later pass
/// can mutate either half.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedExpense {
    record: ExpenseRecord,
    classification: Classification,
}

impl ClassifiedExpense {
    /// Pair a record with its classification
    pub fn new(record: ExpenseRecord, classification: Classification) -> Self {
        Self {
            record,
            classification,
        }
    }

    pub fn record(&self) -> &ExpenseRecord {
        &self.record
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }
}
