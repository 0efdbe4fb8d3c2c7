//! Display formatting for terminal output
//!
//! Formats expense records and the recurring report for the interactive
//! prompts and end-of-run summaries.

use colored::Colorize;

use crate::models::ExpenseRecord;
use crate::services::recurring::RecurringReport;

/// Format one record as the header line of its classification prompt
pub fn format_expense_prompt(record: &ExpenseRecord, index: usize, total: usize) -> String {
    let source = record
        .source_name()
        .map(|name| format!("  ({})", name))
        .unwrap_or_default();

    format!(
        "[{}/{}] {}  {:30} {:>12}{}",
        index + 1,
        total,
        record.date.format("%Y-%m-%d"),
        truncate(&record.description, 30),
        record.amount.to_string(),
        source
    )
}

/// Format the recurring expectation report
///
/// Outstanding keys are highlighted; satisfied ones listed plainly.
pub fn format_recurring_report(report: &RecurringReport) -> String {
    if report.statuses().is_empty() {
        return String::new();
    }

    let mut output = String::from("Recurring expenses:\n");
    for status in report.statuses() {
        let line = format!(
            "  {:20} expected {:>10}  satisfied {:>10}",
            truncate(&status.key, 20),
            status.expected.to_string(),
            status.satisfied.to_string(),
        );
        if status.is_outstanding() {
            output.push_str(&format!(
                "{}  {} missing\n",
                line.red(),
                status.missing.to_string().red().bold()
            ));
        } else {
            output.push_str(&line);
            output.push('\n');
        }
    }
    output
}

/// Truncate a string to a maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, ClassifiedExpense, Money};
    use crate::services::recurring::build_report;
    use chrono::NaiveDate;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long description", 10), "a very ...");
    }

    #[test]
    fn test_format_expense_prompt() {
        let record = ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            "Test Merchant",
            Money::from_cents(12345),
        )
        .with_source("/tmp/checking.csv");

        let line = format_expense_prompt(&record, 0, 2);
        assert!(line.starts_with("[1/2] 2025-09-01"));
        assert!(line.contains("Test Merchant"));
        assert!(line.contains("$123.45"));
        assert!(line.contains("(checking.csv)"));
    }

    #[test]
    fn test_format_recurring_report_lists_every_key() {
        colored::control::set_override(false);

        let rent = ClassifiedExpense::new(
            ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                "ACME Property",
                Money::from_cents(50000),
            ),
            Classification::Recurring { key: "Rent".into() },
        );
        let expectations = vec![
            ("Rent".to_string(), Money::from_cents(150000)),
            ("Gym".to_string(), Money::zero()),
        ];
        let report = build_report(&[rent], &expectations);

        let text = format_recurring_report(&report);
        assert!(text.contains("Rent"));
        assert!(text.contains("$1500.00"));
        assert!(text.contains("$500.00"));
        assert!(text.contains("missing"));
        assert!(text.contains("Gym"));
    }

    #[test]
    fn test_empty_report_formats_to_nothing() {
        let report = build_report(&[], &[]);
        assert_eq!(format_recurring_report(&report), "");
    }
}
