//! Recurring expectation tracking
//!
//! Compares the configured expected monthly amounts against what the loaded
//! expenses actually satisfied. The report is advisory: the collaborator
//! decides whether outstanding expectations block the commit.

use crate::models::{ClassifiedExpense, Money};

/// The state of one configured recurring key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringStatus {
    /// The configured recurring key
    pub key: String,

    /// The expected monthly amount
    pub expected: Money,

    /// Sum of the amounts of matching expenses
    pub satisfied: Money,

    /// Expected minus satisfied; negative means overpaid
    pub missing: Money,
}

impl RecurringStatus {
    /// Whether this expectation still has money outstanding
    ///
    /// Keys registered without an expected amount carry a zero expectation
    /// and are never outstanding.
    pub fn is_outstanding(&self) -> bool {
        self.expected.is_positive() && self.missing.is_positive()
    }
}

/// Per-key recurring expectation results for one session
#[derive(Debug, Clone, Default)]
pub struct RecurringReport {
    statuses: Vec<RecurringStatus>,
}

impl RecurringReport {
    /// All statuses, in configuration order
    pub fn statuses(&self) -> &[RecurringStatus] {
        &self.statuses
    }

    /// The statuses that still have money outstanding
    pub fn outstanding(&self) -> impl Iterator<Item = &RecurringStatus> {
        self.statuses.iter().filter(|s| s.is_outstanding())
    }

    pub fn has_outstanding(&self) -> bool {
        self.statuses.iter().any(|s| s.is_outstanding())
    }
}

/// Build the recurring report for the given expenses
///
/// An expense counts toward a key when it is classified as that recurring
/// key. Payments are a separate classification and can never match, so
/// transfers never satisfy an expectation.
pub fn build_report(
    expenses: &[ClassifiedExpense],
    expectations: &[(String, Money)],
) -> RecurringReport {
    let statuses = expectations
        .iter()
        .map(|(key, expected)| {
            let satisfied: Money = expenses
                .iter()
                .filter(|e| e.classification().recurring_key() == Some(key.as_str()))
                .map(|e| e.record().amount)
                .sum();
            RecurringStatus {
                key: key.clone(),
                expected: *expected,
                satisfied,
                missing: *expected - satisfied,
            }
        })
        .collect();

    RecurringReport { statuses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, ExpenseRecord};
    use chrono::NaiveDate;

    fn expense(amount_cents: i64, classification: Classification) -> ClassifiedExpense {
        ClassifiedExpense::new(
            ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                "Test",
                Money::from_cents(amount_cents),
            ),
            classification,
        )
    }

    fn rent(amount_cents: i64) -> ClassifiedExpense {
        expense(amount_cents, Classification::Recurring { key: "Rent".into() })
    }

    fn expectations() -> Vec<(String, Money)> {
        vec![("Rent".to_string(), Money::from_cents(10000))]
    }

    #[test]
    fn test_fully_satisfied() {
        let report = build_report(&[rent(10000)], &expectations());
        let status = &report.statuses()[0];
        assert_eq!(status.satisfied, Money::from_cents(10000));
        assert_eq!(status.missing, Money::zero());
        assert!(!status.is_outstanding());
        assert!(!report.has_outstanding());
    }

    #[test]
    fn test_partially_satisfied() {
        let report = build_report(&[rent(4000)], &expectations());
        let status = &report.statuses()[0];
        assert_eq!(status.satisfied, Money::from_cents(4000));
        assert_eq!(status.missing, Money::from_cents(6000));
        assert!(status.is_outstanding());
    }

    #[test]
    fn test_no_matching_records() {
        let report = build_report(&[], &expectations());
        let status = &report.statuses()[0];
        assert_eq!(status.satisfied, Money::zero());
        assert_eq!(status.missing, Money::from_cents(10000));
        assert!(status.is_outstanding());
    }

    #[test]
    fn test_overpaid_goes_negative() {
        let report = build_report(&[rent(12000)], &expectations());
        let status = &report.statuses()[0];
        assert_eq!(status.missing, Money::from_cents(-2000));
        assert!(!status.is_outstanding());
    }

    #[test]
    fn test_payments_never_satisfy() {
        // A transfer covering the rent amount still leaves the expectation open
        let report = build_report(
            &[expense(10000, Classification::Payment)],
            &expectations(),
        );
        let status = &report.statuses()[0];
        assert_eq!(status.satisfied, Money::zero());
        assert!(status.is_outstanding());
    }

    #[test]
    fn test_other_keys_do_not_count() {
        let gym = expense(5000, Classification::Recurring { key: "Gym".into() });
        let report = build_report(&[gym], &expectations());
        assert_eq!(report.statuses()[0].satisfied, Money::zero());
    }

    #[test]
    fn test_zero_expectation_is_never_outstanding() {
        let expectations = vec![("Gym".to_string(), Money::zero())];
        let report = build_report(&[], &expectations);
        assert!(!report.statuses()[0].is_outstanding());
        assert!(!report.has_outstanding());
    }
}
