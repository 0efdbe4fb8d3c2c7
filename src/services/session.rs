//! Reconciliation session orchestration
//!
//! Owns the pipeline state for one run: parse, classify one record at a time,
//! check recurring expectations, validate, and write the monthly sheet.
//! Decisions and confirmations come in through callbacks; the session never
//! talks to a terminal itself.

use std::path::PathBuf;

use tracing::info;

use crate::config::BudgetSheetConfig;
use crate::error::ReconcileResult;
use crate::models::{ClassifiedExpense, ExpenseRecord};
use crate::services::classify::{CategoryDecision, Classifier};
use crate::services::partition::partition;
use crate::services::recurring::{self, RecurringReport};
use crate::services::{classify, parser};
use crate::sheet::{plan_sheet, BudgetSheetWriter};

/// High-level orchestration for collecting and reconciling expenses
pub struct ReconciliationSession<'a> {
    config: &'a BudgetSheetConfig,
    expenses: Vec<ExpenseRecord>,
    classified: Vec<ClassifiedExpense>,
}

impl<'a> ReconciliationSession<'a> {
    pub fn new(config: &'a BudgetSheetConfig) -> Self {
        Self {
            config,
            expenses: Vec::new(),
            classified: Vec::new(),
        }
    }

    pub fn config(&self) -> &BudgetSheetConfig {
        self.config
    }

    /// Confirm with the user before mutating the budget workbook
    ///
    /// Returns true without asking when the configuration skips the prompt.
    pub fn confirm_budget_sheet(&self, confirm: impl FnOnce(&BudgetSheetConfig) -> bool) -> bool {
        if !self.config.prompt_user_before_commit {
            return true;
        }
        confirm(self.config)
    }

    /// Read the CSV inputs and expand the session's expense list
    pub fn load_transactions(&mut self, csv_files: &[PathBuf]) -> ReconcileResult<usize> {
        let loaded = parser::load_expenses(csv_files)?;
        info!(files = csv_files.len(), records = loaded.len(), "transactions loaded");
        self.expenses.extend(loaded);
        Ok(self.expenses.len())
    }

    /// The loaded, not yet classified records
    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    /// Classify every loaded record, strictly in order
    ///
    /// `decide` is called once per record with the record and the category
    /// options, and must return a decision that resolves against the
    /// configured set (the collaborator re-prompts until it does). Each
    /// record is committed before the next one is offered. On failure the
    /// collected in-memory state is discarded.
    pub fn classify_all<F>(&mut self, mut decide: F) -> ReconcileResult<()>
    where
        F: FnMut(&ExpenseRecord, &[String]) -> ReconcileResult<CategoryDecision>,
    {
        let classifier = Classifier::new(self.config);
        let options = classifier.category_options();

        let records = std::mem::take(&mut self.expenses);
        let mut classified = Vec::with_capacity(records.len());
        for record in records {
            let decision = decide(&record, &options)?;
            let classification = classifier.classify(&decision)?;
            classified.push(ClassifiedExpense::new(record, classification));
        }

        info!(records = classified.len(), "records classified");
        self.classified = classified;
        Ok(())
    }

    /// The classified records
    pub fn classified(&self) -> &[ClassifiedExpense] {
        &self.classified
    }

    /// Compare configured recurring expectations with the classified records
    pub fn build_recurring_report(&self) -> RecurringReport {
        recurring::build_report(&self.classified, &self.config.recurring_expectations)
    }

    /// Run the pre-write validations
    pub fn validate(&self) -> ReconcileResult<()> {
        classify::validate_income_signs(&self.classified)
    }

    /// Persist the reconciliation results to the workbook
    ///
    /// Validation must pass first; the write refuses to run otherwise.
    pub fn write_budget_sheet(&self) -> ReconcileResult<PathBuf> {
        self.validate()?;

        let sections = partition(&self.classified);
        let plan = plan_sheet(&self.config.month, &sections);
        let writer = BudgetSheetWriter::new(&self.config.workbook_path);
        writer.write(&plan)?;
        Ok(self.config.workbook_path.clone())
    }
}

impl std::fmt::Debug for ReconciliationSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationSession")
            .field("month", &self.config.month)
            .field("expenses", &self.expenses.len())
            .field("classified", &self.classified.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReconcileError;
    use crate::models::Money;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn config(dir: &TempDir) -> BudgetSheetConfig {
        BudgetSheetConfig::new(dir.path().join("budget.xlsx"), "2025-09")
            .with_categories(vec!["Food".into()])
            .with_recurring_expectations(vec![("Rent".into(), Money::from_cents(150000))])
    }

    #[test]
    fn test_full_pipeline_writes_the_workbook() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let file = csv_file(
            "Date,Description,Amount\n09/01/2025,Groceries,42.50\n09/02/2025,Paycheck,(500.00)\n",
        );

        let mut session = ReconciliationSession::new(&config);
        session
            .load_transactions(&[file.path().to_path_buf()])
            .unwrap();
        assert_eq!(session.expenses().len(), 2);

        session
            .classify_all(|record, options| {
                assert!(options.contains(&"Recurring".to_string()));
                Ok(if record.description == "Paycheck" {
                    CategoryDecision::category("Income")
                } else {
                    CategoryDecision::category("Food")
                })
            })
            .unwrap();

        assert!(session.validate().is_ok());
        let written = session.write_budget_sheet().unwrap();
        assert!(written.exists());
    }

    #[test]
    fn test_confirm_skipped_when_prompting_disabled() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir).with_prompt_before_commit(false);
        let session = ReconciliationSession::new(&config);
        // The callback must not run at all
        assert!(session.confirm_budget_sheet(|_| panic!("prompted")));
    }

    #[test]
    fn test_confirm_passes_through_the_answer() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let session = ReconciliationSession::new(&config);
        assert!(session.confirm_budget_sheet(|_| true));
        assert!(!session.confirm_budget_sheet(|_| false));
    }

    #[test]
    fn test_write_blocked_by_income_sign_violation() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let file = csv_file("Date,Description,Amount\n09/02/2025,Refund,30.00\n");

        let mut session = ReconciliationSession::new(&config);
        session
            .load_transactions(&[file.path().to_path_buf()])
            .unwrap();
        session
            .classify_all(|_, _| Ok(CategoryDecision::category("Income")))
            .unwrap();

        let err = session.write_budget_sheet().unwrap_err();
        assert!(err.is_validation());
        assert!(!config.workbook_path.exists());
    }

    #[test]
    fn test_recurring_report_reflects_classification() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let file = csv_file("Date,Description,Amount\n09/01/2025,ACME Property,500.00\n");

        let mut session = ReconciliationSession::new(&config);
        session
            .load_transactions(&[file.path().to_path_buf()])
            .unwrap();
        session
            .classify_all(|_, _| Ok(CategoryDecision::recurring("rent")))
            .unwrap();

        let report = session.build_recurring_report();
        let status = &report.statuses()[0];
        assert_eq!(status.satisfied, Money::from_cents(50000));
        assert_eq!(status.missing, Money::from_cents(100000));
        assert!(report.has_outstanding());
    }

    #[test]
    fn test_decision_error_discards_state() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let file = csv_file("Date,Description,Amount\n09/01/2025,Something,10.00\n");

        let mut session = ReconciliationSession::new(&config);
        session
            .load_transactions(&[file.path().to_path_buf()])
            .unwrap();
        let err = session
            .classify_all(|_, _| Err(ReconcileError::Io("stdin closed".into())))
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Io(_)));
        assert!(session.expenses().is_empty());
        assert!(session.classified().is_empty());
    }
}
