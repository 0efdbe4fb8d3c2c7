//! Classification rules
//!
//! Maps an externally supplied category choice onto a [`Classification`].
//! The interactive collaborator re-prompts on rejected input; this layer only
//! ever stores choices that resolve against the configured category set.

use crate::config::{BudgetSheetConfig, ReservedCategory};
use crate::error::{ReconcileError, ReconcileResult};
use crate::models::{Classification, ClassifiedExpense};

/// A category choice for one record, as collected by the collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDecision {
    /// The chosen category name (reserved or custom, any casing)
    pub category: String,

    /// The chosen recurring key, required when the category is "Recurring"
    pub recurring_key: Option<String>,
}

impl CategoryDecision {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            recurring_key: None,
        }
    }

    pub fn recurring(key: impl Into<String>) -> Self {
        Self {
            category: ReservedCategory::Recurring.name().to_string(),
            recurring_key: Some(key.into()),
        }
    }
}

/// Applies the classification rules for one session's configuration
pub struct Classifier<'a> {
    config: &'a BudgetSheetConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a BudgetSheetConfig) -> Self {
        Self { config }
    }

    /// The category names offered to the collaborator, in prompt order
    ///
    /// Reserved categories come first; "Recurring" is only offered when
    /// recurring keys are configured. Custom categories follow in config
    /// order.
    pub fn category_options(&self) -> Vec<String> {
        let mut options: Vec<String> = ReservedCategory::ALL
            .into_iter()
            .filter(|r| *r != ReservedCategory::Recurring || self.config.has_recurring())
            .map(|r| r.name().to_string())
            .collect();
        options.extend(self.config.categories.iter().cloned());
        options
    }

    /// Resolve a decision into a classification
    ///
    /// Matching is case-insensitive; the canonical spelling from the
    /// configuration is what gets stored.
    pub fn classify(&self, decision: &CategoryDecision) -> ReconcileResult<Classification> {
        if let Some(reserved) = ReservedCategory::resolve(&decision.category) {
            return match reserved {
                ReservedCategory::Income => Ok(Classification::Income),
                ReservedCategory::Payment => Ok(Classification::Payment),
                ReservedCategory::Miscellaneous => Ok(Classification::Miscellaneous),
                ReservedCategory::Recurring => self.classify_recurring(decision),
            };
        }

        match self.config.resolve_category(&decision.category) {
            Some(canonical) => Ok(Classification::Regular {
                category: canonical.to_string(),
            }),
            None => Err(ReconcileError::category_not_found(&decision.category)),
        }
    }

    fn classify_recurring(&self, decision: &CategoryDecision) -> ReconcileResult<Classification> {
        if !self.config.has_recurring() {
            return Err(ReconcileError::Config(
                "No recurring expenses are configured".into(),
            ));
        }
        let key = decision.recurring_key.as_deref().ok_or_else(|| {
            ReconcileError::Validation("A recurring expense requires a recurring key".into())
        })?;
        match self.config.resolve_recurring_key(key) {
            Some(canonical) => Ok(Classification::Recurring {
                key: canonical.to_string(),
            }),
            None => Err(ReconcileError::recurring_key_not_found(key)),
        }
    }
}

/// Check the income sign invariant before anything is written
///
/// Income reduces the outstanding spend ledger, so every income transaction
/// must carry a negative amount. Violations block the write and are reported
/// with the full offending record list.
pub fn validate_income_signs(expenses: &[ClassifiedExpense]) -> ReconcileResult<()> {
    let offenders: Vec<&ClassifiedExpense> = expenses
        .iter()
        .filter(|e| e.classification().is_income() && !e.record().amount.is_negative())
        .collect();

    if offenders.is_empty() {
        return Ok(());
    }

    let mut message =
        String::from("Income transactions must have negative amounts; offending records:\n");
    for expense in offenders {
        message.push_str(&format!("  {}\n", expense.record()));
    }
    Err(ReconcileError::Validation(message))
}
