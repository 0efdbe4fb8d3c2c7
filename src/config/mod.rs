//! Session configuration for reconcile-cli
//!
//! A [`BudgetSheetConfig`] captures everything decided before a reconciliation
//! session starts: the target workbook, the month label, the allowed custom
//! categories, and the expected recurring charges. Custom categories and
//! recurring expectations can be loaded from a JSON file via
//! [`CategoryConfig`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ReconcileError, ReconcileResult};
use crate::models::Money;

/// Category names with built-in classification behavior
///
/// These are case-insensitively reserved; a config file that redefines one of
/// them fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservedCategory {
    Income,
    Payment,
    Miscellaneous,
    Recurring,
}

impl ReservedCategory {
    /// All reserved categories, in prompt order
    pub const ALL: [ReservedCategory; 4] = [
        ReservedCategory::Income,
        ReservedCategory::Payment,
        ReservedCategory::Miscellaneous,
        ReservedCategory::Recurring,
    ];

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Payment => "Payment",
            Self::Miscellaneous => "Miscellaneous",
            Self::Recurring => "Recurring",
        }
    }

    /// Resolve a name case-insensitively to a reserved category
    pub fn resolve(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Immutable session configuration for editing one budget workbook
#[derive(Debug, Clone)]
pub struct BudgetSheetConfig {
    /// Path to the workbook that will be written
    pub workbook_path: PathBuf,

    /// Month label, used as the sheet name (must be unique per workbook)
    pub month: String,

    /// Allowed custom categories, in configured order (reserved names excluded)
    pub categories: Vec<String>,

    /// Expected monthly amount per recurring key
    pub recurring_expectations: Vec<(String, Money)>,

    /// Whether to ask for confirmation before writing the workbook
    pub prompt_user_before_commit: bool,
}

impl BudgetSheetConfig {
    /// Create a configuration with no custom categories or recurring keys
    pub fn new(workbook_path: impl Into<PathBuf>, month: impl Into<String>) -> Self {
        Self {
            workbook_path: workbook_path.into(),
            month: month.into(),
            categories: Vec::new(),
            recurring_expectations: Vec::new(),
            prompt_user_before_commit: true,
        }
    }

    /// Set the allowed custom categories
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Set the recurring expectations
    pub fn with_recurring_expectations(mut self, expectations: Vec<(String, Money)>) -> Self {
        self.recurring_expectations = expectations;
        self
    }

    /// Skip or require the pre-write confirmation prompt
    pub fn with_prompt_before_commit(mut self, prompt: bool) -> Self {
        self.prompt_user_before_commit = prompt;
        self
    }

    /// Whether any recurring keys are configured
    pub fn has_recurring(&self) -> bool {
        !self.recurring_expectations.is_empty()
    }

    /// The configured recurring keys, in order
    pub fn recurring_keys(&self) -> Vec<&str> {
        self.recurring_expectations
            .iter()
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Resolve a recurring key case-insensitively to its canonical spelling
    pub fn resolve_recurring_key(&self, key: &str) -> Option<&str> {
        self.recurring_expectations
            .iter()
            .map(|(k, _)| k.as_str())
            .find(|k| k.eq_ignore_ascii_case(key.trim()))
    }

    /// Resolve a custom category case-insensitively to its canonical spelling
    pub fn resolve_category(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .map(String::as_str)
            .find(|c| c.eq_ignore_ascii_case(name.trim()))
    }

    /// Validate the configuration before a session starts
    ///
    /// Checks the month label against xlsx sheet-name rules and the custom
    /// categories against the reserved set.
    pub fn validate(&self) -> ReconcileResult<()> {
        let month = self.month.trim();
        if month.is_empty() {
            return Err(ReconcileError::Config("Month label is empty".into()));
        }
        if month.len() > 31 {
            return Err(ReconcileError::Config(format!(
                "Month label '{}' exceeds the 31-character sheet name limit",
                month
            )));
        }
        if let Some(bad) = month.chars().find(|c| "[]:*?/\\".contains(*c)) {
            return Err(ReconcileError::Config(format!(
                "Month label '{}' contains '{}', which is not allowed in a sheet name",
                month, bad
            )));
        }

        validate_custom_categories(&self.categories)?;
        Ok(())
    }
}

/// Reject custom categories that collide with reserved names or each other
fn validate_custom_categories(categories: &[String]) -> ReconcileResult<()> {
    let mut seen: Vec<String> = Vec::new();
    for name in categories {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ReconcileError::Config("Empty category name".into()));
        }
        if let Some(reserved) = ReservedCategory::resolve(trimmed) {
            return Err(ReconcileError::Config(format!(
                "Category '{}' collides with the reserved category '{}'",
                trimmed,
                reserved.name()
            )));
        }
        let lower = trimmed.to_lowercase();
        if seen.contains(&lower) {
            return Err(ReconcileError::Config(format!(
                "Duplicate category '{}'",
                trimmed
            )));
        }
        seen.push(lower);
    }
    Ok(())
}

/// On-disk shape of the optional JSON config file
///
/// Recurring charges come in two forms: a bare list of keys
/// (`recurring_expenses`) or a key-to-expected-amount map
/// (`recurring_expectations`). When both are present the map wins.
#[derive(Debug, Default, Deserialize)]
struct CategoryConfigFile {
    #[serde(default)]
    categories: Vec<String>,

    #[serde(default)]
    recurring_expenses: Vec<String>,

    #[serde(default)]
    recurring_expectations: Option<BTreeMap<String, f64>>,
}

/// Custom categories and recurring expectations loaded from a JSON file
#[derive(Debug, Clone, Default)]
pub struct CategoryConfig {
    pub categories: Vec<String>,
    pub recurring_expectations: Vec<(String, Money)>,
}

impl CategoryConfig {
    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> ReconcileResult<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ReconcileError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let file: CategoryConfigFile = serde_json::from_str(&raw).map_err(|e| {
            ReconcileError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        validate_custom_categories(&file.categories)?;

        let recurring_expectations = match file.recurring_expectations {
            Some(map) => map
                .into_iter()
                .map(|(key, amount)| (key, Money::from_dollars(amount)))
                .collect(),
            // List form registers the keys with no expected amount
            None => file
                .recurring_expenses
                .into_iter()
                .map(|key| (key, Money::zero()))
                .collect(),
        };

        Ok(Self {
            categories: file.categories,
            recurring_expectations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_reserved_resolution_is_case_insensitive() {
        assert_eq!(
            ReservedCategory::resolve("income"),
            Some(ReservedCategory::Income)
        );
        assert_eq!(
            ReservedCategory::resolve("  MISCELLANEOUS "),
            Some(ReservedCategory::Miscellaneous)
        );
        assert_eq!(ReservedCategory::resolve("Groceries"), None);
    }

    #[test]
    fn test_load_with_expectations_map() {
        let file = write_config(
            r#"{
                "categories": ["Food", "Housing"],
                "recurring_expectations": {"Rent": 1500.0, "Gym": 75.5}
            }"#,
        );
        let config = CategoryConfig::load(file.path()).unwrap();
        assert_eq!(config.categories, vec!["Food", "Housing"]);
        assert_eq!(config.recurring_expectations.len(), 2);
        assert!(config
            .recurring_expectations
            .iter()
            .any(|(k, v)| k == "Rent" && *v == Money::from_cents(150000)));
        assert!(config
            .recurring_expectations
            .iter()
            .any(|(k, v)| k == "Gym" && *v == Money::from_cents(7550)));
    }

    #[test]
    fn test_load_with_key_list() {
        let file = write_config(r#"{"recurring_expenses": ["Rent", "Gym"]}"#);
        let config = CategoryConfig::load(file.path()).unwrap();
        assert_eq!(
            config.recurring_expectations,
            vec![
                ("Rent".to_string(), Money::zero()),
                ("Gym".to_string(), Money::zero())
            ]
        );
    }

    #[test]
    fn test_load_rejects_reserved_category() {
        let file = write_config(r#"{"categories": ["Food", "income"]}"#);
        let err = CategoryConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ReconcileError::Config(_)));
        assert!(err.to_string().contains("Income"));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let file = write_config("{not json");
        let err = CategoryConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ReconcileError::Config(_)));
    }

    #[test]
    fn test_validate_month_label() {
        let ok = BudgetSheetConfig::new("budget.xlsx", "2025-09");
        assert!(ok.validate().is_ok());

        let empty = BudgetSheetConfig::new("budget.xlsx", "  ");
        assert!(empty.validate().is_err());

        let slash = BudgetSheetConfig::new("budget.xlsx", "09/2025");
        assert!(slash.validate().is_err());

        let long = BudgetSheetConfig::new("budget.xlsx", "a".repeat(32));
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_validate_duplicate_categories() {
        let config = BudgetSheetConfig::new("budget.xlsx", "2025-09")
            .with_categories(vec!["Food".into(), "food".into()]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn test_resolvers_are_case_insensitive() {
        let config = BudgetSheetConfig::new("budget.xlsx", "2025-09")
            .with_categories(vec!["Food".into()])
            .with_recurring_expectations(vec![("Rent".into(), Money::from_cents(150000))]);

        assert_eq!(config.resolve_category("FOOD"), Some("Food"));
        assert_eq!(config.resolve_category("housing"), None);
        assert_eq!(config.resolve_recurring_key("rent"), Some("Rent"));
        assert_eq!(config.resolve_recurring_key("gym"), None);
        assert!(config.has_recurring());
    }
}
