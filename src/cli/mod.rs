//! CLI command handling
//!
//! Bridges clap argument parsing and the interactive prompts with the
//! session layer. Every decision (category, recurring key, confirmations)
//! is collected here and handed to the core; rejected input is re-prompted
//! and never reaches the session.

use std::path::PathBuf;

use clap::Parser;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

use crate::config::{BudgetSheetConfig, CategoryConfig};
use crate::display;
use crate::error::{ReconcileError, ReconcileResult};
use crate::services::{CategoryDecision, ReconciliationSession};

/// Reconcile CSV expense exports against a monthly budget workbook
///
/// Each run writes a fresh workbook containing one sheet named after the
/// month label; sheets from a previous file are not carried over.
#[derive(Debug, Parser)]
#[command(name = "reconcile", version)]
pub struct ReconcileArgs {
    /// Path to the budget workbook that will be written
    #[arg(short = 'w', long)]
    pub workbook_path: PathBuf,

    /// JSON file with custom categories and recurring expenses
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip the confirmation prompt before writing
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Month label, used as the sheet name (e.g. "2025-09")
    pub month: String,

    /// CSV files to reconcile, in order
    #[arg(required = true)]
    pub csv_files: Vec<PathBuf>,
}

/// Run a full reconciliation from parsed arguments
pub fn run(args: ReconcileArgs) -> ReconcileResult<()> {
    let loaded = match &args.config {
        Some(path) => CategoryConfig::load(path)?,
        None => CategoryConfig::default(),
    };

    let config = BudgetSheetConfig::new(args.workbook_path, args.month)
        .with_categories(loaded.categories)
        .with_recurring_expectations(loaded.recurring_expectations)
        .with_prompt_before_commit(!args.yes);
    config.validate()?;

    let mut session = ReconciliationSession::new(&config);

    let confirmed = session.confirm_budget_sheet(|config| {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Write changes to {} for {}?",
                config.workbook_path.display(),
                config.month
            ))
            .default(false)
            .interact()
            .unwrap_or(false)
    });
    if !confirmed {
        println!("No changes were made.");
        return Ok(());
    }

    let count = session.load_transactions(&args.csv_files)?;
    println!("Loaded {} transactions.", count);

    let theme = ColorfulTheme::default();
    let recurring_keys: Vec<String> = config
        .recurring_keys()
        .into_iter()
        .map(str::to_string)
        .collect();
    let total = session.expenses().len();
    let mut index = 0usize;

    session.classify_all(|record, options| {
        println!("{}", display::format_expense_prompt(record, index, total));
        index += 1;

        let choice = Select::with_theme(&theme)
            .with_prompt("Category")
            .items(options)
            .default(0)
            .interact()
            .map_err(prompt_error)?;
        let category = options[choice].clone();

        if category == "Recurring" {
            let key_choice = Select::with_theme(&theme)
                .with_prompt("Recurring expense")
                .items(&recurring_keys)
                .default(0)
                .interact()
                .map_err(prompt_error)?;
            return Ok(CategoryDecision::recurring(recurring_keys[key_choice].clone()));
        }

        Ok(CategoryDecision::category(category))
    })?;

    let report = session.build_recurring_report();
    if !report.statuses().is_empty() {
        print!("{}", display::format_recurring_report(&report));
    }
    if report.has_outstanding() {
        let proceed = Confirm::with_theme(&theme)
            .with_prompt("Some recurring expenses are not fully satisfied. Continue anyway?")
            .default(false)
            .interact()
            .map_err(prompt_error)?;
        if !proceed {
            println!("No changes were made.");
            return Ok(());
        }
    }

    session.validate()?;
    let target = session.write_budget_sheet()?;
    println!("Reconciliation written to {}", target.display());
    Ok(())
}

fn prompt_error(err: dialoguer::Error) -> ReconcileError {
    ReconcileError::Io(format!("Prompt failed: {}", err))
}
