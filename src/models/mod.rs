//! Core data models for reconcile-cli
//!
//! This module contains the data structures that represent the reconciliation
//! domain: money amounts, expense records, and classifications.

pub mod expense;
pub mod money;

pub use expense::{Classification, ClassifiedExpense, ExpenseRecord};
pub use money::{Money, MoneyParseError};
