//! Monthly sheet layout and persistence
//!
//! `layout` plans the grid (pure, no I/O); `writer` maps a finished plan onto
//! an xlsx workbook.

pub mod layout;
pub mod writer;

pub use layout::{plan_sheet, SheetPlan};
pub use writer::BudgetSheetWriter;
