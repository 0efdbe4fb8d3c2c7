//! Workbook persistence
//!
//! Maps a planned sheet onto an xlsx file. The workbook is only materialized
//! in the final save, so aborting anywhere earlier in the pipeline leaves the
//! target untouched. The library writes fresh files only: a run produces a
//! workbook containing the one month sheet, and existing sheets in a previous
//! file are not carried over.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Formula, Workbook};
use tracing::info;

use crate::error::ReconcileResult;
use crate::sheet::layout::{CellStyle, CellValue, SheetPlan};

/// Writes a [`SheetPlan`] to an xlsx workbook
pub struct BudgetSheetWriter {
    target_path: PathBuf,
}

impl BudgetSheetWriter {
    pub fn new(target_path: impl Into<PathBuf>) -> Self {
        Self {
            target_path: target_path.into(),
        }
    }

    /// The path the workbook will be written to
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Write the plan and save the workbook
    pub fn write(&self, plan: &SheetPlan) -> ReconcileResult<()> {
        let mut workbook = Workbook::new();

        let bold = Format::new().set_bold();
        let money = Format::new().set_num_format("#,##0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&plan.sheet_name)?;

        for merge in &plan.merges {
            worksheet.merge_range(
                merge.row,
                merge.first_col,
                merge.row,
                merge.last_col,
                &merge.text,
                &bold,
            )?;
        }

        for write in &plan.writes {
            let (row, col) = (write.cell.row, write.cell.col);
            match (&write.value, write.style) {
                (CellValue::Text(text), CellStyle::Bold) => {
                    worksheet.write_string_with_format(row, col, text, &bold)?;
                }
                (CellValue::Text(text), _) => {
                    worksheet.write_string(row, col, text)?;
                }
                (CellValue::Number(value), CellStyle::Money) => {
                    worksheet.write_number_with_format(row, col, *value, &money)?;
                }
                (CellValue::Number(value), _) => {
                    worksheet.write_number(row, col, *value)?;
                }
                (CellValue::Formula(formula), CellStyle::Money) => {
                    worksheet.write_formula_with_format(
                        row,
                        col,
                        Formula::new(formula),
                        &money,
                    )?;
                }
                (CellValue::Formula(formula), _) => {
                    worksheet.write_formula(row, col, Formula::new(formula))?;
                }
            }
        }

        for (col, width) in &plan.column_widths {
            worksheet.set_column_width(*col, *width)?;
        }

        workbook.save(&self.target_path)?;
        info!(path = %self.target_path.display(), sheet = %plan.sheet_name, "workbook written");
        Ok(())
    }
}
