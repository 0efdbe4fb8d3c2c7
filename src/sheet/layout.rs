//! Monthly sheet layout planning
//!
//! Produces a [`SheetPlan`] (cell writes, merged titles, column widths) from
//! partitioned expenses. Each growing region is described by a [`RegionSpec`]
//! and planned by the same routine. Planning does no I/O; persistence lives
//! in [`crate::sheet::writer`].
//!
//! Geometry: the itemized regions occupy disjoint column bands (Purchases
//! A:D, Recurring Expenses F:G, Miscellaneous I:J) and grow downward from row
//! 1, so they can never collide. The summary block sits in L1:M3. Income is
//! never itemized; it is accumulated into the Net Income summary cell.

use crate::models::{ClassifiedExpense, Money};
use crate::services::partition::Section;

/// A zero-indexed cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u16,
}

impl CellRef {
    pub const fn new(row: u32, col: u16) -> Self {
        Self { row, col }
    }

    /// The A1-style reference for this cell
    pub fn a1(&self) -> String {
        format!("{}{}", col_letters(self.col), self.row + 1)
    }
}

/// Convert a zero-indexed column to its letter name (0 -> A, 26 -> AA)
fn col_letters(col: u16) -> String {
    let mut col = col as i32;
    let mut letters = String::new();
    loop {
        letters.insert(0, (b'A' + (col % 26) as u8) as char);
        col = col / 26 - 1;
        if col < 0 {
            break;
        }
    }
    letters
}

/// What goes into a cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Formula(String),
}

/// How a cell is formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    Text,
    Bold,
    Money,
}

/// One planned cell write
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    pub cell: CellRef,
    pub value: CellValue,
    pub style: CellStyle,
}

/// A merged title cell spanning several columns
#[derive(Debug, Clone, PartialEq)]
pub struct TitleMerge {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
    pub text: String,
}

/// The columns a region writes per record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Category,
    Description,
    RecurringKey,
    Amount,
}

impl Field {
    fn header(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Category => "Category",
            Self::Description => "Description",
            Self::RecurringKey => "Name",
            Self::Amount => "Amount",
        }
    }
}

/// A growing region of the sheet, described as data
#[derive(Debug, Clone, Copy)]
pub struct RegionSpec {
    /// The section this region itemizes
    pub section: Section,

    /// Merged title written across the region's columns
    pub title: &'static str,

    /// Title cell; data rows grow downward from here
    pub anchor: CellRef,

    /// Column layout of one data row
    pub fields: &'static [Field],

    /// Whether to write the field names as a header row under the title
    pub column_headers: bool,
}

pub const PURCHASES_REGION: RegionSpec = RegionSpec {
    section: Section::Regular,
    title: "Purchases",
    anchor: CellRef::new(0, 0),
    fields: &[Field::Date, Field::Category, Field::Description, Field::Amount],
    column_headers: true,
};

pub const RECURRING_REGION: RegionSpec = RegionSpec {
    section: Section::Recurring,
    title: "Recurring Expenses",
    anchor: CellRef::new(0, 5),
    fields: &[Field::RecurringKey, Field::Amount],
    column_headers: false,
};

pub const MISCELLANEOUS_REGION: RegionSpec = RegionSpec {
    section: Section::Miscellaneous,
    title: "Miscellaneous",
    anchor: CellRef::new(0, 8),
    fields: &[Field::Description, Field::Amount],
    column_headers: false,
};

// Summary block coordinates
const SUMMARY_LABEL_COL: u16 = 11;
const SUMMARY_VALUE_COL: u16 = 12;
const NET_INCOME_ROW: u32 = 0;
const TOTAL_SPENDING_ROW: u32 = 1;
const BALANCE_ROW: u32 = 2;

/// The complete planned grid for one monthly sheet
#[derive(Debug, Clone, Default)]
pub struct SheetPlan {
    pub sheet_name: String,
    pub merges: Vec<TitleMerge>,
    pub writes: Vec<CellWrite>,
    pub column_widths: Vec<(u16, f64)>,
}

impl SheetPlan {
    fn write(&mut self, cell: CellRef, value: CellValue, style: CellStyle) {
        self.writes.push(CellWrite { cell, value, style });
    }

    /// Find the planned value at a cell, for assertions
    #[cfg(test)]
    pub fn value_at(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.writes
            .iter()
            .find(|w| w.cell.row == row && w.cell.col == col)
            .map(|w| &w.value)
    }
}

/// Plan the full sheet for a month
///
/// `sections` comes from [`crate::services::partition::partition`]; order
/// within each section is preserved in the written rows. Payment records are
/// excluded from every region.
pub fn plan_sheet(
    month: &str,
    sections: &[(Section, Vec<&ClassifiedExpense>)],
) -> SheetPlan {
    let mut plan = SheetPlan {
        sheet_name: month.to_string(),
        column_widths: vec![
            (0, 11.0),
            (1, 14.0),
            (2, 30.0),
            (5, 16.0),
            (8, 24.0),
            (11, 14.0),
        ],
        ..Default::default()
    };

    let purchases_total = plan_region(&mut plan, &PURCHASES_REGION, sections);
    // The recurring total stands alone; only misc and purchases feed the
    // Total Spending summary cell.
    plan_region(&mut plan, &RECURRING_REGION, sections);
    let misc_total = plan_region(&mut plan, &MISCELLANEOUS_REGION, sections);

    plan_summary(
        &mut plan,
        &section_records(sections, Section::Income),
        misc_total,
        purchases_total,
    );

    plan
}

/// The non-payment records of one section
fn section_records<'a>(
    sections: &[(Section, Vec<&'a ClassifiedExpense>)],
    wanted: Section,
) -> Vec<&'a ClassifiedExpense> {
    sections
        .iter()
        .find(|(section, _)| *section == wanted)
        .map(|(_, records)| {
            records
                .iter()
                .filter(|e| !e.classification().is_payment())
                .copied()
                .collect()
        })
        .unwrap_or_default()
}

/// Plan one itemized region; returns the cell holding its total
fn plan_region(
    plan: &mut SheetPlan,
    region: &RegionSpec,
    sections: &[(Section, Vec<&ClassifiedExpense>)],
) -> CellRef {
    let records = section_records(sections, region.section);
    let width = region.fields.len() as u16;
    plan.merges.push(TitleMerge {
        row: region.anchor.row,
        first_col: region.anchor.col,
        last_col: region.anchor.col + width - 1,
        text: region.title.to_string(),
    });

    let mut data_start = region.anchor.row + 1;
    if region.column_headers {
        for (offset, field) in region.fields.iter().enumerate() {
            plan.write(
                CellRef::new(data_start, region.anchor.col + offset as u16),
                CellValue::Text(field.header().to_string()),
                CellStyle::Bold,
            );
        }
        data_start += 1;
    }

    for (idx, expense) in records.iter().enumerate() {
        let row = data_start + idx as u32;
        for (offset, field) in region.fields.iter().enumerate() {
            let cell = CellRef::new(row, region.anchor.col + offset as u16);
            match field {
                Field::Date => plan.write(
                    cell,
                    CellValue::Text(expense.record().date.format("%Y-%m-%d").to_string()),
                    CellStyle::Text,
                ),
                Field::Category => plan.write(
                    cell,
                    CellValue::Text(expense.classification().label().to_string()),
                    CellStyle::Text,
                ),
                Field::Description => plan.write(
                    cell,
                    CellValue::Text(expense.record().description.clone()),
                    CellStyle::Text,
                ),
                Field::RecurringKey => plan.write(
                    cell,
                    CellValue::Text(
                        expense
                            .classification()
                            .recurring_key()
                            .unwrap_or("")
                            .to_string(),
                    ),
                    CellStyle::Text,
                ),
                Field::Amount => plan.write(
                    cell,
                    CellValue::Number(expense.record().amount.to_dollars()),
                    CellStyle::Money,
                ),
            }
        }
    }

    let amount_offset = region
        .fields
        .iter()
        .position(|f| *f == Field::Amount)
        .expect("every region has an amount column") as u16;
    let amount_col = region.anchor.col + amount_offset;
    let total_row = data_start + records.len() as u32;

    plan.write(
        CellRef::new(total_row, amount_col - 1),
        CellValue::Text("Total".to_string()),
        CellStyle::Bold,
    );

    let total_cell = CellRef::new(total_row, amount_col);
    if records.is_empty() {
        // A SUM over an empty range is not well formed
        plan.write(total_cell, CellValue::Number(0.0), CellStyle::Money);
    } else {
        let first = CellRef::new(data_start, amount_col);
        let last = CellRef::new(total_row - 1, amount_col);
        plan.write(
            total_cell,
            CellValue::Formula(format!("=SUM({}:{})", first.a1(), last.a1())),
            CellStyle::Money,
        );
    }
    total_cell
}

/// Plan the summary block: net income, total spending, balance
///
/// Income amounts are stored negative; the accumulator negates them so the
/// Net Income cell shows inflow as a positive number.
fn plan_summary(
    plan: &mut SheetPlan,
    income: &[&ClassifiedExpense],
    misc_total: CellRef,
    purchases_total: CellRef,
) {
    let labels = [
        (NET_INCOME_ROW, "Net Income"),
        (TOTAL_SPENDING_ROW, "Total Spending"),
        (BALANCE_ROW, "Balance"),
    ];
    for (row, label) in labels {
        plan.write(
            CellRef::new(row, SUMMARY_LABEL_COL),
            CellValue::Text(label.to_string()),
            CellStyle::Bold,
        );
    }

    let net_income_cell = CellRef::new(NET_INCOME_ROW, SUMMARY_VALUE_COL);
    if income.is_empty() {
        plan.write(net_income_cell, CellValue::Number(0.0), CellStyle::Money);
    } else {
        let mut formula = String::from("=0");
        for expense in income {
            formula.push('+');
            formula.push_str(&dollars_literal(-expense.record().amount));
        }
        plan.write(net_income_cell, CellValue::Formula(formula), CellStyle::Money);
    }

    let total_spending_cell = CellRef::new(TOTAL_SPENDING_ROW, SUMMARY_VALUE_COL);
    plan.write(
        total_spending_cell,
        CellValue::Formula(format!("={}+{}", misc_total.a1(), purchases_total.a1())),
        CellStyle::Money,
    );

    plan.write(
        CellRef::new(BALANCE_ROW, SUMMARY_VALUE_COL),
        CellValue::Formula(format!(
            "={}-{}",
            net_income_cell.a1(),
            total_spending_cell.a1()
        )),
        CellStyle::Money,
    );
}

/// Format a money amount as a bare formula literal ("50", "120.5")
fn dollars_literal(amount: Money) -> String {
    format!("{}", amount.to_dollars())
}
