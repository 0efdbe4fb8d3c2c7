//! Section partitioning
//!
//! Buckets a flat expense list into the ordered sheet sections. Every record
//! lands in at most one section; predicates are applied first-match-wins in a
//! fixed order even though classifications are mutually exclusive by
//! construction.

use std::fmt;

use crate::models::ClassifiedExpense;

/// The four sheet sections, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Regular,
    Income,
    Miscellaneous,
    Recurring,
}

impl Section {
    /// All sections, in the fixed partition order
    pub const ORDER: [Section; 4] = [
        Section::Regular,
        Section::Income,
        Section::Miscellaneous,
        Section::Recurring,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Regular => "Regular",
            Self::Income => "Income",
            Self::Miscellaneous => "Miscellaneous",
            Self::Recurring => "Recurring",
        }
    }

    /// Whether an expense belongs to this section
    ///
    /// Regular is the default bucket: everything that is not income, not
    /// miscellaneous, and carries no recurring key. Payments fall into it
    /// here; the layout engine excludes them from every written region.
    fn matches(&self, expense: &ClassifiedExpense) -> bool {
        let classification = expense.classification();
        match self {
            Self::Regular => {
                !classification.is_income()
                    && !classification.is_miscellaneous()
                    && classification.recurring_key().is_none()
            }
            Self::Income => classification.is_income(),
            Self::Miscellaneous => classification.is_miscellaneous(),
            Self::Recurring => classification.recurring_key().is_some(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Partition expenses into ordered sections
///
/// Each record is placed in the first section whose predicate matches.
/// Sections with no matching records are still emitted, empty.
pub fn partition(expenses: &[ClassifiedExpense]) -> Vec<(Section, Vec<&ClassifiedExpense>)> {
    let mut sections: Vec<(Section, Vec<&ClassifiedExpense>)> = Section::ORDER
        .into_iter()
        .map(|section| (section, Vec::new()))
        .collect();

    for expense in expenses {
        if let Some((_, bucket)) = sections
            .iter_mut()
            .find(|(section, _)| section.matches(expense))
        {
            bucket.push(expense);
        }
    }

    sections
}
