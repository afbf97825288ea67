//! The destination workbook: one sheet per month holding expense rows, income rows and the
//! formulas that summarize them.
//!
//! The `Ledger` trait is the seam between the writer and the storage. `XlsxLedger` stores the
//! workbook in an `.xlsx` file and `MemoryLedger` holds it in memory.

pub mod layout;
mod memory;
mod writer;
mod xlsx;

use crate::model::{CellRef, Month};
use crate::Result;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

pub use memory::MemoryLedger;
pub use writer::{
    filter_new, insert_transactions, sheet_state, ImportSummary, MonthSummary, SheetState,
};
pub use xlsx::XlsxLedger;

/// Sheet names that a new workbook comes with. An empty one is renamed instead of leaving it
/// next to the month sheets.
pub const PLACEHOLDER_SHEETS: &[&str] = &["Sheet1", "Arkusz1"];

/// The date formats the ledger's date column is read in, the first one is also written.
pub const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d"];

/// The contents of a single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Formula text including the leading `=`.
    Formula(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn formula(s: impl Into<String>) -> Self {
        CellValue::Formula(s.into())
    }

    /// Whitespace-only text counts as empty.
    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.trim().is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Access to the ledger workbook. Implementations hold the whole workbook in memory and only
/// write it out in `persist`.
pub trait Ledger {
    /// Names of all sheets in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Creates the sheets in `names` that do not exist yet, in order.
    fn ensure_sheets(&mut self, names: &[String]) -> Result<()>;

    /// The non-blank cells of a column as `(row, value)`, ordered by row.
    fn column(&self, sheet: &str, col: u32) -> Result<Vec<(u32, CellValue)>>;

    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) -> Result<()>;

    fn clear_cell(&mut self, sheet: &str, cell: CellRef) -> Result<()>;

    /// Applies `layout::CURRENCY_FORMAT` to a cell.
    fn set_currency_format(&mut self, sheet: &str, cell: CellRef) -> Result<()>;

    /// Writes the workbook to its storage.
    fn persist(&mut self) -> Result<()>;

    /// The value of one cell, `None` when it is blank.
    fn cell(&self, sheet: &str, cell: CellRef) -> Result<Option<CellValue>> {
        Ok(self
            .column(sheet, cell.col())?
            .into_iter()
            .find(|(row, _)| *row == cell.row())
            .map(|(_, value)| value))
    }

    fn has_sheet(&self, sheet: &str) -> bool {
        self.sheet_names().iter().any(|s| s == sheet)
    }

    /// The last row of `col` holding a non-blank value, `None` for an empty column.
    fn last_row(&self, sheet: &str, col: u32) -> Result<Option<u32>> {
        Ok(self
            .column(sheet, col)?
            .into_iter()
            .filter(|(_, v)| !v.is_blank())
            .map(|(row, _)| row)
            .max())
    }

    /// The most recent transaction date found in the date column of any month sheet.
    /// Transactions on or before this date are already in the ledger.
    fn latest_recorded_date(&self) -> Result<Option<NaiveDate>> {
        let mut latest: Option<NaiveDate> = None;
        for sheet in self.sheet_names() {
            if Month::from_str(&sheet).is_err() {
                continue;
            }
            for (_, value) in self.column(&sheet, layout::DATE_COL)? {
                latest = latest.max(recorded_date(&value));
            }
        }
        Ok(latest)
    }
}

/// Reads a date written by the ledger, typed in by hand, or stored as a spreadsheet serial.
pub fn recorded_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Text(s) => DATE_FORMATS
            .iter()
            .find_map(|f| NaiveDate::parse_from_str(s.trim(), f).ok()),
        CellValue::Number(n) => serial_date(*n),
        CellValue::Formula(_) => None,
    }
}

/// Converts a spreadsheet date serial (days since 1899-12-30) to a date.
fn serial_date(serial: f64) -> Option<NaiveDate> {
    // 2958465 is 9999-12-31
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}

/// What `ensure_sheets` does for one name.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum SheetAction {
    Create(String),
    Rename { from: String, to: String },
}

/// Works out how to make every name in `names` exist. `existing` lists the current sheets with
/// whether each one is empty. The first missing name takes over an empty placeholder sheet.
pub(crate) fn plan_sheets(existing: &[(String, bool)], names: &[String]) -> Vec<SheetAction> {
    let mut placeholder = existing
        .iter()
        .find(|(name, empty)| *empty && PLACEHOLDER_SHEETS.contains(&name.as_str()))
        .map(|(name, _)| name.clone());

    let mut actions = Vec::new();
    let mut planned: Vec<&str> = Vec::new();
    for name in names {
        if existing.iter().any(|(n, _)| n == name) || planned.contains(&name.as_str()) {
            continue;
        }
        planned.push(name);
        match placeholder.take() {
            Some(from) => actions.push(SheetAction::Rename {
                from,
                to: name.clone(),
            }),
            None => actions.push(SheetAction::Create(name.clone())),
        }
    }
    actions
}
