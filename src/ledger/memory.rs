//! Implements the `Ledger` trait using in-memory data.
//!
//! Note: this is compiled in the release build too, so that the whole import can be run
//! top-to-bottom without an `.xlsx` file.

use crate::ledger::{plan_sheets, CellValue, Ledger, SheetAction};
use crate::model::CellRef;
use crate::Result;
use anyhow::Context;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

#[derive(Debug, Default, Clone)]
struct MemorySheet {
    name: String,
    cells: BTreeMap<CellRef, CellValue>,
    currency: BTreeSet<CellRef>,
}

/// An implementation of the `Ledger` trait that holds its sheets in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    sheets: Vec<MemorySheet>,
    persisted: usize,
}

impl MemoryLedger {
    /// Creates a ledger with empty sheets named `names`.
    pub fn with_sheets(names: &[&str]) -> Self {
        Self {
            sheets: names
                .iter()
                .map(|name| MemorySheet {
                    name: name.to_string(),
                    ..MemorySheet::default()
                })
                .collect(),
            persisted: 0,
        }
    }

    /// The value of a cell given in A1 notation, `None` when the sheet or cell does not exist.
    pub fn get(&self, sheet: &str, cell: &str) -> Option<&CellValue> {
        let cell = CellRef::from_str(cell).ok()?;
        self.find(sheet)?.cells.get(&cell)
    }

    /// The text of a cell, `None` for missing and non-text cells.
    pub fn text(&self, sheet: &str, cell: &str) -> Option<&str> {
        self.get(sheet, cell).and_then(CellValue::as_text)
    }

    pub fn is_currency(&self, sheet: &str, cell: &str) -> bool {
        match (self.find(sheet), CellRef::from_str(cell)) {
            (Some(s), Ok(cell)) => s.currency.contains(&cell),
            _ => false,
        }
    }

    /// How many times `persist` was called.
    pub fn persist_count(&self) -> usize {
        self.persisted
    }

    fn find(&self, sheet: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == sheet)
    }

    fn find_mut(&mut self, sheet: &str) -> Result<&mut MemorySheet> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .with_context(|| format!("Sheet '{sheet}' not found"))
    }
}

impl Ledger for MemoryLedger {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn ensure_sheets(&mut self, names: &[String]) -> Result<()> {
        let existing: Vec<(String, bool)> = self
            .sheets
            .iter()
            .map(|s| (s.name.clone(), s.cells.values().all(CellValue::is_blank)))
            .collect();
        for action in plan_sheets(&existing, names) {
            match action {
                SheetAction::Create(name) => self.sheets.push(MemorySheet {
                    name,
                    ..MemorySheet::default()
                }),
                SheetAction::Rename { from, to } => self.find_mut(&from)?.name = to,
            }
        }
        Ok(())
    }

    fn column(&self, sheet: &str, col: u32) -> Result<Vec<(u32, CellValue)>> {
        let sheet = self
            .find(sheet)
            .with_context(|| format!("Sheet '{sheet}' not found"))?;
        Ok(sheet
            .cells
            .iter()
            .filter(|(cell, value)| cell.col() == col && !value.is_blank())
            .map(|(cell, value)| (cell.row(), value.clone()))
            .collect())
    }

    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) -> Result<()> {
        self.find_mut(sheet)?.cells.insert(cell, value);
        Ok(())
    }

    fn clear_cell(&mut self, sheet: &str, cell: CellRef) -> Result<()> {
        self.find_mut(sheet)?.cells.remove(&cell);
        Ok(())
    }

    fn set_currency_format(&mut self, sheet: &str, cell: CellRef) -> Result<()> {
        self.find_mut(sheet)?.currency.insert(cell);
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        self.persisted += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_ledger_cells() {
        let mut ledger = MemoryLedger::with_sheets(&["maj"]);
        let g2 = CellRef::new(2, 7);
        ledger.set_cell("maj", g2, CellValue::Number(12.5)).unwrap();
        ledger.set_currency_format("maj", g2).unwrap();
        assert_eq!(ledger.get("maj", "G2"), Some(&CellValue::Number(12.5)));
        assert!(ledger.is_currency("maj", "G2"));
        assert!(!ledger.is_currency("maj", "G3"));

        ledger.clear_cell("maj", g2).unwrap();
        assert_eq!(ledger.get("maj", "G2"), None);
    }

    #[test]
    fn test_memory_ledger_missing_sheet() {
        let mut ledger = MemoryLedger::default();
        assert!(ledger.column("maj", 1).is_err());
        assert!(ledger
            .set_cell("maj", CellRef::new(1, 1), CellValue::text("x"))
            .is_err());
    }

    #[test]
    fn test_memory_ledger_ensure_sheets() {
        let mut ledger = MemoryLedger::with_sheets(&["Arkusz1"]);
        let names = vec!["październik".to_string(), "listopad".to_string()];
        ledger.ensure_sheets(&names).unwrap();
        assert_eq!(ledger.sheet_names(), names);

        ledger.ensure_sheets(&names).unwrap();
        assert_eq!(ledger.sheet_names().len(), 2);
    }

    #[test]
    fn test_memory_ledger_column_order() {
        let mut ledger = MemoryLedger::with_sheets(&["maj"]);
        for row in [3, 1, 2] {
            ledger
                .set_cell("maj", CellRef::new(row, 2), CellValue::text(format!("r{row}")))
                .unwrap();
        }
        ledger.set_cell("maj", CellRef::new(1, 3), CellValue::Number(1.0)).unwrap();
        let rows: Vec<u32> = ledger.column("maj", 2).unwrap().into_iter().map(|(r, _)| r).collect();
        assert_eq!(rows, vec![1, 2, 3]);
    }
}
