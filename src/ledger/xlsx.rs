//! Implements the `Ledger` trait on an `.xlsx` workbook file using `umya_spreadsheet`.

use crate::ledger::layout::CURRENCY_FORMAT;
use crate::ledger::{plan_sheets, CellValue, Ledger, SheetAction};
use crate::model::CellRef;
use crate::Result;
use anyhow::{anyhow, Context};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};

/// A workbook loaded into memory. Nothing is written to `path` until `persist` is called.
pub struct XlsxLedger {
    path: PathBuf,
    book: Spreadsheet,
}

impl XlsxLedger {
    /// Loads the workbook at `path`. A missing file starts a new, empty workbook that will be
    /// written to `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let book = if path.is_file() {
            debug!("Loading ledger {}", path.display());
            umya_spreadsheet::reader::xlsx::read(&path)
                .map_err(|e| anyhow!("{e}"))
                .with_context(|| format!("Unable to read ledger {}", path.display()))?
        } else {
            info!("Ledger {} does not exist, starting a new workbook", path.display());
            umya_spreadsheet::new_file()
        };
        Ok(Self { path, book })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sheet(&self, name: &str) -> Result<&Worksheet> {
        self.book
            .get_sheet_by_name(name)
            .with_context(|| format!("Sheet '{name}' not found in {}", self.path.display()))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut Worksheet> {
        let path = self.path.display().to_string();
        self.book
            .get_sheet_by_name_mut(name)
            .with_context(|| format!("Sheet '{name}' not found in {path}"))
    }
}

fn read_cell(cell: &umya_spreadsheet::Cell) -> CellValue {
    if cell.is_formula() {
        return CellValue::Formula(format!("={}", cell.get_formula()));
    }
    match cell.get_value_number() {
        Some(n) => CellValue::Number(n),
        None => CellValue::Text(cell.get_value().to_string()),
    }
}

fn is_empty(sheet: &Worksheet) -> bool {
    let rows = sheet.get_highest_row();
    let cols = sheet.get_highest_column();
    (1..=rows).all(|row| {
        (1..=cols).all(|col| {
            sheet
                .get_cell((col, row))
                .map_or(true, |c| read_cell(c).is_blank())
        })
    })
}

impl Ledger for XlsxLedger {
    fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|s| s.get_name().to_string())
            .collect()
    }

    fn ensure_sheets(&mut self, names: &[String]) -> Result<()> {
        let existing: Vec<(String, bool)> = self
            .book
            .get_sheet_collection()
            .iter()
            .map(|s| (s.get_name().to_string(), is_empty(s)))
            .collect();
        for action in plan_sheets(&existing, names) {
            match action {
                SheetAction::Create(name) => {
                    debug!("Creating sheet '{name}'");
                    self.book
                        .new_sheet(name.as_str())
                        .map_err(|e| anyhow!("Unable to create sheet '{name}': {e}"))?;
                }
                SheetAction::Rename { from, to } => {
                    debug!("Renaming sheet '{from}' to '{to}'");
                    self.sheet_mut(&from)?.set_name(to);
                }
            }
        }
        Ok(())
    }

    fn column(&self, sheet: &str, col: u32) -> Result<Vec<(u32, CellValue)>> {
        let sheet = self.sheet(sheet)?;
        Ok((1..=sheet.get_highest_row())
            .filter_map(|row| {
                let value = read_cell(sheet.get_cell((col, row))?);
                (!value.is_blank()).then_some((row, value))
            })
            .collect())
    }

    fn set_cell(&mut self, sheet: &str, cell: CellRef, value: CellValue) -> Result<()> {
        let target = self.sheet_mut(sheet)?.get_cell_mut((cell.col(), cell.row()));
        match value {
            CellValue::Text(s) => {
                target.set_value_string(s);
            }
            CellValue::Number(n) => {
                target.set_value_number(n);
            }
            CellValue::Formula(f) => {
                target.set_formula(f.trim_start_matches('='));
            }
        }
        Ok(())
    }

    fn clear_cell(&mut self, sheet: &str, cell: CellRef) -> Result<()> {
        let ws = self.sheet_mut(sheet)?;
        if ws.get_cell((cell.col(), cell.row())).is_some() {
            ws.get_cell_mut((cell.col(), cell.row())).set_value_string("");
        }
        Ok(())
    }

    fn set_currency_format(&mut self, sheet: &str, cell: CellRef) -> Result<()> {
        self.sheet_mut(sheet)?
            .get_style_mut((cell.col(), cell.row()))
            .get_number_format_mut()
            .set_format_code(CURRENCY_FORMAT);
        Ok(())
    }

    fn persist(&mut self) -> Result<()> {
        info!("Saving ledger {}", self.path.display());
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path)
            .map_err(|e| anyhow!("{e}"))
            .with_context(|| format!("Unable to save ledger {}", self.path.display()))
    }
}
