//! Writes new transactions into the month sheets of a `Ledger`.

use crate::ledger::layout::*;
use crate::ledger::{CellValue, Ledger};
use crate::model::{Amount, CellRef, Month, Transaction};
use crate::Result;
use anyhow::bail;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

/// Where a month sheet is before it is written to.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetState {
    NoSheet,
    /// The sheet exists and holds nothing below the header row.
    Empty,
    /// The date or description column is filled down to `last_row`.
    Populated { last_row: u32 },
}

/// What was written to one month sheet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: Month,
    pub sheet: String,
    pub expenses: usize,
    pub incomes: usize,
    /// The row the first new expense went to.
    pub first_row: u32,
    pub expense_total: Amount,
    pub income_total: Amount,
}

/// What an import wrote to the ledger.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct ImportSummary {
    /// The latest date that was already in the ledger.
    pub cursor: Option<NaiveDate>,
    /// Transactions left out because they were not newer than `cursor`.
    pub skipped: usize,
    pub months: Vec<MonthSummary>,
}

impl ImportSummary {
    /// The number of transactions written.
    pub fn inserted(&self) -> usize {
        self.months.iter().map(|m| m.expenses + m.incomes).sum()
    }
}

/// Keeps the transactions dated strictly after `cursor`.
pub fn filter_new(transactions: Vec<Transaction>, cursor: Option<NaiveDate>) -> Vec<Transaction> {
    match cursor {
        None => transactions,
        Some(cursor) => transactions
            .into_iter()
            .filter(|t| t.date() > cursor)
            .collect(),
    }
}

pub fn sheet_state(ledger: &dyn Ledger, sheet: &str) -> Result<SheetState> {
    if !ledger.has_sheet(sheet) {
        return Ok(SheetState::NoSheet);
    }
    let last_row = ledger
        .last_row(sheet, DATE_COL)?
        .max(ledger.last_row(sheet, DESCRIPTION_COL)?);
    Ok(match last_row {
        Some(last_row) if last_row > HEADER_ROW => SheetState::Populated { last_row },
        _ => SheetState::Empty,
    })
}

/// Writes the transactions that are newer than anything in the ledger, one month sheet at a
/// time. `transactions` must be oldest-first. The ledger is not persisted.
pub fn insert_transactions(
    ledger: &mut dyn Ledger,
    transactions: Vec<Transaction>,
) -> Result<ImportSummary> {
    let cursor = ledger.latest_recorded_date()?;
    let total = transactions.len();
    let new = filter_new(transactions, cursor);
    let skipped = total - new.len();
    match cursor {
        Some(cursor) => info!("Ledger is filled up to {cursor}, {skipped} transactions are already in it"),
        None => info!("Ledger holds no transactions yet"),
    }

    let mut months: Vec<Month> = Vec::new();
    for t in &new {
        if !months.contains(&t.month()) {
            months.push(t.month());
        }
    }
    months.sort_by_key(Month::budget_order);

    let names: Vec<String> = months.iter().map(Month::sheet_name).collect();
    if !names.is_empty() {
        ledger.ensure_sheets(&names)?;
    }

    let mut summary = ImportSummary {
        cursor,
        skipped,
        months: Vec::with_capacity(months.len()),
    };
    for month in months {
        let rows: Vec<&Transaction> = new.iter().filter(|t| t.month() == month).collect();
        summary.months.push(fill_month(ledger, month, &rows)?);
    }
    Ok(summary)
}

fn fill_month(ledger: &mut dyn Ledger, month: Month, rows: &[&Transaction]) -> Result<MonthSummary> {
    let sheet = month.sheet_name();
    let first_row = match sheet_state(ledger, &sheet)? {
        SheetState::NoSheet => bail!("Sheet '{sheet}' was not created"),
        SheetState::Empty => {
            write_header(ledger, &sheet)?;
            FIRST_DATA_ROW
        }
        SheetState::Populated { last_row } => last_row + 1,
    };

    let (expenses, incomes): (Vec<&Transaction>, Vec<&Transaction>) =
        rows.iter().copied().partition(|t| t.is_expense());
    debug!(
        "Writing {} expenses from row {first_row} and {} incomes to '{sheet}'",
        expenses.len(),
        incomes.len()
    );

    for (row, t) in (first_row..).zip(&expenses) {
        write_expense(ledger, &sheet, row, t)?;
    }
    let incomes = write_summary_block(ledger, &sheet, &incomes)?;

    Ok(MonthSummary {
        month,
        sheet,
        expenses: expenses.len(),
        incomes: incomes.len(),
        first_row,
        expense_total: expenses.iter().map(|t| t.amount()).sum(),
        income_total: incomes.iter().map(|t| t.amount()).sum(),
    })
}

fn write_header(ledger: &mut dyn Ledger, sheet: &str) -> Result<()> {
    for (col, header) in (DATE_COL..).zip(HEADERS) {
        ledger.set_cell(sheet, CellRef::new(HEADER_ROW, col), CellValue::text(header))?;
    }
    Ok(())
}

fn write_expense(ledger: &mut dyn Ledger, sheet: &str, row: u32, t: &Transaction) -> Result<()> {
    let date = t.date().format(DATE_FORMAT).to_string();
    ledger.set_cell(sheet, CellRef::new(row, DATE_COL), CellValue::Text(date))?;
    ledger.set_cell(sheet, CellRef::new(row, DESCRIPTION_COL), CellValue::text(t.title()))?;
    write_amount(ledger, sheet, CellRef::new(row, AMOUNT_COL), t.amount())?;
    ledger.set_cell(sheet, CellRef::new(row, CATEGORY_COL), CellValue::text(t.category()))
}

fn write_amount(ledger: &mut dyn Ledger, sheet: &str, cell: CellRef, amount: Amount) -> Result<()> {
    ledger.set_cell(sheet, cell, CellValue::Number(amount.to_f64()))?;
    ledger.set_currency_format(sheet, cell)
}

fn write_formula(ledger: &mut dyn Ledger, sheet: &str, cell: CellRef, formula: String) -> Result<()> {
    ledger.set_cell(sheet, cell, CellValue::Formula(formula))?;
    ledger.set_currency_format(sheet, cell)
}

/// An income already listed in a month sheet.
#[derive(Debug, Clone, PartialEq)]
struct ListedIncome {
    row: u32,
    title: String,
    amount: Option<f64>,
}

/// Reads the income rows of the G:H block, which run from the first data row down to the row
/// above the income sum.
fn listed_incomes(ledger: &dyn Ledger, sheet: &str) -> Result<Vec<ListedIncome>> {
    let titles = ledger.column(sheet, INCOME_TITLE_COL)?;
    let Some(sum_row) = titles
        .iter()
        .find(|(row, v)| *row >= FIRST_DATA_ROW && v.as_text() == Some(SUM_LABEL))
        .map(|(row, _)| *row)
    else {
        return Ok(Vec::new());
    };
    let amounts = ledger.column(sheet, INCOME_AMOUNT_COL)?;
    Ok(titles
        .into_iter()
        .filter(|(row, _)| (FIRST_DATA_ROW..sum_row).contains(row))
        .filter_map(|(row, v)| {
            let title = v.as_text()?.to_string();
            let amount = amounts.iter().find(|(r, _)| *r == row).and_then(|(_, a)| match a {
                CellValue::Number(n) => Some(*n),
                _ => None,
            });
            Some(ListedIncome { row, title, amount })
        })
        .collect())
}

/// Clears columns G and H from `from_row` down.
fn clear_summary_block(ledger: &mut dyn Ledger, sheet: &str, from_row: u32) -> Result<()> {
    let last = ledger
        .last_row(sheet, INCOME_AMOUNT_COL)?
        .max(ledger.last_row(sheet, INCOME_TITLE_COL)?);
    let Some(last) = last else {
        return Ok(());
    };
    for row in from_row..=last {
        ledger.clear_cell(sheet, CellRef::new(row, INCOME_AMOUNT_COL))?;
        ledger.clear_cell(sheet, CellRef::new(row, INCOME_TITLE_COL))?;
    }
    Ok(())
}

/// Rewrites the G:H block: the incomes listed so far followed by the new ones, their sum, the
/// per-category expense sums and their total, and the balance. Returns the incomes that were
/// added. An income matching the title and amount of a listed one is not added again, and
/// each listed income matches once.
fn write_summary_block<'a>(
    ledger: &mut dyn Ledger,
    sheet: &str,
    incomes: &[&'a Transaction],
) -> Result<Vec<&'a Transaction>> {
    let label = |row| CellRef::new(row, INCOME_TITLE_COL);
    let value = |row| CellRef::new(row, INCOME_AMOUNT_COL);

    let listed = listed_incomes(ledger, sheet)?;
    let listed_last_row = listed.iter().map(|i| i.row).max();
    let first_new_row = listed_last_row.map_or(FIRST_DATA_ROW, |row| row + 1);
    clear_summary_block(ledger, sheet, first_new_row)?;

    // Each listed income stands for one incoming transaction, so a repeated income is kept.
    let mut unmatched: Vec<&ListedIncome> = listed.iter().collect();
    let mut new: Vec<&'a Transaction> = Vec::with_capacity(incomes.len());
    for t in incomes {
        let amount = Some(t.amount().to_f64());
        match unmatched
            .iter()
            .position(|i| i.title == t.title() && i.amount == amount)
        {
            Some(ix) => {
                unmatched.remove(ix);
            }
            None => new.push(t),
        }
    }
    if new.len() < incomes.len() {
        debug!(
            "{} incomes are already listed in '{sheet}'",
            incomes.len() - new.len()
        );
    }

    ledger.set_cell(sheet, value(HEADER_ROW), CellValue::text(INCOMES_LABEL))?;
    let mut last_income_row = listed_last_row.unwrap_or(FIRST_DATA_ROW);
    for (row, t) in (first_new_row..).zip(&new) {
        write_amount(ledger, sheet, value(row), t.amount())?;
        ledger.set_cell(sheet, label(row), CellValue::text(t.title()))?;
        last_income_row = row;
    }

    let income_sum_row = last_income_row + 1;
    let income_sum = sum_formula(INCOME_AMOUNT_COL, FIRST_DATA_ROW, last_income_row);
    write_formula(ledger, sheet, value(income_sum_row), income_sum)?;
    ledger.set_cell(sheet, label(income_sum_row), CellValue::text(SUM_LABEL))?;

    let categories_row = income_sum_row + CATEGORY_BLOCK_GAP;
    ledger.set_cell(sheet, value(categories_row), CellValue::text(CATEGORIES_LABEL))?;
    let mut last_category_row = categories_row;
    for (row, category) in (categories_row + 1..).zip(EXPENSE_CATEGORIES) {
        ledger.set_cell(sheet, label(row), CellValue::text(category))?;
        write_formula(ledger, sheet, value(row), category_sum_formula(label(row)))?;
        last_category_row = row;
    }

    let expense_sum_row = last_category_row + 1;
    let expense_sum = sum_formula(INCOME_AMOUNT_COL, categories_row + 1, last_category_row);
    write_formula(ledger, sheet, value(expense_sum_row), expense_sum)?;
    ledger.set_cell(sheet, label(expense_sum_row), CellValue::text(SUM_LABEL))?;

    let balance_row = last_category_row + BALANCE_LABEL_GAP;
    ledger.set_cell(sheet, value(balance_row), CellValue::text(BALANCE_LABEL))?;
    let balance = balance_formula(value(income_sum_row), value(expense_sum_row));
    write_formula(ledger, sheet, value(balance_row + 1), balance)?;
    Ok(new)
}
