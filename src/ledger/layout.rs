//! Where things go on a month sheet.
//!
//! Columns A to D hold one expense per row under a header row. Columns G and H hold the income
//! list, its sum, the per-category expense sums, their total and the balance of the month.

use crate::model::CellRef;

pub const HEADER_ROW: u32 = 1;
pub const FIRST_DATA_ROW: u32 = 2;

pub const DATE_COL: u32 = 1;
/// The column whose last non-empty row decides where new expenses are appended.
pub const DESCRIPTION_COL: u32 = 2;
pub const AMOUNT_COL: u32 = 3;
pub const CATEGORY_COL: u32 = 4;

pub const INCOME_AMOUNT_COL: u32 = 7;
pub const INCOME_TITLE_COL: u32 = 8;

/// The expense table header, columns A to D.
pub const HEADERS: [&str; 4] = ["Data", "Opis", "Kwota", "Kategoria"];

pub const INCOMES_LABEL: &str = "wpływy";
pub const CATEGORIES_LABEL: &str = "wydatki wg kategorii";
pub const SUM_LABEL: &str = "suma";
pub const BALANCE_LABEL: &str = "bilans";

/// Rows from the income sum to the category block header.
pub const CATEGORY_BLOCK_GAP: u32 = 3;

/// Rows from the last category to the balance label. The balance formula is on the row below.
pub const BALANCE_LABEL_GAP: u32 = 3;

/// The last row the per-category sums look at.
pub const EXPENSE_RANGE_LAST_ROW: u32 = 250;

/// How expense dates are written.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Number format of every amount cell.
pub const CURRENCY_FORMAT: &str = r#"#,##0.00\ "zł""#;

/// The categories summed in the category block, in display order.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "transport",
    "mieszkanie",
    "spożywcze",
    "media",
    "rozrywka",
    "prezenty",
    "ubrania",
    "wyjazdy",
    "domowe",
    "inne",
];

/// `=SUM(G2:G9)` over one column.
pub fn sum_formula(col: u32, first_row: u32, last_row: u32) -> String {
    format!(
        "=SUM({}:{})",
        CellRef::new(first_row, col),
        CellRef::new(last_row, col)
    )
}

/// Sums the expense amounts whose category equals the label in `label`.
pub fn category_sum_formula(label: CellRef) -> String {
    let categories = format!(
        "{}:{}",
        CellRef::new(FIRST_DATA_ROW, CATEGORY_COL).absolute(),
        CellRef::new(EXPENSE_RANGE_LAST_ROW, CATEGORY_COL).absolute()
    );
    let amounts = format!(
        "{}:{}",
        CellRef::new(FIRST_DATA_ROW, AMOUNT_COL).absolute(),
        CellRef::new(EXPENSE_RANGE_LAST_ROW, AMOUNT_COL).absolute()
    );
    format!("=SUMIF({categories},{label},{amounts})")
}

/// `=G5-G22`
pub fn balance_formula(incomes: CellRef, expenses: CellRef) -> String {
    format!("={incomes}-{expenses}")
}
