use crate::model::{Amount, Month};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A row of the bank export as it was read, before any cleaning. A field is `None` when the
/// export left it empty or the row was too short to contain it.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RawRecord {
    pub(crate) date: Option<String>,
    pub(crate) counterparty: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) amount: Option<String>,
    pub(crate) balance: Option<String>,
    pub(crate) currency: Option<String>,
}

impl RawRecord {
    /// Builds a record from the fields of an export row, picking the columns listed in
    /// `SOURCE_COLUMNS`. Empty fields become `None`.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let fields: Vec<&str> = fields.into_iter().collect();
        let pick = |col: SourceColumn| {
            fields
                .get(col.index())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };
        Self {
            date: pick(SourceColumn::Date),
            counterparty: pick(SourceColumn::Counterparty),
            title: pick(SourceColumn::Title),
            amount: pick(SourceColumn::Amount),
            balance: pick(SourceColumn::Balance),
            currency: pick(SourceColumn::Currency),
        }
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }
}

/// A cleaned, categorized transaction that is ready to be written to the ledger.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub(crate) date: NaiveDate,
    pub(crate) title: String,
    /// Always non-negative, the direction is held by `expense`.
    pub(crate) amount: Amount,
    pub(crate) category: String,
    pub(crate) balance: String,
    pub(crate) expense: bool,
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn balance(&self) -> &str {
        &self.balance
    }

    pub fn is_expense(&self) -> bool {
        self.expense
    }

    pub fn month(&self) -> Month {
        Month::of(self.date)
    }
}

/// The columns of the bank export that are read. Every other column is ignored.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceColumn {
    Date,
    Counterparty,
    Title,
    Amount,
    Balance,
    Currency,
}

serde_plain::derive_display_from_serialize!(SourceColumn);

impl SourceColumn {
    /// The 0-based position of the column in the export.
    pub fn index(&self) -> usize {
        match self {
            SourceColumn::Date => DATE_IDX,
            SourceColumn::Counterparty => COUNTERPARTY_IDX,
            SourceColumn::Title => TITLE_IDX,
            SourceColumn::Amount => AMOUNT_IDX,
            SourceColumn::Balance => BALANCE_IDX,
            SourceColumn::Currency => CURRENCY_IDX,
        }
    }

    /// The header the bank gives this column.
    pub fn header(&self) -> &'static str {
        match self {
            SourceColumn::Date => DATE_STR,
            SourceColumn::Counterparty => COUNTERPARTY_STR,
            SourceColumn::Title => TITLE_STR,
            SourceColumn::Amount => AMOUNT_STR,
            SourceColumn::Balance => BALANCE_STR,
            SourceColumn::Currency => CURRENCY_STR,
        }
    }
}

pub const SOURCE_COLUMNS: [SourceColumn; 6] = [
    SourceColumn::Date,
    SourceColumn::Counterparty,
    SourceColumn::Title,
    SourceColumn::Amount,
    SourceColumn::Balance,
    SourceColumn::Currency,
];

pub(super) const DATE_STR: &str = "Data transakcji";
pub(super) const DATE_IDX: usize = 0;

pub(super) const COUNTERPARTY_STR: &str = "Dane kontrahenta";
pub(super) const COUNTERPARTY_IDX: usize = 2;

pub(super) const TITLE_STR: &str = "Tytuł";
pub(super) const TITLE_IDX: usize = 3;

pub(super) const AMOUNT_STR: &str = "Kwota transakcji (waluta rachunku)";
pub(super) const AMOUNT_IDX: usize = 8;

pub(super) const BALANCE_STR: &str = "Saldo po transakcji";
pub(super) const BALANCE_IDX: usize = 9;

pub(super) const CURRENCY_STR: &str = "Waluta";
pub(super) const CURRENCY_IDX: usize = 15;
