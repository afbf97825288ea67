use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month. Ledger sheets are named after months, so the serialized form is the Polish
/// month name that is used as the sheet name.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Month {
    #[serde(rename = "styczeń")]
    January,
    #[serde(rename = "luty")]
    February,
    #[serde(rename = "marzec")]
    March,
    #[serde(rename = "kwiecień")]
    April,
    #[serde(rename = "maj")]
    May,
    #[serde(rename = "czerwiec")]
    June,
    #[serde(rename = "lipiec")]
    July,
    #[serde(rename = "sierpień")]
    August,
    #[serde(rename = "wrzesień")]
    September,
    #[serde(rename = "październik")]
    October,
    #[serde(rename = "listopad")]
    November,
    #[serde(rename = "grudzień")]
    December,
}

serde_plain::derive_display_from_serialize!(Month);
serde_plain::derive_fromstr_from_deserialize!(Month);

const ALL: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// The first month of the budgeting year. Months before it sort after the months from it onwards.
const FIRST_MONTH_OF_YEAR: u32 = 10;

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        // `month()` is always within 1..=12
        ALL[date.month0() as usize]
    }

    /// The 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// The name of the ledger sheet that holds this month.
    pub fn sheet_name(&self) -> String {
        self.to_string()
    }

    /// The sort key for processing order: October, November, December, January, ... September.
    pub fn budget_order(&self) -> (bool, u32) {
        let n = self.number();
        (n < FIRST_MONTH_OF_YEAR, n)
    }
}
