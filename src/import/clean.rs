//! Turns raw export rows into categorized `Transaction`s.

use crate::error::ImportError;
use crate::import::categorize::categorize;
use crate::import::rewrite::{rewrite_title, RewriteContext};
use crate::import::Rules;
use crate::model::{Amount, RawRecord, Transaction};
use crate::Result;
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::{debug, trace};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A raw record whose fields are all present and trimmed.
struct Complete {
    date: String,
    counterparty: String,
    title: String,
    amount: String,
    balance: String,
}

/// Cleans `records`, which are in the export's newest-first order, and returns the transactions
/// oldest-first.
///
/// # Errors
/// - `ImportError::Date` when a transaction date is not `YYYY-MM-DD`.
/// - `ImportError::Amount` when an amount is not a number.
pub fn clean(records: Vec<RawRecord>, rules: &Rules) -> Result<Vec<Transaction>> {
    let total = records.len();
    let home_currency = rules.home_currency();

    // The currency is compared before trimming, so a padded currency does not match.
    let in_currency: Vec<RawRecord> = records
        .into_iter()
        .filter(|r| r.currency() == Some(home_currency))
        .collect();
    let foreign = total - in_currency.len();

    let complete: Vec<Complete> = in_currency.into_iter().filter_map(complete).collect();
    debug!(
        "Dropped {foreign} rows not in {home_currency} and {} incomplete rows",
        total - foreign - complete.len()
    );

    let mut transactions = complete
        .into_iter()
        .map(|c| normalize(c, rules))
        .collect::<Result<Vec<_>>>()?;
    transactions.reverse();
    Ok(transactions)
}

/// Returns the trimmed record when every field is present. A field holding only whitespace
/// counts as missing.
fn complete(record: RawRecord) -> Option<Complete> {
    let trim = |s: Option<String>| s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    // The currency was already checked, it is dropped here.
    record.currency?;
    Some(Complete {
        date: trim(record.date)?,
        counterparty: trim(record.counterparty)?,
        title: trim(record.title)?,
        amount: trim(record.amount)?,
        balance: trim(record.balance)?,
    })
}

fn normalize(record: Complete, rules: &Rules) -> Result<Transaction> {
    let (amount, expense) = parse_amount(&record.amount)?;
    let date = parse_date(&record.date)?;
    let title = rewrite_title(
        &record.title,
        &RewriteContext {
            counterparty: &record.counterparty,
            aliases: rules.merchant_aliases(),
        },
    );
    let category = categorize(&title, rules.categories());
    trace!("'{}' -> '{title}' [{category}]", record.title);
    Ok(Transaction {
        date,
        title,
        amount,
        category,
        balance: record.balance,
        expense,
    })
}

/// Parses a signed amount into its absolute value and whether it was an expense.
pub(crate) fn parse_amount(raw: &str) -> Result<(Amount, bool)> {
    let expense = raw.starts_with('-');
    let unsigned = raw.trim_start_matches('-');
    let amount = Amount::from_str(unsigned).map_err(|e| ImportError::Amount {
        value: raw.to_string(),
        source: e.into_inner(),
    })?;
    Ok((amount, expense))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
        ImportError::Date {
            value: raw.to_string(),
            source: e,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::rewrite::MerchantAlias;
    use rust_decimal::Decimal;

    fn record(
        date: &str,
        counterparty: &str,
        title: &str,
        amount: &str,
        currency: &str,
    ) -> RawRecord {
        RawRecord {
            date: Some(date.to_string()),
            counterparty: Some(counterparty.to_string()),
            title: Some(title.to_string()),
            amount: Some(amount.to_string()),
            balance: Some("1000,00".to_string()),
            currency: Some(currency.to_string()),
        }
    }

    fn decimal(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount_expense() {
        let (amount, expense) = parse_amount("-1234,56").unwrap();
        assert_eq!(amount.value(), decimal("1234.56"));
        assert!(expense);
    }

    #[test]
    fn test_parse_amount_income() {
        let (amount, expense) = parse_amount("78,00").unwrap();
        assert_eq!(amount.value(), decimal("78.0"));
        assert!(!expense);
    }

    #[test]
    fn test_parse_amount_invalid() {
        let err = parse_amount("-12 34,00").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::Amount { .. })
        ));
    }

    #[test]
    fn test_clean_filters_currency() {
        let records = vec![
            record("2024-10-02", "A", "a", "-1,00", "PLN"),
            record("2024-10-01", "B", "b", "-2,00", "EUR"),
            record("2024-10-01", "C", "c", "-3,00", " PLN"),
        ];
        let cleaned = clean(records, &Rules::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].title(), "a");
    }

    #[test]
    fn test_clean_drops_incomplete_rows() {
        let mut missing_balance = record("2024-10-02", "A", "a", "-1,00", "PLN");
        missing_balance.balance = None;
        let mut missing_title = record("2024-10-02", "B", "b", "-1,00", "PLN");
        missing_title.title = None;
        let records = vec![
            missing_balance,
            missing_title,
            record("2024-10-01", "C", "c", "-3,00", "PLN"),
        ];
        let cleaned = clean(records, &Rules::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].title(), "c");
    }

    #[test]
    fn test_clean_drops_whitespace_only_fields() {
        let records = vec![
            record("2024-10-03", "A", "   ", "-5,00", "PLN"),
            record("2024-10-02", " ", "b", "-2,00", "PLN"),
            record("2024-10-01", "C", "c", "-3,00", "PLN"),
        ];
        let cleaned = clean(records, &Rules::default()).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].title(), "c");
    }

    #[test]
    fn test_clean_trims_and_reverses() {
        let records = vec![
            record(" 2024-10-03 ", " Later ", "  second  ", " -5,00 ", "PLN"),
            record("2024-10-01", "Earlier", "first", "7,50", "PLN"),
        ];
        let cleaned = clean(records, &Rules::default()).unwrap();
        assert_eq!(cleaned[0].title(), "first");
        assert_eq!(cleaned[0].date(), NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        assert!(!cleaned[0].is_expense());
        assert_eq!(cleaned[1].title(), "second");
        assert_eq!(cleaned[1].amount().value(), decimal("5"));
        assert!(cleaned[1].is_expense());
        assert_eq!(cleaned[1].balance(), "1000,00");
    }

    #[test]
    fn test_clean_amounts_are_never_negative() {
        let records = vec![
            record("2024-10-03", "A", "a", "-0,01", "PLN"),
            record("2024-10-02", "B", "b", "--4,00", "PLN"),
            record("2024-10-01", "C", "c", "4,00", "PLN"),
        ];
        let cleaned = clean(records, &Rules::default()).unwrap();
        for t in &cleaned {
            assert!(t.amount().value() >= Decimal::ZERO);
        }
        let flags: Vec<bool> = cleaned.iter().map(Transaction::is_expense).collect();
        assert_eq!(flags, vec![false, true, true]);
    }

    #[test]
    fn test_clean_bad_date_is_fatal() {
        let records = vec![
            record("2024-10-02", "A", "a", "-1,00", "PLN"),
            record("02.10.2024", "B", "b", "-1,00", "PLN"),
        ];
        let err = clean(records, &Rules::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImportError>(),
            Some(ImportError::Date { .. })
        ));
    }

    #[test]
    fn test_clean_bad_date_in_foreign_currency_is_ignored() {
        let records = vec![record("02.10.2024", "B", "b", "-1,00", "EUR")];
        assert!(clean(records, &Rules::default()).unwrap().is_empty());
    }

    #[test]
    fn test_clean_alias_feeds_category() {
        let records = vec![record(
            "2024-10-02",
            "JMP S.A. BIEDRONKA WARSZAWA",
            "Płatność kartą 01.10.2024 Nr karty 4246xx1234",
            "-23,45",
            "PLN",
        )];
        let cleaned = clean(records.clone(), &Rules::default()).unwrap();
        assert_eq!(cleaned[0].title(), "Biedronka");
        assert_eq!(cleaned[0].category(), "");

        let mut categories = Rules::default().categories().clone();
        categories.insert("Biedronka".to_string(), "spożywcze".to_string());
        let rules = Rules::new("PLN", Rules::default().merchant_aliases().to_vec(), categories);
        let cleaned = clean(records, &rules).unwrap();
        assert_eq!(cleaned[0].title(), "Biedronka");
        assert_eq!(cleaned[0].category(), "spożywcze");
    }

    #[test]
    fn test_clean_intercity_is_transport() {
        let records = vec![record(
            "2024-10-02",
            "WWW.BILET.INTERCITY.PL  WARSZAWA  P",
            "Płatność kartą 01.10.2024 Nr karty 4246xx1234",
            "-89,00",
            "PLN",
        )];
        let cleaned = clean(records, &Rules::default()).unwrap();
        assert_eq!(cleaned[0].title(), "Bilet IC");
        assert_eq!(cleaned[0].category(), "transport");
    }

    #[test]
    fn test_clean_custom_aliases_and_currency() {
        let rules = Rules::new(
            "EUR",
            vec![MerchantAlias::new("LIDL", "Lidl")],
            Default::default(),
        );
        let records = vec![
            record("2024-10-02", "LIDL BERLIN", "Kartenzahlung", "-9,99", "EUR"),
            record("2024-10-01", "ZABKA", "Płatność kartą", "-1,00", "PLN"),
        ];
        let cleaned = clean(records, &rules).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].title(), "Lidl");
    }
}
