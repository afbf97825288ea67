//! Shared test utilities for creating test environments and sample bank exports.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::import::categorize::{categorize, default_categories};
use crate::import::clean::{parse_amount, parse_date};
use crate::import::parse::METADATA_LINES;
use crate::model::Transaction;
use crate::{utils, Config};
use encoding_rs::WINDOWS_1250;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The header line of a bank export.
const EXPORT_HEADERS: [&str; 17] = [
    "Data transakcji",
    "Data księgowania",
    "Dane kontrahenta",
    "Tytuł",
    "Nr rachunku",
    "Nazwa banku",
    "Szczegóły",
    "Nr transakcji",
    "Kwota transakcji (waluta rachunku)",
    "Saldo po transakcji",
    "Kwota blokady/zwolnienie blokady",
    "Waluta blokady",
    "Kwota płatności w walucie",
    "Waluta płatności",
    "Konto",
    "Waluta",
    "",
];

/// The last line of a bank export.
const EXPORT_SUMMARY: &str = "Saldo końcowe;;;;;;;;3,00;;;;;;;PLN;";

/// Test environment with a home directory holding a Config, an empty source directory and a
/// ledger path that does not exist yet. Holds TempDir to keep the directories alive for the
/// duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let home = temp_dir.path().join("home");
        let source = temp_dir.path().join("downloads");
        utils::make_dir(&source).unwrap();
        let config = Config::create(&home, &source, Path::new("budzet.xlsx"), "PLN").unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Writes `text` as a Windows-1250 encoded file named `name` into the source directory.
    pub fn write_export(&self, name: &str, text: &str) -> PathBuf {
        let path = self.config.source_dir().join(name);
        utils::write(&path, encode_export(text)).unwrap();
        path
    }
}

/// One transaction line of a bank export.
pub fn export_line(
    date: &str,
    counterparty: &str,
    title: &str,
    amount: &str,
    balance: &str,
    currency: &str,
) -> String {
    let mut fields = vec![""; EXPORT_HEADERS.len()];
    fields[0] = date;
    fields[1] = date;
    fields[2] = counterparty;
    fields[3] = title;
    fields[8] = amount;
    fields[9] = balance;
    fields[15] = currency;
    fields.join(";")
}

/// A complete bank export around `lines`: the account description, the header line, `lines`
/// and the summary line.
pub fn export_text(lines: &[String]) -> String {
    let mut text = String::new();
    text.push_str("Lista transakcji\n");
    for ix in 1..METADATA_LINES {
        text.push_str(&format!("Parametr {ix};wartość {ix};\n"));
    }
    text.push_str(&EXPORT_HEADERS.join(";"));
    text.push('\n');
    for line in lines {
        text.push_str(line);
        text.push('\n');
    }
    text.push_str(EXPORT_SUMMARY);
    text.push('\n');
    text
}

pub fn encode_export(text: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = WINDOWS_1250.encode(text);
    assert!(!had_errors, "not encodable as Windows-1250: {text}");
    bytes.into_owned()
}

/// An export with two October expenses, an October income, a November expense and a row in a
/// foreign currency, newest first.
pub fn sample_export() -> String {
    export_text(&[
        export_line(
            "2024-11-02",
            "Allegro sp. z o.o.",
            "Płatność BLIK 02.11.2024 Nr transakcji 12345678901 https://www.allegro.pl/",
            "-120,00",
            "1717,55",
            "PLN",
        ),
        export_line(
            "2024-10-07",
            "Jan Kowalski",
            "Przelew na telefon +48xxxxxx123 Jan Dla Kowalski Od Nowak",
            "50,00",
            "1837,55",
            "PLN",
        ),
        export_line(
            "2024-10-05",
            "JMP S.A. BIEDRONKA WARSZAWA",
            "Płatność kartą 04.10.2024 Nr karty 4246xx1234",
            "-23,45",
            "1787,55",
            "PLN",
        ),
        export_line(
            "2024-10-04",
            "HOTEL BERLIN",
            "Płatność kartą 03.10.2024 Nr karty 4246xx1234",
            "-80,00",
            "20,00",
            "EUR",
        ),
        export_line(
            "2024-10-03",
            "WWW.BILET.INTERCITY.PL  WARSZAWA  P",
            "Płatność kartą 02.10.2024 Nr karty 4246xx1234",
            "-89,00",
            "1811,00",
            "PLN",
        ),
    ])
}

/// A cleaned transaction. `date` is `YYYY-MM-DD` and `amount` is signed with a decimal comma,
/// the way the bank writes them. The category comes from the built-in table.
pub fn transaction(date: &str, title: &str, amount: &str) -> Transaction {
    let (amount, expense) = parse_amount(amount).unwrap();
    Transaction {
        date: parse_date(date).unwrap(),
        title: title.to_string(),
        amount,
        category: categorize(title, &default_categories()),
        balance: "0,00".to_string(),
        expense,
    }
}
