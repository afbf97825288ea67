//! The stages that take a bank export to a list of categorized transactions:
//! locate the newest export, parse it, then clean, rewrite and categorize its rows.

pub mod categorize;
pub mod clean;
pub mod locate;
pub mod parse;
pub mod rewrite;

use crate::import::rewrite::MerchantAlias;
use std::collections::BTreeMap;

pub use clean::clean;
pub use locate::locate_newest;

/// The currency transactions must be in to be imported, unless configured otherwise.
pub const DEFAULT_HOME_CURRENCY: &str = "PLN";

/// The lookup tables and settings the cleaning stage works with.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Rules {
    home_currency: String,
    merchant_aliases: Vec<MerchantAlias>,
    categories: BTreeMap<String, String>,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            home_currency: DEFAULT_HOME_CURRENCY.to_string(),
            merchant_aliases: rewrite::default_merchant_aliases(),
            categories: categorize::default_categories(),
        }
    }
}

impl Rules {
    pub fn new(
        home_currency: impl Into<String>,
        merchant_aliases: Vec<MerchantAlias>,
        categories: BTreeMap<String, String>,
    ) -> Self {
        Self {
            home_currency: home_currency.into(),
            merchant_aliases,
            categories,
        }
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    pub fn merchant_aliases(&self) -> &[MerchantAlias] {
        &self.merchant_aliases
    }

    pub fn categories(&self) -> &BTreeMap<String, String> {
        &self.categories
    }
}
