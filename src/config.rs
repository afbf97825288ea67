//! Configuration file handling for bank-ledger.
//!
//! The configuration file is stored at `$BANK_LEDGER_HOME/config.json` and holds where bank
//! exports are found, where the ledger workbook lives, and the tables used to clean and
//! categorize transactions.

use crate::import::categorize::default_categories;
use crate::import::rewrite::{default_merchant_aliases, MerchantAlias};
use crate::import::{Rules, DEFAULT_HOME_CURRENCY};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "bank-ledger";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const FILE_PREFIX: &str = "Lista_transakcji_nr";
const FILE_EXTENSION: &str = "csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BANK_LEDGER_HOME` and from there it loads `$BANK_LEDGER_HOME/config.json`.
/// Relative paths in the file are resolved against the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The home directory, e.g. `$HOME/bank-ledger`
    /// - `source_dir` - The directory the bank exports are downloaded to.
    /// - `ledger_path` - The `.xlsx` workbook transactions are written to.
    /// - `home_currency` - Only transactions in this currency are imported.
    ///
    /// # Errors
    /// - Returns an error if `config.json` already exists or any file operation fails.
    pub fn create(
        dir: impl Into<PathBuf>,
        source_dir: &Path,
        ledger_path: &Path,
        home_currency: &str,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative).context("Unable to create the home directory")?;
        let root = utils::canonicalize(&maybe_relative)?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!("A config file already exists at '{}'", config_path.display())
        }

        let config_file = ConfigFile {
            source_dir: source_dir.to_path_buf(),
            ledger_path: ledger_path.to_path_buf(),
            home_currency: home_currency.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory and the config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative).context("The home directory is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path)?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.config_file.source_dir)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.resolve(&self.config_file.ledger_path)
    }

    pub fn file_prefix(&self) -> &str {
        &self.config_file.file_prefix
    }

    pub fn file_extension(&self) -> &str {
        &self.config_file.file_extension
    }

    /// The cleaning rules: the configured tables, or the built-in ones where none are configured.
    pub fn rules(&self) -> Rules {
        let f = &self.config_file;
        Rules::new(
            f.home_currency.clone(),
            f.merchant_aliases
                .clone()
                .unwrap_or_else(default_merchant_aliases),
            f.categories.clone().unwrap_or_else(default_categories),
        )
    }

    /// Checks if `p` is relative, and if so, resolves it against the home directory.
    fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            return p.to_path_buf();
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "bank-ledger",
///   "config_version": 1,
///   "source_dir": "/home/jan/Pobrane",
///   "file_prefix": "Lista_transakcji_nr",
///   "file_extension": "csv",
///   "ledger_path": "budzet.xlsx",
///   "home_currency": "PLN",
///   "merchant_aliases": [{ "prefix": "ZABKA", "title": "Żabka" }],
///   "categories": { "Żabka": "spożywcze" }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "bank-ledger"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Directory scanned for bank exports
    source_dir: PathBuf,

    #[serde(default = "default_file_prefix")]
    file_prefix: String,

    #[serde(default = "default_file_extension")]
    file_extension: String,

    /// The ledger workbook
    ledger_path: PathBuf,

    #[serde(default = "default_home_currency")]
    home_currency: String,

    /// Counterparty prefixes and the titles they replace, the first match wins. The built-in
    /// table is used when this is not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    merchant_aliases: Option<Vec<MerchantAlias>>,

    /// Title to category table. The built-in table is used when this is not specified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    categories: Option<BTreeMap<String, String>>,
}

fn default_file_prefix() -> String {
    FILE_PREFIX.to_string()
}

fn default_file_extension() -> String {
    FILE_EXTENSION.to_string()
}

fn default_home_currency() -> String {
    DEFAULT_HOME_CURRENCY.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            source_dir: PathBuf::new(),
            file_prefix: default_file_prefix(),
            file_extension: default_file_extension(),
            ledger_path: PathBuf::new(),
            home_currency: default_home_currency(),
            merchant_aliases: None,
            categories: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or names another app.
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data).context("Unable to write config file")
    }
}
