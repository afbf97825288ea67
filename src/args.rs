//! These structs provide the CLI interface for the bank-ledger CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// bank-ledger: Keeps a monthly budget workbook up to date from bank exports.
///
/// The program takes the newest transaction export downloaded from the bank, cleans and
/// categorizes its transactions and appends the ones that are not in the ledger yet to the
/// workbook, one sheet per month.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and its configuration file.
    ///
    /// This is the first command you should run. Pass the directory your browser saves bank
    /// exports to as --source-dir and the budget workbook as --ledger. The workbook is created
    /// on the first import if it does not exist.
    Init(InitArgs),
    /// Import the newest bank export into the ledger.
    Import(ImportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where configuration is held. Defaults to ~/bank-ledger
    #[arg(long, env = "BANK_LEDGER_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `bank-ledger init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The directory bank exports are downloaded to.
    #[arg(long)]
    source_dir: PathBuf,

    /// The budget workbook (.xlsx) that transactions are written to.
    #[arg(long)]
    ledger: PathBuf,

    /// Only transactions in this currency are imported.
    #[arg(long, default_value = crate::import::DEFAULT_HOME_CURRENCY)]
    home_currency: String,
}

impl InitArgs {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        ledger: impl Into<PathBuf>,
        home_currency: impl Into<String>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            ledger: ledger.into(),
            home_currency: home_currency.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn ledger(&self) -> &Path {
        &self.ledger
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }
}

/// Args for the `bank-ledger import` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ImportArgs {
    /// Import this export instead of the newest one in the source directory.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Do everything except saving the ledger.
    #[arg(long)]
    dry_run: bool,
}

impl ImportArgs {
    pub fn new(file: Option<PathBuf>, dry_run: bool) -> Self {
        Self { file, dry_run }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("bank-ledger"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or BANK_LEDGER_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("bank-ledger")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
