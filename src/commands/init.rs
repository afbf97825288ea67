use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and an initial `config.json` from `args`.
///
/// # Arguments
/// - `home` - The home directory, e.g. `$HOME/bank-ledger`
/// - `args` - Where exports are found, the ledger workbook and the home currency.
///
/// # Errors
/// - Returns an error if a config file already exists or any file operation fails.
pub fn init(home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(home, args.source_dir(), args.ledger(), args.home_currency())
        .context("Unable to create the home directory and config")?;
    Ok(format!(
        "Created {}, exports are read from {} and written to {}",
        config.config_path().display(),
        config.source_dir().display(),
        config.ledger_path().display()
    )
    .into())
}
