use crate::args::ImportArgs;
use crate::commands::Out;
use crate::error::ImportError;
use crate::import::{clean, locate_newest, parse, Rules};
use crate::ledger::{insert_transactions, ImportSummary, Ledger, XlsxLedger};
use crate::{Config, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Imports a bank export into the ledger workbook.
///
/// The export is `args.file()` when given, otherwise the newest export in the configured source
/// directory. The workbook is loaded, changed in memory and saved once at the end, so a failure
/// at any step leaves the file on disk as it was. With `args.dry_run()` it is not saved at all.
pub fn import(config: &Config, args: &ImportArgs) -> Result<Out<ImportSummary>> {
    let source = match args.file() {
        Some(file) => {
            if !file.is_file() {
                return Err(ImportError::NotFound {
                    dir: file.parent().map(Path::to_path_buf).unwrap_or_default(),
                    pattern: file_name(file),
                }
                .into());
            }
            file.to_path_buf()
        }
        None => locate_newest(
            &config.source_dir(),
            config.file_prefix(),
            config.file_extension(),
        )?,
    };
    let mut ledger = XlsxLedger::open(config.ledger_path())?;
    let summary = import_into(&mut ledger, &source, &config.rules(), args.dry_run())?;
    Ok(Out::new(
        message(&summary, &source, ledger.path(), args.dry_run()),
        summary,
    ))
}

/// Runs the pipeline from `source` into `ledger`.
pub(crate) fn import_into(
    ledger: &mut dyn Ledger,
    source: &Path,
    rules: &Rules,
    dry_run: bool,
) -> Result<ImportSummary> {
    info!("Importing {}", source.display());
    let records = parse::read_file(source)?;
    let transactions = clean(records, rules)?;
    let summary = insert_transactions(ledger, transactions)?;
    if dry_run {
        info!("Dry run, the ledger is not saved");
    } else if summary.inserted() > 0 {
        ledger.persist()?;
    }
    Ok(summary)
}

fn message(summary: &ImportSummary, source: &Path, ledger: &Path, dry_run: bool) -> String {
    let source = file_name(source);
    if summary.inserted() == 0 {
        return format!("No new transactions in {source}");
    }
    let months = summary
        .months
        .iter()
        .map(|m| m.sheet.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let verb = if dry_run { "Would write" } else { "Wrote" };
    format!(
        "{verb} {} transactions from {source} to {} ({months})",
        summary.inserted(),
        ledger.display()
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}
