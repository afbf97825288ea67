//! Finds the bank export to import.

use crate::error::ImportError;
use crate::Result;
use anyhow::Context;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// Returns the most recently created regular file in `dir` whose name starts with `prefix` and
/// ends with `extension`.
///
/// # Errors
/// - `ImportError::NotFound` when no file matches.
/// - An I/O error when `dir` cannot be listed.
pub fn locate_newest(dir: &Path, prefix: &str, extension: &str) -> Result<PathBuf> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Unable to list the source directory {}", dir.display()))?;

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.with_context(|| format!("Unable to read an entry of {}", dir.display()))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.starts_with(prefix) || !name.ends_with(extension) {
            continue;
        }
        let metadata = entry
            .metadata()
            .with_context(|| format!("Unable to read metadata of {name}"))?;
        if !metadata.is_file() {
            continue;
        }
        let created = creation_time(&metadata)?;
        trace!("Candidate {name} created at {created:?}");
        if newest.as_ref().map_or(true, |(t, _)| created > *t) {
            newest = Some((created, entry.path()));
        }
    }

    match newest {
        Some((_, path)) => {
            debug!("Newest matching file is {}", path.display());
            Ok(path)
        }
        None => Err(ImportError::NotFound {
            dir: dir.to_path_buf(),
            pattern: format!("{prefix}*.{extension}"),
        }
        .into()),
    }
}

/// The creation time, or the modification time on file systems that do not record creation.
fn creation_time(metadata: &Metadata) -> Result<SystemTime> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .context("The file system reports neither creation nor modification times")
}
