use std::path::PathBuf;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The failures of an import run that a caller may want to tell apart. These travel inside
/// `anyhow::Error` and can be recovered with `downcast_ref::<ImportError>()`.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// `pattern` is a file name, or `prefix*.extension` when the newest export was looked up.
    #[error("No file matching '{pattern}' was found in '{}'", dir.display())]
    NotFound { dir: PathBuf, pattern: String },

    #[error("Unable to parse transactions from '{source_name}': {reason}")]
    Parse { source_name: String, reason: String },

    #[error("Invalid transaction date '{value}', expected YYYY-MM-DD")]
    Date {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid transaction amount '{value}'")]
    Amount {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
}
