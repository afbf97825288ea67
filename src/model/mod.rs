//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod cell_ref;
mod month;
mod transaction;

pub use amount::{Amount, AmountError};
pub use cell_ref::{column_letters, CellRef};
pub use month::Month;
pub use transaction::{RawRecord, SourceColumn, Transaction, SOURCE_COLUMNS};
