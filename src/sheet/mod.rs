//! Remote tabular store access
//!
//! - [`SheetStore`]: the append/read calls a store backend provides
//! - [`RemoteWriter`]: turns entities into rows and issues one append per flush
//! - [`CsvDirStore`]: local CSV files, one per sheet
//! - [`SheetsApiStore`]: Google Sheets v4 REST API

pub mod api;
pub mod csv_store;
pub mod range;
pub mod writer;

use std::fmt;

pub use api::SheetsApiStore;
pub use csv_store::CsvDirStore;
pub use range::SheetRange;
pub use writer::RemoteWriter;

use crate::error::Result;

/// The two sheets rows are appended to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetKind {
    Models,
    Components,
}

impl SheetKind {
    pub fn label(self) -> &'static str {
        match self {
            SheetKind::Models => "Models",
            SheetKind::Components => "Components",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tabular store rows can be appended to and read from.
///
/// `append` inserts `rows` as new rows after the table that starts at `range`,
/// never overwriting, and stores every cell as a literal value. Implementations
/// return their native failure; callers attach the sheet and range.
pub trait SheetStore {
    fn append(&self, sheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()>;

    fn read(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>>;
}
