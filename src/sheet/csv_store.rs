//! Sheet store backed by local CSV files
//!
//! Each sheet lives at `<root>/<sheet id>/<sheet name>.csv` and holds data rows
//! only; the start cell of a range does not matter locally.

use std::fs::OpenOptions;
use std::path::PathBuf;

use super::{SheetRange, SheetStore};
use crate::error::{self, Result};

/// CSV directory standing in for a remote spreadsheet
#[derive(Debug, Clone)]
pub struct CsvDirStore {
    root: PathBuf,
}

impl CsvDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File holding the sheet named in `range`
    pub fn sheet_path(&self, sheet_id: &str, range: &str) -> Result<PathBuf> {
        let range = SheetRange::parse(range)?;
        Ok(self
            .root
            .join(sheet_id)
            .join(format!("{}.csv", range.sheet_name())))
    }
}

impl SheetStore for CsvDirStore {
    fn append(&self, sheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let path = self.sheet_path(sheet_id, range)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(file);
        for row in rows {
            writer
                .write_record(row)
                .map_err(error::sheet::request_failed)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read(&self, sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let path = self.sheet_path(sheet_id, range)?;
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)
            .map_err(error::sheet::request_failed)?;
        reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect())
                    .map_err(error::sheet::request_failed)
            })
            .collect()
    }
}
