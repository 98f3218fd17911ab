//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Provides temp directories, a recording in-memory [`SheetStore`] and unit
//! builders.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{RecordingStore, create_temp_dir, unit};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     let store = RecordingStore::new();
//!     let unit = unit("github", "argo", &["Rollout"]);
//! }
//! ```

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use crate::domain::{ComponentRecord, ModelRecord, SpreadsheetUnit};
use crate::error::{self, Result};
use crate::sheet::SheetStore;

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Write `content` to `name` inside `temp` and return the path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_file(temp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = temp.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, content).expect("Failed to write file");
    path
}

/// Build a unit for `registrant`/`model` with components of the given kinds
#[must_use]
pub fn unit(registrant: &str, model: &str, kinds: &[&str]) -> SpreadsheetUnit {
    SpreadsheetUnit {
        model: ModelRecord::new(registrant, model),
        components: kinds.iter().map(|k| ComponentRecord::new(*k)).collect(),
    }
}

/// One recorded append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendCall {
    pub sheet_id: String,
    pub range: String,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
struct StoreState {
    calls: Vec<AppendCall>,
    tables: HashMap<String, Vec<Vec<String>>>,
    failing_ranges: Vec<String>,
    fail_all: bool,
}

/// In-memory store that records every append.
///
/// Clones share state, so a clone can be handed to a synchronizer thread and
/// inspected afterwards. Failed appends are recorded too.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    state: Arc<Mutex<StoreState>>,
}

impl RecordingStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose appends always fail
    #[must_use]
    pub fn failing() -> Self {
        let store = Self::new();
        store.lock().fail_all = true;
        store
    }

    /// Make appends to `range` fail
    pub fn fail_range(&self, range: &str) {
        self.lock().failing_ranges.push(range.to_string());
    }

    /// Rows returned by `read` for `range`
    pub fn preload(&self, range: &str, rows: Vec<Vec<String>>) {
        self.lock().tables.insert(range.to_string(), rows);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<AppendCall> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Appends made to `range`, in order
    #[must_use]
    pub fn calls_to(&self, range: &str) -> Vec<AppendCall> {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.range == range)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreState> {
        self.state.lock().expect("store state poisoned")
    }
}

impl SheetStore for RecordingStore {
    fn append(&self, sheet_id: &str, range: &str, rows: &[Vec<String>]) -> Result<()> {
        let mut state = self.lock();
        state.calls.push(AppendCall {
            sheet_id: sheet_id.to_string(),
            range: range.to_string(),
            rows: rows.to_vec(),
        });
        if state.fail_all || state.failing_ranges.iter().any(|r| r == range) {
            return Err(error::sheet::request_failed("503 Service Unavailable"));
        }
        Ok(())
    }

    fn read(&self, _sheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        Ok(self.lock().tables.get(range).cloned().unwrap_or_default())
    }
}
