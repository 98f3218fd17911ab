//! Remote writer
//!
//! Converts entities to rows of literal cells and appends each batch to its
//! sheet in a single store call.

use serde::Serialize;
use tracing::{debug, info};

use super::{SheetKind, SheetRange, SheetStore};
use crate::config::SyncConfig;
use crate::domain::Snapshot;
use crate::error::{self, Result};

/// Appends batches of entities to the model and component sheets
pub struct RemoteWriter<S> {
    store: S,
    sheet_id: String,
    models_range: String,
    components_range: String,
}

impl<S: SheetStore> RemoteWriter<S> {
    pub fn new(store: S, sheet_id: impl Into<String>, config: &SyncConfig) -> Self {
        Self {
            store,
            sheet_id: sheet_id.into(),
            models_range: config.models_range.clone(),
            components_range: config.components_range.clone(),
        }
    }

    /// Start range rows of `kind` are appended to
    pub fn range(&self, kind: SheetKind) -> &str {
        match kind {
            SheetKind::Models => &self.models_range,
            SheetKind::Components => &self.components_range,
        }
    }

    /// Append `rows` to the sheet for `kind` in one call.
    ///
    /// Returns the number of rows written. An empty batch makes no store call.
    pub fn flush<R: Serialize>(&self, kind: SheetKind, rows: &[R]) -> Result<usize> {
        if rows.is_empty() {
            debug!(sheet = %kind, "nothing to flush");
            return Ok(0);
        }

        let values = to_cells(kind, rows)?;
        let range = self.range(kind);
        info!(sheet = %kind, rows = values.len(), range, "appending rows");

        self.store
            .append(&self.sheet_id, range, &values)
            .map_err(|e| error::sheet::append_failed(&self.sheet_id, range, e))?;

        Ok(values.len())
    }

    /// Read rows already present in both sheets
    pub fn read_snapshot(&self) -> Result<Snapshot> {
        let model_rows = self.read_table(SheetKind::Models)?;
        let component_rows = self.read_table(SheetKind::Components)?;
        info!(
            models = model_rows.len(),
            components = component_rows.len(),
            "read existing rows"
        );
        Ok(Snapshot::from_rows(&model_rows, &component_rows))
    }

    fn read_table(&self, kind: SheetKind) -> Result<Vec<Vec<String>>> {
        let range = SheetRange::parse(self.range(kind))?.table_range();
        self.store
            .read(&self.sheet_id, &range)
            .map_err(|e| error::sheet::read_failed(&self.sheet_id, range, e))
    }
}

/// Convert entities into rows of cells, one cell per field in declaration order
pub fn to_cells<R: Serialize>(kind: SheetKind, rows: &[R]) -> Result<Vec<Vec<String>>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| error::sheet::serialization_failed(kind.label(), e))?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| error::sheet::serialization_failed(kind.label(), e.error()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());
    reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| error::sheet::serialization_failed(kind.label(), e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{ComponentRecord, ComponentRow, ModelRecord};
    use crate::error::SyncError;
    use crate::test_fixtures::RecordingStore;

    fn writer(store: RecordingStore) -> RemoteWriter<RecordingStore> {
        RemoteWriter::new(store, "sheet-1", &SyncConfig::default())
    }

    #[test]
    fn test_to_cells_keeps_field_order() {
        let model = ModelRecord::new("github", "cert-manager");
        let component = ComponentRecord::new("Issuer").with_field("description", "a, \"quoted\"\nvalue");
        let rows = to_cells(SheetKind::Components, &[ComponentRow::new(&model, &component)]).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 7);
        assert_eq!(rows[0][0], "github");
        assert_eq!(rows[0][1], "cert-manager");
        assert_eq!(rows[0][2], "Issuer");
        assert_eq!(rows[0][4], "a, \"quoted\"\nvalue");
    }

    #[test]
    fn test_to_cells_rejects_nested_fields() {
        #[derive(Serialize)]
        struct Nested {
            name: String,
            labels: BTreeMap<String, String>,
        }

        let row = Nested {
            name: "x".to_string(),
            labels: BTreeMap::from([("a".to_string(), "b".to_string())]),
        };
        let result = to_cells(SheetKind::Models, &[row]);
        assert!(matches!(result, Err(SyncError::RowSerializationFailed { .. })));
    }

    #[test]
    fn test_flush_empty_makes_no_call() {
        let store = RecordingStore::new();
        let writer = writer(store.clone());

        let written = writer.flush::<ModelRecord>(SheetKind::Models, &[]).unwrap();
        assert_eq!(written, 0);
        assert_eq!(store.call_count(), 0);
    }

    #[test]
    fn test_flush_appends_all_rows_in_one_call() {
        let store = RecordingStore::new();
        let writer = writer(store.clone());
        let models = vec![ModelRecord::new("a", "m1"), ModelRecord::new("b", "m2")];

        let written = writer.flush(SheetKind::Models, &models).unwrap();
        assert_eq!(written, 2);

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].sheet_id, "sheet-1");
        assert_eq!(calls[0].range, "Models!A4");
        assert_eq!(calls[0].rows.len(), 2);
        assert_eq!(calls[0].rows[1][1], "m2");
    }

    #[test]
    fn test_flush_wraps_store_error_with_target() {
        let store = RecordingStore::failing();
        let writer = writer(store);
        let models = vec![ModelRecord::new("a", "m1")];

        let err = writer.flush(SheetKind::Components, &models).unwrap_err();
        match err {
            SyncError::SheetAppendFailed { sheet_id, range, .. } => {
                assert_eq!(sheet_id, "sheet-1");
                assert_eq!(range, "Components!A4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_snapshot_uses_table_ranges() {
        let store = RecordingStore::new();
        store.preload("Models!A4:ZZ", vec![vec!["github".into(), "argo".into()]]);
        store.preload(
            "Components!A4:ZZ",
            vec![vec!["github".into(), "argo".into(), "Rollout".into()]],
        );
        let writer = writer(store);

        let snapshot = writer.read_snapshot().unwrap();
        assert_eq!(snapshot.0["github"]["argo"][0].kind, "Rollout");
    }
}
