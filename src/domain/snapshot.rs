//! Snapshot of entries already present in the store
//!
//! The registry is seeded from a `registrant -> model -> components` mapping.
//! It is either read from a seed file or rebuilt from rows previously written
//! to the model and component sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ComponentRecord, component, model};

/// Existing entries keyed by registrant, then model name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub BTreeMap<String, BTreeMap<String, Vec<ComponentRecord>>>);

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a model as present, with no components yet
    pub fn add_model(&mut self, registrant: impl Into<String>, model: impl Into<String>) {
        self.0
            .entry(registrant.into())
            .or_default()
            .entry(model.into())
            .or_default();
    }

    /// Record a component as present under its model
    pub fn add_component(
        &mut self,
        registrant: impl Into<String>,
        model: impl Into<String>,
        component: ComponentRecord,
    ) {
        self.0
            .entry(registrant.into())
            .or_default()
            .entry(model.into())
            .or_default()
            .push(component);
    }

    /// Rebuild a snapshot from sheet rows in the model and component row schemas.
    ///
    /// Rows too short to carry an identity, or with an empty identity cell, are
    /// skipped.
    pub fn from_rows(model_rows: &[Vec<String>], component_rows: &[Vec<String>]) -> Self {
        let mut snapshot = Self::new();

        for (idx, row) in model_rows.iter().enumerate() {
            match identity(row, &[model::REGISTRANT_COLUMN, model::MODEL_COLUMN]).as_deref() {
                Some([registrant, model]) => snapshot.add_model(registrant, model),
                _ => warn!(row = idx, "skipping model row without registrant and model"),
            }
        }

        for (idx, row) in component_rows.iter().enumerate() {
            let columns = [
                component::REGISTRANT_COLUMN,
                component::MODEL_COLUMN,
                component::KIND_COLUMN,
            ];
            match identity(row, &columns).as_deref() {
                Some([registrant, model, kind]) => {
                    snapshot.add_component(registrant, model, ComponentRecord::new(kind));
                }
                _ => warn!(row = idx, "skipping component row without full identity"),
            }
        }

        snapshot
    }

    /// Number of registrants in the snapshot
    pub fn registrant_count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Non-empty cells at the given columns, or `None` if any is missing or blank
fn identity(row: &[String], columns: &[usize]) -> Option<Vec<String>> {
    columns
        .iter()
        .map(|&col| {
            row.get(col)
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
        })
        .collect()
}
