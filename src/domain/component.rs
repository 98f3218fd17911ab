//! Component records and component sheet rows

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ModelRecord;

/// Column of the registrant in a component row
pub const REGISTRANT_COLUMN: usize = 0;
/// Column of the model name in a component row
pub const MODEL_COLUMN: usize = 1;
/// Column of the component kind in a component row
pub const KIND_COLUMN: usize = 2;

/// A component definition as produced upstream.
///
/// Only `kind` takes part in identity; every other field is opaque and kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub kind: String,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ComponentRecord {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            extra: BTreeMap::new(),
        }
    }

    /// Attach an opaque field
    #[allow(dead_code)] // used in tests
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// String value of an opaque field, empty when missing or not a string
    fn text(&self, key: &str) -> String {
        self.extra
            .get(key)
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()
    }
}

/// Row schema of the component sheet.
///
/// Field order is column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRow {
    pub registrant: String,
    pub model: String,
    pub component: String,
    pub display_name: String,
    pub description: String,
    pub svg_color: String,
    pub svg_white: String,
}

impl ComponentRow {
    /// Build the sheet row for `component` registered under `model`
    pub fn new(model: &ModelRecord, component: &ComponentRecord) -> Self {
        Self {
            registrant: model.registrant.clone(),
            model: model.model.clone(),
            component: component.kind.clone(),
            display_name: component.text("displayName"),
            description: component.text("description"),
            svg_color: component.text("svgColor"),
            svg_white: component.text("svgWhite"),
        }
    }
}
