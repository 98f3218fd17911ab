//! Model records
//!
//! A model is identified by `(registrant, model)`. Every other field is carried
//! through to the model sheet unchanged.

use serde::{Deserialize, Serialize};

/// Column of the registrant in a model row
pub const REGISTRANT_COLUMN: usize = 0;
/// Column of the model name in a model row
pub const MODEL_COLUMN: usize = 1;

/// A model definition, also the row schema of the model sheet.
///
/// Field order is column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelRecord {
    pub registrant: String,
    pub model: String,
    pub display_name: String,
    pub category: String,
    pub sub_category: String,
    pub description: String,
    pub source_url: String,
    pub website: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub svg_color: String,
    pub svg_white: String,
}

impl ModelRecord {
    /// Create a model record with only its identity set
    #[allow(dead_code)] // used in tests
    pub fn new(registrant: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            registrant: registrant.into(),
            model: model.into(),
            ..Self::default()
        }
    }
}
