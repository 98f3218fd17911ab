//! The unit of work pushed by producers

use serde::{Deserialize, Serialize};

use super::{ComponentRecord, ModelRecord};

/// One model together with the components discovered for it.
///
/// An empty component list is a model-only registration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetUnit {
    pub model: ModelRecord,

    #[serde(default)]
    pub components: Vec<ComponentRecord>,
}
