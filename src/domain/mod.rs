//! Domain models for sheetsync
//!
//! Records flowing from producers into the synchronizer, the flat rows written
//! to the model and component sheets, and the snapshot of rows already present.

pub mod component;
pub mod model;
pub mod snapshot;
pub mod unit;

pub use component::{ComponentRecord, ComponentRow};
pub use model::ModelRecord;
pub use snapshot::Snapshot;
pub use unit::SpreadsheetUnit;
