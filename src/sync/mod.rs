//! Deduplicating, batching synchronization
//!
//! Producers push [`SpreadsheetUnit`](crate::domain::SpreadsheetUnit)s into a
//! channel; a single [`Synchronizer`] drains it, checks every entry against the
//! [`IdentityRegistry`](crate::registry::IdentityRegistry), accumulates novel
//! rows in one [`Batch`] per sheet and flushes a batch once its threshold is
//! crossed. Only the synchronizer thread writes, so at most one append per
//! sheet is in flight.

pub mod batch;
pub mod report;
pub mod synchronizer;


pub use batch::Batch;
pub use report::SyncReport;
pub use synchronizer::{SyncHandle, Synchronizer};
