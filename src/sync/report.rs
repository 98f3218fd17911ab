//! Run summary

use serde::Serialize;

use crate::sheet::SheetKind;

/// Counters collected over one synchronization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub units: usize,
    pub models_queued: usize,
    pub components_queued: usize,
    pub models_written: usize,
    pub components_written: usize,
    pub model_flushes: usize,
    pub component_flushes: usize,
    pub failed_flushes: usize,
    /// Rows dropped after a failed write
    pub rows_abandoned: usize,
    /// Pending model rows cleared by a component flush under the coupled policy
    pub models_discarded: usize,
}

impl SyncReport {
    /// Count a successful flush of `written` rows; empty flushes are not counted
    pub fn record_flush(&mut self, kind: SheetKind, written: usize) {
        if written == 0 {
            return;
        }
        match kind {
            SheetKind::Models => {
                self.model_flushes += 1;
                self.models_written += written;
            }
            SheetKind::Components => {
                self.component_flushes += 1;
                self.components_written += written;
            }
        }
    }

    pub fn record_failure(&mut self, abandoned: usize) {
        self.failed_flushes += 1;
        self.rows_abandoned += abandoned;
    }
}
