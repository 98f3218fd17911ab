//! Spinner shown while producers feed the synchronizer

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress display for a synchronization run.
///
/// Clones share the same spinner, so every producer thread can report units.
#[derive(Clone)]
pub struct SyncProgress {
    units_pb: ProgressBar,
}

impl SyncProgress {
    /// Create a spinner on stderr for `files` input files
    pub fn new(files: usize) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {pos} units read from {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let units_pb = ProgressBar::new_spinner();
        units_pb.set_style(style);
        units_pb.set_message(format!("{files} file(s)"));
        units_pb.enable_steady_tick(Duration::from_millis(120));

        Self { units_pb }
    }

    /// A progress display that draws nothing
    #[allow(dead_code)] // used in tests
    pub fn hidden() -> Self {
        let units_pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden());
        Self { units_pb }
    }

    /// Count one unit handed to the synchronizer
    pub fn inc_unit(&self) {
        self.units_pb.inc(1);
    }

    #[allow(dead_code)] // used in tests
    pub fn units(&self) -> u64 {
        self.units_pb.position()
    }

    /// Clear the spinner once producers are done
    pub fn finish(&self) {
        self.units_pb.finish_and_clear();
    }

    /// Leave the spinner in place on error
    pub fn abandon(&self) {
        self.units_pb.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_count() {
        let progress = SyncProgress::hidden();
        let clone = progress.clone();
        progress.inc_unit();
        clone.inc_unit();
        assert_eq!(progress.units(), 2);
        progress.finish();
    }
}
