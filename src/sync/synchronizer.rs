//! The synchronizer worker
//!
//! Per unit `{model, components}`:
//! 1. A registrant never seen before has its model queued for the model sheet,
//!    unless it is the configured self-registrant.
//! 2. Every component kind not yet recorded under `(registrant, model)` is
//!    queued for the component sheet. An unknown model has an empty set.
//! 3. A due component batch is flushed; under [`FlushPolicy::Coupled`] pending
//!    model rows are cleared with it.
//! 4. A due model batch is flushed.
//!
//! When the channel closes, whatever is left is flushed, models first.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::{Batch, SyncReport};
use crate::config::{FlushPolicy, SyncConfig};
use crate::domain::{ComponentRow, ModelRecord, SpreadsheetUnit};
use crate::error::{Result, SyncError};
use crate::registry::IdentityRegistry;
use crate::sheet::{RemoteWriter, SheetKind, SheetStore};

/// Single consumer of incoming units, owner of the registry and both batches
pub struct Synchronizer<S> {
    config: SyncConfig,
    registry: IdentityRegistry,
    writer: RemoteWriter<S>,
    models: Batch<ModelRecord>,
    components: Batch<ComponentRow>,
    report: SyncReport,
}

impl<S: SheetStore> Synchronizer<S> {
    pub fn new(config: SyncConfig, registry: IdentityRegistry, writer: RemoteWriter<S>) -> Self {
        let models = Batch::new(config.model_batch_size);
        let components = Batch::new(config.component_batch_size);
        Self {
            config,
            registry,
            writer,
            models,
            components,
            report: SyncReport::default(),
        }
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    pub fn pending_models(&self) -> &[ModelRecord] {
        self.models.pending()
    }

    pub fn pending_components(&self) -> &[ComponentRow] {
        self.components.pending()
    }

    pub fn report(&self) -> &SyncReport {
        &self.report
    }

    /// Accept one unit, then flush whichever batch is due
    pub fn process(&mut self, unit: SpreadsheetUnit) {
        self.accept(unit);
        self.flush_due();
    }

    /// Drain `units` until every sender is dropped, then flush what is left
    pub fn run(mut self, units: &Receiver<SpreadsheetUnit>) -> Result<SyncReport> {
        for unit in units {
            self.process(unit);
        }
        self.finish()
    }

    /// Flush remaining rows, model sheet first.
    ///
    /// A failed model flush is logged; a failed component flush is the result
    /// of the run.
    pub fn finish(mut self) -> Result<SyncReport> {
        let models = self.models.take();
        match self.writer.flush(SheetKind::Models, &models) {
            Ok(written) => self.report.record_flush(SheetKind::Models, written),
            Err(err) => {
                error!(sheet = %SheetKind::Models, rows = models.len(), error = %err, "final flush failed");
                self.report.record_failure(models.len());
            }
        }

        let components = self.components.take();
        match self.writer.flush(SheetKind::Components, &components) {
            Ok(written) => self.report.record_flush(SheetKind::Components, written),
            Err(err) => {
                self.report.record_failure(components.len());
                return Err(err);
            }
        }

        info!(
            units = self.report.units,
            models = self.report.models_written,
            components = self.report.components_written,
            failed_flushes = self.report.failed_flushes,
            "synchronization finished"
        );
        Ok(self.report)
    }

    fn accept(&mut self, unit: SpreadsheetUnit) {
        let SpreadsheetUnit { model, components } = unit;
        self.report.units += 1;
        debug!(
            registrant = %model.registrant,
            model = %model.model,
            components = components.len(),
            "received unit"
        );

        if !self.registry.has_registrant(&model.registrant) {
            self.registry.mark_registrant(&model.registrant);
            if model.registrant == self.config.self_registrant {
                debug!(registrant = %model.registrant, "self-registrant model not queued");
            } else {
                self.registry.mark_model(&model.registrant, &model.model);
                self.models.push(model.clone());
                self.report.models_queued += 1;
            }
        }

        if components.is_empty() {
            return;
        }

        if self
            .registry
            .ensure_component_set(&model.registrant, &model.model)
        {
            debug!(registrant = %model.registrant, model = %model.model, "new model, all components novel");
        }

        for component in &components {
            if self
                .registry
                .mark_component(&model.registrant, &model.model, &component.kind)
            {
                self.components.push(ComponentRow::new(&model, component));
                self.report.components_queued += 1;
            }
        }
    }

    fn flush_due(&mut self) {
        if self.components.is_due() {
            flush_on_threshold(
                &self.writer,
                &mut self.components,
                SheetKind::Components,
                &mut self.report,
            );

            if self.config.flush_policy == FlushPolicy::Coupled {
                let discarded = self.models.take();
                if !discarded.is_empty() {
                    warn!(
                        rows = discarded.len(),
                        "coupled flush policy discarded pending model rows"
                    );
                    self.report.models_discarded += discarded.len();
                }
            }
        }

        if self.models.is_due() {
            flush_on_threshold(
                &self.writer,
                &mut self.models,
                SheetKind::Models,
                &mut self.report,
            );
        }
    }
}

impl<S: SheetStore + Send + 'static> Synchronizer<S> {
    /// Run on a dedicated thread behind a bounded channel.
    ///
    /// Drop every clone of the returned sender to end the run, then
    /// [`SyncHandle::wait`] for the result.
    pub fn spawn(self) -> Result<(Sender<SpreadsheetUnit>, SyncHandle)> {
        let (sender, receiver) = crossbeam_channel::bounded(self.config.channel_capacity);
        let handle = thread::Builder::new()
            .name("sheetsync-synchronizer".to_string())
            .spawn(move || self.run(&receiver))?;
        Ok((sender, SyncHandle { handle }))
    }
}

/// Completion handle of a spawned synchronizer
pub struct SyncHandle {
    handle: JoinHandle<Result<SyncReport>>,
}

impl SyncHandle {
    /// Block until the synchronizer has drained the channel and flushed
    pub fn wait(self) -> Result<SyncReport> {
        self.handle.join().map_err(|_| SyncError::WorkerPanicked)?
    }
}

/// Flush a due batch.
///
/// Rows whose conversion fails are kept for one retry; rows the store rejects
/// are abandoned.
fn flush_on_threshold<S: SheetStore, R: Serialize>(
    writer: &RemoteWriter<S>,
    batch: &mut Batch<R>,
    kind: SheetKind,
    report: &mut SyncReport,
) {
    let rows = batch.take();
    match writer.flush(kind, &rows) {
        Ok(written) => {
            batch.clear_retry();
            report.record_flush(kind, written);
        }
        Err(err) if err.is_serialization() && !batch.retry_used() => {
            warn!(sheet = %kind, rows = rows.len(), error = %err, "keeping rows for one retry");
            report.record_failure(0);
            batch.retain_for_retry(rows);
        }
        Err(err) => {
            error!(sheet = %kind, rows = rows.len(), error = %err, "flush failed, abandoning rows");
            batch.clear_retry();
            report.record_failure(rows.len());
        }
    }
}
