//! Sync command implementation
//!
//! Seeds the registry (from `--seed` or from the sheets themselves), starts the
//! synchronizer, feeds it from one producer per input file and prints a
//! summary once the final flush is done.

use std::path::{Path, PathBuf};

use console::Style;
use tracing::{error, info};

use crate::cli::SyncArgs;
use crate::config::{FlushPolicy, SyncConfig};
use crate::error::{self, Result, SyncError};
use crate::input;
use crate::progress::SyncProgress;
use crate::registry::IdentityRegistry;
use crate::sheet::{CsvDirStore, RemoteWriter, SheetStore, SheetsApiStore};
use crate::sync::{SyncHandle, SyncReport, Synchronizer};

/// Run sync command
pub fn run(config_path: Option<&Path>, args: SyncArgs) -> Result<()> {
    let config = build_config(config_path, &args)?;
    let files = input::discover_inputs(&args.inputs)?;

    let report = match (&args.out_dir, &args.api_token) {
        (Some(out_dir), _) => sync_with_store(
            CsvDirStore::new(out_dir),
            config,
            &args.sheet_id,
            args.seed.as_deref(),
            files,
        )?,
        (None, Some(token)) => {
            let store =
                SheetsApiStore::new(&config.api_base_url, token.clone(), config.request_timeout())?;
            sync_with_store(store, config, &args.sheet_id, args.seed.as_deref(), files)?
        }
        (None, None) => {
            return Err(error::config::invalid(
                "either --out-dir or --api-token (SHEETSYNC_API_TOKEN) is required",
            ));
        }
    };

    print_report(&report);
    Ok(())
}

/// Resolve the config file, then apply command line overrides
fn build_config(config_path: Option<&Path>, args: &SyncArgs) -> Result<SyncConfig> {
    let mut config = SyncConfig::resolve(config_path)?;

    if let Some(size) = args.model_batch_size {
        config.model_batch_size = size;
    }
    if let Some(size) = args.component_batch_size {
        config.component_batch_size = size;
    }
    if args.coupled_flush {
        config.flush_policy = FlushPolicy::Coupled;
    }

    config.validate()?;
    Ok(config)
}

/// Run one synchronization against `store`.
///
/// Producer failures do not stop the other producers; the first one is
/// returned after the final flush.
pub fn sync_with_store<S: SheetStore + Send + 'static>(
    store: S,
    config: SyncConfig,
    sheet_id: &str,
    seed: Option<&Path>,
    files: Vec<PathBuf>,
) -> Result<SyncReport> {
    let writer = RemoteWriter::new(store, sheet_id, &config);
    let snapshot = match seed {
        Some(path) => input::load_seed(path)?,
        None => writer.read_snapshot()?,
    };
    if snapshot.is_empty() {
        info!("no existing entries, every unit is novel");
    }

    let registry = IdentityRegistry::from_snapshot(&snapshot);
    info!(
        registrants = snapshot.registrant_count(),
        models = registry.model_count(),
        components = registry.component_count(),
        files = files.len(),
        "starting synchronization"
    );
    let (sender, handle) = Synchronizer::new(config, registry, writer).spawn()?;

    let progress = SyncProgress::new(files.len());
    let producers = match input::spawn_producers(files, sender, &progress) {
        Ok(producers) => producers,
        Err(err) => {
            progress.abandon();
            return Err(finish_after_failure(handle, err));
        }
    };

    let mut producer_error = None;
    for producer in producers {
        match producer.join() {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                error!(error = %err, "producer failed");
                producer_error.get_or_insert(err);
            }
            Err(_) => {
                producer_error.get_or_insert(SyncError::WorkerPanicked);
            }
        }
    }

    let result = handle.wait();
    match (&result, &producer_error) {
        (Ok(_), None) => progress.finish(),
        _ => progress.abandon(),
    }

    let report = result?;
    match producer_error {
        Some(err) => Err(err),
        None => Ok(report),
    }
}

/// Wait for the synchronizer's final flush, then hand back `err`.
///
/// The sender must already be dropped, or this blocks until every producer
/// that did start is done.
fn finish_after_failure(handle: SyncHandle, err: SyncError) -> SyncError {
    match handle.wait() {
        Ok(report) => info!(
            models = report.models_written,
            components = report.components_written,
            "flushed pending rows before aborting"
        ),
        Err(flush_err) => error!(error = %flush_err, "final flush failed while aborting"),
    }
    err
}

fn print_report(report: &SyncReport) {
    let label = Style::new().bold();
    println!(
        "{} {} unit(s) processed",
        Style::new().bold().green().apply_to("Synchronized:"),
        report.units
    );
    println!(
        "  {} {} written in {} append(s)",
        label.apply_to("Models:"),
        report.models_written,
        report.model_flushes
    );
    println!(
        "  {} {} written in {} append(s)",
        label.apply_to("Components:"),
        report.components_written,
        report.component_flushes
    );
    if report.failed_flushes > 0 {
        println!(
            "  {} {} failed append(s), {} row(s) abandoned",
            Style::new().bold().yellow().apply_to("Failures:"),
            report.failed_flushes,
            report.rows_abandoned
        );
    }
    if report.models_discarded > 0 {
        println!(
            "  {} {} pending model row(s) cleared by coupled flushes",
            Style::new().bold().yellow().apply_to("Discarded:"),
            report.models_discarded
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{RecordingStore, create_temp_dir, unit, write_file};

    const UNITS: &str = concat!(
        r#"{"model": {"registrant": "github", "model": "argo"}, "components": [{"kind": "Rollout"}, {"kind": "Analysis"}]}"#,
        "\n",
        r#"{"model": {"registrant": "meshery", "model": "core"}, "components": [{"kind": "Pattern"}]}"#,
        "\n",
    );

    fn args(inputs: Vec<PathBuf>) -> SyncArgs {
        SyncArgs {
            inputs,
            sheet_id: "sheet-1".to_string(),
            seed: None,
            out_dir: None,
            api_token: None,
            model_batch_size: None,
            component_batch_size: Some(7),
            coupled_flush: true,
        }
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "config.yaml", "model_batch_size: 3\ncomponent_batch_size: 9\n");

        let config = build_config(Some(path.as_path()), &args(vec![])).unwrap();
        assert_eq!(config.model_batch_size, 3);
        assert_eq!(config.component_batch_size, 7);
        assert_eq!(config.flush_policy, FlushPolicy::Coupled);
    }

    #[test]
    fn test_build_config_validates_overrides() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "config.yaml", "{}\n");
        let mut args = args(vec![]);
        args.component_batch_size = Some(0);

        assert!(matches!(
            build_config(Some(path.as_path()), &args),
            Err(SyncError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn test_sync_with_store_seeds_from_sheets() {
        let temp = create_temp_dir();
        let file = write_file(&temp, "units.jsonl", UNITS);
        let store = RecordingStore::new();
        store.preload(
            "Components!A4:ZZ",
            vec![vec!["github".into(), "argo".into(), "Rollout".into()]],
        );

        let report =
            sync_with_store(store.clone(), SyncConfig::default(), "sheet-1", None, vec![file])
                .unwrap();

        assert_eq!(report.units, 2);
        assert_eq!(report.components_written, 2);
        assert_eq!(report.models_written, 0, "github already present");
        let kinds: Vec<String> = store.calls()[0].rows.iter().map(|r| r[2].clone()).collect();
        assert_eq!(kinds, vec!["Analysis", "Pattern"]);
    }

    #[test]
    fn test_sync_with_store_seed_file() {
        let temp = create_temp_dir();
        let file = write_file(&temp, "units.jsonl", UNITS);
        let seed = write_file(&temp, "seed.yaml", "github:\n  argo:\n    - kind: Analysis\n");
        let store = RecordingStore::new();

        let report = sync_with_store(
            store,
            SyncConfig::default(),
            "sheet-1",
            Some(seed.as_path()),
            vec![file],
        )
        .unwrap();
        assert_eq!(report.components_written, 2);
    }

    #[test]
    fn test_failure_waits_for_final_flush() {
        let store = RecordingStore::new();
        let writer = RemoteWriter::new(store.clone(), "sheet-1", &SyncConfig::default());
        let synchronizer =
            Synchronizer::new(SyncConfig::default(), IdentityRegistry::new(), writer);
        let (sender, handle) = synchronizer.spawn().unwrap();
        sender.send(unit("github", "argo", &["Rollout"])).unwrap();
        drop(sender);

        let err = finish_after_failure(handle, SyncError::NoInputFiles);
        assert!(matches!(err, SyncError::NoInputFiles));
        assert_eq!(store.calls_to("Models!A4").len(), 1);
        assert_eq!(store.calls_to("Components!A4").len(), 1);
    }

    #[test]
    fn test_sync_with_store_returns_producer_error_after_flush() {
        let temp = create_temp_dir();
        let good = write_file(&temp, "good.jsonl", UNITS);
        let bad = write_file(&temp, "bad.jsonl", "not json\n");
        let store = RecordingStore::new();

        let result = sync_with_store(
            store.clone(),
            SyncConfig::default(),
            "sheet-1",
            None,
            vec![good, bad],
        );
        assert!(matches!(result, Err(SyncError::InputParseFailed { .. })));
        assert_eq!(store.calls_to("Components!A4").len(), 1);
    }
}
