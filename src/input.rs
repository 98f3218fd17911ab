//! Seed and unit input files
//!
//! Units are read from JSON Lines files (one unit per line) or JSON arrays.
//! Directories are walked for `.json` and `.jsonl` files. Each file feeds the
//! synchronizer channel from its own producer thread.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::{Snapshot, SpreadsheetUnit};
use crate::error::{self, Result, SyncError};
use crate::progress::SyncProgress;

const UNIT_EXTENSIONS: &[&str] = &["json", "jsonl"];

/// Expand `paths` into the unit files to read, in a stable order
pub fn discover_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(error::input::read_failed(
                path.display().to_string(),
                "no such file or directory",
            ));
        }

        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && has_unit_extension(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();
        found.sort();
        files.extend(found);
    }

    if files.is_empty() {
        return Err(SyncError::NoInputFiles);
    }
    Ok(files)
}

fn has_unit_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| UNIT_EXTENSIONS.contains(&ext))
}

/// Read every unit in `path`, handing each to `sink`.
///
/// Stops early when `sink` returns `false`. Returns the number of units handed
/// over.
pub fn read_units(path: &Path, mut sink: impl FnMut(SpreadsheetUnit) -> bool) -> Result<usize> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|e| error::input::read_failed(&display, e))?;
    let mut reader = BufReader::new(file);

    if starts_with_array(&mut reader).map_err(|e| error::input::read_failed(&display, e))? {
        let units: Vec<SpreadsheetUnit> =
            serde_json::from_reader(reader).map_err(|e| error::input::parse_failed(&display, e.line(), e))?;
        let mut sent = 0;
        for unit in units {
            if !sink(unit) {
                break;
            }
            sent += 1;
        }
        return Ok(sent);
    }

    let mut sent = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| error::input::read_failed(&display, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let unit: SpreadsheetUnit = serde_json::from_str(&line)
            .map_err(|e| error::input::parse_failed(&display, idx + 1, e))?;
        if !sink(unit) {
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

/// Whether the first non-whitespace byte is `[`, without consuming it
fn starts_with_array(reader: &mut impl BufRead) -> std::io::Result<bool> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(false);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let is_array = buf[pos] == b'[';
                reader.consume(pos);
                return Ok(is_array);
            }
            None => {
                let len = buf.len();
                reader.consume(len);
            }
        }
    }
}

/// Load a seed snapshot from YAML, or JSON when the extension is `.json`
pub fn load_seed(path: &Path) -> Result<Snapshot> {
    let display = path.display().to_string();
    let content =
        std::fs::read_to_string(path).map_err(|e| error::input::read_failed(&display, e))?;

    let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
    if is_json {
        serde_json::from_str(&content).map_err(|e| error::input::parse_failed(&display, e.line(), e))
    } else {
        serde_yaml::from_str(&content).map_err(|e| {
            let line = e.location().map_or(0, |loc| loc.line());
            error::input::parse_failed(&display, line, e)
        })
    }
}

/// Start one producer thread per file, each sending into `sender`.
///
/// The caller's `sender` is dropped here, so the channel closes once every
/// producer finishes.
pub fn spawn_producers(
    files: Vec<PathBuf>,
    sender: Sender<SpreadsheetUnit>,
    progress: &SyncProgress,
) -> Result<Vec<JoinHandle<Result<usize>>>> {
    let mut handles = Vec::with_capacity(files.len());

    for (idx, file) in files.into_iter().enumerate() {
        let sender = sender.clone();
        let progress = progress.clone();
        let handle = thread::Builder::new()
            .name(format!("sheetsync-producer-{idx}"))
            .spawn(move || {
                let sent = read_units(&file, |unit| {
                    progress.inc_unit();
                    sender.send(unit).is_ok()
                })?;
                debug!(file = %file.display(), units = sent, "producer finished");
                Ok(sent)
            })?;
        handles.push(handle);
    }

    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_temp_dir, write_file};

    const LINE_A: &str = r#"{"model": {"registrant": "github", "model": "argo"}, "components": [{"kind": "Rollout"}]}"#;
    const LINE_B: &str = r#"{"model": {"registrant": "github", "model": "istio"}}"#;

    fn collect(path: &Path) -> Result<Vec<SpreadsheetUnit>> {
        let mut units = Vec::new();
        read_units(path, |unit| {
            units.push(unit);
            true
        })?;
        Ok(units)
    }

    #[test]
    fn test_read_json_lines() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "units.jsonl", &format!("{LINE_A}\n\n{LINE_B}\n"));

        let units = collect(&path).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].components[0].kind, "Rollout");
        assert!(units[1].components.is_empty());
    }

    #[test]
    fn test_read_json_array() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "units.json", &format!("  \n[{LINE_A}, {LINE_B}]"));

        let units = collect(&path).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].model.model, "istio");
    }

    #[test]
    fn test_parse_error_reports_line() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "units.jsonl", &format!("{LINE_A}\n{{\"components\": []}}\n"));

        let err = collect(&path).unwrap_err();
        assert!(matches!(err, SyncError::InputParseFailed { line: 2, .. }));
    }

    #[test]
    fn test_sink_can_stop_early() {
        let temp = create_temp_dir();
        let path = write_file(&temp, "units.jsonl", &format!("{LINE_A}\n{LINE_B}\n"));

        let sent = read_units(&path, |_| false).unwrap();
        assert_eq!(sent, 0);
    }

    #[test]
    fn test_discover_inputs_walks_directories() {
        let temp = create_temp_dir();
        write_file(&temp, "in/b.jsonl", LINE_A);
        write_file(&temp, "in/nested/a.json", LINE_A);
        write_file(&temp, "in/readme.md", "not units");

        let files = discover_inputs(&[temp.path().join("in")]).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| has_unit_extension(f)));
    }

    #[test]
    fn test_discover_inputs_errors() {
        let temp = create_temp_dir();
        assert!(matches!(
            discover_inputs(&[temp.path().to_path_buf()]),
            Err(SyncError::NoInputFiles)
        ));
        assert!(matches!(
            discover_inputs(&[temp.path().join("missing")]),
            Err(SyncError::InputReadFailed { .. })
        ));
    }

    #[test]
    fn test_load_seed_yaml_and_json() {
        let temp = create_temp_dir();
        let yaml = write_file(&temp, "seed.yaml", "registrantA:\n  model1:\n    - kind: compX\n");
        let json = write_file(&temp, "seed.json", r#"{"registrantA": {"model1": [{"kind": "compX"}]}}"#);

        assert_eq!(load_seed(&yaml).unwrap(), load_seed(&json).unwrap());
    }

    #[test]
    fn test_spawn_producers_feed_channel() {
        let temp = create_temp_dir();
        let a = write_file(&temp, "a.jsonl", &format!("{LINE_A}\n{LINE_B}\n"));
        let b = write_file(&temp, "b.jsonl", LINE_A);
        let (sender, receiver) = crossbeam_channel::unbounded();

        let handles = spawn_producers(vec![a, b], sender, &SyncProgress::hidden()).unwrap();
        let total: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .sum();

        assert_eq!(total, 3);
        assert_eq!(receiver.iter().count(), 3);
    }
}
