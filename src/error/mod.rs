//! Error types and handling for sheetsync
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructor helpers are grouped into sub-modules by error domain:
//! - [`sheet`]: Remote sheet store and row serialization errors
//! - [`markup`]: Markup un-escape, decode and encode errors
//! - [`config`]: Configuration errors
//! - [`input`]: Seed and unit input errors

pub mod config;
pub mod input;
pub mod markup;
pub mod sheet;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sheetsync operations
#[derive(Error, Diagnostic, Debug)]
pub enum SyncError {
    // Sheet errors
    #[error("Failed to append rows to sheet '{sheet_id}' at {range}: {reason}")]
    #[diagnostic(
        code(sheetsync::sheet::append_failed),
        help("Check that the sheet exists and the credentials allow writing to it")
    )]
    SheetAppendFailed {
        sheet_id: String,
        range: String,
        reason: String,
    },

    #[error("Failed to read rows from sheet '{sheet_id}' at {range}: {reason}")]
    #[diagnostic(code(sheetsync::sheet::read_failed))]
    SheetReadFailed {
        sheet_id: String,
        range: String,
        reason: String,
    },

    #[error("Failed to convert {sheet} entity to a row: {reason}")]
    #[diagnostic(code(sheetsync::sheet::serialization_failed))]
    RowSerializationFailed { sheet: String, reason: String },

    #[error("Sheet request failed: {reason}")]
    #[diagnostic(code(sheetsync::sheet::request_failed))]
    SheetRequestFailed { reason: String },

    // Markup errors
    #[error("Failed to unescape markup: {reason}")]
    #[diagnostic(
        code(sheetsync::markup::unescape_failed),
        help("Markup must be given as the body of a double-quoted string literal")
    )]
    MarkupUnescapeFailed { reason: String },

    #[error("Malformed markup at byte {position}: {reason}")]
    #[diagnostic(code(sheetsync::markup::decode_failed))]
    MarkupDecodeFailed { position: u64, reason: String },

    #[error("Failed to encode markup: {reason}")]
    #[diagnostic(code(sheetsync::markup::encode_failed))]
    MarkupEncodeFailed { reason: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(sheetsync::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(sheetsync::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(sheetsync::config::invalid))]
    ConfigInvalid { message: String },

    // Input errors
    #[error("Failed to read input {path}: {reason}")]
    #[diagnostic(code(sheetsync::input::read_failed))]
    InputReadFailed { path: String, reason: String },

    #[error("Failed to parse input {path} (line {line}): {reason}")]
    #[diagnostic(
        code(sheetsync::input::parse_failed),
        help("Each line must be a JSON object with 'model' and 'components' fields")
    )]
    InputParseFailed {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("No input files found")]
    #[diagnostic(
        code(sheetsync::input::none_found),
        help("Pass .json or .jsonl files, or directories containing them")
    )]
    NoInputFiles,

    // Worker errors
    #[error("Synchronizer worker panicked")]
    #[diagnostic(code(sheetsync::sync::worker_panicked))]
    WorkerPanicked,

    #[error("IO error: {message}")]
    #[diagnostic(code(sheetsync::fs::io_error))]
    IoError { message: String },
}

impl SyncError {
    /// Whether the error came from turning entities into rows, as opposed to the
    /// store rejecting the write
    pub fn is_serialization(&self) -> bool {
        matches!(self, SyncError::RowSerializationFailed { .. })
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SyncError {
    fn from(err: serde_yaml::Error) -> Self {
        SyncError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::SheetRequestFailed {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for sheetsync operations
pub type Result<T> = miette::Result<T, SyncError>;
