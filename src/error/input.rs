//! Seed and unit input errors

use super::SyncError;

/// Creates an input read failed error
pub fn read_failed(path: impl Into<String>, reason: impl ToString) -> SyncError {
    SyncError::InputReadFailed {
        path: path.into(),
        reason: reason.to_string(),
    }
}

/// Creates an input parse failed error for a 1-based line number
pub fn parse_failed(path: impl Into<String>, line: usize, reason: impl ToString) -> SyncError {
    SyncError::InputParseFailed {
        path: path.into(),
        line,
        reason: reason.to_string(),
    }
}
