//! Sheet store errors

use super::SyncError;

/// Creates an append failed error carrying the target sheet and range
pub fn append_failed(
    sheet_id: impl Into<String>,
    range: impl Into<String>,
    reason: impl ToString,
) -> SyncError {
    SyncError::SheetAppendFailed {
        sheet_id: sheet_id.into(),
        range: range.into(),
        reason: reason.to_string(),
    }
}

/// Creates a read failed error carrying the source sheet and range
pub fn read_failed(
    sheet_id: impl Into<String>,
    range: impl Into<String>,
    reason: impl ToString,
) -> SyncError {
    SyncError::SheetReadFailed {
        sheet_id: sheet_id.into(),
        range: range.into(),
        reason: reason.to_string(),
    }
}

/// Creates a row serialization error
pub fn serialization_failed(sheet: impl Into<String>, reason: impl ToString) -> SyncError {
    SyncError::RowSerializationFailed {
        sheet: sheet.into(),
        reason: reason.to_string(),
    }
}

/// Creates a request failed error
pub fn request_failed(reason: impl ToString) -> SyncError {
    SyncError::SheetRequestFailed {
        reason: reason.to_string(),
    }
}
