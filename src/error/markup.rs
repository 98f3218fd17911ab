//! Markup errors

use super::SyncError;

/// Creates an unescape error
pub fn unescape_failed(reason: impl ToString) -> SyncError {
    SyncError::MarkupUnescapeFailed {
        reason: reason.to_string(),
    }
}

/// Creates a decode error at the given byte offset
pub fn decode_failed(position: u64, reason: impl ToString) -> SyncError {
    SyncError::MarkupDecodeFailed {
        position,
        reason: reason.to_string(),
    }
}

/// Creates an encode error
pub fn encode_failed(reason: impl ToString) -> SyncError {
    SyncError::MarkupEncodeFailed {
        reason: reason.to_string(),
    }
}
