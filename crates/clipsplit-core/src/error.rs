//! Error taxonomy module
//!
//! Every failed invocation is reduced to one [`FailureCategory`]. The category
//! decides the status code returned to the invoking runtime, the generic
//! client-facing message, and the level the failure is logged at. Detailed
//! diagnostics stay in the logs.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Warning level - for bad input from the event source
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Category of a failed invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureCategory {
    /// The trigger event is missing fields or names an unusable key.
    MalformedEvent,
    /// Any blob-store operation failed.
    StorageError,
    /// The toolchain could not decode or encode, or produced no audio.
    ExtractionError,
    /// Anything else.
    InternalError,
}

/// Static metadata for each category: (status_code, error_code, client_message, log_level).
fn category_metadata(
    category: FailureCategory,
) -> (u16, &'static str, &'static str, LogLevel) {
    match category {
        FailureCategory::MalformedEvent => (
            400,
            "MALFORMED_EVENT",
            "Error processing event. Key not found.",
            LogLevel::Warn,
        ),
        FailureCategory::StorageError => (
            500,
            "STORAGE_ERROR",
            "Error interacting with storage.",
            LogLevel::Error,
        ),
        FailureCategory::ExtractionError => (
            500,
            "EXTRACTION_ERROR",
            "Error extracting audio from video.",
            LogLevel::Error,
        ),
        FailureCategory::InternalError => (
            500,
            "INTERNAL_ERROR",
            "Internal server error.",
            LogLevel::Error,
        ),
    }
}

impl FailureCategory {
    /// Status code reported in the invocation response
    pub fn status_code(&self) -> u16 {
        category_metadata(*self).0
    }

    /// Machine-readable error code (e.g., "STORAGE_ERROR")
    pub fn error_code(&self) -> &'static str {
        category_metadata(*self).1
    }

    /// Generic message safe to hand back to the caller
    pub fn client_message(&self) -> &'static str {
        category_metadata(*self).2
    }

    pub fn log_level(&self) -> LogLevel {
        category_metadata(*self).3
    }
}

impl Display for FailureCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            FailureCategory::MalformedEvent => "MalformedEvent",
            FailureCategory::StorageError => "StorageError",
            FailureCategory::ExtractionError => "ExtractionError",
            FailureCategory::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}
