//! Pipeline stages and failure classification.

use crate::audio::ExtractionError;
use clipsplit_core::{EventError, FailureCategory};
use clipsplit_storage::{StorageError, StorageOperation};
use std::fmt::{Display, Formatter, Result as FmtResult};
use thiserror::Error;

/// Progress of one invocation. Variants are ordered; a later stage implies
/// every earlier one completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Received,
    KeysDerived,
    Fetched,
    Extracted,
    AudioStored,
    /// Video copied to its destination but the original not yet deleted
    VideoCopied,
    VideoRelocated,
    Done,
}

impl PipelineStage {
    /// Whether storage holds objects written by this invocation.
    pub fn has_side_effects(&self) -> bool {
        *self >= PipelineStage::AudioStored
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            PipelineStage::Received => "received",
            PipelineStage::KeysDerived => "keys_derived",
            PipelineStage::Fetched => "fetched",
            PipelineStage::Extracted => "extracted",
            PipelineStage::AudioStored => "audio_stored",
            PipelineStage::VideoCopied => "video_copied",
            PipelineStage::VideoRelocated => "video_relocated",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Malformed event: {0}")]
    MalformedEvent(#[from] EventError),

    #[error("Object key has an empty base name: {0}")]
    EmptyBaseName(String),

    #[error("Storage {operation} failed after stage {completed}: {source}")]
    Storage {
        operation: StorageOperation,
        completed: PipelineStage,
        #[source]
        source: StorageError,
    },

    #[error("Audio extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Audio extraction produced no data")]
    EmptyAudio,
}

impl PipelineError {
    pub fn storage(
        operation: StorageOperation,
        completed: PipelineStage,
        source: StorageError,
    ) -> Self {
        PipelineError::Storage {
            operation,
            completed,
            source,
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            PipelineError::MalformedEvent(_) | PipelineError::EmptyBaseName(_) => {
                FailureCategory::MalformedEvent
            }
            PipelineError::Storage { .. } => FailureCategory::StorageError,
            PipelineError::Extraction(ExtractionError::Io(_)) => FailureCategory::InternalError,
            PipelineError::Extraction(_) | PipelineError::EmptyAudio => {
                FailureCategory::ExtractionError
            }
        }
    }

    /// Last stage that completed before the failure.
    pub fn completed_stage(&self) -> PipelineStage {
        match self {
            PipelineError::MalformedEvent(_) | PipelineError::EmptyBaseName(_) => {
                PipelineStage::Received
            }
            PipelineError::Storage { completed, .. } => *completed,
            PipelineError::Extraction(_) | PipelineError::EmptyAudio => PipelineStage::Fetched,
        }
    }
}
