//! Clipsplit Processing Library
//!
//! This crate provides the audio extraction toolchain wrapper, the toolchain
//! capability check, and the orchestrator that turns one upload event into an
//! extracted audio object plus a relocated video.

pub mod audio;
pub mod orchestration;
pub mod pipeline;
pub mod toolchain;
pub mod traits;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types
pub use audio::{AudioFormat, AudioMetadata, AudioProbe, ExtractionError, FfmpegAudioExtractor};
pub use orchestration::{AudioSplitOrchestrator, SplitOutcome, TARGET_FORMAT};
pub use pipeline::{PipelineError, PipelineStage};
pub use toolchain::{check_toolchain, ToolReport, ToolchainError, ToolchainReport};
pub use traits::AudioExtractor;
