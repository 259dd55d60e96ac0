//! Audio extraction module

pub mod error;
pub mod extractor;
pub mod format;
pub mod probe;

pub use error::ExtractionError;
pub use extractor::FfmpegAudioExtractor;
pub use format::AudioFormat;
pub use probe::{AudioMetadata, AudioProbe};
