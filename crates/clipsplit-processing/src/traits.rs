//! Core traits for audio extraction

use crate::audio::ExtractionError;
use async_trait::async_trait;
use bytes::Bytes;

/// Audio extractor trait - pulls the primary audio track out of a video container
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    /// Extract the first audio stream of `container` and encode it as `target_format`.
    ///
    /// Extraction is a pure function of its inputs; it never touches storage.
    async fn extract(&self, container: &[u8], target_format: &str)
        -> Result<Bytes, ExtractionError>;
}
