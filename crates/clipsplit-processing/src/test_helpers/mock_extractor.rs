//! Scripted audio extractor for testing

use crate::audio::ExtractionError;
use crate::traits::AudioExtractor;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum Script {
    Returning(Bytes),
    NoAudioStream,
    Decode(String),
    Encode(String),
}

/// Extractor that returns a fixed outcome and counts invocations
#[derive(Clone)]
pub struct MockExtractor {
    script: Script,
    calls: Arc<AtomicUsize>,
    formats: Arc<Mutex<Vec<String>>>,
}

impl MockExtractor {
    fn scripted(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            formats: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always succeed with `audio`.
    pub fn returning(audio: impl Into<Bytes>) -> Self {
        Self::scripted(Script::Returning(audio.into()))
    }

    /// Succeed with an empty buffer.
    pub fn empty() -> Self {
        Self::scripted(Script::Returning(Bytes::new()))
    }

    pub fn no_audio_stream() -> Self {
        Self::scripted(Script::NoAudioStream)
    }

    pub fn failing_decode(detail: &str) -> Self {
        Self::scripted(Script::Decode(detail.to_string()))
    }

    pub fn failing_encode(detail: &str) -> Self {
        Self::scripted(Script::Encode(detail.to_string()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Target formats requested so far.
    pub fn requested_formats(&self) -> Vec<String> {
        self.formats.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioExtractor for MockExtractor {
    async fn extract(
        &self,
        _container: &[u8],
        target_format: &str,
    ) -> Result<Bytes, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.formats.lock().unwrap().push(target_format.to_string());

        match &self.script {
            Script::Returning(audio) => Ok(audio.clone()),
            Script::NoAudioStream => Err(ExtractionError::NoAudioStream),
            Script::Decode(detail) => Err(ExtractionError::Decode(detail.clone())),
            Script::Encode(detail) => Err(ExtractionError::Encode(detail.clone())),
        }
    }
}
