use thiserror::Error;

/// Audio extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to decode container: {0}")]
    Decode(String),

    #[error("Container has no audio stream")]
    NoAudioStream,

    #[error("Unsupported target audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio encoding failed: {0}")]
    Encode(String),

    #[error("Failed to run toolchain: {0}")]
    Toolchain(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// The input could not be parsed or carries no audio.
    pub fn is_decode_error(&self) -> bool {
        matches!(self, ExtractionError::Decode(_) | ExtractionError::NoAudioStream)
    }

    /// The target format is unsupported or the encoder failed.
    pub fn is_encode_error(&self) -> bool {
        matches!(
            self,
            ExtractionError::UnsupportedFormat(_) | ExtractionError::Encode(_)
        )
    }
}

/// Keep the end of a tool's diagnostic stream, where the actual error usually is.
pub(crate) fn stderr_tail(stderr: &[u8]) -> String {
    const MAX_STDERR_CHARS: usize = 2048;

    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    let char_count = text.chars().count();
    if char_count <= MAX_STDERR_CHARS {
        return text.to_string();
    }
    let tail: String = text.chars().skip(char_count - MAX_STDERR_CHARS).collect();
    format!("...{}", tail)
}
