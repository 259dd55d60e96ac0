//! Audio stream inspection via ffprobe

use super::error::stderr_tail;
use super::ExtractionError;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    format: Option<FFprobeFormat>,
    streams: Option<Vec<FFprobeStream>>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    format_name: Option<String>,
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FFprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    sample_rate: Option<String>,
    channels: Option<u32>,
    duration: Option<String>,
}

/// Audio-relevant facts about a media container
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetadata {
    pub audio_streams: usize,
    pub codec: Option<String>,
    pub sample_rate: Option<u32>,
    pub channels: Option<u32>,
    pub duration_seconds: Option<f64>,
    pub format_name: Option<String>,
}

impl AudioMetadata {
    pub fn has_audio(&self) -> bool {
        self.audio_streams > 0
    }
}

/// Parse `ffprobe -print_format json` output into [`AudioMetadata`].
///
/// Only streams with `codec_type == "audio"` are counted; the first of them
/// supplies codec, sample rate and channel count.
pub fn parse_probe_output(stdout: &[u8]) -> Result<AudioMetadata, ExtractionError> {
    let output: FFprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| ExtractionError::Decode(format!("Failed to parse ffprobe output: {}", e)))?;

    let audio: Vec<&FFprobeStream> = output
        .streams
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|s| s.codec_type.as_deref() == Some("audio"))
        .collect();

    let first = audio.first();

    let duration_seconds = output
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or_else(|| first.and_then(|s| s.duration.as_ref()))
        .and_then(|d| d.parse::<f64>().ok());

    Ok(AudioMetadata {
        audio_streams: audio.len(),
        codec: first.and_then(|s| s.codec_name.clone()),
        sample_rate: first
            .and_then(|s| s.sample_rate.as_ref())
            .and_then(|r| r.parse::<u32>().ok()),
        channels: first.and_then(|s| s.channels),
        duration_seconds,
        format_name: output.format.and_then(|f| f.format_name),
    })
}

#[derive(Debug, Clone)]
pub struct AudioProbe {
    ffprobe_path: String,
}

impl AudioProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.ffprobe_path
    }

    /// Inspect the audio streams of a file on disk.
    ///
    /// A container ffprobe cannot read is reported as [`ExtractionError::Decode`].
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path
    ))]
    pub async fn probe_path(&self, path: &Path) -> Result<AudioMetadata, ExtractionError> {
        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "-select_streams",
                "a",
            ])
            .arg(path)
            .output()
            .await
            .map_err(|e| ExtractionError::Toolchain(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            tracing::warn!(status = %output.status, stderr = %stderr, "ffprobe rejected input");
            return Err(ExtractionError::Decode(format!("ffprobe failed: {}", stderr)));
        }

        parse_probe_output(&output.stdout)
    }

    /// Inspect the audio streams of an in-memory container.
    pub async fn probe_bytes(&self, data: &[u8]) -> Result<AudioMetadata, ExtractionError> {
        let temp_file = tempfile::NamedTempFile::new()?;
        tokio::fs::write(temp_file.path(), data).await?;

        self.probe_path(temp_file.path()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_audio_stream() {
        let json = br#"{
            "streams": [
                {"codec_type": "video", "codec_name": "h264"},
                {"codec_type": "audio", "codec_name": "aac", "sample_rate": "48000", "channels": 2},
                {"codec_type": "audio", "codec_name": "mp3", "sample_rate": "44100", "channels": 1}
            ],
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "12.480000"}
        }"#;

        let metadata = parse_probe_output(json).unwrap();
        assert_eq!(metadata.audio_streams, 2);
        assert_eq!(metadata.codec.as_deref(), Some("aac"));
        assert_eq!(metadata.sample_rate, Some(48000));
        assert_eq!(metadata.channels, Some(2));
        assert_eq!(metadata.duration_seconds, Some(12.48));
        assert!(metadata.has_audio());
    }

    #[test]
    fn silent_container_has_no_audio() {
        let json = br#"{"streams": [], "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2"}}"#;
        let metadata = parse_probe_output(json).unwrap();
        assert_eq!(metadata.audio_streams, 0);
        assert!(!metadata.has_audio());
        assert_eq!(metadata.duration_seconds, None);
    }

    #[test]
    fn missing_sections_are_tolerated() {
        let metadata = parse_probe_output(b"{}").unwrap();
        assert!(!metadata.has_audio());
        assert_eq!(metadata.format_name, None);
    }

    #[test]
    fn stream_duration_used_when_format_lacks_one() {
        let json = br#"{"streams": [{"codec_type": "audio", "duration": "3.5"}], "format": {}}"#;
        let metadata = parse_probe_output(json).unwrap();
        assert_eq!(metadata.duration_seconds, Some(3.5));
    }

    #[test]
    fn garbage_output_is_decode_error() {
        let err = parse_probe_output(b"not json").unwrap_err();
        assert!(err.is_decode_error());
    }
}
