//! ffmpeg-backed audio extraction

use super::error::stderr_tail;
use super::{AudioFormat, AudioProbe, ExtractionError};
use crate::toolchain::{validate_tool_path, ToolchainError};
use crate::traits::AudioExtractor;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

const DEFAULT_BITRATE_KBPS: u32 = 192;

/// Extracts the first audio stream of a container with ffmpeg.
///
/// The container is staged in a temporary file because MP4 demuxing needs a
/// seekable input; the encoded audio is read back from ffmpeg's stdout.
pub struct FfmpegAudioExtractor {
    ffmpeg_path: String,
    probe: AudioProbe,
    bitrate_kbps: u32,
}

impl FfmpegAudioExtractor {
    pub fn new(
        ffmpeg_path: impl Into<String>,
        ffprobe_path: impl Into<String>,
    ) -> Result<Self, ToolchainError> {
        let ffmpeg_path = ffmpeg_path.into();
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path("ffmpeg", &ffmpeg_path)?;
        validate_tool_path("ffprobe", &ffprobe_path)?;

        Ok(Self {
            ffmpeg_path,
            probe: AudioProbe::new(ffprobe_path),
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
        })
    }

    pub fn with_bitrate(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    pub fn bitrate_kbps(&self) -> u32 {
        self.bitrate_kbps
    }

    async fn encode(&self, input_path: &Path, format: AudioFormat) -> Result<Bytes, ExtractionError> {
        let args = encode_args(input_path, format, self.bitrate_kbps);

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExtractionError::Toolchain(format!("Failed to execute ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = stderr_tail(&output.stderr);
            tracing::error!(
                status = %output.status,
                stderr = %stderr,
                format = %format,
                "FFmpeg audio extraction failed"
            );
            return Err(ExtractionError::Encode(format!(
                "FFmpeg audio extraction failed ({}): {}",
                output.status, stderr
            )));
        }

        if output.stdout.is_empty() {
            return Err(ExtractionError::Encode(
                "FFmpeg produced no audio output".to_string(),
            ));
        }

        Ok(Bytes::from(output.stdout))
    }
}

/// ffmpeg arguments that encode the first audio stream of `input_path` to stdout.
pub(crate) fn encode_args(input_path: &Path, format: AudioFormat, bitrate_kbps: u32) -> Vec<String> {
    let mut args = vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-v".to_string(),
        "error".to_string(),
        "-i".to_string(),
        input_path.to_string_lossy().to_string(),
        "-vn".to_string(), // No video
        "-map".to_string(),
        "0:a:0".to_string(),
        "-c:a".to_string(),
        format.codec().to_string(),
    ];

    if format.is_lossy() {
        args.extend_from_slice(&["-b:a".to_string(), format!("{}k", bitrate_kbps)]);
    }

    args.extend_from_slice(&[
        "-f".to_string(),
        format.muxer().to_string(),
        "pipe:1".to_string(),
    ]);

    args
}

#[async_trait]
impl AudioExtractor for FfmpegAudioExtractor {
    #[tracing::instrument(skip(self, container), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        input_bytes = container.len(),
        ffmpeg.operation = "extract_audio"
    ))]
    async fn extract(
        &self,
        container: &[u8],
        target_format: &str,
    ) -> Result<Bytes, ExtractionError> {
        if container.is_empty() {
            return Err(ExtractionError::Decode("Input container is empty".to_string()));
        }

        let format: AudioFormat = target_format.parse()?;
        let start = std::time::Instant::now();

        let input_temp = tempfile::NamedTempFile::new()?;
        tokio::fs::write(input_temp.path(), container).await?;

        let metadata = self.probe.probe_path(input_temp.path()).await?;
        if !metadata.has_audio() {
            return Err(ExtractionError::NoAudioStream);
        }

        let audio = self.encode(input_temp.path(), format).await?;

        tracing::info!(
            format = %format,
            source_codec = metadata.codec.as_deref().unwrap_or("unknown"),
            duration_seconds = metadata.duration_seconds.unwrap_or_default(),
            output_bytes = audio.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Audio extracted"
        );

        Ok(audio)
    }
}
