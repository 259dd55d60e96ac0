//! Cold-start setup: toolchain verification and orchestrator wiring

use anyhow::{Context, Result};
use clipsplit_core::Config;
use clipsplit_processing::{
    check_toolchain, AudioSplitOrchestrator, FfmpegAudioExtractor, ToolchainReport,
};
use clipsplit_storage::{create_storage, ObjectStorage};
use std::sync::Arc;

/// Verify ffmpeg and ffprobe unless the check is disabled.
///
/// Returns `None` when `SKIP_TOOLCHAIN_CHECK` is set.
pub async fn verify_toolchain(config: &Config) -> Result<Option<ToolchainReport>> {
    if config.skip_toolchain_check {
        tracing::warn!("Toolchain check skipped by configuration");
        return Ok(None);
    }

    let report = check_toolchain(&config.ffmpeg_path, &config.ffprobe_path)
        .await
        .context("Media toolchain is not usable")?;

    Ok(Some(report))
}

/// Build the orchestrator with the configured storage backend.
pub async fn build_orchestrator(config: &Config) -> Result<AudioSplitOrchestrator> {
    tracing::info!("Initializing storage...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    build_orchestrator_with_storage(config, storage)
}

/// Build the orchestrator around an existing storage gateway.
pub fn build_orchestrator_with_storage(
    config: &Config,
    storage: Arc<dyn ObjectStorage>,
) -> Result<AudioSplitOrchestrator> {
    let extractor = FfmpegAudioExtractor::new(&config.ffmpeg_path, &config.ffprobe_path)
        .context("Invalid toolchain configuration")?
        .with_bitrate(config.audio_bitrate_kbps);

    Ok(AudioSplitOrchestrator::new(storage, Arc::new(extractor)))
}
