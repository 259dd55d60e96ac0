//! Audio split orchestration: fetch video → extract audio → store audio → relocate video.

use std::sync::Arc;

use clipsplit_core::{LogLevel, PipelineResult, TriggerEvent};
use clipsplit_storage::{is_derived_key, ObjectKeySet, ObjectStorage, StorageOperation};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::audio::AudioFormat;
use crate::pipeline::{PipelineError, PipelineStage};
use crate::traits::AudioExtractor;

/// Encoding of the extracted audio object.
pub const TARGET_FORMAT: AudioFormat = AudioFormat::Mp3;

/// What a successful invocation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitOutcome {
    Completed {
        bucket: String,
        keys: ObjectKeySet,
        audio_bytes: usize,
    },
    /// The triggering object was written by the pipeline itself.
    Skipped { bucket: String, key: String },
}

impl SplitOutcome {
    pub fn message(&self) -> String {
        match self {
            SplitOutcome::Completed { bucket, keys, .. } => format!(
                "Audio file successfully extracted and saved to {} in {}.",
                keys.audio_key, bucket
            ),
            SplitOutcome::Skipped { bucket, key } => {
                format!("Object {} in {} is already processed.", key, bucket)
            }
        }
    }
}

/// Runs one upload event through the split pipeline.
///
/// Steps run strictly in order and the first failure ends the invocation.
/// Completed steps are never rolled back.
pub struct AudioSplitOrchestrator {
    storage: Arc<dyn ObjectStorage>,
    extractor: Arc<dyn AudioExtractor>,
}

impl AudioSplitOrchestrator {
    pub fn new(storage: Arc<dyn ObjectStorage>, extractor: Arc<dyn AudioExtractor>) -> Self {
        Self { storage, extractor }
    }

    /// Process a raw trigger event and classify the outcome.
    pub async fn handle_event(&self, event: &Value) -> PipelineResult {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!("audio_split", invocation_id = %invocation_id);

        async move {
            match self.process(event).await {
                Ok(outcome) => {
                    let message = outcome.message();
                    tracing::info!(result = %message, "Invocation succeeded");
                    PipelineResult::success(message)
                }
                Err(e) => {
                    log_failure(&e);
                    PipelineResult::failure(e.category())
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the pipeline, returning the typed error on failure.
    pub async fn process(&self, event: &Value) -> Result<SplitOutcome, PipelineError> {
        let trigger = TriggerEvent::from_value(event)?;
        let TriggerEvent { bucket, key } = trigger;

        tracing::info!(bucket = %bucket, key = %key, "Received upload event");

        // Copying an output onto itself and then deleting the source would
        // remove the only copy of the video.
        if is_derived_key(&key) {
            tracing::info!(bucket = %bucket, key = %key, "Object is pipeline output, skipping");
            return Ok(SplitOutcome::Skipped { bucket, key });
        }

        let keys = ObjectKeySet::from_key(&key);
        if keys.base_name.is_empty() {
            return Err(PipelineError::EmptyBaseName(key));
        }

        tracing::info!(
            audio_key = %keys.audio_key,
            video_key = %keys.video_key,
            "Derived output keys"
        );

        let video = self
            .storage
            .get_object(&bucket, &key)
            .await
            .map_err(|e| {
                PipelineError::storage(StorageOperation::Get, PipelineStage::KeysDerived, e)
            })?;

        tracing::info!(size_bytes = video.len() as u64, "Fetched source video");

        let audio = self
            .extractor
            .extract(&video, TARGET_FORMAT.as_str())
            .await?;
        drop(video);

        if audio.is_empty() {
            return Err(PipelineError::EmptyAudio);
        }
        let audio_bytes = audio.len();

        self.storage
            .put_object(
                &bucket,
                &keys.audio_key,
                audio.to_vec(),
                TARGET_FORMAT.mime_type(),
            )
            .await
            .map_err(|e| {
                PipelineError::storage(StorageOperation::Put, PipelineStage::Extracted, e)
            })?;

        tracing::info!(
            audio_key = %keys.audio_key,
            size_bytes = audio_bytes as u64,
            "Stored extracted audio"
        );

        if let Err(e) = self
            .storage
            .copy_object(&bucket, &key, &keys.video_key)
            .await
        {
            tracing::warn!(
                bucket = %bucket,
                audio_key = %keys.audio_key,
                source_key = %key,
                "Audio stored but video was not relocated; outputs need reconciliation"
            );
            return Err(PipelineError::storage(
                StorageOperation::Copy,
                PipelineStage::AudioStored,
                e,
            ));
        }

        match self.storage.delete_object(&bucket, &key).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    bucket = %bucket,
                    key = %key,
                    "Original object already gone after copy, treating delete as done"
                );
            }
            Err(e) => {
                tracing::warn!(
                    bucket = %bucket,
                    source_key = %key,
                    video_key = %keys.video_key,
                    "Video copied but original not deleted; object is duplicated"
                );
                return Err(PipelineError::storage(
                    StorageOperation::Delete,
                    PipelineStage::VideoCopied,
                    e,
                ));
            }
        }

        tracing::info!(
            source_key = %key,
            video_key = %keys.video_key,
            "Relocated source video"
        );

        Ok(SplitOutcome::Completed {
            bucket,
            keys,
            audio_bytes,
        })
    }
}

fn log_failure(error: &PipelineError) {
    let category = error.category();
    let stage = error.completed_stage();

    match category.log_level() {
        LogLevel::Warn => tracing::warn!(
            error = %error,
            error_code = category.error_code(),
            completed_stage = %stage,
            "Invocation failed"
        ),
        LogLevel::Error => tracing::error!(
            error = %error,
            error_code = category.error_code(),
            completed_stage = %stage,
            partial = stage.has_side_effects(),
            "Invocation failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{s3_event, InjectedFailure, MockExtractor, MockStorage, StorageCall};
    use clipsplit_core::FailureCategory;
    use serde_json::json;

    const BUCKET: &str = "media";
    const MP3: &[u8] = b"ID3\x04\x00fake-mp3-frames";

    fn orchestrator(storage: &MockStorage, extractor: &MockExtractor) -> AudioSplitOrchestrator {
        AudioSplitOrchestrator::new(Arc::new(storage.clone()), Arc::new(extractor.clone()))
    }

    fn seeded(key: &str) -> MockStorage {
        MockStorage::new().with_object(BUCKET, key, b"\0\0\0\x18ftypmp42video".to_vec())
    }

    #[tokio::test]
    async fn splits_upload_into_audio_and_video() {
        let storage = seeded("uploads/trip.mp4");
        let extractor = MockExtractor::returning(MP3);

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await;

        assert_eq!(
            result,
            PipelineResult::success(
                "Audio file successfully extracted and saved to data/trip/audio.mp3 in media."
            )
        );
        assert_eq!(storage.object(BUCKET, "data/trip/audio.mp3").unwrap(), MP3);
        assert_eq!(
            storage.content_type(BUCKET, "data/trip/audio.mp3").as_deref(),
            Some("audio/mpeg")
        );
        assert!(storage.has_object(BUCKET, "data/trip/video.mp4"));
        assert!(!storage.has_object(BUCKET, "uploads/trip.mp4"));
        assert_eq!(
            storage.operations(),
            vec![
                StorageOperation::Get,
                StorageOperation::Put,
                StorageOperation::Copy,
                StorageOperation::Delete
            ]
        );
        assert_eq!(extractor.requested_formats(), vec!["mp3".to_string()]);
    }

    #[tokio::test]
    async fn encoded_keys_are_decoded_before_use() {
        let storage = seeded("uploads/my trip.mp4");
        let extractor = MockExtractor::returning(MP3);

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "uploads/my+trip.mp4"))
            .await;

        assert!(result.is_success());
        assert!(storage.has_object(BUCKET, "data/my trip/audio.mp3"));
        assert!(storage.has_object(BUCKET, "data/my trip/video.mp4"));
    }

    #[tokio::test]
    async fn event_without_key_is_malformed_and_touches_nothing() {
        let storage = MockStorage::new();
        let extractor = MockExtractor::returning(MP3);
        let event = json!({"Records": [{"s3": {"bucket": {"name": BUCKET}, "object": {}}}]});

        let result = orchestrator(&storage, &extractor).handle_event(&event).await;

        assert_eq!(result.category(), Some(FailureCategory::MalformedEvent));
        assert_eq!(result.status_code(), 400);
        assert_eq!(result.message(), "Error processing event. Key not found.");
        assert!(storage.calls().is_empty());
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn empty_records_is_malformed() {
        let storage = MockStorage::new();
        let extractor = MockExtractor::returning(MP3);

        let result = orchestrator(&storage, &extractor)
            .handle_event(&json!({"Records": []}))
            .await;

        assert_eq!(result.category(), Some(FailureCategory::MalformedEvent));
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn key_with_empty_base_name_is_malformed() {
        let storage = MockStorage::new();
        let extractor = MockExtractor::returning(MP3);

        let err = orchestrator(&storage, &extractor)
            .process(&s3_event(BUCKET, "uploads/"))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::EmptyBaseName(_)));
        assert_eq!(err.category(), FailureCategory::MalformedEvent);
        assert!(storage.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_source_object_is_storage_error() {
        let storage = MockStorage::new();
        let extractor = MockExtractor::returning(MP3);

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "uploads/gone.mp4"))
            .await;

        assert_eq!(result.category(), Some(FailureCategory::StorageError));
        assert_eq!(result.status_code(), 500);
        assert_eq!(extractor.call_count(), 0);
        assert_eq!(storage.operations(), vec![StorageOperation::Get]);
    }

    #[tokio::test]
    async fn undecodable_video_stops_before_any_write() {
        let storage = seeded("uploads/corrupt.mp4");
        let extractor = MockExtractor::failing_decode("moov atom not found");

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "uploads/corrupt.mp4"))
            .await;

        assert_eq!(result.category(), Some(FailureCategory::ExtractionError));
        assert_eq!(result.message(), "Error extracting audio from video.");
        assert_eq!(storage.operations(), vec![StorageOperation::Get]);
        assert!(storage.has_object(BUCKET, "uploads/corrupt.mp4"));
    }

    #[tokio::test]
    async fn encoder_failure_stops_before_any_write() {
        let storage = seeded("uploads/trip.mp4");
        let extractor = MockExtractor::failing_encode("Unknown encoder libmp3lame");

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await;

        assert_eq!(result.category(), Some(FailureCategory::ExtractionError));
        assert_eq!(result.status_code(), 500);
        assert_eq!(result.message(), "Error extracting audio from video.");
        assert_eq!(storage.operations(), vec![StorageOperation::Get]);
        assert!(storage.has_object(BUCKET, "uploads/trip.mp4"));
        assert!(!storage.has_object(BUCKET, "data/trip/audio.mp3"));
    }

    #[tokio::test]
    async fn silent_video_is_extraction_error() {
        let storage = seeded("uploads/silent.mp4");
        let extractor = MockExtractor::no_audio_stream();

        let err = orchestrator(&storage, &extractor)
            .process(&s3_event(BUCKET, "uploads/silent.mp4"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), FailureCategory::ExtractionError);
        assert_eq!(err.completed_stage(), PipelineStage::Fetched);
    }

    #[tokio::test]
    async fn empty_audio_buffer_is_rejected() {
        let storage = seeded("uploads/trip.mp4");
        let extractor = MockExtractor::empty();

        let err = orchestrator(&storage, &extractor)
            .process(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::EmptyAudio));
        assert_eq!(storage.calls_for(StorageOperation::Put), vec![]);
    }

    #[tokio::test]
    async fn quota_exceeded_on_put_leaves_source_untouched() {
        let storage = seeded("uploads/trip.mp4")
            .fail_on(StorageOperation::Put, InjectedFailure::QuotaExceeded);
        let extractor = MockExtractor::returning(MP3);

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await;

        assert_eq!(result.category(), Some(FailureCategory::StorageError));
        assert!(storage.has_object(BUCKET, "uploads/trip.mp4"));
        assert!(!storage.has_object(BUCKET, "data/trip/audio.mp3"));
        assert_eq!(storage.calls_for(StorageOperation::Copy), vec![]);
    }

    #[tokio::test]
    async fn copy_failure_keeps_stored_audio() {
        let storage = seeded("uploads/trip.mp4")
            .fail_on(StorageOperation::Copy, InjectedFailure::AccessDenied);
        let extractor = MockExtractor::returning(MP3);

        let err = orchestrator(&storage, &extractor)
            .process(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), FailureCategory::StorageError);
        assert_eq!(err.completed_stage(), PipelineStage::AudioStored);
        // No rollback
        assert!(storage.has_object(BUCKET, "data/trip/audio.mp3"));
        assert!(storage.has_object(BUCKET, "uploads/trip.mp4"));
        assert_eq!(storage.calls_for(StorageOperation::Delete), vec![]);
    }

    #[tokio::test]
    async fn delete_failure_reports_duplicated_video() {
        let storage = seeded("uploads/trip.mp4")
            .fail_on(StorageOperation::Delete, InjectedFailure::AccessDenied);
        let extractor = MockExtractor::returning(MP3);

        let err = orchestrator(&storage, &extractor)
            .process(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await
            .unwrap_err();

        assert_eq!(err.category(), FailureCategory::StorageError);
        assert_eq!(err.completed_stage(), PipelineStage::VideoCopied);
        assert!(storage.has_object(BUCKET, "data/trip/video.mp4"));
        assert!(storage.has_object(BUCKET, "uploads/trip.mp4"));
    }

    #[tokio::test]
    async fn delete_of_already_missing_original_is_success() {
        let storage = seeded("uploads/trip.mp4")
            .fail_on(StorageOperation::Delete, InjectedFailure::NotFound);
        let extractor = MockExtractor::returning(MP3);

        let outcome = orchestrator(&storage, &extractor)
            .process(&s3_event(BUCKET, "uploads/trip.mp4"))
            .await
            .unwrap();

        assert!(matches!(outcome, SplitOutcome::Completed { audio_bytes, .. } if audio_bytes == MP3.len()));
    }

    #[tokio::test]
    async fn pipeline_output_events_are_skipped() {
        let storage = seeded("data/trip/video.mp4");
        let extractor = MockExtractor::returning(MP3);

        let result = orchestrator(&storage, &extractor)
            .handle_event(&s3_event(BUCKET, "data/trip/video.mp4"))
            .await;

        assert!(result.is_success());
        assert_eq!(
            result.message(),
            "Object data/trip/video.mp4 in media is already processed."
        );
        assert!(storage.calls().is_empty());
        assert!(storage.has_object(BUCKET, "data/trip/video.mp4"));
        assert_eq!(extractor.call_count(), 0);
    }

    #[tokio::test]
    async fn rerun_after_success_reports_missing_source() {
        let storage = seeded("uploads/trip.mp4");
        let extractor = MockExtractor::returning(MP3);
        let orchestrator = orchestrator(&storage, &extractor);
        let event = s3_event(BUCKET, "uploads/trip.mp4");

        assert!(orchestrator.handle_event(&event).await.is_success());
        let second = orchestrator.handle_event(&event).await;

        assert_eq!(second.category(), Some(FailureCategory::StorageError));
        assert_eq!(
            storage.calls().last(),
            Some(&StorageCall::Get {
                bucket: BUCKET.to_string(),
                key: "uploads/trip.mp4".to_string()
            })
        );
        assert!(storage.has_object(BUCKET, "data/trip/audio.mp3"));
    }
}
