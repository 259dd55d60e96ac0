//! Test helpers: an orchestrator over temp-dir local storage.
//!
//! Run from workspace root: `cargo test -p clipsplit-handler`.

use clipsplit_processing::test_helpers::MockExtractor;
use clipsplit_processing::AudioSplitOrchestrator;
use clipsplit_storage::{LocalStorage, ObjectStorage};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const BUCKET: &str = "uploads-bucket";

/// Test application: orchestrator plus the storage it writes to.
pub struct TestApp {
    pub orchestrator: AudioSplitOrchestrator,
    pub storage: Arc<LocalStorage>,
    pub extractor: MockExtractor,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new(extractor: MockExtractor) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let storage = Arc::new(
            LocalStorage::new(temp_dir.path())
                .await
                .expect("Failed to create local storage"),
        );

        let orchestrator = AudioSplitOrchestrator::new(storage.clone(), Arc::new(extractor.clone()));

        Self {
            orchestrator,
            storage,
            extractor,
            _temp_dir: temp_dir,
        }
    }

    pub async fn upload(&self, key: &str, data: &[u8]) {
        self.storage
            .put_object(BUCKET, key, data.to_vec(), "video/mp4")
            .await
            .expect("Failed to seed object");
    }

    pub async fn read(&self, key: &str) -> Option<Vec<u8>> {
        self.storage.get_object(BUCKET, key).await.ok()
    }

    pub fn path_of(&self, key: &str) -> PathBuf {
        self.storage.base_path().join(BUCKET).join(key)
    }
}

/// Notification payload as delivered by the event source.
pub fn event_payload(bucket: &str, key: &str) -> String {
    clipsplit_processing::test_helpers::s3_event(bucket, key).to_string()
}
