//! Test helpers for pipeline tests
//!
//! In-memory doubles for the storage gateway and the audio extractor, so the
//! orchestrator can be exercised without a bucket or a media toolchain.

pub mod mock_extractor;
pub mod mock_storage;

pub use mock_extractor::*;
pub use mock_storage::*;

use serde_json::{json, Value};

/// Build a single-record object-created notification.
pub fn s3_event(bucket: &str, key: &str) -> Value {
    json!({
        "Records": [
            {
                "eventSource": "aws:s3",
                "eventName": "ObjectCreated:Put",
                "s3": {
                    "bucket": { "name": bucket },
                    "object": { "key": key, "size": 1024 }
                }
            }
        ]
    })
}
