//! Trigger event model
//!
//! The event source delivers an S3-style object-created notification. Only the
//! first record is used.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Why a trigger event could not be turned into a [`TriggerEvent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    #[error("Event does not match the notification shape: {0}")]
    InvalidShape(String),

    #[error("Event contains no records")]
    NoRecords,

    #[error("Event record has an empty bucket name")]
    EmptyBucket,

    #[error("Event record has an empty object key")]
    EmptyKey,

    #[error("Object key is not valid percent-encoded UTF-8: {0}")]
    UndecodableKey(String),
}

#[derive(Debug, Deserialize)]
struct S3Event {
    #[serde(rename = "Records")]
    records: Vec<S3Record>,
}

#[derive(Debug, Deserialize)]
struct S3Record {
    s3: S3Entity,
}

#[derive(Debug, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Deserialize)]
struct S3Object {
    key: String,
}

/// Reference to the newly created object that triggered the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    pub bucket: String,
    pub key: String,
}

impl TriggerEvent {
    /// Parse the first record of a notification.
    ///
    /// Object keys arrive form-encoded (`+` for space, `%XX` escapes) and are
    /// decoded here.
    pub fn from_value(event: &Value) -> Result<Self, EventError> {
        let parsed = S3Event::deserialize(event)
            .map_err(|e| EventError::InvalidShape(e.to_string()))?;

        let record = parsed
            .records
            .into_iter()
            .next()
            .ok_or(EventError::NoRecords)?;

        let bucket = record.s3.bucket.name;
        if bucket.trim().is_empty() {
            return Err(EventError::EmptyBucket);
        }

        let key = decode_object_key(&record.s3.object.key)?;
        if key.is_empty() {
            return Err(EventError::EmptyKey);
        }

        Ok(Self { bucket, key })
    }
}

/// Decode an object key as delivered in S3 notifications.
pub fn decode_object_key(raw: &str) -> Result<String, EventError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| EventError::UndecodableKey(e.to_string()))
}
