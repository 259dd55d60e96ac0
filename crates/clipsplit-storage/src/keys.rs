//! Key derivation for split outputs.
//!
//! Key format: `data/{base}/audio.mp3` and `data/{base}/video.mp4`, where
//! `{base}` is the stem of the source object's file name.

/// Root prefix of the output layout.
pub const OUTPUT_PREFIX: &str = "data";
/// File name of the extracted audio inside a per-file directory.
pub const AUDIO_FILENAME: &str = "audio.mp3";
/// File name of the relocated video inside a per-file directory.
pub const VIDEO_FILENAME: &str = "video.mp4";

/// Destination keys for one source object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKeySet {
    pub base_name: String,
    pub audio_key: String,
    pub video_key: String,
}

impl ObjectKeySet {
    /// Derive the key set for a source object key.
    pub fn from_key(key: &str) -> Self {
        derive_keys(base_name(key))
    }

    /// The per-file directory both outputs live in, with trailing slash.
    pub fn directory(&self) -> String {
        format!("{}/{}/", OUTPUT_PREFIX, self.base_name)
    }
}

/// Stem of the key's final path segment: no directories, no final extension.
///
/// Leading dots never start an extension, so `.mp4` stays `.mp4`. A key that
/// ends in `/` has an empty stem.
pub fn base_name(key: &str) -> &str {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();

    match file_name[leading_dots..].rfind('.') {
        Some(pos) => &file_name[..leading_dots + pos],
        None => file_name,
    }
}

/// Build the output keys for a base name.
///
/// Total: an empty base name yields `data//audio.mp3` and `data//video.mp4`.
/// Callers are expected to reject empty base names first.
pub fn derive_keys(base_name: &str) -> ObjectKeySet {
    ObjectKeySet {
        base_name: base_name.to_string(),
        audio_key: format!("{}/{}/{}", OUTPUT_PREFIX, base_name, AUDIO_FILENAME),
        video_key: format!("{}/{}/{}", OUTPUT_PREFIX, base_name, VIDEO_FILENAME),
    }
}

/// Whether a key already belongs to the output layout.
///
/// Objects written by the pipeline itself can re-trigger it; those events
/// should not be processed again.
pub fn is_derived_key(key: &str) -> bool {
    let segments: Vec<&str> = key.split('/').collect();
    matches!(
        segments.as_slice(),
        [prefix, _, file] if *prefix == OUTPUT_PREFIX
            && (*file == AUDIO_FILENAME || *file == VIDEO_FILENAME)
    )
}
