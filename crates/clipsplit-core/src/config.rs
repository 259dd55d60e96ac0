//! Configuration module
//!
//! Configuration is read from the process environment (optionally seeded from a
//! `.env` file) once at startup.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

const DEFAULT_FFMPEG_PATH: &str = "/opt/bin/ffmpeg";
const DEFAULT_FFPROBE_PATH: &str = "/opt/bin/ffprobe";
const AUDIO_BITRATE_KBPS: u32 = 192;
const MIN_AUDIO_BITRATE_KBPS: u32 = 32;
const MAX_AUDIO_BITRATE_KBPS: u32 = 320;

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Handler configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub log_format: LogFormat,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    // Toolchain configuration
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub audio_bitrate_kbps: u32,
    pub skip_toolchain_check: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|name| env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let environment = non_empty("ENVIRONMENT")
            .or_else(|| non_empty("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";

        let log_format = match non_empty("LOG_FORMAT") {
            Some(value) => value.parse::<LogFormat>()?,
            None if is_production => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let storage_backend = match non_empty("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => StorageBackend::S3,
        };

        let audio_bitrate_kbps = match non_empty("AUDIO_BITRATE_KBPS") {
            Some(value) => value.trim().parse::<u32>().map_err(|e| {
                anyhow::anyhow!("AUDIO_BITRATE_KBPS must be an integer: {}", e)
            })?,
            None => AUDIO_BITRATE_KBPS,
        };

        let skip_toolchain_check = non_empty("SKIP_TOOLCHAIN_CHECK")
            .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            environment,
            log_format,
            storage_backend,
            s3_region: non_empty("S3_REGION").or_else(|| non_empty("AWS_REGION")),
            s3_endpoint: non_empty("S3_ENDPOINT"),
            local_storage_path: non_empty("LOCAL_STORAGE_PATH"),
            ffmpeg_path: non_empty("FFMPEG_PATH").unwrap_or_else(|| DEFAULT_FFMPEG_PATH.to_string()),
            ffprobe_path: non_empty("FFPROBE_PATH")
                .unwrap_or_else(|| DEFAULT_FFPROBE_PATH.to_string()),
            audio_bitrate_kbps,
            skip_toolchain_check,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_backend == StorageBackend::Local && self.local_storage_path.is_none() {
            return Err(anyhow::anyhow!(
                "STORAGE_BACKEND=local requires LOCAL_STORAGE_PATH to be set"
            ));
        }

        if !(MIN_AUDIO_BITRATE_KBPS..=MAX_AUDIO_BITRATE_KBPS).contains(&self.audio_bitrate_kbps) {
            return Err(anyhow::anyhow!(
                "AUDIO_BITRATE_KBPS must be between {} and {}",
                MIN_AUDIO_BITRATE_KBPS,
                MAX_AUDIO_BITRATE_KBPS
            ));
        }

        if let Some(endpoint) = &self.s3_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(anyhow::anyhow!(
                    "S3_ENDPOINT must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }
}
