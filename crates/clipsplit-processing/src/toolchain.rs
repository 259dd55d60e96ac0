//! Media toolchain capability check
//!
//! Run once at cold start: every configured tool must exist, be executable and
//! answer `-version`. A failing check means the deployment is broken, so the
//! handler refuses to process events.

use serde::Serialize;
use std::path::Path;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("Invalid {tool} path: {reason}")]
    InvalidPath { tool: String, reason: String },

    #[error("{tool} not found at {path}")]
    Missing { tool: String, path: String },

    #[error("{tool} at {path} is not executable")]
    NotExecutable { tool: String, path: String },

    #[error("Failed to execute {tool}: {message}")]
    Spawn { tool: String, message: String },

    #[error("{tool} -version exited with {status}")]
    Failed { tool: String, status: String },
}

/// One verified tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolReport {
    pub name: String,
    pub path: String,
    /// First line of the tool's `-version` output
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainReport {
    pub tools: Vec<ToolReport>,
}

impl ToolchainReport {
    pub fn tool(&self, name: &str) -> Option<&ToolReport> {
        self.tools.iter().find(|t| t.name == name)
    }
}

/// Reject tool paths carrying shell metacharacters or traversal sequences.
pub fn validate_tool_path(tool: &str, path: &str) -> Result<(), ToolchainError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];

    let reason = if path.trim().is_empty() {
        Some("path is empty")
    } else if path.chars().any(|c| dangerous_chars.contains(&c)) {
        Some("contains dangerous characters")
    } else if path.contains("..") {
        Some("contains directory traversal")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ToolchainError::InvalidPath {
            tool: tool.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    metadata.is_file()
}

/// Verify a single tool and capture its version banner.
pub async fn check_tool(tool: &str, path: &str) -> Result<ToolReport, ToolchainError> {
    validate_tool_path(tool, path)?;

    let metadata = tokio::fs::metadata(Path::new(path))
        .await
        .map_err(|_| ToolchainError::Missing {
            tool: tool.to_string(),
            path: path.to_string(),
        })?;

    if !is_executable(&metadata) {
        return Err(ToolchainError::NotExecutable {
            tool: tool.to_string(),
            path: path.to_string(),
        });
    }

    let output = Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ToolchainError::Spawn {
            tool: tool.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(ToolchainError::Failed {
            tool: tool.to_string(),
            status: output.status.to_string(),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(ToolReport {
        name: tool.to_string(),
        path: path.to_string(),
        version,
    })
}

/// Verify ffmpeg and ffprobe; stops at the first failing tool.
#[tracing::instrument]
pub async fn check_toolchain(
    ffmpeg_path: &str,
    ffprobe_path: &str,
) -> Result<ToolchainReport, ToolchainError> {
    let mut tools = Vec::with_capacity(2);

    for (name, path) in [("ffmpeg", ffmpeg_path), ("ffprobe", ffprobe_path)] {
        match check_tool(name, path).await {
            Ok(report) => {
                tracing::info!(
                    tool = %report.name,
                    path = %report.path,
                    version = %report.version,
                    "Toolchain component available"
                );
                tools.push(report);
            }
            Err(e) => {
                tracing::error!(tool = %name, path = %path, error = %e, "Toolchain check failed");
                return Err(e);
            }
        }
    }

    Ok(ToolchainReport { tools })
}
