use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("group launcher not found: {program}")]
    NotFound { program: String },

    #[error("failed to prepare output directory {}: {reason}", .path.display())]
    Prepare { path: PathBuf, reason: String },

    #[error("failed to spawn group launcher '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("failed waiting for group launcher: {0}")]
    Wait(String),

    #[error("launch interrupted; per-rank output is unreliable")]
    Interrupted,
}
