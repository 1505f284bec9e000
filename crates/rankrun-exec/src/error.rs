use std::time::Duration;

use thiserror::Error;

use rankrun_core::launcher::LaunchError;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("executable not found: {program}")]
    NotFound { program: String },

    #[error("failed to spawn '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("failed waiting for '{program}': {reason}")]
    Wait { program: String, reason: String },

    #[error("'{program}' did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("'{program}' was canceled")]
    Canceled { program: String },
}

impl From<ExecError> for LaunchError {
    fn from(e: ExecError) -> Self {
        match e {
            ExecError::NotFound { program } => LaunchError::NotFound { program },
            ExecError::Spawn { program, reason } => LaunchError::Spawn { program, reason },
            ExecError::Wait { reason, .. } => LaunchError::Wait(reason),
            ExecError::Timeout { .. } | ExecError::Canceled { .. } => LaunchError::Interrupted,
        }
    }
}
