use thiserror::Error;

/// Invalid harness inputs.
///
/// Every variant is the caller's fault: nothing has been spawned when one of these is returned.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("worker count must be positive, got {0}")]
    InvalidWorkerCount(i64),

    #[error("launch command is empty")]
    EmptyCommand,

    #[error("group launcher executable name is empty")]
    EmptyLauncher,

    #[error("invalid output template: {0}")]
    InvalidTemplate(String),

    #[error("unknown runtime flavor: {0}")]
    UnknownFlavor(String),

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("invalid model: {0}")]
    Invalid(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
