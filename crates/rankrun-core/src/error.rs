use thiserror::Error;

use rankrun_model::ModelError;

use crate::{harness::HarnessState, launcher::LaunchError};

/// Orchestration failure: the run was aborted before a verdict could be derived.
///
/// A failing test suite is not a `CoreError`; it is a [`rankrun_model::RunResult`] with a nonzero exit code.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ModelError),

    #[error("launch error: {0}")]
    Launch(#[from] LaunchError),

    #[error("output collection failed: {0}")]
    Collect(String),

    #[error("illegal harness transition: {from} -> {to}")]
    IllegalTransition { from: HarnessState, to: HarnessState },
}
