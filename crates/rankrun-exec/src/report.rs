//! Coverage post-processing: merge per-rank data files and render HTML.
//!
//! No process group is involved; the coverage tool runs once, directly.
use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::{ExecError, process::run_to_completion, utils::resolve_program};

/// Runs `<coverage> combine` followed by `<coverage> html -d <html_dir>`.
#[derive(Debug, Clone)]
pub struct CoverageReporter {
    tool: String,
    html_dir: PathBuf,
}

impl CoverageReporter {
    pub fn new(tool: impl Into<String>, html_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool: tool.into(),
            html_dir: html_dir.into(),
        }
    }

    fn steps(&self) -> [Vec<String>; 2] {
        [
            vec!["combine".to_string()],
            vec![
                "html".to_string(),
                "-d".to_string(),
                self.html_dir.display().to_string(),
            ],
        ]
    }

    /// Run every step in order.
    ///
    /// Stops at the first step exiting nonzero and returns its code verbatim; returns `0` when all
    /// steps succeed.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<i32, ExecError> {
        let tool = resolve_program(&self.tool).ok_or_else(|| ExecError::NotFound {
            program: self.tool.clone(),
        })?;

        for args in self.steps() {
            let step = args[0].clone();
            let code = run_to_completion(&tool, &args, cancel).await?;
            if code != 0 {
                warn!(step = %step, code, "coverage step failed");
                return Ok(code);
            }
        }

        info!(html_dir = %self.html_dir.display(), "coverage report written");
        Ok(0)
    }
}
