use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use rankrun_core::probe::FlavorProbe;
use rankrun_model::RuntimeFlavor;

use crate::{ExecError, utils::resolve_program};

/// Detects the runtime flavor from `<launcher> --version`.
///
/// Any probe failure (missing executable, spawn error, timeout) falls back to
/// [`RuntimeFlavor::default`]; a wrong guess only affects output file naming.
#[derive(Debug, Clone)]
pub struct VersionProbe {
    program: String,
    timeout: Duration,
}

impl VersionProbe {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Combined stdout and stderr of the version command.
    ///
    /// A nonzero exit status is not an error: some launchers print their banner and exit 1.
    async fn version_output(&self) -> Result<String, ExecError> {
        let path = resolve_program(&self.program).ok_or_else(|| ExecError::NotFound {
            program: self.program.clone(),
        })?;

        let mut cmd = Command::new(&path);
        cmd.arg("--version").stdin(Stdio::null()).kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ExecError::Timeout {
                program: self.program.clone(),
                timeout: self.timeout,
            })?
            .map_err(|e| ExecError::Spawn {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            debug!(program = %self.program, status = %output.status, "version command exited unsuccessfully");
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

#[async_trait]
impl FlavorProbe for VersionProbe {
    fn name(&self) -> &'static str {
        "version"
    }

    async fn detect(&self) -> RuntimeFlavor {
        match self.version_output().await {
            Ok(text) => RuntimeFlavor::from_version_output(&text),
            Err(e) => {
                let fallback = RuntimeFlavor::default();
                warn!(error = %e, %fallback, "runtime flavor probe failed; using fallback");
                fallback
            }
        }
    }
}
