//! Spawn-and-wait shared by the launcher and the coverage reporter.
use std::{path::Path, process::Stdio};

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{ExecError, utils::exit_code};

/// Run `program` with inherited stdout/stderr until it exits or `cancel` fires.
///
/// Returns the exit code verbatim. On cancellation the child is killed and
/// [`ExecError::Canceled`] is returned.
pub(crate) async fn run_to_completion<I, S>(
    program: &Path,
    args: I,
    cancel: &CancellationToken,
) -> Result<i32, ExecError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let name = program.display().to_string();

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    trace!(program = %name, "spawning process");
    let mut child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ExecError::NotFound {
                program: name.clone(),
            }
        } else {
            ExecError::Spawn {
                program: name.clone(),
                reason: e.to_string(),
            }
        }
    })?;

    tokio::select! {
        res = child.wait() => {
            let status = res.map_err(|e| ExecError::Wait {
                program: name.clone(),
                reason: e.to_string(),
            })?;
            let code = exit_code(status);
            debug!(program = %name, code, "process exited");
            Ok(code)
        }
        _ = cancel.cancelled() => {
            debug!(program = %name, "cancellation requested; killing process");
            if let Err(e) = child.kill().await {
                debug!(program = %name, "failed to kill process: {e}");
            }
            Err(ExecError::Canceled { program: name })
        }
    }
}
