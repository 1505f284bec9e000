use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rankrun_core::prelude::*;
use rankrun_exec::{CoverageReporter, ExecError, MpiexecLauncher, VersionProbe};
use rankrun_model::Operation;

use crate::cli::Cli;

/// Exit code for configuration and launch errors.
///
/// A group launcher may exit with 124 or 125 too; those pass through unchanged.
pub const EXIT_ABORTED: u8 = 125;
/// Exit code when the caller's timeout interrupted the run.
pub const EXIT_INTERRUPTED: u8 = 124;

/// Execute the selected operation and return the group exit code.
pub async fn execute(cli: &Cli) -> anyhow::Result<i32> {
    let mut cfg = load_config(cli.opts.config.as_deref()).await?;
    cli.apply(&mut cfg);

    let op = cli.command.operation();
    let cancel = CancellationToken::new();
    if let Some(secs) = cli.opts.timeout_secs {
        arm_timeout(cancel.clone(), Duration::from_secs(secs));
    }

    if op == Operation::CoverageReport {
        let code = CoverageReporter::new(&cfg.coverage, &cfg.html_dir)
            .run(&cancel)
            .await?;
        return Ok(code);
    }

    let req = cfg.request(op).map_err(CoreError::from)?;
    let result = harness(&cfg).run(&req, cancel).await?;
    println!("{}", Summary(&result));
    info!(%op, code = result.exit_code, "run finished");
    Ok(result.exit_code)
}

/// Default config, or the JSON file at `path` with defaults for missing fields.
pub async fn load_config(path: Option<&Path>) -> anyhow::Result<HarnessConfig> {
    let Some(path) = path else {
        return Ok(HarnessConfig::default());
    };
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

fn harness(cfg: &HarnessConfig) -> Harness {
    let probe: Arc<dyn FlavorProbe> = match cfg.flavor {
        FlavorSetting::Auto => Arc::new(VersionProbe::new(cfg.launcher.clone())),
        FlavorSetting::Fixed(flavor) => Arc::new(StaticFlavor(flavor)),
    };
    Harness::new(cfg.planner(), probe, Arc::new(MpiexecLauncher::new()))
}

fn arm_timeout(cancel: CancellationToken, after: Duration) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(after) => {
                warn!(?after, "timeout reached; interrupting run");
                cancel.cancel();
            }
            _ = cancel.cancelled() => {}
        }
    });
}

/// Process exit status for a group exit code.
///
/// Codes are truncated to a byte the way the OS would, except that a nonzero code never
/// turns into success.
pub fn exit_status(code: i32) -> u8 {
    let byte = (code & 0xff) as u8;
    if code != 0 && byte == 0 { 1 } else { byte }
}

/// Process exit status for an aborted run.
pub fn failure_status(err: &anyhow::Error) -> u8 {
    let interrupted = match err.downcast_ref::<CoreError>() {
        Some(CoreError::Launch(LaunchError::Interrupted)) => true,
        _ => matches!(
            err.downcast_ref::<ExecError>(),
            Some(ExecError::Canceled { .. } | ExecError::Timeout { .. })
        ),
    };
    if interrupted {
        EXIT_INTERRUPTED
    } else {
        EXIT_ABORTED
    }
}
