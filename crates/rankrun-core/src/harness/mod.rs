//! One-shot driver for detect → plan → launch → collect → aggregate.
//!
//! The harness owns no processes itself: fan-out happens inside the [`GroupLauncher`], and
//! the controlling task simply waits for it.
mod state;
pub use state::{HarnessState, Lifecycle};

use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use rankrun_model::{OutputTemplate, RunResult, RuntimeFlavor};

use crate::{
    aggregate::aggregate, collect::collect, error::CoreError, launcher::GroupLauncher,
    plan::PlanBuilder, probe::FlavorProbe,
};

/// Inputs of one launching run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Requested number of peers; validated by the plan builder.
    pub worker_count: i64,
    /// Where the peers write their output. Must not be shared with a concurrent run.
    pub template: OutputTemplate,
    /// Command executed by every rank.
    pub command: Vec<String>,
}

/// Drives runs against one group launcher.
///
/// The flavor probe is consulted once, on the first run, and its answer is reused by every
/// later run of the same harness (e.g. a coverage rerun after a plain run).
pub struct Harness {
    planner: PlanBuilder,
    probe: Arc<dyn FlavorProbe>,
    launcher: Arc<dyn GroupLauncher>,
    flavor: OnceCell<RuntimeFlavor>,
}

impl Harness {
    pub fn new(
        planner: PlanBuilder,
        probe: Arc<dyn FlavorProbe>,
        launcher: Arc<dyn GroupLauncher>,
    ) -> Self {
        Self {
            planner,
            probe,
            launcher,
            flavor: OnceCell::new(),
        }
    }

    /// Detected (or cached) runtime flavor.
    pub async fn flavor(&self) -> RuntimeFlavor {
        *self
            .flavor
            .get_or_init(|| async {
                let flavor = self.probe.detect().await;
                info!(probe = self.probe.name(), %flavor, "runtime flavor detected");
                flavor
            })
            .await
    }

    /// Execute one run.
    ///
    /// A nonzero group exit code is a normal outcome and comes back as `Ok`; configuration and
    /// launch errors abort the run before anything is collected.
    #[instrument(level = "debug", skip_all, fields(template = %req.template, workers = req.worker_count))]
    pub async fn run(
        &self,
        req: &RunRequest,
        cancel: CancellationToken,
    ) -> Result<RunResult, CoreError> {
        let mut lifecycle = Lifecycle::new();
        let result = self.drive(&mut lifecycle, req, cancel).await;
        if let Err(e) = &result {
            warn!(state = %lifecycle.state(), error = %e, "run aborted");
            lifecycle.fail();
        }
        result
    }

    async fn drive(
        &self,
        lifecycle: &mut Lifecycle,
        req: &RunRequest,
        cancel: CancellationToken,
    ) -> Result<RunResult, CoreError> {
        self.planner.validate(req.worker_count, &req.command)?;
        let flavor = self.flavor().await;
        lifecycle.advance(HarnessState::FlavorDetected)?;

        let plan = self.planner.build(
            flavor,
            req.worker_count,
            req.template.clone(),
            req.command.clone(),
        )?;
        lifecycle.advance(HarnessState::PlanBuilt)?;

        lifecycle.advance(HarnessState::Launching)?;
        info!(launcher = self.launcher.name(), plan = %plan, "launching process group");
        let exit_code = self.launcher.launch(&plan, cancel).await?;
        lifecycle.advance(HarnessState::Launched)?;

        lifecycle.advance(HarnessState::Collecting)?;
        let template = plan.template().clone();
        let workers = plan.worker_count();
        let per_rank = tokio::task::spawn_blocking(move || collect(&template, workers))
            .await
            .map_err(|e| CoreError::Collect(e.to_string()))?;
        let result = aggregate(exit_code, per_rank);
        lifecycle.advance(HarnessState::Done)?;

        info!(
            exit_code = result.exit_code,
            ranks = result.per_rank.len(),
            missing = result.missing_ranks().count(),
            "run finished"
        );
        Ok(result)
    }
}
