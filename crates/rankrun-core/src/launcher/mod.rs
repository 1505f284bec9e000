//! Seam between the harness and whatever actually starts the process group.
mod error;
pub use error::LaunchError;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use rankrun_model::LaunchPlan;

/// Starts a process group for a [`LaunchPlan`] and waits for all of it to terminate.
///
/// Implementations must:
/// - fail with [`LaunchError::NotFound`] before touching the output directory when the launcher is missing;
/// - create the output directory if absent and remove stale files owned by the plan's template;
/// - return the launcher's own exit code verbatim (it already folds the peers' statuses into one);
/// - kill the launcher and return [`LaunchError::Interrupted`] once `cancel` fires.
#[async_trait]
pub trait GroupLauncher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn launch(&self, plan: &LaunchPlan, cancel: CancellationToken) -> Result<i32, LaunchError>;
}
