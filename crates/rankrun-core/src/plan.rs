//! Maps (flavor, worker count, template, command) onto the launcher's flag dialect.
use std::num::NonZeroU32;

use tracing::trace;

use rankrun_model::{
    LaunchPlan, ModelError, ModelResult, OutputTemplate, RuntimeFlavor, Stream,
};

const FLAG_WORKERS: &str = "-n";
const HYDRA_FLAG_STDOUT: &str = "-outfile-pattern";
const HYDRA_FLAG_STDERR: &str = "-errfile-pattern";
const OPENRTE_FLAG_OUTPUT: &str = "--output-filename";

/// Builds [`LaunchPlan`]s for one group launcher executable.
///
/// Building is pure: no I/O, and identical inputs always give equal plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanBuilder {
    program: String,
}

impl PlanBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Check the flavor-independent inputs of a plan.
    ///
    /// Needs no flavor, so callers can reject bad input before probing the launcher.
    pub fn validate(&self, worker_count: i64, command: &[String]) -> ModelResult<NonZeroU32> {
        if self.program.trim().is_empty() {
            return Err(ModelError::EmptyLauncher);
        }
        let workers = u32::try_from(worker_count)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or(ModelError::InvalidWorkerCount(worker_count))?;
        match command.first() {
            Some(head) if !head.trim().is_empty() => Ok(workers),
            _ => Err(ModelError::EmptyCommand),
        }
    }

    /// Build the launch plan.
    ///
    /// Fails with a configuration error if `worker_count <= 0`, `command` is empty or the
    /// launcher name is blank.
    pub fn build(
        &self,
        flavor: RuntimeFlavor,
        worker_count: i64,
        template: OutputTemplate,
        command: Vec<String>,
    ) -> ModelResult<LaunchPlan> {
        let workers = self.validate(worker_count, &command)?;

        let launcher_args = launcher_flags(flavor, workers, &template);
        trace!(
            program = %self.program,
            %flavor,
            workers = workers.get(),
            args = ?launcher_args,
            "launch flags resolved"
        );

        LaunchPlan::new(
            self.program.clone(),
            flavor,
            workers,
            template,
            launcher_args,
            command,
        )
    }
}

fn launcher_flags(
    flavor: RuntimeFlavor,
    workers: NonZeroU32,
    template: &OutputTemplate,
) -> Vec<String> {
    let mut args = vec![FLAG_WORKERS.to_string(), workers.to_string()];
    match flavor {
        RuntimeFlavor::Hydra => {
            args.push(HYDRA_FLAG_STDOUT.to_string());
            args.push(template.hydra_pattern(Stream::Stdout));
            args.push(HYDRA_FLAG_STDERR.to_string());
            args.push(template.hydra_pattern(Stream::Stderr));
        }
        RuntimeFlavor::OpenRte => {
            args.push(OPENRTE_FLAG_OUTPUT.to_string());
            args.push(template.prefix().display().to_string());
        }
    }
    args
}
