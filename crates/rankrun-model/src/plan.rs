use std::{fmt, num::NonZeroU32};

use crate::{
    RuntimeFlavor,
    error::{ModelError, ModelResult},
    template::OutputTemplate,
};

/// Fully resolved invocation of the group launcher.
///
/// A plan is immutable: the launcher reads it, nothing writes to it after construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Group launcher executable (e.g. `"mpiexec"`, `"/opt/mpich/bin/mpiexec"`).
    program: String,
    /// Dialect the launcher flags were spelled in.
    flavor: RuntimeFlavor,
    /// Number of peer processes in the group.
    worker_count: NonZeroU32,
    /// Where the ranks write their output.
    template: OutputTemplate,
    /// Launcher flags (worker count, output patterns), in order.
    launcher_args: Vec<String>,
    /// Command every rank executes.
    command: Vec<String>,
}

impl LaunchPlan {
    /// Assemble a plan from already resolved parts.
    ///
    /// Rules:
    /// - `program` is not empty or whitespace-only;
    /// - `command` has at least one token and its first token is not blank.
    pub fn new(
        program: impl Into<String>,
        flavor: RuntimeFlavor,
        worker_count: NonZeroU32,
        template: OutputTemplate,
        launcher_args: Vec<String>,
        command: Vec<String>,
    ) -> ModelResult<Self> {
        let program = program.into();
        if program.trim().is_empty() {
            return Err(ModelError::EmptyLauncher);
        }
        match command.first() {
            Some(head) if !head.trim().is_empty() => {}
            _ => return Err(ModelError::EmptyCommand),
        }
        Ok(Self {
            program,
            flavor,
            worker_count,
            template,
            launcher_args,
            command,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn flavor(&self) -> RuntimeFlavor {
        self.flavor
    }

    pub fn worker_count(&self) -> u32 {
        self.worker_count.get()
    }

    pub fn template(&self) -> &OutputTemplate {
        &self.template
    }

    pub fn launcher_args(&self) -> &[String] {
        &self.launcher_args
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Arguments passed to [`LaunchPlan::program`]: launcher flags followed by the command.
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        self.launcher_args
            .iter()
            .chain(self.command.iter())
            .map(String::as_str)
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in self.argv() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
