//! Harness configuration and the mapping from [`Operation`] to [`RunRequest`].
use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use rankrun_model::{
    ModelError, ModelResult, Operation, OutputTemplate, RuntimeFlavor, SuiteKind,
};

use crate::{harness::RunRequest, plan::PlanBuilder};

/// How the runtime flavor is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FlavorSetting {
    /// Probe the launcher's version output.
    #[default]
    Auto,
    /// Skip probing and use this flavor.
    Fixed(RuntimeFlavor),
}

impl FromStr for FlavorSetting {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(FlavorSetting::Auto);
        }
        s.parse().map(FlavorSetting::Fixed)
    }
}

impl TryFrom<String> for FlavorSetting {
    type Error = ModelError;
    fn try_from(s: String) -> ModelResult<Self> {
        s.parse()
    }
}

impl From<FlavorSetting> for String {
    fn from(f: FlavorSetting) -> Self {
        f.to_string()
    }
}

impl fmt::Display for FlavorSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlavorSetting::Auto => f.write_str("auto"),
            FlavorSetting::Fixed(flavor) => fmt::Display::fmt(flavor, f),
        }
    }
}

/// Worker count and interpreter arguments of one suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Number of peers launched for this suite.
    pub workers: i64,
    /// Arguments after the interpreter (or after `coverage run --parallel-mode`).
    pub args: Vec<String>,
}

impl SuiteConfig {
    fn plain() -> Self {
        Self {
            workers: 4,
            args: to_strings(&["-m", "unittest", "discover", "-c"]),
        }
    }

    fn group() -> Self {
        Self {
            workers: 4,
            args: to_strings(&[
                "-m",
                "unittest",
                "discover",
                "-s",
                "distarray/mpi/tests",
                "-p",
                "paralleltest*.py",
            ]),
        }
    }
}

/// Suite entry as written in a config file; missing fields keep the suite's own defaults.
#[derive(Deserialize)]
struct PartialSuite {
    workers: Option<i64>,
    args: Option<Vec<String>>,
}

impl PartialSuite {
    fn over(self, base: SuiteConfig) -> SuiteConfig {
        SuiteConfig {
            workers: self.workers.unwrap_or(base.workers),
            args: self.args.unwrap_or(base.args),
        }
    }
}

fn plain_suite<'de, D: Deserializer<'de>>(d: D) -> Result<SuiteConfig, D::Error> {
    PartialSuite::deserialize(d).map(|p| p.over(SuiteConfig::plain()))
}

fn group_suite<'de, D: Deserializer<'de>>(d: D) -> Result<SuiteConfig, D::Error> {
    PartialSuite::deserialize(d).map(|p| p.over(SuiteConfig::group()))
}

/// Harness configuration.
///
/// Every field has a default, so a partial JSON file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Group launcher executable.
    pub launcher: String,
    /// Runtime flavor selection.
    pub flavor: FlavorSetting,
    /// Directory receiving per-rank output files.
    pub output_dir: PathBuf,
    /// Interpreter version tag prefixed to output file names.
    pub version_tag: String,
    /// Interpreter used for plain runs.
    pub python: String,
    /// Coverage tool used for instrumented runs and reports.
    pub coverage: String,
    /// Destination of the HTML coverage report.
    pub html_dir: PathBuf,
    #[serde(deserialize_with = "plain_suite")]
    pub plain: SuiteConfig,
    #[serde(deserialize_with = "group_suite")]
    pub group: SuiteConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            launcher: "mpiexec".into(),
            flavor: FlavorSetting::Auto,
            output_dir: PathBuf::from(".mpi_out"),
            version_tag: "py3".into(),
            python: "python".into(),
            coverage: "coverage".into(),
            html_dir: PathBuf::from("coverage_report"),
            plain: SuiteConfig::plain(),
            group: SuiteConfig::group(),
        }
    }
}

impl HarnessConfig {
    pub fn suite(&self, kind: SuiteKind) -> &SuiteConfig {
        match kind {
            SuiteKind::Plain => &self.plain,
            SuiteKind::Group => &self.group,
        }
    }

    pub fn suite_mut(&mut self, kind: SuiteKind) -> &mut SuiteConfig {
        match kind {
            SuiteKind::Plain => &mut self.plain,
            SuiteKind::Group => &mut self.group,
        }
    }

    pub fn planner(&self) -> PlanBuilder {
        PlanBuilder::new(self.launcher.clone())
    }

    /// Output template of a launching operation; each operation gets its own base name.
    pub fn template(&self, op: Operation) -> ModelResult<OutputTemplate> {
        OutputTemplate::new(&self.output_dir, &self.version_tag, op.base_name())
    }

    /// Command executed by every rank for `op`.
    ///
    /// Plain: `<python> <args…>`; coverage: `<coverage> run --parallel-mode <args…>`.
    pub fn command(&self, op: Operation) -> ModelResult<Vec<String>> {
        let suite = op.suite().ok_or_else(|| not_launching(op))?;
        let args = &self.suite(suite).args;

        let mut cmd = if op.with_coverage() {
            vec![
                self.coverage.clone(),
                "run".to_string(),
                "--parallel-mode".to_string(),
            ]
        } else {
            vec![self.python.clone()]
        };
        cmd.extend(args.iter().cloned());
        Ok(cmd)
    }

    /// Resolve a launching operation into a run request.
    pub fn request(&self, op: Operation) -> ModelResult<RunRequest> {
        let suite = op.suite().ok_or_else(|| not_launching(op))?;
        Ok(RunRequest {
            worker_count: self.suite(suite).workers,
            template: self.template(op)?,
            command: self.command(op)?,
        })
    }
}

fn not_launching(op: Operation) -> ModelError {
    ModelError::Invalid(format!("operation '{op}' does not launch a process group"))
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
