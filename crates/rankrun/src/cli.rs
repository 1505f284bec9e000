use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use rankrun_core::prelude::{FlavorSetting, HarnessConfig};
use rankrun_model::Operation;
use rankrun_observe::{LoggerConfig, LoggerFormat, LoggerLevel};

/// Run a test suite as a process group and fold the per-rank results into one exit code.
///
/// EXIT STATUS:
///     0      every peer succeeded
///     124    the run was interrupted (--timeout-secs)
///     125    configuration or launch error
///     other  the group launcher's exit code, verbatim
///
/// A launcher that itself exits 124 or 125 is indistinguishable from the reserved codes; the
/// log on stderr tells them apart.
#[derive(Debug, Parser)]
#[command(name = "rankrun")]
#[command(version)]
#[command(verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub opts: GlobalOpts,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the plain suite on N peers
    Plain(SuiteArgs),
    /// Run the plain suite under coverage
    PlainCoverage(SuiteArgs),
    /// Run the group suite on N peers
    Group(SuiteArgs),
    /// Run the group suite under coverage
    GroupCoverage(SuiteArgs),
    /// Merge coverage data and write the HTML report
    CoverageReport,
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Plain(_) => Operation::Plain,
            Command::PlainCoverage(_) => Operation::PlainCoverage,
            Command::Group(_) => Operation::Group,
            Command::GroupCoverage(_) => Operation::GroupCoverage,
            Command::CoverageReport => Operation::CoverageReport,
        }
    }

    fn suite_args(&self) -> Option<&SuiteArgs> {
        match self {
            Command::Plain(a)
            | Command::PlainCoverage(a)
            | Command::Group(a)
            | Command::GroupCoverage(a) => Some(a),
            Command::CoverageReport => None,
        }
    }
}

#[derive(Debug, Args)]
pub struct SuiteArgs {
    /// Number of peers to launch
    #[arg(long, short = 'n', env = "RANKRUN_WORKERS", allow_negative_numbers = true)]
    pub workers: Option<i64>,

    /// Replacement arguments for the suite, after `--`
    #[arg(last = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// JSON configuration file; flags and env vars override it
    #[arg(long, global = true, env = "RANKRUN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Group launcher executable [default: mpiexec]
    #[arg(long, global = true, env = "RANKRUN_LAUNCHER")]
    pub launcher: Option<String>,

    /// Runtime flavor: auto, hydra or openrte [default: auto]
    #[arg(long, global = true)]
    pub flavor: Option<FlavorSetting>,

    /// Directory for per-rank output files [default: .mpi_out]
    #[arg(long, global = true, env = "RANKRUN_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Interpreter tag prefixed to output file names [default: py3]
    #[arg(long, global = true)]
    pub version_tag: Option<String>,

    /// Interpreter for plain runs [default: python]
    #[arg(long, global = true)]
    pub python: Option<String>,

    /// Coverage tool [default: coverage]
    #[arg(long, global = true)]
    pub coverage: Option<String>,

    /// HTML coverage report directory [default: coverage_report]
    #[arg(long, global = true)]
    pub html_dir: Option<PathBuf>,

    /// Interrupt the run after this many seconds
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Log filter expression
    #[arg(long, global = true, env = "RANKRUN_LOG", default_value = "warn")]
    pub log_level: LoggerLevel,

    /// Log format: text or json
    #[arg(long, global = true, env = "RANKRUN_LOG_FORMAT", default_value = "text")]
    pub log_format: LoggerFormat,
}

impl GlobalOpts {
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            format: self.log_format,
            level: self.log_level.clone(),
            ..Default::default()
        }
    }
}

impl Cli {
    /// Layer flags and env vars over `cfg`.
    pub fn apply(&self, cfg: &mut HarnessConfig) {
        let o = &self.opts;
        if let Some(v) = &o.launcher {
            cfg.launcher = v.clone();
        }
        if let Some(v) = o.flavor {
            cfg.flavor = v;
        }
        if let Some(v) = &o.output_dir {
            cfg.output_dir = v.clone();
        }
        if let Some(v) = &o.version_tag {
            cfg.version_tag = v.clone();
        }
        if let Some(v) = &o.python {
            cfg.python = v.clone();
        }
        if let Some(v) = &o.coverage {
            cfg.coverage = v.clone();
        }
        if let Some(v) = &o.html_dir {
            cfg.html_dir = v.clone();
        }

        let (Some(suite), Some(args)) = (self.command.operation().suite(), self.command.suite_args())
        else {
            return;
        };
        let target = cfg.suite_mut(suite);
        if let Some(n) = args.workers {
            target.workers = n;
        }
        if !args.args.is_empty() {
            target.args = args.args.clone();
        }
    }
}
