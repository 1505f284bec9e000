mod cli;
mod run;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use rankrun_observe::init_logger;

use crate::cli::Cli;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 1) logger
    if let Err(e) = init_logger(&cli.opts.logger_config()) {
        eprintln!("rankrun: {e}");
        return ExitCode::from(run::EXIT_ABORTED);
    }

    // 2) run
    match run::execute(&cli).await {
        Ok(code) => ExitCode::from(run::exit_status(code)),
        Err(e) => {
            error!(error = %format!("{e:#}"), "run aborted");
            ExitCode::from(run::failure_status(&e))
        }
    }
}
