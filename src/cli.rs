//! The `rendercheck` command line.
//!
//! Parses arguments into a [`RunnerConfig`], runs every chart, prints the
//! console report and writes the optional report file. The exit code is 0
//! iff everything passed.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::Report;
use tracing::{debug, error};

use crate::config::RunnerConfig;
use crate::errors::EngineError;
use crate::report::{write_report, Printer};
use crate::test::{RunResult, TestRunner};

pub mod args;
pub mod logging;

use args::Args;

pub fn run() -> ExitCode {
    let args = Args::parse();
    let debug_logging = args.debug;
    let charts = args.charts.clone();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(err) => {
            logging::init(debug_logging, false);
            eprintln!("{:?}", Report::new(err));
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.debug, config.use_color());
    debug!(?config, charts = charts.len(), "configuration");

    match execute(&config, &charts) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{:?}", Report::new(err));
            ExitCode::FAILURE
        }
    }
}

/// Runs the charts, prints the report and writes the report file. Returns
/// whether every chart passed.
pub fn execute(config: &RunnerConfig, charts: &[PathBuf]) -> Result<bool, EngineError> {
    let result: RunResult = TestRunner::new(config).run(charts);

    let mut printer = Printer::stdout(config.colored);
    if let Err(err) = printer.print(&result) {
        error!(error = %err, "failed to print results");
    }

    if let Some(path) = &config.output_file {
        write_report(path, config.output_type, &result)?;
    }
    Ok(result.passed())
}
