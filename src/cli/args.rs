//! Command-line arguments, parsed with clap's derive API.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{RunnerConfig, DEFAULT_RENDER_PATH, DEFAULT_TEST_FILES};
use crate::errors::EngineError;
use crate::report::OutputKind;

#[derive(Debug, Parser)]
#[command(
    name = "rendercheck",
    version,
    about = "Run declarative assertions against rendered chart templates.",
    long_about = "Run declarative assertions against rendered chart templates.\n\n\
Suite files live in CHART/tests with the suffix _test.yaml by default:\n\n\
  suite: test my deployment\n\
  templates:\n\
    - deployment.yaml\n\
  tests:\n\
    - it: should be a Deployment\n\
      asserts:\n\
        - isKind:\n\
            of: Deployment"
)]
pub struct Args {
    /// Chart directories to test.
    #[arg(value_name = "CHART", required = true)]
    pub charts: Vec<PathBuf>,

    /// Force coloured output (`--color=false` disables it). Detected from the
    /// terminal when absent.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub color: Option<bool>,

    /// Reject unknown fields in suite files.
    #[arg(long)]
    pub strict: bool,

    /// Glob paths of suite files, relative to each chart.
    #[arg(short = 'f', long = "file", value_name = "GLOB")]
    pub files: Vec<String>,

    /// Values files applied to every test before the suite's own.
    #[arg(short = 'v', long = "values", value_name = "FILE")]
    pub values: Vec<PathBuf>,

    /// Record missing snapshots and overwrite changed ones.
    #[arg(short = 'u', long)]
    pub update_snapshot: bool,

    /// Include tests of the sub-charts in `charts/`.
    #[arg(
        short = 's',
        long,
        value_name = "BOOL",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = clap::ArgAction::Set
    )]
    pub with_subchart: bool,

    /// Write a test report to this file.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Report format: JUnit, NUnit, XUnit or Sonar.
    #[arg(short = 't', long, value_name = "TYPE", default_value = "XUnit")]
    pub output_type: String,

    /// Tests directory relative to the chart.
    #[arg(long, value_name = "DIR")]
    pub chart_tests_path: Option<PathBuf>,

    /// Stop at the first failing assertion.
    #[arg(short = 'q', long = "failfast")]
    pub fail_fast: bool,

    /// Verbose logging on stderr.
    #[arg(short = 'd', long = "debug-plugin")]
    pub debug: bool,

    /// Directory, relative to the chart, holding the rendered templates.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_RENDER_PATH)]
    pub render_path: PathBuf,
}

impl Args {
    pub fn into_config(self) -> Result<RunnerConfig, EngineError> {
        let output_type: OutputKind = self.output_type.parse()?;
        let test_files = if self.files.is_empty() {
            vec![DEFAULT_TEST_FILES.to_string()]
        } else {
            self.files
        };
        Ok(RunnerConfig {
            test_files,
            values_files: self.values,
            update_snapshot: self.update_snapshot,
            with_subchart: self.with_subchart,
            output_file: self.output_file,
            output_type,
            fail_fast: self.fail_fast,
            strict: self.strict,
            colored: self.color,
            chart_tests_path: self.chart_tests_path,
            render_path: self.render_path,
            debug: self.debug,
        })
    }
}
