//! Runner configuration.
//!
//! Built once from the command line and passed by reference into the
//! [`TestRunner`](crate::test::TestRunner). Nothing in the engine reads
//! process-wide state.

use std::path::PathBuf;

use crate::report::OutputKind;

pub const DEFAULT_TEST_FILES: &str = "tests/*_test.yaml";
pub const DEFAULT_RENDER_PATH: &str = "rendered";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Glob patterns, relative to each chart, selecting suite files.
    pub test_files: Vec<String>,
    /// Extra values files applied to every job before the suite's own.
    pub values_files: Vec<PathBuf>,
    pub update_snapshot: bool,
    pub with_subchart: bool,
    pub output_file: Option<PathBuf>,
    pub output_type: OutputKind,
    pub fail_fast: bool,
    pub strict: bool,
    /// `None` detects a terminal on stdout.
    pub colored: Option<bool>,
    /// Tests directory relative to the chart, holding the snapshot store.
    /// Defaults to `tests`.
    pub chart_tests_path: Option<PathBuf>,
    pub render_path: PathBuf,
    pub debug: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            test_files: vec![DEFAULT_TEST_FILES.to_string()],
            values_files: Vec::new(),
            update_snapshot: false,
            with_subchart: true,
            output_file: None,
            output_type: OutputKind::XUnit,
            fail_fast: false,
            strict: false,
            colored: None,
            chart_tests_path: None,
            render_path: PathBuf::from(DEFAULT_RENDER_PATH),
            debug: false,
        }
    }
}

impl RunnerConfig {
    /// Resolves the colour decision against the terminal.
    pub fn use_color(&self) -> bool {
        self.colored
            .unwrap_or_else(|| atty::is(atty::Stream::Stdout))
    }

    /// Tests directory of `chart`, holding the snapshot store.
    pub fn tests_dir(&self, chart: &std::path::Path) -> PathBuf {
        match &self.chart_tests_path {
            Some(path) => chart.join(path),
            None => chart.join("tests"),
        }
    }
}
