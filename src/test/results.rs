//! The result tree: run → chart → suite → job → assertion.
//!
//! Every item that was declared ends up in the tree, evaluated or not, so the
//! formatters can render a complete report after a fail-fast stop.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::snapshot::SnapshotStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Passed,
    Failed,
    Skipped,
    /// Not evaluated because fail-fast stopped the run earlier.
    NotRun,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Passed => "Passed",
            Status::Failed => "Failed",
            Status::Skipped => "Skipped",
            Status::NotRun => "NotRun",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Status::Failed)
    }

    /// Folds child statuses into a parent status. Any failure fails the
    /// parent; a parent whose children were all skipped is skipped.
    pub fn aggregate<I: IntoIterator<Item = Status>>(children: I) -> Status {
        let mut any = false;
        let mut all_skipped = true;
        let mut all_not_run = true;
        for status in children {
            any = true;
            match status {
                Status::Failed => return Status::Failed,
                Status::Skipped => all_not_run = false,
                Status::NotRun => all_skipped = false,
                Status::Passed => {
                    all_skipped = false;
                    all_not_run = false;
                }
            }
        }
        match (any, all_skipped, all_not_run) {
            (false, _, _) => Status::Passed,
            (true, true, _) => Status::Skipped,
            (true, _, true) => Status::NotRun,
            _ => Status::Passed,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertionResult {
    /// Position in the job's `asserts` list.
    pub index: usize,
    /// Validator name, e.g. `isKind`.
    pub kind: String,
    pub negative: bool,
    pub status: Status,
    pub diagnostics: Vec<String>,
}

impl AssertionResult {
    /// `isKind` or `NOT isKind`.
    pub fn label(&self) -> String {
        if self.negative {
            format!("NOT {}", self.kind)
        } else {
            self.kind.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    pub name: String,
    pub status: Status,
    pub assertions: Vec<AssertionResult>,
    pub skip_reason: Option<String>,
    pub duration: Duration,
}

impl JobResult {
    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionResult> {
        self.assertions.iter().filter(|a| a.status.is_failed())
    }

    /// Diagnostic text of all failed assertions, one block per assertion.
    pub fn failure_message(&self) -> String {
        self.failed_assertions()
            .map(|a| {
                let mut block = format!("- asserts[{}] `{}` fail", a.index, a.label());
                for line in &a.diagnostics {
                    block.push_str("\n\t");
                    block.push_str(line);
                }
                block
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteResult {
    pub name: String,
    /// Suite file the suite was read from.
    pub file: PathBuf,
    /// Suite file relative to the chart, with `/` separators.
    pub display_path: String,
    pub status: Status,
    pub jobs: Vec<JobResult>,
    /// Set when the suite could not be loaded or run at all.
    pub error: Option<String>,
    pub skip_reason: Option<String>,
    pub started: DateTime<Utc>,
    pub duration: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartResult {
    pub name: String,
    pub path: PathBuf,
    pub status: Status,
    pub suites: Vec<SuiteResult>,
    /// Chart-level problems, e.g. an unreadable snapshot store.
    pub errors: Vec<String>,
    pub snapshot: SnapshotStats,
    pub duration: Duration,
}

/// Counters for one level of the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub not_run: usize,
}

impl Tally {
    pub fn add(&mut self, status: Status) {
        match status {
            Status::Passed => self.passed += 1,
            Status::Failed => self.failed += 1,
            Status::Skipped => self.skipped += 1,
            Status::NotRun => self.not_run += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.not_run
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub charts: Vec<ChartResult>,
    pub started: DateTime<Utc>,
    pub duration: Duration,
}

impl RunResult {
    pub fn passed(&self) -> bool {
        !self.charts.iter().any(|c| c.status.is_failed())
    }

    pub fn suites(&self) -> impl Iterator<Item = &SuiteResult> {
        self.charts.iter().flat_map(|c| c.suites.iter())
    }

    pub fn jobs(&self) -> impl Iterator<Item = &JobResult> {
        self.suites().flat_map(|s| s.jobs.iter())
    }

    pub fn chart_tally(&self) -> Tally {
        tally(self.charts.iter().map(|c| c.status))
    }

    pub fn suite_tally(&self) -> Tally {
        tally(self.suites().map(|s| s.status))
    }

    pub fn job_tally(&self) -> Tally {
        tally(self.jobs().map(|j| j.status))
    }

    pub fn snapshot(&self) -> SnapshotStats {
        let mut stats = SnapshotStats::default();
        for chart in &self.charts {
            stats.merge(&chart.snapshot);
        }
        stats
    }
}

fn tally(statuses: impl Iterator<Item = Status>) -> Tally {
    let mut tally = Tally::default();
    statuses.for_each(|s| tally.add(s));
    tally
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_statuses() {
        use Status::*;
        assert_eq!(Status::aggregate([]), Passed);
        assert_eq!(Status::aggregate([Passed, Skipped]), Passed);
        assert_eq!(Status::aggregate([Skipped, Skipped]), Skipped);
        assert_eq!(Status::aggregate([Passed, NotRun]), Passed);
        assert_eq!(Status::aggregate([NotRun, NotRun]), NotRun);
        assert_eq!(Status::aggregate([Passed, Failed, NotRun]), Failed);
    }

    #[test]
    fn failure_message_lists_failed_assertions() {
        let job = JobResult {
            name: "should work".into(),
            status: Status::Failed,
            assertions: vec![
                AssertionResult {
                    index: 0,
                    kind: "isKind".into(),
                    negative: false,
                    status: Status::Passed,
                    diagnostics: vec![],
                },
                AssertionResult {
                    index: 1,
                    kind: "equal".into(),
                    negative: true,
                    status: Status::Failed,
                    diagnostics: vec!["Path:\tspec".into()],
                },
            ],
            skip_reason: None,
            duration: Duration::ZERO,
        };
        assert_eq!(job.failure_message(), "- asserts[1] `NOT equal` fail\n\tPath:\tspec");
    }
}
