//! NUnit 2.5 result XML.
//!
//! `test-results` → one `Assembly` suite per chart → one `TestFixture` per
//! suite → one `test-case` per job.

use super::seconds;
use super::xml::XmlWriter;
use crate::test::{ChartResult, JobResult, RunResult, Status, SuiteResult};

fn outcome(status: Status) -> (&'static str, &'static str, &'static str) {
    // (executed, result, success)
    match status {
        Status::Passed => ("True", "Success", "True"),
        Status::Failed => ("True", "Failure", "False"),
        Status::Skipped => ("False", "Ignored", "True"),
        Status::NotRun => ("False", "NotRunnable", "False"),
    }
}

fn suite_attrs(kind: &str, name: &str, status: Status, time: String, asserts: usize) -> Vec<(&'static str, String)> {
    let (executed, result, success) = outcome(status);
    vec![
        ("type", kind.to_string()),
        ("name", name.to_string()),
        ("executed", executed.to_string()),
        ("result", result.to_string()),
        ("success", success.to_string()),
        ("time", time),
        ("asserts", asserts.to_string()),
    ]
}

fn write_case(w: &mut XmlWriter, suite: &SuiteResult, job: &JobResult) {
    let (executed, result, success) = outcome(job.status);
    let attrs = [
        ("name", format!("{}.{}", suite.name, job.name)),
        ("description", job.name.clone()),
        ("executed", executed.to_string()),
        ("result", result.to_string()),
        ("success", success.to_string()),
        ("time", seconds(job.duration)),
        ("asserts", job.assertions.len().to_string()),
    ];
    match job.status {
        Status::Passed => {
            w.empty("test-case", &attrs);
        }
        Status::Failed => {
            w.open("test-case", &attrs);
            w.open("failure", &[]);
            w.cdata("message", &job.failure_message());
            w.empty("stack-trace", &[]);
            w.close();
            w.close();
        }
        Status::Skipped | Status::NotRun => {
            let reason = match job.status {
                Status::NotRun => "not run".to_string(),
                _ => job.skip_reason.clone().unwrap_or_else(|| "skipped".into()),
            };
            w.open("test-case", &attrs);
            w.open("reason", &[]);
            w.cdata("message", &reason);
            w.close();
            w.close();
        }
    }
}

fn write_suite(w: &mut XmlWriter, suite: &SuiteResult) {
    let asserts = suite.jobs.iter().map(|j| j.assertions.len()).sum();
    w.open(
        "test-suite",
        &suite_attrs("TestFixture", &suite.name, suite.status, seconds(suite.duration), asserts),
    );
    if let Some(error) = &suite.error {
        w.open("failure", &[]);
        w.cdata("message", error);
        w.empty("stack-trace", &[]);
        w.close();
    }
    w.open("results", &[]);
    for job in &suite.jobs {
        write_case(w, suite, job);
    }
    w.close();
    w.close();
}

fn write_chart(w: &mut XmlWriter, chart: &ChartResult) {
    let asserts = chart
        .suites
        .iter()
        .flat_map(|s| s.jobs.iter())
        .map(|j| j.assertions.len())
        .sum();
    w.open(
        "test-suite",
        &suite_attrs("Assembly", &chart.name, chart.status, seconds(chart.duration), asserts),
    );
    if !chart.errors.is_empty() {
        w.open("failure", &[]);
        w.cdata("message", &chart.errors.join("\n"));
        w.empty("stack-trace", &[]);
        w.close();
    }
    w.open("results", &[]);
    for suite in &chart.suites {
        write_suite(w, suite);
    }
    w.close();
    w.close();
}

pub fn render(result: &RunResult) -> String {
    let jobs = result.job_tally();
    let errors = result.suites().filter(|s| s.error.is_some()).count()
        + result.charts.iter().map(|c| c.errors.len()).sum::<usize>();

    let mut w = XmlWriter::new();
    w.open(
        "test-results",
        &[
            ("name", "rendercheck".to_string()),
            ("total", jobs.total().to_string()),
            ("errors", errors.to_string()),
            ("failures", jobs.failed.to_string()),
            ("not-run", jobs.not_run.to_string()),
            ("inconclusive", "0".to_string()),
            ("ignored", jobs.skipped.to_string()),
            ("skipped", "0".to_string()),
            ("invalid", "0".to_string()),
            ("date", result.started.format("%Y-%m-%d").to_string()),
            ("time", result.started.format("%H:%M:%S").to_string()),
        ],
    );
    for chart in &result.charts {
        write_chart(&mut w, chart);
    }
    w.finish()
}
