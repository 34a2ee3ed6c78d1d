//! xUnit.net v2 XML: one `<assembly>` per chart, one `<collection>` per
//! suite, one `<test>` per job.

use super::seconds;
use super::xml::XmlWriter;
use crate::test::{ChartResult, JobResult, RunResult, Status, SuiteResult, Tally};

fn tally<'a>(jobs: impl Iterator<Item = &'a JobResult>) -> Tally {
    let mut tally = Tally::default();
    jobs.for_each(|j| tally.add(j.status));
    tally
}

fn write_test(w: &mut XmlWriter, suite: &SuiteResult, job: &JobResult) {
    let result = match job.status {
        Status::Passed => "Pass",
        Status::Failed => "Fail",
        Status::Skipped | Status::NotRun => "Skip",
    };
    let attrs = [
        ("name", job.name.clone()),
        ("type", suite.name.clone()),
        ("method", job.name.clone()),
        ("time", seconds(job.duration)),
        ("result", result.to_string()),
    ];
    match job.status {
        Status::Passed => {
            w.empty("test", &attrs);
        }
        Status::Failed => {
            w.open("test", &attrs);
            w.open("failure", &[("exception-type", "AssertionFailure".to_string())]);
            w.cdata("message", &job.failure_message());
            w.close();
            w.close();
        }
        Status::Skipped | Status::NotRun => {
            let reason = match job.status {
                Status::NotRun => "not run".to_string(),
                _ => job.skip_reason.clone().unwrap_or_else(|| "skipped".into()),
            };
            w.open("test", &attrs);
            w.cdata("reason", &reason);
            w.close();
        }
    }
}

fn write_assembly(w: &mut XmlWriter, chart: &ChartResult, result: &RunResult) {
    let jobs = tally(chart.suites.iter().flat_map(|s| s.jobs.iter()));
    let errors = chart.errors.len() + chart.suites.iter().filter(|s| s.error.is_some()).count();
    w.open(
        "assembly",
        &[
            ("name", chart.path.display().to_string()),
            ("config-file", String::new()),
            ("test-framework", "rendercheck".to_string()),
            ("environment", String::new()),
            ("run-date", result.started.format("%Y-%m-%d").to_string()),
            ("run-time", result.started.format("%H:%M:%S").to_string()),
            ("total", jobs.total().to_string()),
            ("passed", jobs.passed.to_string()),
            ("failed", jobs.failed.to_string()),
            ("skipped", (jobs.skipped + jobs.not_run).to_string()),
            ("time", seconds(chart.duration)),
            ("errors", errors.to_string()),
        ],
    );

    if errors == 0 {
        w.empty("errors", &[]);
    } else {
        w.open("errors", &[]);
        let messages = chart
            .errors
            .iter()
            .map(|e| (chart.name.as_str(), e.as_str()))
            .chain(
                chart
                    .suites
                    .iter()
                    .filter_map(|s| s.error.as_deref().map(|e| (s.display_path.as_str(), e))),
            );
        for (name, message) in messages {
            w.open("error", &[("type", "fatal".to_string()), ("name", name.to_string())]);
            w.open("failure", &[("exception-type", "EngineError".to_string())]);
            w.cdata("message", message);
            w.close();
            w.close();
        }
        w.close();
    }

    for suite in &chart.suites {
        let counts = tally(suite.jobs.iter());
        w.open(
            "collection",
            &[
                ("total", counts.total().to_string()),
                ("passed", counts.passed.to_string()),
                ("failed", counts.failed.to_string()),
                ("skipped", (counts.skipped + counts.not_run).to_string()),
                ("name", suite.name.clone()),
                ("time", seconds(suite.duration)),
            ],
        );
        for job in &suite.jobs {
            write_test(w, suite, job);
        }
        w.close();
    }
    w.close();
}

pub fn render(result: &RunResult) -> String {
    let mut w = XmlWriter::new();
    w.open("assemblies", &[]);
    for chart in &result.charts {
        write_assembly(&mut w, chart, result);
    }
    w.finish()
}
