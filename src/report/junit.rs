//! JUnit XML: one `<testsuite>` per suite, one `<testcase>` per job.

use chrono::SecondsFormat;

use super::seconds;
use super::xml::XmlWriter;
use crate::test::{JobResult, RunResult, Status, SuiteResult, Tally};

fn suite_tally(suite: &SuiteResult) -> Tally {
    let mut tally = Tally::default();
    suite.jobs.iter().for_each(|j| tally.add(j.status));
    tally
}

fn write_case(w: &mut XmlWriter, suite: &SuiteResult, job: &JobResult) {
    let attrs = [
        ("classname", suite.name.clone()),
        ("name", job.name.clone()),
        ("time", seconds(job.duration)),
    ];
    match job.status {
        Status::Passed => {
            w.empty("testcase", &attrs);
        }
        Status::Failed => {
            w.open("testcase", &attrs);
            w.text(
                "failure",
                &[("message", "Test failed".to_string()), ("type", String::new())],
                &job.failure_message(),
            );
            w.close();
        }
        Status::Skipped | Status::NotRun => {
            let reason = match job.status {
                Status::NotRun => "not run".to_string(),
                _ => job.skip_reason.clone().unwrap_or_else(|| "skipped".into()),
            };
            w.open("testcase", &attrs);
            w.empty("skipped", &[("message", reason)]);
            w.close();
        }
    }
}

pub fn render(result: &RunResult) -> String {
    let jobs = result.job_tally();
    let errors = result.suites().filter(|s| s.error.is_some()).count();

    let mut w = XmlWriter::new();
    w.open(
        "testsuites",
        &[
            ("name", "rendercheck".to_string()),
            ("tests", (jobs.total() + errors).to_string()),
            ("failures", jobs.failed.to_string()),
            ("errors", errors.to_string()),
            ("skipped", (jobs.skipped + jobs.not_run).to_string()),
            ("time", seconds(result.duration)),
        ],
    );

    for chart in &result.charts {
        for suite in &chart.suites {
            let tally = suite_tally(suite);
            let suite_errors = usize::from(suite.error.is_some());
            w.open(
                "testsuite",
                &[
                    ("name", suite.name.clone()),
                    ("package", chart.name.clone()),
                    ("tests", (tally.total() + suite_errors).to_string()),
                    ("failures", tally.failed.to_string()),
                    ("errors", suite_errors.to_string()),
                    ("skipped", (tally.skipped + tally.not_run).to_string()),
                    ("time", seconds(suite.duration)),
                    (
                        "timestamp",
                        suite.started.to_rfc3339_opts(SecondsFormat::Secs, true),
                    ),
                ],
            );
            if let Some(error) = &suite.error {
                w.open(
                    "testcase",
                    &[
                        ("classname", suite.name.clone()),
                        ("name", suite.display_path.clone()),
                        ("time", seconds(suite.duration)),
                    ],
                );
                w.text("error", &[("message", "Suite could not be loaded".to_string())], error);
                w.close();
            }
            for job in &suite.jobs {
                write_case(&mut w, suite, job);
            }
            w.close();
        }
    }
    w.finish()
}
