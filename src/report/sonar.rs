//! SonarQube generic test execution format: one `<file>` per suite file,
//! one `<testCase>` per job, durations in milliseconds.

use std::collections::BTreeMap;

use super::xml::XmlWriter;
use crate::test::{JobResult, RunResult, Status};

fn write_case(w: &mut XmlWriter, job: &JobResult) {
    let attrs = [
        ("name", job.name.clone()),
        ("duration", job.duration.as_millis().to_string()),
    ];
    match job.status {
        Status::Passed => {
            w.empty("testCase", &attrs);
        }
        Status::Failed => {
            w.open("testCase", &attrs);
            w.text(
                "failure",
                &[("message", "Test failed".to_string())],
                &job.failure_message(),
            );
            w.close();
        }
        Status::Skipped | Status::NotRun => {
            let reason = match job.status {
                Status::NotRun => "not run".to_string(),
                _ => job.skip_reason.clone().unwrap_or_else(|| "skipped".into()),
            };
            w.open("testCase", &attrs);
            w.empty("skipped", &[("message", reason)]);
            w.close();
        }
    }
}

pub fn render(result: &RunResult) -> String {
    // Several suites may share a file; Sonar wants each path once.
    let mut files: BTreeMap<String, Vec<&JobResult>> = BTreeMap::new();
    let mut errors: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for suite in result.suites() {
        let path = suite.file.display().to_string();
        let entry = files.entry(path.clone()).or_default();
        entry.extend(suite.jobs.iter());
        if let Some(error) = &suite.error {
            errors.entry(path).or_default().push(error);
        }
    }

    let mut w = XmlWriter::new();
    w.open("testExecutions", &[("version", "1".to_string())]);
    for (path, jobs) in &files {
        w.open("file", &[("path", path.clone())]);
        for error in errors.get(path).into_iter().flatten() {
            w.open(
                "testCase",
                &[("name", "load suite".to_string()), ("duration", "0".to_string())],
            );
            w.text("error", &[("message", "Suite could not be loaded".to_string())], error);
            w.close();
        }
        for job in jobs {
            write_case(&mut w, job);
        }
        w.close();
    }
    w.finish()
}
