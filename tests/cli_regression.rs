// End-to-end runs of the `rendercheck` binary: exit codes, console output,
// report files and miette diagnostics for fatal errors.

mod common;

use assert_cmd::Command;
use common::{ChartFixture, DEPLOYMENT};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

const PASSING: &str = "\
suite: deployment
tests:
  - it: is a deployment
    asserts:
      - isKind:
          of: Deployment
";

const FAILING: &str = "\
suite: deployment
tests:
  - it: is a service
    asserts:
      - isKind:
          of: Service
";

fn rendercheck() -> Command {
    let mut cmd = Command::cargo_bin("rendercheck").unwrap();
    cmd.env_remove("RENDERCHECK_LOG").env_remove("RUST_LOG");
    cmd.arg("--color=false");
    cmd
}

fn chart(suite: &str) -> ChartFixture {
    let fixture = ChartFixture::new("web");
    fixture
        .template("deployment.yaml", DEPLOYMENT)
        .suite("deployment_test.yaml", suite);
    fixture
}

#[test]
fn passing_chart_exits_zero() {
    let fixture = chart(PASSING);
    rendercheck()
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(contains("PASS").and(contains("Tests:")));
}

#[test]
fn failing_chart_exits_one_with_details() {
    let fixture = chart(FAILING);
    rendercheck()
        .arg(fixture.path())
        .assert()
        .code(1)
        .stdout(
            contains("FAIL")
                .and(contains("is a service"))
                .and(contains("Expected to be kind:")),
        );
}

#[test]
fn report_file_is_written() {
    let fixture = chart(PASSING);
    let out = tempfile::tempdir().unwrap();
    let report = out.path().join("reports/junit.xml");

    rendercheck()
        .arg(fixture.path())
        .args(["--output-type", "junit", "--output-file"])
        .arg(&report)
        .assert()
        .success();

    let xml = std::fs::read_to_string(&report).unwrap();
    assert!(xml.contains("<testsuites"));
    assert!(xml.contains("is a deployment"));
}

#[test]
fn unknown_output_type_is_a_config_error() {
    let fixture = chart(PASSING);
    rendercheck()
        .arg(fixture.path())
        .args(["-t", "html"])
        .assert()
        .failure()
        .stderr(contains("rendercheck::config").or(contains("help:")));
}

#[test]
fn update_snapshot_flag_records_then_matches() {
    let fixture = ChartFixture::new("web");
    fixture.template("deployment.yaml", DEPLOYMENT).suite(
        "snapshot_test.yaml",
        "suite: snap\ntests:\n  - it: snapshot\n    asserts:\n      - matchSnapshot: {}\n",
    );

    rendercheck().arg(fixture.path()).assert().failure();
    rendercheck().arg(fixture.path()).arg("-u").assert().success();
    assert!(fixture.snapshot_file().is_file());
    rendercheck().arg(fixture.path()).assert().success();
}

#[test]
fn missing_chart_argument_is_rejected() {
    rendercheck().assert().failure().stderr(contains("CHART"));
}
