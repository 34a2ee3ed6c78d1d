//! A test job: one rendering scenario and its ordered assertions.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info, warn};

use super::assertion::Assertion;
use super::results::{AssertionResult, JobResult, Status};
use crate::errors::EngineError;
use crate::manifest::{index_documents, Manifest, RenderError};
use crate::render::{Release, RenderRequest, Renderer};
use crate::snapshot::{JobId, JobSnapshots, SnapshotCache};
use crate::tree::Tree;
use crate::validation::ValidateContext;

/// `skip: {reason: ...}` on a suite or a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Skip {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Partial release override; unset fields keep the inherited value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReleaseOverride {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ReleaseOverride {
    pub fn apply(&self, release: &mut Release) {
        if let Some(name) = &self.name {
            release.name = name.clone();
        }
        if let Some(namespace) = &self.namespace {
            release.namespace = namespace.clone();
        }
    }
}

/// A job as written in the suite file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobDefinition {
    it: String,
    #[serde(default)]
    templates: Vec<String>,
    #[serde(default)]
    template: Option<String>,
    #[serde(default)]
    document_index: Option<usize>,
    #[serde(default)]
    values: Vec<PathBuf>,
    #[serde(default)]
    set: BTreeMap<String, Tree>,
    #[serde(default)]
    release: Option<ReleaseOverride>,
    #[serde(default)]
    asserts: Vec<Tree>,
    #[serde(default)]
    skip: Option<Skip>,
    #[serde(default)]
    only: bool,
    #[serde(flatten)]
    unknown: BTreeMap<String, Tree>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestJob {
    pub name: String,
    /// Templates to render; empty inherits the suite's.
    pub templates: Vec<String>,
    pub values_files: Vec<PathBuf>,
    pub set: BTreeMap<String, Tree>,
    pub release: ReleaseOverride,
    pub assertions: Vec<Assertion>,
    pub skip: Option<Skip>,
    pub only: bool,
}

/// What a job needs from its surroundings to run.
pub struct JobEnv<'a> {
    /// Suite file relative to the chart.
    pub file: &'a str,
    pub suite: &'a str,
    /// The suite-level request the job refines.
    pub request: &'a RenderRequest,
    pub renderer: &'a dyn Renderer,
    pub snapshots: &'a RefCell<SnapshotCache>,
    pub fail_fast: bool,
    pub strict: bool,
}

impl TestJob {
    pub fn new(name: impl Into<String>, assertions: Vec<Assertion>) -> Self {
        Self {
            name: name.into(),
            templates: Vec::new(),
            values_files: Vec::new(),
            set: BTreeMap::new(),
            release: ReleaseOverride::default(),
            assertions,
            skip: None,
            only: false,
        }
    }

    /// Decodes a job definition. `base_dir` resolves relative values paths.
    pub(crate) fn from_definition(
        definition: JobDefinition,
        strict: bool,
        file: &Path,
        base_dir: &Path,
    ) -> Result<Self, EngineError> {
        if !definition.unknown.is_empty() {
            let keys: Vec<&str> = definition.unknown.keys().map(String::as_str).collect();
            if strict {
                return Err(EngineError::definition(
                    file,
                    format!("test '{}' has unknown field(s): {}", definition.it, keys.join(", ")),
                ));
            }
            warn!(file = %file.display(), test = %definition.it, fields = ?keys, "ignoring unknown fields");
        }

        let mut assertions = Vec::with_capacity(definition.asserts.len());
        for raw in &definition.asserts {
            let mut assertion = Assertion::from_yaml(raw, strict, file).map_err(|err| match err {
                EngineError::Definition { path, message, help } => EngineError::Definition {
                    path,
                    message: format!("test '{}': {message}", definition.it),
                    help,
                },
                other => other,
            })?;
            if assertion.template.is_none() {
                assertion.template = definition.template.clone();
            }
            if assertion.document_index.is_none() {
                assertion.document_index = definition.document_index;
            }
            assertions.push(assertion);
        }

        Ok(Self {
            name: definition.it,
            templates: definition.templates,
            values_files: definition
                .values
                .into_iter()
                .map(|p| base_dir.join(p))
                .collect(),
            set: definition.set,
            release: definition.release.unwrap_or_default(),
            assertions,
            skip: definition.skip,
            only: definition.only,
        })
    }

    fn request(&self, base: &RenderRequest) -> RenderRequest {
        let mut request = base.clone();
        if !self.templates.is_empty() {
            request.templates = self.templates.clone();
        }
        request.values_files.extend(self.values_files.iter().cloned());
        request
            .set
            .extend(self.set.iter().map(|(k, v)| (k.clone(), v.clone())));
        self.release.apply(&mut request.release);
        request
    }

    /// Result for a job that is never evaluated, keeping its assertion list.
    pub fn unevaluated(&self, status: Status, reason: Option<String>) -> JobResult {
        JobResult {
            name: self.name.clone(),
            status,
            assertions: self
                .assertions
                .iter()
                .enumerate()
                .map(|(index, a)| AssertionResult {
                    index,
                    kind: a.validator.name().to_string(),
                    negative: a.negative,
                    status,
                    diagnostics: Vec::new(),
                })
                .collect(),
            skip_reason: reason,
            duration: Default::default(),
        }
    }

    /// Renders once, then runs the assertions in declared order. With
    /// fail-fast the assertions after the first failure are `NotRun`.
    pub fn run(&self, env: &JobEnv<'_>) -> JobResult {
        if let Some(skip) = &self.skip {
            info!(suite = env.suite, test = %self.name, "test skipped");
            return self.unevaluated(Status::Skipped, skip.reason.clone());
        }

        let started = Instant::now();
        let (manifests, render_error): (Vec<Manifest>, Option<RenderError>) =
            match env.renderer.render(&self.request(env.request)) {
                Ok(documents) => (index_documents(documents), None),
                Err(err) => {
                    debug!(test = %self.name, error = %err, "render failed");
                    (Vec::new(), Some(err))
                }
            };

        let slots = JobSnapshots::new(env.snapshots, JobId::new(env.file, env.suite, &self.name));
        let base = ValidateContext::new(&manifests)
            .fail_fast(env.fail_fast)
            .strict(env.strict)
            .render_error(render_error.as_ref())
            .snapshot(Some(&slots));

        let mut stopped = false;
        let mut assertions = Vec::with_capacity(self.assertions.len());
        for (index, assertion) in self.assertions.iter().enumerate() {
            let mut result = AssertionResult {
                index,
                kind: assertion.validator.name().to_string(),
                negative: assertion.negative,
                status: Status::NotRun,
                diagnostics: Vec::new(),
            };
            if !stopped {
                let outcome = assertion.evaluate(&base);
                result.status = if outcome.passed { Status::Passed } else { Status::Failed };
                result.diagnostics = outcome.diagnostics;
                stopped = env.fail_fast && !outcome.passed;
            }
            assertions.push(result);
        }

        let status = if assertions.iter().any(|a| a.status.is_failed()) {
            Status::Failed
        } else {
            Status::Passed
        };
        info!(suite = env.suite, test = %self.name, %status, "test finished");

        JobResult {
            name: self.name.clone(),
            status,
            assertions,
            skip_reason: None,
            duration: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::RenderedDocument;
    use crate::validation::{IsKind, Validator};

    /// Renders a fixed result, ignoring the request.
    struct FixedRenderer(Result<Vec<RenderedDocument>, RenderError>);

    impl Renderer for FixedRenderer {
        fn render(&self, _request: &RenderRequest) -> Result<Vec<RenderedDocument>, RenderError> {
            self.0.clone()
        }
    }

    fn deployment() -> FixedRenderer {
        FixedRenderer(Ok(vec![RenderedDocument::new(
            "templates/deployment.yaml",
            serde_yaml::from_str("kind: Deployment").unwrap(),
        )]))
    }

    fn is_kind(kind: &str) -> Assertion {
        Assertion::new(Validator::IsKind(IsKind::of(kind)))
    }

    fn run(job: &TestJob, renderer: &dyn Renderer, fail_fast: bool) -> JobResult {
        let dir = tempfile::tempdir().unwrap();
        let cache = RefCell::new(SnapshotCache::open(dir.path().join("s.yaml"), false).unwrap());
        let request = RenderRequest::default();
        job.run(&JobEnv {
            file: "tests/suite_test.yaml",
            suite: "suite",
            request: &request,
            renderer,
            snapshots: &cache,
            fail_fast,
            strict: false,
        })
    }

    #[test]
    fn fail_fast_stops_after_first_failure() {
        let job = TestJob::new(
            "three asserts",
            vec![is_kind("Deployment"), is_kind("Service"), is_kind("Deployment")],
        );

        let result = run(&job, &deployment(), true);
        assert_eq!(result.status, Status::Failed);
        let statuses: Vec<Status> = result.assertions.iter().map(|a| a.status).collect();
        assert_eq!(statuses, vec![Status::Passed, Status::Failed, Status::NotRun]);
        assert_eq!(result.failed_assertions().count(), 1);

        let result = run(&job, &deployment(), false);
        let statuses: Vec<Status> = result.assertions.iter().map(|a| a.status).collect();
        assert_eq!(statuses, vec![Status::Passed, Status::Failed, Status::Passed]);
    }

    #[test]
    fn render_error_reaches_every_assertion() {
        let renderer = FixedRenderer(Err(RenderError::new("template: bad indentation")));
        let job = TestJob::new("broken", vec![is_kind("Deployment")]);
        let result = run(&job, &renderer, false);
        assert_eq!(result.status, Status::Failed);
        assert_eq!(
            result.assertions[0].diagnostics,
            vec!["Error:", "\ttemplate: bad indentation"]
        );
    }

    #[test]
    fn skipped_job_is_not_evaluated() {
        let mut job = TestJob::new("later", vec![is_kind("Service")]);
        job.skip = Some(Skip {
            reason: Some("flaky".into()),
        });
        let result = run(&job, &deployment(), false);
        assert_eq!(result.status, Status::Skipped);
        assert_eq!(result.skip_reason.as_deref(), Some("flaky"));
        assert_eq!(result.assertions[0].status, Status::Skipped);
    }

    #[test]
    fn request_inherits_and_overrides() {
        let mut job = TestJob::new("t", Vec::new());
        job.templates = vec!["svc.yaml".into()];
        job.release.namespace = Some("prod".into());
        let base = RenderRequest {
            templates: vec!["deploy.yaml".into()],
            ..Default::default()
        };
        let request = job.request(&base);
        assert_eq!(request.templates, vec!["svc.yaml"]);
        assert_eq!(request.release.namespace, "prod");
        assert_eq!(request.release.name, "release-name");
    }
}
