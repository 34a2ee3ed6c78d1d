//! Collection-level validators: they look at the manifest set as a whole
//! instead of folding over individual documents.

use serde::Deserialize;

use super::common::FailureReport;
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::manifest::Manifest;

/// `hasDocuments`: the number of manifests equals `count`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HasDocuments {
    pub count: usize,
}

impl HasDocuments {
    pub const PARAMS: &'static [&'static str] = &["count"];
}

impl Validate for HasDocuments {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let actual = ctx.manifests.len();
        if (actual == self.count) == ctx.negative {
            return FailureReport::new()
                .expected("have documents count", ctx.negative, &self.count.to_string())
                .actual(&actual.to_string())
                .fail();
        }
        AssertionOutcome::pass()
    }
}

/// `containsDocument`: some manifest has the given identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainsDocument {
    pub kind: String,
    pub api_version: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub namespace: Option<String>,
}

impl ContainsDocument {
    pub const PARAMS: &'static [&'static str] = &["kind", "apiVersion", "name", "namespace"];

    fn matches(&self, manifest: &Manifest) -> bool {
        manifest.kind() == Some(self.kind.as_str())
            && manifest.api_version() == Some(self.api_version.as_str())
            && self
                .name
                .as_deref()
                .map_or(true, |name| manifest.name() == Some(name))
            && self
                .namespace
                .as_deref()
                .map_or(true, |ns| manifest.namespace() == Some(ns))
    }

    fn describe(&self) -> String {
        let mut parts = vec![
            format!("kind = {}", self.kind),
            format!("apiVersion = {}", self.api_version),
        ];
        if let Some(name) = &self.name {
            parts.push(format!("name = {name}"));
        }
        if let Some(namespace) = &self.namespace {
            parts.push(format!("namespace = {namespace}"));
        }
        parts.join(", ")
    }
}

impl Validate for ContainsDocument {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let matching: Vec<usize> = ctx
            .manifests
            .iter()
            .filter(|m| self.matches(m))
            .map(|m| m.index)
            .collect();
        let found = !matching.is_empty();

        if found == ctx.negative {
            let report = FailureReport::new().expected("contain document", ctx.negative, &self.describe());
            if ctx.negative {
                let indices: Vec<String> = matching.iter().map(|i| i.to_string()).collect();
                return report.field("DocumentIndex", &indices.join(", ")).fail();
            }
            return report
                .actual(&format!("{} document(s), none matching", ctx.manifests.len()))
                .fail();
        }
        AssertionOutcome::pass()
    }
}
