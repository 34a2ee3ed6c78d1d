//! `failedTemplate`: asserts that rendering failed, optionally with a given
//! message (exact) or matching a pattern.
//!
//! When the renderer failed as a whole, the render error message is checked.
//! Otherwise every manifest's raw field is checked, in index order.
//!
//! Quirk kept on purpose: a parameterless validator in a non-negated context
//! skips every manifest, so populated output passes. Existing suites rely on
//! `failedTemplate: {}` behaving this way.

use serde::Deserialize;
use tracing::debug;

use super::common::{compile_pattern, raw_text, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::manifest::Manifest;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedTemplate {
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_pattern: Option<String>,
}

impl FailedTemplate {
    pub const PARAMS: &'static [&'static str] = &["errorMessage", "errorPattern"];

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            error_message: Some(message.into()),
            error_pattern: None,
        }
    }

    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        Self {
            error_message: None,
            error_pattern: Some(pattern.into()),
        }
    }

    fn message(&self) -> Option<&str> {
        self.error_message.as_deref().filter(|s| !s.is_empty())
    }

    fn pattern(&self) -> Option<&str> {
        self.error_pattern.as_deref().filter(|s| !s.is_empty())
    }

    fn is_unparameterized(&self) -> bool {
        self.message().is_none() && self.pattern().is_none()
    }

    fn fail_info(
        &self,
        actual: Option<&str>,
        manifest: Option<&Manifest>,
        negative: bool,
    ) -> AssertionOutcome {
        let verb = if self.pattern().is_some() { "match" } else { "equal" };
        let expected = self.message().or(self.pattern()).unwrap_or_default();
        let actual = actual.unwrap_or("null");

        debug!(validator = "failed_template", "expected content: {expected}");
        debug!(validator = "failed_template", "actual content: {actual}");

        let report = FailureReport::for_optional_manifest(manifest).expected(verb, negative, expected);
        if negative {
            report.fail()
        } else {
            report.actual(actual).fail()
        }
    }

    fn check(
        &self,
        actual: Option<&str>,
        manifest: Option<&Manifest>,
        ctx: &ValidateContext<'_>,
    ) -> AssertionOutcome {
        let matched = if let Some(pattern) = self.pattern() {
            let regex = match compile_pattern(pattern) {
                Ok(regex) => regex,
                Err(outcome) => return outcome,
            };
            actual.is_some_and(|text| regex.is_match(text))
        } else if let Some(message) = self.message() {
            actual == Some(message)
        } else {
            return AssertionOutcome::pass();
        };

        if matched == ctx.negative {
            return self.fail_info(actual, manifest, ctx.negative);
        }
        AssertionOutcome::pass()
    }

    fn validate_manifests(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        if ctx.manifests.is_empty() {
            if ctx.negative {
                return AssertionOutcome::pass();
            }
            return self.fail_info(Some("No failed document"), None, false);
        }

        if self.is_unparameterized() && !ctx.negative {
            return AssertionOutcome::pass();
        }

        validate_each(ctx, |manifest| {
            let actual = match raw_text(ctx, manifest) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            self.check(actual.as_deref(), Some(manifest), ctx)
        })
    }
}

impl Validate for FailedTemplate {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        if self.message().is_some() && self.pattern().is_some() {
            return FailureReport::new()
                .error("single attribute 'errorMessage' or 'errorPattern' supported at the same time")
                .fail();
        }

        match ctx.render_error {
            Some(error) if self.is_unparameterized() => {
                debug!(validator = "failed_template", error = %error, "render error present");
                AssertionOutcome::pass()
            }
            Some(error) => self.check(Some(&error.message), None, ctx),
            None => self.validate_manifests(ctx),
        }
    }
}
