use serde::Deserialize;
use tracing::debug;

use super::common::{lookup_existing, parse_path, raw_text, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::tree::{render, structural_eq, Tree};

/// `equal`: the node at `path` is structurally equal to `value`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equal {
    pub path: String,
    pub value: Tree,
}

impl Equal {
    pub const PARAMS: &'static [&'static str] = &["path", "value"];
}

impl Validate for Equal {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let path = match parse_path(&self.path) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };
        let expected = render(&self.value);

        validate_each(ctx, |manifest| {
            let actual = match lookup_existing(ctx, manifest, &path) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            debug!(validator = "equal", "expected content: {expected}");
            debug!(validator = "equal", "actual content: {}", render(actual));

            if structural_eq(&self.value, actual, ctx.strict) == ctx.negative {
                let report = FailureReport::for_manifest(manifest)
                    .path(&path)
                    .expected("equal", ctx.negative, &expected);
                if ctx.negative {
                    return report.fail();
                }
                return report
                    .actual(&render(actual))
                    .diff(&expected, &render(actual))
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}

/// `equalRaw`: the raw text of a document equals `value`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EqualRaw {
    pub value: String,
}

impl EqualRaw {
    pub const PARAMS: &'static [&'static str] = &["value"];
}

impl Validate for EqualRaw {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        validate_each(ctx, |manifest| {
            let actual = match raw_text(ctx, manifest) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            if (actual.as_deref() == Some(self.value.as_str())) == ctx.negative {
                let report = FailureReport::for_manifest(manifest).expected(
                    "equal",
                    ctx.negative,
                    &self.value,
                );
                if ctx.negative {
                    return report.fail();
                }
                return report.actual(actual.as_deref().unwrap_or("null")).fail();
            }
            AssertionOutcome::pass()
        })
    }
}
