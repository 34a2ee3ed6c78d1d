use serde::Deserialize;

use super::common::{compile_pattern, parse_path, raw_text, text_at, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};

/// `matchRegex`: the string at `path` matches `pattern` (search semantics).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchRegex {
    pub path: String,
    pub pattern: String,
}

impl MatchRegex {
    pub const PARAMS: &'static [&'static str] = &["path", "pattern"];
}

impl Validate for MatchRegex {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let path = match parse_path(&self.path) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };
        let regex = match compile_pattern(&self.pattern) {
            Ok(regex) => regex,
            Err(outcome) => return outcome,
        };

        validate_each(ctx, |manifest| {
            let actual = match text_at(ctx, manifest, &path) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            if regex.is_match(&actual) == ctx.negative {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .expected("match", ctx.negative, &self.pattern)
                    .actual(&actual)
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}

/// `matchRegexRaw`: the raw text of a document matches `pattern`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchRegexRaw {
    pub pattern: String,
}

impl MatchRegexRaw {
    pub const PARAMS: &'static [&'static str] = &["pattern"];
}

impl Validate for MatchRegexRaw {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let regex = match compile_pattern(&self.pattern) {
            Ok(regex) => regex,
            Err(outcome) => return outcome,
        };

        validate_each(ctx, |manifest| {
            let actual = match raw_text(ctx, manifest) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            let matched = actual.as_deref().is_some_and(|text| regex.is_match(text));
            if matched == ctx.negative {
                return FailureReport::for_manifest(manifest)
                    .expected("match", ctx.negative, &self.pattern)
                    .actual(actual.as_deref().unwrap_or("null"))
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}
