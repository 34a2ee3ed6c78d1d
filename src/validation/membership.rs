use serde::Deserialize;
use serde_yaml::Value;

use super::common::{lookup_existing, parse_path, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::tree::{is_subset, render, structural_eq, type_name, Tree};

/// `contains`: the sequence at `path` contains `content`.
///
/// With `any`, mapping elements only need to include `content` as a subset.
/// With `count`, the element must occur exactly that many times.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Contains {
    pub path: String,
    pub content: Tree,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub any: bool,
}

impl Contains {
    pub const PARAMS: &'static [&'static str] = &["path", "content", "count", "any"];

    fn occurrences(&self, elements: &[Tree], strict: bool) -> usize {
        elements
            .iter()
            .filter(|element| {
                if self.any {
                    is_subset(&self.content, element, strict)
                } else {
                    structural_eq(&self.content, element, strict)
                }
            })
            .count()
    }
}

impl Validate for Contains {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let path = match parse_path(&self.path) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };
        let expected = render(&self.content);
        let verb = match self.count {
            Some(count) => format!("contain {count} time(s)"),
            None => "contain".to_string(),
        };

        validate_each(ctx, |manifest| {
            let actual = match lookup_existing(ctx, manifest, &path) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            let Value::Sequence(elements) = actual else {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .error(&format!("expected a sequence, found {}", type_name(actual)))
                    .fail();
            };

            let occurrences = self.occurrences(elements, ctx.strict);
            let found = match self.count {
                Some(count) => occurrences == count,
                None => occurrences > 0,
            };
            if found == ctx.negative {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .expected(&verb, ctx.negative, &expected)
                    .actual(&render(actual))
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}

/// `isSubset`: the mapping at `path` includes every entry of `content`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IsSubset {
    pub path: String,
    pub content: Tree,
}

impl IsSubset {
    pub const PARAMS: &'static [&'static str] = &["path", "content"];
}

impl Validate for IsSubset {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let path = match parse_path(&self.path) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };
        if !self.content.is_mapping() {
            return FailureReport::new()
                .error(&format!(
                    "isSubset content must be a map, found {}",
                    type_name(&self.content)
                ))
                .fail();
        }

        validate_each(ctx, |manifest| {
            let actual = match lookup_existing(ctx, manifest, &path) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            if !actual.is_mapping() {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .error(&format!("expected a map, found {}", type_name(actual)))
                    .fail();
            }
            if is_subset(&self.content, actual, ctx.strict) == ctx.negative {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .expected("contain subset", ctx.negative, &render(&self.content))
                    .actual(&render(actual))
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}
