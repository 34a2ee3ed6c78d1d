use serde::Deserialize;
use serde_yaml::Value;

use super::common::{lookup_existing, parse_path, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::manifest::Manifest;
use crate::tree::{render, type_name};

fn check_identity(
    ctx: &ValidateContext<'_>,
    expected: &str,
    verb: &str,
    actual_of: fn(&Manifest) -> Option<&str>,
) -> AssertionOutcome {
    validate_each(ctx, |manifest| {
        let actual = actual_of(manifest);
        if (actual == Some(expected)) == ctx.negative {
            return FailureReport::for_manifest(manifest)
                .expected(verb, ctx.negative, expected)
                .actual(actual.unwrap_or("null"))
                .fail();
        }
        AssertionOutcome::pass()
    })
}

/// `isKind`: the document's `kind` equals `of`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsKind {
    pub of: String,
}

impl IsKind {
    pub const PARAMS: &'static [&'static str] = &["of"];

    pub fn of(kind: impl Into<String>) -> Self {
        Self { of: kind.into() }
    }
}

impl Validate for IsKind {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        check_identity(ctx, &self.of, "be kind", Manifest::kind)
    }
}

/// `isAPIVersion`: the document's `apiVersion` equals `of`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsApiVersion {
    pub of: String,
}

impl IsApiVersion {
    pub const PARAMS: &'static [&'static str] = &["of"];
}

impl Validate for IsApiVersion {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        check_identity(ctx, &self.of, "be apiVersion", Manifest::api_version)
    }
}

const KNOWN_TYPES: &[&str] = &["string", "int", "float", "bool", "map", "seq", "null"];

/// `isType`: the node at `path` has the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsType {
    pub path: String,
    #[serde(rename = "type")]
    pub expected_type: String,
}

impl IsType {
    pub const PARAMS: &'static [&'static str] = &["path", "type"];
}

impl Validate for IsType {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        if !KNOWN_TYPES.contains(&self.expected_type.as_str()) {
            return FailureReport::new()
                .error(&format!(
                    "unknown type '{}', expected one of: {}",
                    self.expected_type,
                    KNOWN_TYPES.join(", ")
                ))
                .fail();
        }
        let path = match parse_path(&self.path) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };

        validate_each(ctx, |manifest| {
            let actual = match lookup_existing(ctx, manifest, &path) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            if (type_name(actual) == self.expected_type) == ctx.negative {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .expected("be of type", ctx.negative, &self.expected_type)
                    .actual(type_name(actual))
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}

/// `lengthEqual`: the sequence or map at `path` has `count` entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LengthEqual {
    pub path: String,
    pub count: usize,
}

impl LengthEqual {
    pub const PARAMS: &'static [&'static str] = &["path", "count"];
}

impl Validate for LengthEqual {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let path = match parse_path(&self.path) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };

        validate_each(ctx, |manifest| {
            let actual = match lookup_existing(ctx, manifest, &path) {
                Ok(actual) => actual,
                Err(outcome) => return outcome,
            };
            let length = match actual {
                Value::Sequence(seq) => seq.len(),
                Value::Mapping(map) => map.len(),
                other => {
                    return FailureReport::for_manifest(manifest)
                        .path(&path)
                        .error(&format!("expected a seq or map, found {}", type_name(other)))
                        .fail()
                }
            };
            if (length == self.count) == ctx.negative {
                return FailureReport::for_manifest(manifest)
                    .path(&path)
                    .expected("have length", ctx.negative, &self.count.to_string())
                    .actual(&format!("{length}\n{}", render(actual)))
                    .fail();
            }
            AssertionOutcome::pass()
        })
    }
}
