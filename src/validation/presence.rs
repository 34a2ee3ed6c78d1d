//! Validators that define what absence means: `isNull`, `isEmpty`,
//! `isNullOrEmpty` and `exists`. A missing path is a regular input here,
//! never an "unknown path" failure.

use serde::Deserialize;
use serde_yaml::Value;

use super::common::{parse_path, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::tree::{render, Path, Tree};

fn is_null(value: Option<&Tree>) -> bool {
    matches!(value, None | Some(Value::Null))
}

fn is_empty(value: Option<&Tree>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Sequence(seq)) => seq.is_empty(),
        Some(Value::Mapping(map)) => map.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Tagged(_)) => false,
    }
}

fn is_null_or_empty(value: Option<&Tree>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Sequence(seq)) => seq.is_empty(),
        Some(Value::Mapping(map)) => map.is_empty(),
        _ => false,
    }
}

fn check_presence(
    ctx: &ValidateContext<'_>,
    raw_path: &str,
    verb: &str,
    predicate: fn(Option<&Tree>) -> bool,
) -> AssertionOutcome {
    let path: Path = match parse_path(raw_path) {
        Ok(path) => path,
        Err(outcome) => return outcome,
    };

    validate_each(ctx, |manifest| {
        let actual = path.lookup(&manifest.tree);
        if predicate(actual) == ctx.negative {
            return FailureReport::for_manifest(manifest)
                .path(&path)
                .condition(verb, ctx.negative)
                .actual(&actual.map(render).unwrap_or_else(|| "<missing>".to_string()))
                .fail();
        }
        AssertionOutcome::pass()
    })
}

/// `isNull`: the node is null or absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsNull {
    pub path: String,
}

impl IsNull {
    pub const PARAMS: &'static [&'static str] = &["path"];
}

impl Validate for IsNull {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        check_presence(ctx, &self.path, "be null", is_null)
    }
}

/// `isEmpty`: the node is absent, null, or a zero value
/// (`""`, `[]`, `{}`, `0`, `false`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsEmpty {
    pub path: String,
}

impl IsEmpty {
    pub const PARAMS: &'static [&'static str] = &["path"];
}

impl Validate for IsEmpty {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        check_presence(ctx, &self.path, "be empty", is_empty)
    }
}

/// `isNullOrEmpty`: absent, null, or an empty string/sequence/map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IsNullOrEmpty {
    pub path: String,
}

impl IsNullOrEmpty {
    pub const PARAMS: &'static [&'static str] = &["path"];
}

impl Validate for IsNullOrEmpty {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        check_presence(ctx, &self.path, "be null or empty", is_null_or_empty)
    }
}

/// `exists`: the path resolves, even to null.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Exists {
    pub path: String,
}

impl Exists {
    pub const PARAMS: &'static [&'static str] = &["path"];
}

impl Validate for Exists {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        check_presence(ctx, &self.path, "exist", |value| value.is_some())
    }
}
