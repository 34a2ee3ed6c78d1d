use serde::Deserialize;
use tracing::debug;

use super::common::{lookup_existing, parse_path, raw_text, validate_each, FailureReport};
use super::{AssertionOutcome, Validate, ValidateContext};
use crate::manifest::Manifest;
use crate::snapshot::{CompareOutcome, SnapshotComparison};
use crate::tree::{render, Path, Tree};

/// Turns a comparison into an outcome, applying negation to the match.
///
/// `Created` and `Updated` only happen in update mode on non-negated
/// assertions and are informational: they pass.
fn judge(
    ctx: &ValidateContext<'_>,
    manifest: &Manifest,
    path: Option<&Path>,
    content: &Tree,
    comparison: SnapshotComparison,
) -> AssertionOutcome {
    let header = |report: FailureReport| match path {
        Some(path) if !path.is_root() => report.path(path),
        _ => report,
    };
    let actual = render(content);

    let matched = match comparison.outcome {
        CompareOutcome::Matched => true,
        CompareOutcome::Created | CompareOutcome::Updated { .. } => {
            debug!(ordinal = comparison.ordinal, "snapshot recorded");
            return AssertionOutcome::pass();
        }
        CompareOutcome::Missing => {
            return header(FailureReport::for_manifest(manifest))
                .error(&format!(
                    "no snapshot recorded for slot {}; run with --update-snapshot to record it",
                    comparison.ordinal
                ))
                .fail();
        }
        CompareOutcome::Mismatched { expected } => {
            if !ctx.negative {
                let expected = render(&expected);
                return header(FailureReport::for_manifest(manifest))
                    .expected(
                        &format!("match snapshot {}", comparison.ordinal),
                        false,
                        &expected,
                    )
                    .diff(&expected, &actual)
                    .fail();
            }
            false
        }
    };

    if matched == ctx.negative {
        return header(FailureReport::for_manifest(manifest))
            .expected(
                &format!("match snapshot {}", comparison.ordinal),
                ctx.negative,
                &actual,
            )
            .fail();
    }
    AssertionOutcome::pass()
}

fn store_unavailable() -> AssertionOutcome {
    FailureReport::new()
        .error("snapshot store is not available for this assertion")
        .fail()
}

/// `matchSnapshot`: the node at `path` (whole document by default) equals
/// the recorded snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MatchSnapshot {
    #[serde(default)]
    pub path: Option<String>,
}

impl MatchSnapshot {
    pub const PARAMS: &'static [&'static str] = &["path"];
}

impl Validate for MatchSnapshot {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let Some(comparer) = ctx.snapshot else {
            return store_unavailable();
        };
        let path = match parse_path(self.path.as_deref().unwrap_or_default()) {
            Ok(path) => path,
            Err(outcome) => return outcome,
        };

        validate_each(ctx, |manifest| {
            let content = match lookup_existing(ctx, manifest, &path) {
                Ok(content) => content,
                Err(outcome) => return outcome,
            };
            let comparison = comparer.compare_to_snapshot(content, !ctx.negative);
            judge(ctx, manifest, Some(&path), content, comparison)
        })
    }
}

/// `matchSnapshotRaw`: the raw text equals the recorded snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MatchSnapshotRaw {}

impl MatchSnapshotRaw {
    pub const PARAMS: &'static [&'static str] = &[];
}

impl Validate for MatchSnapshotRaw {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        let Some(comparer) = ctx.snapshot else {
            return store_unavailable();
        };

        validate_each(ctx, |manifest| {
            let text = match raw_text(ctx, manifest) {
                Ok(Some(text)) => text,
                Ok(None) => {
                    return FailureReport::for_manifest(manifest)
                        .error("document has no raw content")
                        .fail()
                }
                Err(outcome) => return outcome,
            };
            let content = Tree::from(text);
            let comparison = comparer.compare_to_snapshot(&content, !ctx.negative);
            judge(ctx, manifest, None, &content, comparison)
        })
    }
}
