//! Shared pieces of every validator: the failure-report builder, the
//! index-ordered left fold over manifests, and checked extraction helpers.

use difference::{Changeset, Difference};
use regex::Regex;

use super::{AssertionOutcome, ValidateContext};
use crate::manifest::Manifest;
use crate::tree::{self, Path, Tree};

// ============================================================================
// FAILURE REPORTS - diagnostic lines and diffs
// ============================================================================

/// Builds the human-readable diagnostic lines of a failed check.
///
/// Headers end with `:` followed by either a tab and a short value or by
/// tab-indented content lines, e.g.
///
/// ```text
/// Template:	templates/deployment.yaml
/// DocumentIndex:	0
/// Path:	spec.replicas
/// Expected to equal:
/// 	3
/// Actual:
/// 	1
/// ```
#[derive(Debug, Default)]
pub struct FailureReport {
    lines: Vec<String>,
}

impl FailureReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_manifest(manifest: &Manifest) -> Self {
        Self::new()
            .field("Template", &manifest.source)
            .field("DocumentIndex", &manifest.index.to_string())
    }

    pub fn for_optional_manifest(manifest: Option<&Manifest>) -> Self {
        manifest.map(Self::for_manifest).unwrap_or_default()
    }

    pub fn field(mut self, name: &str, value: &str) -> Self {
        self.lines.push(format!("{name}:\t{value}"));
        self
    }

    pub fn path(self, path: &Path) -> Self {
        self.field("Path", &path.to_string())
    }

    pub fn section(mut self, title: &str, content: &str) -> Self {
        self.lines.push(format!("{title}:"));
        self.lines.extend(indent(content));
        self
    }

    /// `Expected to <verb>:` or `Expected NOT to <verb>:`.
    pub fn expected(self, verb: &str, negative: bool, content: &str) -> Self {
        let not = if negative { " NOT" } else { "" };
        self.section(&format!("Expected{not} to {verb}"), content)
    }

    /// A bare expectation without content, e.g. `Expected NOT to exist`.
    pub fn condition(mut self, verb: &str, negative: bool) -> Self {
        let not = if negative { " NOT" } else { "" };
        self.lines.push(format!("Expected{not} to {verb}"));
        self
    }

    pub fn actual(self, content: &str) -> Self {
        self.section("Actual", content)
    }

    pub fn error(self, message: &str) -> Self {
        self.section("Error", message)
    }

    pub fn diff(mut self, expected: &str, actual: &str) -> Self {
        self.lines.push("Diff:".to_string());
        self.lines
            .extend(diff_lines(expected, actual).into_iter().map(|l| format!("\t{l}")));
        self
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn fail(self) -> AssertionOutcome {
        AssertionOutcome::fail(self.lines)
    }
}

fn indent(content: &str) -> Vec<String> {
    if content.is_empty() {
        return vec!["\t".to_string()];
    }
    content.lines().map(|line| format!("\t{line}")).collect()
}

/// Line diff in unified style: `-` expected only, `+` actual only.
pub fn diff_lines(expected: &str, actual: &str) -> Vec<String> {
    let changeset = Changeset::new(expected, actual, "\n");
    let mut out = Vec::new();
    for diff in &changeset.diffs {
        let (prefix, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Rem(text) => ('-', text),
            Difference::Add(text) => ('+', text),
        };
        out.extend(text.lines().map(|line| format!("{prefix} {line}")));
    }
    out
}

// ============================================================================
// AGGREGATION - the per-manifest fold
// ============================================================================

/// Runs `check` over every manifest in index order.
///
/// Aggregation is a monotonic left fold: once a manifest fails, later
/// successes never restore the overall result. With fail-fast the loop stops
/// after the first failure. An empty collection fails unless the context is
/// negated.
pub fn validate_each<F>(ctx: &ValidateContext<'_>, mut check: F) -> AssertionOutcome
where
    F: FnMut(&Manifest) -> AssertionOutcome,
{
    let mut success = true;
    let mut diagnostics = Vec::new();

    for manifest in ctx.manifests {
        let outcome = check(manifest);
        success = success && outcome.passed;
        diagnostics.extend(outcome.diagnostics);
        if !success && ctx.fail_fast {
            break;
        }
    }

    if ctx.manifests.is_empty() && !ctx.negative {
        success = false;
        diagnostics.extend(FailureReport::new().error("no manifest found").into_lines());
    }

    AssertionOutcome {
        passed: success,
        diagnostics,
    }
}

// ============================================================================
// EXTRACTION - checked paths, patterns and text
// ============================================================================

/// Parses a declared path; a malformed one is a configuration failure.
pub fn parse_path(raw: &str) -> Result<Path, AssertionOutcome> {
    Path::parse(raw).map_err(|err| FailureReport::new().error(&err.to_string()).fail())
}

pub fn compile_pattern(pattern: &str) -> Result<Regex, AssertionOutcome> {
    Regex::new(pattern).map_err(|err| FailureReport::new().error(&err.to_string()).fail())
}

/// Looks `path` up in `manifest`. A missing node fails the check unless the
/// context is negated, in which case the manifest passes.
pub fn lookup_existing<'m>(
    ctx: &ValidateContext<'_>,
    manifest: &'m Manifest,
    path: &Path,
) -> Result<&'m Tree, AssertionOutcome> {
    match path.lookup(&manifest.tree) {
        Some(value) => Ok(value),
        None if ctx.negative => Err(AssertionOutcome::pass()),
        None => Err(FailureReport::for_manifest(manifest)
            .error(&format!("unknown path {path}"))
            .fail()),
    }
}

/// The manifest's raw text, type-checked. `Ok(None)` when there is none.
pub fn raw_text(
    ctx: &ValidateContext<'_>,
    manifest: &Manifest,
) -> Result<Option<String>, AssertionOutcome> {
    match manifest.raw() {
        None => Ok(None),
        Some(value) => tree::expect_text(value, ctx.strict)
            .map(Some)
            .map_err(|err| {
                FailureReport::for_manifest(manifest)
                    .error(&format!("raw content: {err}"))
                    .fail()
            }),
    }
}

/// Text at `path`, type-checked.
pub fn text_at(
    ctx: &ValidateContext<'_>,
    manifest: &Manifest,
    path: &Path,
) -> Result<String, AssertionOutcome> {
    let value = lookup_existing(ctx, manifest, path)?;
    tree::expect_text(value, ctx.strict).map_err(|err| {
        FailureReport::for_manifest(manifest)
            .path(path)
            .error(&err)
            .fail()
    })
}
