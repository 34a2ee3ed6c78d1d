//! The assertion model.
//!
//! Each assertion kind is one variant of the closed [`Validator`] enum and
//! implements [`Validate`]. Validators are pure functions of their declared
//! parameters and a [`ValidateContext`]: they return an [`AssertionOutcome`]
//! (pass/fail plus diagnostic lines) and never raise errors. The only side
//! effect is the snapshot store behind `matchSnapshot`.
//!
//! ## Negation
//!
//! `ctx.negative` flips the polarity of the expected-vs-actual comparison at
//! the point where it is made (`matched == ctx.negative` means failure). The
//! aggregation over manifests and fail-fast behave the same either way.

use serde::Serialize;

pub mod common;
pub mod context;
pub mod documents;
pub mod equal;
pub mod failed_template;
pub mod membership;
pub mod pattern;
pub mod presence;
pub mod shape;
pub mod snapshot;

pub use common::FailureReport;
pub use context::ValidateContext;
pub use documents::{ContainsDocument, HasDocuments};
pub use equal::{Equal, EqualRaw};
pub use failed_template::FailedTemplate;
pub use membership::{Contains, IsSubset};
pub use pattern::{MatchRegex, MatchRegexRaw};
pub use presence::{Exists, IsEmpty, IsNull, IsNullOrEmpty};
pub use shape::{IsApiVersion, IsKind, IsType, LengthEqual};
pub use snapshot::{MatchSnapshot, MatchSnapshotRaw};

/// Result of evaluating one assertion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AssertionOutcome {
    pub passed: bool,
    pub diagnostics: Vec<String>,
}

impl AssertionOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            diagnostics: Vec::new(),
        }
    }

    pub fn fail(diagnostics: Vec<String>) -> Self {
        Self {
            passed: false,
            diagnostics,
        }
    }
}

pub trait Validate {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Equal(Equal),
    EqualRaw(EqualRaw),
    MatchRegex(MatchRegex),
    MatchRegexRaw(MatchRegexRaw),
    Contains(Contains),
    IsSubset(IsSubset),
    IsNull(IsNull),
    IsEmpty(IsEmpty),
    IsNullOrEmpty(IsNullOrEmpty),
    Exists(Exists),
    IsKind(IsKind),
    IsApiVersion(IsApiVersion),
    IsType(IsType),
    LengthEqual(LengthEqual),
    HasDocuments(HasDocuments),
    ContainsDocument(ContainsDocument),
    MatchSnapshot(MatchSnapshot),
    MatchSnapshotRaw(MatchSnapshotRaw),
    FailedTemplate(FailedTemplate),
}

impl Validator {
    /// Canonical assertion-type name as written in test files.
    pub fn name(&self) -> &'static str {
        match self {
            Validator::Equal(_) => "equal",
            Validator::EqualRaw(_) => "equalRaw",
            Validator::MatchRegex(_) => "matchRegex",
            Validator::MatchRegexRaw(_) => "matchRegexRaw",
            Validator::Contains(_) => "contains",
            Validator::IsSubset(_) => "isSubset",
            Validator::IsNull(_) => "isNull",
            Validator::IsEmpty(_) => "isEmpty",
            Validator::IsNullOrEmpty(_) => "isNullOrEmpty",
            Validator::Exists(_) => "exists",
            Validator::IsKind(_) => "isKind",
            Validator::IsApiVersion(_) => "isAPIVersion",
            Validator::IsType(_) => "isType",
            Validator::LengthEqual(_) => "lengthEqual",
            Validator::HasDocuments(_) => "hasDocuments",
            Validator::ContainsDocument(_) => "containsDocument",
            Validator::MatchSnapshot(_) => "matchSnapshot",
            Validator::MatchSnapshotRaw(_) => "matchSnapshotRaw",
            Validator::FailedTemplate(_) => "failedTemplate",
        }
    }

    /// Validators that inspect the render error instead of failing on it.
    pub fn expects_render_error(&self) -> bool {
        matches!(self, Validator::FailedTemplate(_))
    }

    pub fn uses_snapshots(&self) -> bool {
        matches!(
            self,
            Validator::MatchSnapshot(_) | Validator::MatchSnapshotRaw(_)
        )
    }

    fn inner(&self) -> &dyn Validate {
        match self {
            Validator::Equal(v) => v,
            Validator::EqualRaw(v) => v,
            Validator::MatchRegex(v) => v,
            Validator::MatchRegexRaw(v) => v,
            Validator::Contains(v) => v,
            Validator::IsSubset(v) => v,
            Validator::IsNull(v) => v,
            Validator::IsEmpty(v) => v,
            Validator::IsNullOrEmpty(v) => v,
            Validator::Exists(v) => v,
            Validator::IsKind(v) => v,
            Validator::IsApiVersion(v) => v,
            Validator::IsType(v) => v,
            Validator::LengthEqual(v) => v,
            Validator::HasDocuments(v) => v,
            Validator::ContainsDocument(v) => v,
            Validator::MatchSnapshot(v) => v,
            Validator::MatchSnapshotRaw(v) => v,
            Validator::FailedTemplate(v) => v,
        }
    }
}

impl Validate for Validator {
    fn validate(&self, ctx: &ValidateContext<'_>) -> AssertionOutcome {
        if let Some(error) = ctx.render_error {
            if !self.expects_render_error() {
                return FailureReport::new().error(&error.message).fail();
            }
        }
        self.inner().validate(ctx)
    }
}
