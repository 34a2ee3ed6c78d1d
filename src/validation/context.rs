use crate::manifest::{Manifest, RenderError};
use crate::snapshot::SnapshotComparer;

/// Per-assertion execution state.
///
/// Built by the job for each assertion and handed to the validator by shared
/// reference; validators never mutate it. Snapshot writes go through the
/// [`SnapshotComparer`], which owns its own bookkeeping.
#[derive(Clone, Copy)]
pub struct ValidateContext<'a> {
    /// Manifests the assertion applies to, in index order.
    pub manifests: &'a [Manifest],
    /// Inverts the polarity of every expected-vs-actual comparison.
    pub negative: bool,
    /// Stop at the first failing manifest.
    pub fail_fast: bool,
    /// Disables lenient coercions (number/string, int/float).
    pub strict: bool,
    /// Set when the renderer failed; `manifests` is then empty.
    pub render_error: Option<&'a RenderError>,
    pub snapshot: Option<&'a dyn SnapshotComparer>,
}

impl<'a> ValidateContext<'a> {
    pub fn new(manifests: &'a [Manifest]) -> Self {
        Self {
            manifests,
            negative: false,
            fail_fast: false,
            strict: false,
            render_error: None,
            snapshot: None,
        }
    }

    pub fn negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn render_error(mut self, error: Option<&'a RenderError>) -> Self {
        self.render_error = error;
        self
    }

    pub fn snapshot(mut self, comparer: Option<&'a dyn SnapshotComparer>) -> Self {
        self.snapshot = comparer;
        self
    }
}

impl std::fmt::Debug for ValidateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidateContext")
            .field("manifests", &self.manifests.len())
            .field("negative", &self.negative)
            .field("fail_fast", &self.fail_fast)
            .field("strict", &self.strict)
            .field("render_error", &self.render_error)
            .field("snapshot", &self.snapshot.is_some())
            .finish()
    }
}
