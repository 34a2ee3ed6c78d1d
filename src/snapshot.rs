//! Snapshot store: previously recorded documents, compared structurally.
//!
//! One YAML file per chart maps `file -> suite -> test -> ordinal -> tree`,
//! where `file` is the suite file relative to the chart. Suite and test names
//! are only unique within a file, so the file keeps two suites that share a
//! name apart. Ordinals number the snapshot comparisons of a job in
//! evaluation order, starting at 1, so adding a non-snapshot assertion does
//! not shift existing keys.
//!
//! Lifecycle of a key during [`SnapshotCache::evaluate`]:
//!
//! | stored? | equal? | update mode | outcome      |
//! |---------|--------|-------------|--------------|
//! | no      | –      | off         | `Missing`    |
//! | no      | –      | on          | `Created`    |
//! | yes     | yes    | any         | `Matched`    |
//! | yes     | no     | off         | `Mismatched` |
//! | yes     | no     | on          | `Updated`    |
//!
//! The cache is shared by the suites of one chart and lives behind a
//! `RefCell`; suites run sequentially so a key is never written twice
//! concurrently.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::errors::EngineError;
use crate::tree::{structural_eq, Tree};

/// Directory, relative to the tests directory, holding snapshot files.
pub const SNAPSHOT_DIR: &str = "__snapshot__";
pub const SNAPSHOT_FILE: &str = "snapshots.yaml";

// ============================================================================
// KEYS AND OUTCOMES
// ============================================================================

type Slots = BTreeMap<usize, Tree>;
type Store = BTreeMap<String, BTreeMap<String, BTreeMap<String, Slots>>>;

/// Identity of one job: suite file, suite name and test name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId {
    pub file: String,
    pub suite: String,
    pub test: String,
}

impl JobId {
    pub fn new(file: impl Into<String>, suite: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            suite: suite.into(),
            test: test.into(),
        }
    }

    pub fn slot(&self, ordinal: usize) -> SnapshotKey {
        SnapshotKey {
            job: self.clone(),
            ordinal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotKey {
    pub job: JobId,
    pub ordinal: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompareOutcome {
    Matched,
    Created,
    Updated { previous: Tree },
    Mismatched { expected: Tree },
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotComparison {
    pub ordinal: usize,
    pub outcome: CompareOutcome,
}

/// Per-run counters, reported in the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub matched: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub obsolete: usize,
}

impl SnapshotStats {
    pub fn merge(&mut self, other: &SnapshotStats) {
        self.matched += other.matched;
        self.created += other.created;
        self.updated += other.updated;
        self.failed += other.failed;
        self.obsolete += other.obsolete;
    }
}

// ============================================================================
// SNAPSHOT CACHE
// ============================================================================

#[derive(Debug)]
pub struct SnapshotCache {
    path: PathBuf,
    update: bool,
    stored: Store,
    visited: BTreeMap<JobId, BTreeSet<usize>>,
    dirty: bool,
    stats: SnapshotStats,
}

impl SnapshotCache {
    /// Opens the store at `path`; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>, update: bool) -> Result<Self, EngineError> {
        let path = path.into();
        let stored = if path.is_file() {
            let text = fs::read_to_string(&path).map_err(|err| EngineError::io(&path, err))?;
            if text.trim().is_empty() {
                Store::new()
            } else {
                serde_yaml::from_str(&text).map_err(|err| EngineError::parse(&path, err))?
            }
        } else {
            Store::new()
        };
        debug!(path = %path.display(), files = stored.len(), "snapshot store opened");

        Ok(Self {
            path,
            update,
            stored,
            visited: BTreeMap::new(),
            dirty: false,
            stats: SnapshotStats::default(),
        })
    }

    /// Conventional location below a chart's tests directory.
    pub fn default_path(tests_dir: &Path) -> PathBuf {
        tests_dir.join(SNAPSHOT_DIR).join(SNAPSHOT_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn update_mode(&self) -> bool {
        self.update
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn slots(&self, job: &JobId) -> Option<&Slots> {
        self.stored
            .get(&job.file)
            .and_then(|suites| suites.get(&job.suite))
            .and_then(|tests| tests.get(&job.test))
    }

    pub fn load(&self, key: &SnapshotKey) -> Option<&Tree> {
        self.slots(&key.job).and_then(|slots| slots.get(&key.ordinal))
    }

    /// Pure structural comparison. An absent key never matches.
    pub fn compare(&self, key: &SnapshotKey, content: &Tree) -> bool {
        self.load(key)
            .is_some_and(|stored| structural_eq(stored, content, false))
    }

    /// Stores `content` under `key`. Does nothing and returns `false` unless
    /// update mode is enabled.
    pub fn record(&mut self, key: &SnapshotKey, content: &Tree) -> bool {
        if !self.update {
            return false;
        }
        self.insert(key, content.clone());
        true
    }

    /// Full record-or-compare protocol for one key. With `allow_write` off
    /// the store is only read, whatever the update mode.
    pub fn evaluate(&mut self, key: &SnapshotKey, content: &Tree, allow_write: bool) -> CompareOutcome {
        self.visited
            .entry(key.job.clone())
            .or_default()
            .insert(key.ordinal);
        let writable = self.update && allow_write;

        let outcome = match self.load(key).cloned() {
            None if writable => {
                self.insert(key, content.clone());
                CompareOutcome::Created
            }
            None => CompareOutcome::Missing,
            Some(stored) if structural_eq(&stored, content, false) => CompareOutcome::Matched,
            Some(previous) if writable => {
                self.insert(key, content.clone());
                CompareOutcome::Updated { previous }
            }
            Some(expected) => CompareOutcome::Mismatched { expected },
        };

        let job = &key.job;
        match &outcome {
            CompareOutcome::Matched => self.stats.matched += 1,
            CompareOutcome::Created => {
                info!(file = %job.file, suite = %job.suite, test = %job.test, ordinal = key.ordinal, "snapshot created");
                self.stats.created += 1
            }
            CompareOutcome::Updated { .. } => {
                info!(file = %job.file, suite = %job.suite, test = %job.test, ordinal = key.ordinal, "snapshot updated");
                self.stats.updated += 1
            }
            CompareOutcome::Mismatched { .. } | CompareOutcome::Missing => self.stats.failed += 1,
        }
        outcome
    }

    /// Stored ordinals of visited jobs that were not compared in this run.
    pub fn obsolete(&self) -> Vec<SnapshotKey> {
        let mut keys = Vec::new();
        for (job, seen) in &self.visited {
            let Some(slots) = self.slots(job) else {
                continue;
            };
            keys.extend(
                slots
                    .keys()
                    .filter(|ordinal| !seen.contains(*ordinal))
                    .map(|ordinal| job.slot(*ordinal)),
            );
        }
        keys
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            obsolete: self.obsolete().len(),
            ..self.stats
        }
    }

    /// Writes the store if anything changed. The file is replaced atomically
    /// through a temporary file in the same directory.
    pub fn save(&mut self) -> Result<bool, EngineError> {
        if !self.dirty {
            return Ok(false);
        }
        for key in self.obsolete() {
            let job = &key.job;
            warn!(file = %job.file, suite = %job.suite, test = %job.test, ordinal = key.ordinal, "obsolete snapshot");
        }

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        fs::create_dir_all(&dir).map_err(|err| EngineError::io(&dir, err))?;

        let text = serde_yaml::to_string(&self.stored).map_err(|err| EngineError::Snapshot {
            path: self.path.clone(),
            message: err.to_string(),
        })?;
        let mut temp = NamedTempFile::new_in(&dir).map_err(|err| EngineError::io(&dir, err))?;
        temp.write_all(text.as_bytes())
            .map_err(|err| EngineError::io(temp.path(), err))?;
        temp.persist(&self.path)
            .map_err(|err| EngineError::io(&self.path, err.error))?;

        self.dirty = false;
        info!(path = %self.path.display(), "snapshot store written");
        Ok(true)
    }

    fn insert(&mut self, key: &SnapshotKey, content: Tree) {
        let job = &key.job;
        self.stored
            .entry(job.file.clone())
            .or_default()
            .entry(job.suite.clone())
            .or_default()
            .entry(job.test.clone())
            .or_default()
            .insert(key.ordinal, content);
        self.dirty = true;
    }
}

// ============================================================================
// PER-JOB ACCESS
// ============================================================================

/// Snapshot access handed to validators through the context.
pub trait SnapshotComparer {
    /// Compares `content` against the next snapshot slot of the current job.
    fn compare_to_snapshot(&self, content: &Tree, allow_write: bool) -> SnapshotComparison;
}

/// The snapshot slots of one job. Each comparison takes the next ordinal.
pub struct JobSnapshots<'a> {
    cache: &'a RefCell<SnapshotCache>,
    job: JobId,
    next: Cell<usize>,
}

impl<'a> JobSnapshots<'a> {
    pub fn new(cache: &'a RefCell<SnapshotCache>, job: JobId) -> Self {
        Self {
            cache,
            job,
            next: Cell::new(1),
        }
    }
}

impl SnapshotComparer for JobSnapshots<'_> {
    fn compare_to_snapshot(&self, content: &Tree, allow_write: bool) -> SnapshotComparison {
        let ordinal = self.next.get();
        self.next.set(ordinal + 1);
        let key = self.job.slot(ordinal);
        let outcome = self.cache.borrow_mut().evaluate(&key, content, allow_write);
        SnapshotComparison { ordinal, outcome }
    }
}
