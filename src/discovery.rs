//! Test-file and template discovery below a chart directory.
//!
//! Patterns are shell-style globs relative to a base directory: `*` and `?`
//! stay within one path component, `[...]` is a character class, and `**`
//! spans components. Matching is done on `/`-separated relative paths so
//! results do not depend on the host separator.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

use crate::errors::EngineError;
use crate::config_err;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: Pattern,
}

impl Glob {
    pub fn new(pattern: &str) -> Result<Self, EngineError> {
        let normalized = pattern.strip_prefix("./").unwrap_or(pattern);
        let pattern = Pattern::new(normalized)
            .map_err(|err| config_err!("invalid glob pattern '{}': {}", pattern, err))?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, relative: &str) -> bool {
        self.pattern.matches_with(relative, MATCH_OPTIONS)
    }
}

/// `/`-separated form of `path` relative to `base`.
pub fn relative_slash_path(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Expands `patterns` below `base`, returning matching files sorted and
/// de-duplicated. A pattern that is an absolute path to an existing file is
/// taken as-is.
pub fn expand_globs(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, EngineError> {
    let mut globs = Vec::with_capacity(patterns.len());
    let mut files = Vec::new();
    for pattern in patterns {
        let as_path = Path::new(pattern);
        if as_path.is_absolute() && as_path.is_file() {
            files.push(as_path.to_path_buf());
            continue;
        }
        globs.push(Glob::new(pattern)?);
    }

    if !globs.is_empty() && base.is_dir() {
        for entry in WalkDir::new(base).follow_links(true) {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(base).to_path_buf();
                match err.into_io_error() {
                    Some(io) => EngineError::io(path, io),
                    None => config_err!("filesystem loop below '{}'", base.display()),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(relative) = relative_slash_path(base, entry.path()) else {
                continue;
            };
            if globs.iter().any(|glob| glob.is_match(&relative)) {
                files.push(entry.path().to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Sub-chart directories (`charts/*` containing a `Chart.yaml`), sorted.
pub fn discover_subcharts(chart: &Path) -> Vec<PathBuf> {
    let charts_dir = chart.join("charts");
    if !charts_dir.is_dir() {
        return Vec::new();
    }
    let mut found: Vec<PathBuf> = WalkDir::new(&charts_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir() && e.path().join("Chart.yaml").is_file())
        .map(|e| e.path().to_path_buf())
        .collect();
    found.sort();
    found
}
