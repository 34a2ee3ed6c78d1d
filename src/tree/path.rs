//! A canonical, type-safe representation of a path into a rendered document.
//!
//! Grammar: `spec.template.spec.containers[0].image`, with bracketed quoted
//! keys for names that contain dots: `metadata.labels["app.kubernetes.io/name"]`.
//! The empty string addresses the document root.

use std::fmt;

use serde_yaml::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path '{path}': {reason}")]
pub struct PathError {
    pub path: String,
    pub reason: String,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(input: &str) -> Result<Self, PathError> {
        let fail = |reason: &str| PathError {
            path: input.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = Vec::new();
        let chars: Vec<char> = input.chars().collect();
        let mut pos = 0;
        // A dot is only legal once at least one segment has been read.
        let mut expect_key = true;

        while pos < chars.len() {
            match chars[pos] {
                '[' => {
                    let close = chars[pos..]
                        .iter()
                        .position(|c| *c == ']')
                        .map(|offset| pos + offset)
                        .ok_or_else(|| fail("unclosed '['"))?;
                    let inner: String = chars[pos + 1..close].iter().collect();
                    segments.push(parse_bracket(&inner).map_err(|reason| fail(&reason))?);
                    pos = close + 1;
                    expect_key = false;
                }
                '.' => {
                    if expect_key {
                        return Err(fail("empty segment"));
                    }
                    pos += 1;
                    expect_key = true;
                    if pos == chars.len() {
                        return Err(fail("trailing '.'"));
                    }
                }
                _ => {
                    if !expect_key {
                        return Err(fail("expected '.' or '[' between segments"));
                    }
                    let start = pos;
                    while pos < chars.len() && chars[pos] != '.' && chars[pos] != '[' {
                        pos += 1;
                    }
                    segments.push(Segment::Key(chars[start..pos].iter().collect()));
                    expect_key = false;
                }
            }
        }

        Ok(Self {
            raw: input.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolves the path against `tree`. A missing key, an out-of-range
    /// index, or indexing into the wrong node type yields `None`.
    pub fn lookup<'a>(&self, tree: &'a Value) -> Option<&'a Value> {
        let mut current = tree;
        for segment in &self.segments {
            current = match (segment, current) {
                (Segment::Key(key), Value::Mapping(map)) => map.get(key.as_str())?,
                (Segment::Index(idx), Value::Sequence(seq)) => seq.get(*idx)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

fn parse_bracket(inner: &str) -> Result<Segment, String> {
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        return Err("empty brackets".to_string());
    }
    for quote in ['"', '\''] {
        if trimmed.starts_with(quote) {
            if trimmed.len() < 2 || !trimmed.ends_with(quote) {
                return Err("unterminated quoted key".to_string());
            }
            return Ok(Segment::Key(trimmed[1..trimmed.len() - 1].to_string()));
        }
    }
    trimmed
        .parse::<usize>()
        .map(Segment::Index)
        .map_err(|_| format!("'{trimmed}' is not a sequence index"))
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
