//! Rendered documents as seen by the validators.
//!
//! The rendering collaborator hands back a list of [`RenderedDocument`]s (or a
//! [`RenderError`]). The job turns them into [`Manifest`]s, assigning each a
//! stable 0-based index that every diagnostic uses to point back at it.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::tree::Tree;

/// Key under which non-mapping documents keep their text.
pub const RAW_KEY: &str = "raw";

/// Rendering failed as a whole. Captured as data, never thrown past the job.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// One document as produced by the renderer, before indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub source: String,
    pub tree: Tree,
}

impl RenderedDocument {
    pub fn new(source: impl Into<String>, tree: Tree) -> Self {
        Self {
            source: source.into(),
            tree,
        }
    }

    /// Wraps plain text output (NOTES and other non-YAML templates).
    pub fn raw(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(source, raw_tree(text.into()))
    }
}

/// An immutable, indexed rendered document.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub index: usize,
    pub source: String,
    pub tree: Tree,
}

impl Manifest {
    pub fn new(index: usize, source: impl Into<String>, tree: Tree) -> Self {
        Self {
            index,
            source: source.into(),
            tree,
        }
    }

    pub fn kind(&self) -> Option<&str> {
        self.tree.get("kind").and_then(Value::as_str)
    }

    pub fn api_version(&self) -> Option<&str> {
        self.tree.get("apiVersion").and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.tree
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.tree
            .get("metadata")
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
    }

    /// The raw/source field. `None` for ordinary mapping documents.
    pub fn raw(&self) -> Option<&Tree> {
        self.tree.get(RAW_KEY)
    }
}

/// Assigns indices in render order.
pub fn index_documents(documents: Vec<RenderedDocument>) -> Vec<Manifest> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, doc)| Manifest::new(index, doc.source, doc.tree))
        .collect()
}

/// Splits a multi-document YAML text into rendered documents.
///
/// Empty documents (`---` separators with nothing between them) are dropped.
/// A document that parses to a scalar becomes a raw document holding the
/// original text.
pub fn split_documents(source: &str, text: &str) -> Result<Vec<RenderedDocument>, RenderError> {
    let mut documents = Vec::new();
    for de in serde_yaml::Deserializer::from_str(text) {
        let value = <Value as serde::Deserialize>::deserialize(de)
            .map_err(|err| RenderError::new(format!("template: {source}: {err}")))?;
        match value {
            Value::Null => continue,
            Value::Mapping(_) | Value::Sequence(_) => {
                documents.push(RenderedDocument::new(source, value))
            }
            scalar => documents.push(RenderedDocument::raw(
                source,
                crate::tree::render(&scalar),
            )),
        }
    }
    Ok(documents)
}

fn raw_tree(text: String) -> Tree {
    let mut map = Mapping::new();
    map.insert(Value::from(RAW_KEY), Value::from(text));
    Value::Mapping(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_indexes_documents() {
        let text = "kind: Service\n---\n---\nkind: Deployment\nmetadata:\n  name: web\n";
        let docs = split_documents("templates/app.yaml", text).unwrap();
        let manifests = index_documents(docs);
        assert_eq!(manifests.len(), 2);
        assert_eq!(manifests[0].kind(), Some("Service"));
        assert_eq!(manifests[1].index, 1);
        assert_eq!(manifests[1].name(), Some("web"));
        assert_eq!(manifests[1].source, "templates/app.yaml");
    }

    #[test]
    fn scalar_documents_become_raw() {
        let docs = split_documents("templates/NOTES.txt", "Thank you for installing").unwrap();
        let manifest = &index_documents(docs)[0];
        assert_eq!(manifest.raw(), Some(&Value::from("Thank you for installing")));
        assert_eq!(manifest.kind(), None);
    }

    #[test]
    fn syntax_errors_become_render_errors() {
        let err = split_documents("templates/bad.yaml", "a: [1, 2").unwrap_err();
        assert!(err.message.starts_with("template: templates/bad.yaml:"));
    }
}
