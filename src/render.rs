//! The seam to the template-rendering collaborator.
//!
//! The engine never renders templates itself. It hands a [`RenderRequest`] to
//! a [`Renderer`] and receives either the rendered documents or a
//! [`RenderError`], captured once per job before any validator runs.
//!
//! [`PrerenderedRenderer`] is the collaborator shipped with the binary: it
//! reads documents that an external tool already rendered into
//! `<chart>/<render_path>/templates/`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::discovery::{relative_slash_path, Glob};
use crate::manifest::{split_documents, RenderError, RenderedDocument};
use crate::tree::Tree;

/// Marker line that makes a pre-rendered file report a render failure.
pub const RENDER_ERROR_MARKER: &str = "# render-error:";

/// Release identity passed through to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub name: String,
    pub namespace: String,
}

impl Default for Release {
    fn default() -> Self {
        Self {
            name: "release-name".to_string(),
            namespace: "default".to_string(),
        }
    }
}

/// Everything a renderer needs for one job.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub chart: PathBuf,
    /// Template selectors relative to the chart's `templates/` directory.
    /// Globs are allowed. Empty means every template.
    pub templates: Vec<String>,
    pub values_files: Vec<PathBuf>,
    pub set: BTreeMap<String, Tree>,
    pub release: Release,
}

pub trait Renderer {
    fn render(&self, request: &RenderRequest) -> Result<Vec<RenderedDocument>, RenderError>;
}

/// Reads pre-rendered multi-document YAML files.
#[derive(Debug, Clone)]
pub struct PrerenderedRenderer {
    render_path: PathBuf,
}

impl PrerenderedRenderer {
    pub fn new(render_path: impl Into<PathBuf>) -> Self {
        Self {
            render_path: render_path.into(),
        }
    }

    fn templates_root(&self, chart: &Path) -> PathBuf {
        chart.join(&self.render_path).join("templates")
    }

    fn read_template(&self, root: &Path, file: &Path) -> Result<Vec<RenderedDocument>, RenderError> {
        let source = relative_slash_path(root, file)
            .map(|rel| format!("templates/{rel}"))
            .unwrap_or_else(|| file.display().to_string());
        let text = fs::read_to_string(file)
            .map_err(|err| RenderError::new(format!("template: {source}: {err}")))?;

        if let Some(message) = text
            .lines()
            .find_map(|line| line.trim().strip_prefix(RENDER_ERROR_MARKER))
        {
            return Err(RenderError::new(message.trim()));
        }

        let is_yaml = file
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml {
            split_documents(&source, &text)
        } else {
            Ok(vec![RenderedDocument::raw(source, text)])
        }
    }
}

impl Default for PrerenderedRenderer {
    fn default() -> Self {
        Self::new("rendered")
    }
}

impl Renderer for PrerenderedRenderer {
    fn render(&self, request: &RenderRequest) -> Result<Vec<RenderedDocument>, RenderError> {
        if !request.values_files.is_empty() || !request.set.is_empty() {
            debug!(
                values = request.values_files.len(),
                set = request.set.len(),
                "pre-rendered output ignores values overrides"
            );
        }

        let root = self.templates_root(&request.chart);
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        if request.templates.is_empty() {
            let mut documents = Vec::new();
            for file in &files {
                documents.extend(self.read_template(&root, file)?);
            }
            return Ok(documents);
        }

        let mut documents = Vec::new();
        for selector in &request.templates {
            let normalized = selector.trim_start_matches("templates/");
            let glob = Glob::new(normalized).map_err(|err| RenderError::new(err.to_string()))?;
            let matching: Vec<&PathBuf> = files
                .iter()
                .filter(|f| {
                    relative_slash_path(&root, f).is_some_and(|rel| glob.is_match(&rel))
                })
                .collect();
            if matching.is_empty() {
                return Err(RenderError::new(format!(
                    "template: templates/{normalized} not found"
                )));
            }
            for file in matching {
                documents.extend(self.read_template(&root, file)?);
            }
        }
        Ok(documents)
    }
}
