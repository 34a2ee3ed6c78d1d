//! rendercheck: declarative assertions against rendered template documents.
//!
//! Pipeline: suite file → job → render (external [`Renderer`]) → manifests →
//! validators → result tree → console printer and CI report.

pub use crate::errors::{EngineError, ErrorType};
pub use crate::manifest::{Manifest, RenderError};
pub use crate::render::{PrerenderedRenderer, RenderRequest, Renderer};
pub use crate::validation::{AssertionOutcome, Validate, ValidateContext, Validator};

pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod manifest;
pub mod render;
pub mod report;
pub mod snapshot;
pub mod tree;
pub mod validation;
