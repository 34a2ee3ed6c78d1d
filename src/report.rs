//! Report output: structured CI reports and the console printer.
//!
//! [`render_report`] is a pure function of the result tree and the chosen
//! [`OutputKind`]; it knows nothing about how the results were produced.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::config_err;
use crate::errors::EngineError;
use crate::test::RunResult;

pub mod junit;
pub mod nunit;
pub mod printer;
pub mod sonar;
pub mod xml;
pub mod xunit;

pub use printer::Printer;

/// Supported report schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    JUnit,
    NUnit,
    XUnit,
    Sonar,
}

impl OutputKind {
    pub const ALL: [OutputKind; 4] = [
        OutputKind::JUnit,
        OutputKind::NUnit,
        OutputKind::XUnit,
        OutputKind::Sonar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputKind::JUnit => "JUnit",
            OutputKind::NUnit => "NUnit",
            OutputKind::XUnit => "XUnit",
            OutputKind::Sonar => "Sonar",
        }
    }
}

impl std::fmt::Display for OutputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputKind {
    type Err = EngineError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                config_err!("unknown output type '{s}'")
                    .with_help("accepted types are JUnit, NUnit, XUnit and Sonar")
            })
    }
}

pub fn render_report(kind: OutputKind, result: &RunResult) -> String {
    match kind {
        OutputKind::JUnit => junit::render(result),
        OutputKind::NUnit => nunit::render(result),
        OutputKind::XUnit => xunit::render(result),
        OutputKind::Sonar => sonar::render(result),
    }
}

/// Renders and writes the report, creating parent directories.
pub fn write_report(path: &Path, kind: OutputKind, result: &RunResult) -> Result<(), EngineError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| EngineError::io(parent, err))?;
    }
    fs::write(path, render_report(kind, result)).map_err(|err| EngineError::io(path, err))?;
    info!(path = %path.display(), format = %kind, "report written");
    Ok(())
}

/// Seconds with millisecond precision, as the XML schemas expect.
pub(crate) fn seconds(duration: std::time::Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}
