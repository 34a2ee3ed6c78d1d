//! Unified error type for everything that can abort a suite or a run.
//!
//! Assertion failures are *not* errors: validators report them as diagnostic
//! lines inside an [`AssertionOutcome`](crate::validation::AssertionOutcome).
//! `EngineError` covers the fatal cases only: unreadable test files, broken
//! test definitions, snapshot persistence problems and bad configuration.
//! Every variant carries a `miette` code so the binary can render it with the
//! fancy reporter.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// ERROR CLASSIFICATION
// ============================================================================

/// Type-safe error classification that mirrors the [`EngineError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// Reading or writing a file failed.
    Io,
    /// A YAML document could not be parsed.
    Parse,
    /// A test suite is structurally invalid.
    Definition,
    /// Snapshot store could not be loaded or saved.
    Snapshot,
    /// Invalid runner configuration.
    Config,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Io => "Io",
            ErrorType::Parse => "Parse",
            ErrorType::Definition => "Definition",
            ErrorType::Snapshot => "Snapshot",
            ErrorType::Config => "Config",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ENGINE ERROR - the single library error type
// ============================================================================

#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("failed to access '{}': {source}", path.display())]
    #[diagnostic(code(rendercheck::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{}': {message}", path.display())]
    #[diagnostic(code(rendercheck::parse), help("test suites and snapshots must be valid YAML"))]
    Parse { path: PathBuf, message: String },

    #[error("invalid test definition in '{}': {message}", path.display())]
    #[diagnostic(code(rendercheck::definition))]
    Definition {
        path: PathBuf,
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("snapshot store '{}': {message}", path.display())]
    #[diagnostic(code(rendercheck::snapshot))]
    Snapshot { path: PathBuf, message: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(code(rendercheck::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        EngineError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn definition(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        EngineError::Definition {
            path: path.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Attaches a help line. Only `Definition` and `Config` carry help; other
    /// variants are returned unchanged.
    pub fn with_help(self, text: impl Into<String>) -> Self {
        match self {
            EngineError::Definition { path, message, .. } => EngineError::Definition {
                path,
                message,
                help: Some(text.into()),
            },
            EngineError::Config { message, .. } => EngineError::Config {
                message,
                help: Some(text.into()),
            },
            other => other,
        }
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            EngineError::Io { .. } => ErrorType::Io,
            EngineError::Parse { .. } => ErrorType::Parse,
            EngineError::Definition { .. } => ErrorType::Definition,
            EngineError::Snapshot { .. } => ErrorType::Snapshot,
            EngineError::Config { .. } => ErrorType::Config,
        }
    }
}

// ============================================================================
// CONSTRUCTION MACROS
// ============================================================================

/// Builds an [`EngineError::Config`] from a format string.
#[macro_export]
macro_rules! config_err {
    ($($arg:tt)*) => {
        $crate::errors::EngineError::Config {
            message: format!($($arg)*),
            help: None,
        }
    };
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn error_type_matches_variant() {
        let err = EngineError::parse("tests/a_test.yaml", "bad indentation");
        assert_eq!(err.error_type(), ErrorType::Parse);
        assert_eq!(err.error_type().to_string(), "Parse");
    }

    #[test]
    fn help_is_rendered_by_miette() {
        let err = EngineError::definition("tests/a_test.yaml", "unknown assertion type 'isKnd'")
            .with_help("did you mean 'isKind'?");
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("unknown assertion type"));
        assert!(output.contains("did you mean 'isKind'?"));
    }

    #[test]
    fn config_macro_formats_message() {
        let err = config_err!("unknown output type '{}'", "Html");
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("unknown output type 'Html'"));
    }
}
