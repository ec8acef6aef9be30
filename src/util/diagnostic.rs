//! Error kinds (§7) and their diagnostic presentation.
//!
//! Core operations return `BrokerError`; the CLI driver decides, per the
//! verbosity policy in §4.5/§7, whether and where to print it.

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

/// The error kinds named in §7.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BrokerError {
    #[error("No package '{name}' found")]
    #[diagnostic(
        code(flagbroker::not_found),
        help("check that {name}.pc is reachable from the search path")
    )]
    NotFound { name: String },

    #[error("Requested '{name} {comparison} {wanted}' but version of {name} is {have}")]
    #[diagnostic(code(flagbroker::version_mismatch))]
    VersionMismatch {
        name: String,
        comparison: String,
        wanted: String,
        have: String,
        url: Option<String>,
    },

    #[error("{path}: {message}")]
    #[diagnostic(code(flagbroker::parse_error))]
    ParseError { path: PathBuf, message: String },

    #[error("variable substitution in '{name}' exceeded the expansion limit (possible cycle)")]
    #[diagnostic(code(flagbroker::substitution_cycle))]
    SubstitutionCycle { name: String },

    #[error("variable '{name}' not defined in '{package}'")]
    #[diagnostic(code(flagbroker::unknown_variable))]
    UnknownVariable { name: String, package: String },

    #[error("unknown option '{option}'")]
    #[diagnostic(code(flagbroker::bad_option))]
    BadOption { option: String },

    #[error("bad requirement string '{text}': {reason}")]
    #[diagnostic(code(flagbroker::bad_requirement))]
    BadRequirement { text: String, reason: String },

    #[error("{0}")]
    #[diagnostic(code(flagbroker::io_error))]
    IoError(String),
}

impl BrokerError {
    /// The optional second line printed after a version mismatch (§7).
    pub fn url_hint(&self) -> Option<String> {
        match self {
            BrokerError::VersionMismatch { name, url: Some(url), .. } => {
                Some(format!("You may find new versions of {} at {}", name, url))
            }
            _ => None,
        }
    }
}

/// Severity level for ad hoc CLI diagnostics (debug spew, warnings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Debug,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Debug => write!(f, "debug"),
        }
    }
}

/// A free-form message with an optional source location, used for the
/// debug-spew channel and for warnings that are not full `BrokerError`s.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
    pub location: Option<PathBuf>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic { message: message.into(), severity: Severity::Error, location: None }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic { message: message.into(), severity: Severity::Warning, location: None }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Diagnostic { message: message.into(), severity: Severity::Debug, location: None }
    }

    pub fn with_location(mut self, path: impl Into<PathBuf>) -> Self {
        self.location = Some(path.into());
        self
    }

    pub fn format(&self) -> String {
        match &self.location {
            Some(path) => format!("{}: {}: {}", self.severity, path.display(), self.message),
            None => format!("{}: {}", self.severity, self.message),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Print a `BrokerError` to the given stream per the effective verbosity
/// policy, including its optional URL hint line.
pub fn emit_error(err: &BrokerError, to_stdout: bool) {
    let text = format!("{}", err);
    if to_stdout {
        println!("{}", text);
        if let Some(hint) = err.url_hint() {
            println!("{}", hint);
        }
    } else {
        eprintln!("{}", text);
        if let Some(hint) = err.url_hint() {
            eprintln!("{}", hint);
        }
    }
}

/// Print a free-form diagnostic (debug spew, warnings) to stderr.
pub fn emit(diagnostic: &Diagnostic) {
    eprintln!("{}", diagnostic.format());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_mismatch_message_matches_reference_wording() {
        let err = BrokerError::VersionMismatch {
            name: "foo".into(),
            comparison: "=".into(),
            wanted: "1.2".into(),
            have: "1.2.3".into(),
            url: None,
        };
        assert_eq!(
            format!("{}", err),
            "Requested 'foo = 1.2' but version of foo is 1.2.3"
        );
        assert!(err.url_hint().is_none());
    }

    #[test]
    fn version_mismatch_with_url_hint() {
        let err = BrokerError::VersionMismatch {
            name: "foo".into(),
            comparison: ">=".into(),
            wanted: "2.0".into(),
            have: "1.2.3".into(),
            url: Some("https://example.org/foo".into()),
        };
        assert_eq!(
            err.url_hint().unwrap(),
            "You may find new versions of foo at https://example.org/foo"
        );
    }

    #[test]
    fn not_found_message() {
        let err = BrokerError::NotFound { name: "nosuch".into() };
        assert_eq!(format!("{}", err), "No package 'nosuch' found");
    }

    #[test]
    fn diagnostic_formatting() {
        let diag = Diagnostic::debug("searching /usr/lib/pkgconfig");
        assert_eq!(diag.format(), "debug: searching /usr/lib/pkgconfig");
    }
}
