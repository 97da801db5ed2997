// Core module for reporting the non-fatal diagnostics collected while
// lowering a program. Fatal errors abort the run through `RillErrorExt`
// values; everything recoverable lands here instead and is reported
// together once lowering finishes.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::Level;
use crate::location::Location;

/// A single recoverable finding: a symbol collision, a degraded lowering,
/// an unsupported construct replaced by a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Dotted path of the lowering routine that raised the finding.
    pub issuer: String,
    pub file: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

/// Serializable mirror of `error::Level` for report output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

impl From<Level> for DiagnosticLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => DiagnosticLevel::Info,
            Level::Warning => DiagnosticLevel::Warning,
            Level::Error | Level::Critical => DiagnosticLevel::Error,
        }
    }
}

impl std::fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiagnosticLevel::Info => "INFO",
            DiagnosticLevel::Warning => "WARNING",
            DiagnosticLevel::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, issuer: impl Into<String>) -> Self {
        Diagnostic {
            level: level.into(),
            message: message.into(),
            issuer: issuer.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn with_location(mut self, location: &Location) -> Self {
        self.file = Some(location.file.clone());
        self.line = Some(location.line);
        self.column = Some(location.column);
        self
    }

    pub fn is_warning(&self) -> bool {
        self.level == DiagnosticLevel::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line, self.column) {
            (Some(file), Some(line), Some(column)) => write!(
                f,
                "RILL | {} | {}:{}:{} | {} | {}",
                self.level, file, line, column, self.issuer, self.message
            ),
            _ => write!(
                f,
                "RILL | {} | unknown location | {} | {}",
                self.level, self.issuer, self.message
            ),
        }
    }
}

/// Renders the end-of-run report: one line per diagnostic plus a summary
/// line, in collection order.
pub fn render_report(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        out.push_str(&diag.to_string());
        out.push('\n');
    }
    let warnings = diagnostics.iter().filter(|d| d.is_warning()).count();
    out.push_str(&format!(
        "{} diagnostic(s), {} warning(s)\n",
        diagnostics.len(),
        warnings
    ));
    out
}

/// Serializes the collected diagnostics for machine consumption.
pub fn to_json(diagnostics: &[Diagnostic]) -> serde_json::Value {
    json!({
        "diagnostics": diagnostics,
        "count": diagnostics.len(),
        "warnings": diagnostics.iter().filter(|d| d.is_warning()).count(),
    })
}
