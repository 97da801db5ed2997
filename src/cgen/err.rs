use crate::error::{Level, RillErrorExt};
use crate::location::{Location, Span};

/// A fatal internal-invariant failure during lowering. These abort the
/// compilation; no partial output is meaningful once one is raised.
#[derive(Debug, Clone)]
pub struct InternalLoweringError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl InternalLoweringError {
    pub fn new(message: String, issuer: String) -> Self {
        InternalLoweringError {
            level: Level::Critical,
            message,
            issuer,
            location: None,
            span: None,
        }
    }

    pub fn with(
        level: Level,
        message: String,
        issuer: String,
        location: Option<Location>,
        span: Option<Span>,
    ) -> Self {
        InternalLoweringError {
            level,
            message,
            issuer,
            location,
            span,
        }
    }
}

impl std::fmt::Display for InternalLoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {}:{}:{})", self.message, loc.file, loc.line, loc.column)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for InternalLoweringError {}

impl RillErrorExt for InternalLoweringError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
