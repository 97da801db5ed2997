use crate::location;

use super::kind::AstNodeKind;

#[derive(Clone, PartialEq)]
pub struct AstNode {
    id: usize,
    pub kind: AstNodeKind,
    pub location: Option<location::Location>,
    pub span: Option<location::Span>,
}

impl AstNode {
    fn create_id() -> usize {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(1);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    pub fn new(kind: AstNodeKind) -> Self {
        AstNode {
            id: Self::create_id(),
            kind,
            location: None,
            span: None,
        }
    }

    pub fn with_location(mut self, location: location::Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_span(mut self, span: location::Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn get_id(&self) -> usize {
        self.id
    }

    pub fn get_kind(&self) -> &AstNodeKind {
        &self.kind
    }

    pub fn get_location(&self) -> Option<&location::Location> {
        self.location.as_ref()
    }

    pub fn get_span(&self) -> Option<&location::Span> {
        self.span.as_ref()
    }
}

use std::fmt;

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AstNode {{")?;
        writeln!(f, "  id: {},", self.id)?;
        writeln!(f, "  kind: {:#?},", &self.kind)?;
        match &self.location {
            Some(loc) => writeln!(f, "  location: {}", loc)?,
            None => writeln!(f, "  location: None")?,
        }
        match &self.span {
            Some(span) => writeln!(f, "  span: {}", span)?,
            None => writeln!(f, "  span: None")?,
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate to Display so both "{}" and "{:?}" are pretty.
        write!(f, "{}", self)
    }
}
