//! Error types for component extraction.

use source_map::Span;
use std::fmt;
use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// A fatal extraction error. Only the two mandatory anchors of a component
/// file (its declaration and its returned markup) can produce one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Where the error applies. Covers the whole file when nothing more
    /// precise is known.
    pub span: Span,
    pub code: ErrorCode,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// No `function Name(` (or upper-case arrow binding) was found.
    pub fn no_component(span: Span) -> Self {
        Self::new(
            "no component definition: expected `function Name(...)` or `const Name = (...) => {`",
            span,
            ErrorCode::NoComponent,
        )
    }

    /// The component never returns a markup fragment.
    pub fn no_markup_fragment(component: &str, span: Span) -> Self {
        Self::new(
            format!("no markup fragment: `{component}` has no `return (<...>)` block"),
            span,
            ErrorCode::NoMarkupFragment,
        )
    }
}

/// Error codes for categorizing parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoComponent,
    NoMarkupFragment,
}

impl ErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NoComponent => "no-component",
            ErrorCode::NoMarkupFragment => "no-markup-fragment",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
