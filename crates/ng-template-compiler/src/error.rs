//! Errors and warnings for template translation.

use source_map::Span;
use std::fmt;
use thiserror::Error;

/// A translation error. Only raised in strict state-mapping mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TranslateError {
    pub message: String,
    pub span: Span,
    pub code: TranslateErrorCode,
}

impl TranslateError {
    pub fn new(message: impl Into<String>, span: Span, code: TranslateErrorCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// A controlled input calls a setter no `useState` declaration owns.
    pub fn unmapped_setter(setter: &str, span: Span) -> Self {
        Self::new(
            format!("setter `{setter}` is not bound to any useState declaration"),
            span,
            TranslateErrorCode::UnmappedSetter,
        )
    }
}

/// Error codes for template translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslateErrorCode {
    UnmappedSetter,
}

impl TranslateErrorCode {
    /// Get the error code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnmappedSetter => "unmapped-setter",
        }
    }
}

impl fmt::Display for TranslateErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output that was produced but needs manual review.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateWarning {
    pub message: String,
    /// Location in the component file.
    pub span: Span,
    pub code: WarningCode,
}

impl TemplateWarning {
    pub fn new(message: impl Into<String>, span: Span, code: WarningCode) -> Self {
        Self {
            message: message.into(),
            span,
            code,
        }
    }

    /// The state name of a two-way binding was guessed from the setter name.
    pub fn heuristic_state_name(setter: &str, state: &str, span: Span) -> Self {
        Self::new(
            format!(
                "setter `{setter}` has no useState declaration; bound `[(ngModel)]` to `{state}` by name, review the binding"
            ),
            span,
            WarningCode::HeuristicStateName,
        )
    }

    /// An expression was copied into the template unrewritten.
    pub fn unsupported_expression(code: &str, span: Span) -> Self {
        Self::new(
            format!("expression `{{{}}}` has no template equivalent and was kept as is", code.trim()),
            span,
            WarningCode::UnsupportedExpression,
        )
    }
}

impl fmt::Display for TemplateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Warning codes for template translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WarningCode {
    HeuristicStateName,
    UnsupportedExpression,
}

impl WarningCode {
    /// Get the warning code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HeuristicStateName => "heuristic-state-name",
            Self::UnsupportedExpression => "unsupported-expression",
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
