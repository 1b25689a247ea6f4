//! JSX markup to Angular template translation.
//!
//! The markup returned by a React component is translated node by node:
//! `.map` callbacks become `*ngFor`, controlled inputs become `[(ngModel)]`
//! bindings, `onClick` handlers become `(click)` bindings and plain
//! identifier expressions become `{{ }}` interpolations. Anything else is
//! carried over unrewritten and reported as a [`TemplateWarning`].

pub mod ast;
pub mod error;
pub mod render;
pub mod transforms;
mod translate;

pub use ast::*;
pub use error::{TemplateWarning, TranslateError, TranslateErrorCode, WarningCode};
pub use render::render;

use jsx_parser::{MarkupFragment, StateVar};
use translate::Translator;

/// Options for template translation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Fail instead of guessing when a controlled input calls a setter that
    /// no `useState` declaration owns.
    pub strict_state_mapping: bool,
}

/// A translated template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateResult {
    /// The template text, trimmed.
    pub template: String,
    /// Output that needs manual review.
    pub warnings: Vec<TemplateWarning>,
}

/// Translate a component's returned markup into an Angular template.
pub fn translate_fragment(
    fragment: &MarkupFragment,
    states: &[StateVar],
    options: &TranslateOptions,
) -> Result<TranslateResult, TranslateError> {
    let mut translator = Translator::new(states, options);
    let root = translator.translate(&fragment.root, 0)?;

    Ok(TranslateResult {
        template: render(&[root]).trim().to_string(),
        warnings: translator.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(source: &str) -> TranslateResult {
        let parsed = jsx_parser::parse(source).unwrap();
        translate_fragment(
            &parsed.fragment,
            &parsed.model.states,
            &TranslateOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_translate_simple() {
        let result = translate("function A() { return (<p className=\"x\">{name}</p>); }");
        assert_eq!(result.template, "<p class=\"x\">{{ name }}</p>");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_translate_fragment_root() {
        let result = translate("function A() { return (<><b>1</b>{/* c */}</>); }");
        assert_eq!(result.template, "<ng-container><b>1</b><!-- c --></ng-container>");
    }
}
