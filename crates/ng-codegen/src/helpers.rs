//! Naming helpers for generated Angular artifacts.

/// Default prefix of component selectors.
pub const DEFAULT_SELECTOR_PREFIX: &str = "app";

/// Convert a PascalCase or camelCase name to kebab-case.
///
/// A hyphen goes before every upper-case letter except the first character:
/// `TodoList` becomes `todo-list`.
pub fn hyphenate(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('-');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

/// The element selector a component registers under, e.g. `app-todo-list`.
pub fn selector_name(prefix: &str, identifier: &str) -> String {
    let name = hyphenate(identifier);
    if prefix.is_empty() {
        name
    } else {
        format!("{prefix}-{name}")
    }
}

/// The generated class name, e.g. `TodoListComponent`.
pub fn class_name(identifier: &str) -> String {
    format!("{identifier}Component")
}

/// File names of the three artifacts of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// `{Id}.component.ts`
    pub class_file: String,
    /// `{Id}.component.html`
    pub template_file: String,
    /// `{Id}.component.css`
    pub stylesheet_file: String,
}

impl ArtifactNames {
    pub fn new(identifier: &str) -> Self {
        Self {
            class_file: format!("{identifier}.component.ts"),
            template_file: format!("{identifier}.component.html"),
            stylesheet_file: format!("{identifier}.component.css"),
        }
    }
}
