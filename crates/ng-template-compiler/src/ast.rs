//! Angular template tree.

use smol_str::SmolStr;

/// A node in an Angular template.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NgNode {
    Element(NgElement),
    /// `<ng-container>...</ng-container>`
    Container(Vec<NgNode>),
    /// Literal text, rendered as is.
    Text(String),
    /// `{{ expr }}`
    Interpolation(String),
    /// A JSX expression container that has no template equivalent, kept as `{code}`.
    Verbatim(String),
    /// `<!--content-->`
    Comment(String),
}

/// A template element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NgElement {
    pub tag: SmolStr,
    pub attrs: Vec<NgAttribute>,
    pub children: Vec<NgNode>,
    pub self_closing: bool,
}

/// A template attribute, binding or directive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NgAttribute {
    /// Attribute name as written: `class`, `(click)`, `[(ngModel)]`, `*ngFor`.
    pub name: SmolStr,
    pub value: NgAttrValue,
}

impl NgAttribute {
    /// `name="value"`.
    pub fn quoted(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: NgAttrValue::Quoted {
                value: value.into(),
                quote: '"',
            },
        }
    }
}

/// The value of a template attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NgAttrValue {
    /// Boolean attribute.
    None,
    Quoted { value: String, quote: char },
    /// Untranslated JSX expression, rendered as `name={code}`.
    Verbatim(String),
    /// Untranslated spread, rendered as `{...code}`.
    Spread(String),
}
