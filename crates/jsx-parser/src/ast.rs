//! AST types for React function components.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use source_map::Span;

/// One `const [name, setter] = useState(initializer)` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateVar {
    /// The state value binding.
    pub name: SmolStr,
    /// The setter binding.
    pub setter: SmolStr,
    /// The initializer expression, verbatim (trimmed).
    pub initializer: String,
    /// Span of the whole declaration.
    pub span: Span,
}

/// A zero-argument arrow callback: `const name = () => { body };`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HandlerDef {
    pub name: SmolStr,
    /// Block contents between the braces, verbatim (trimmed), not rewritten.
    pub body: String,
    /// Span of the whole binding.
    pub span: Span,
    /// Span of the block contents (without braces).
    pub body_span: Span,
}

/// The structured model of one component, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentModel {
    /// The component name, e.g. `TodoList`.
    pub identifier: SmolStr,
    /// Span of the component name.
    pub identifier_span: Span,
    pub states: Vec<StateVar>,
    pub handlers: IndexMap<SmolStr, HandlerDef>,
}

impl ComponentModel {
    /// Create an empty model for a component.
    pub fn new(identifier: impl Into<SmolStr>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    /// Map of setter name to state name.
    pub fn setter_lookup(&self) -> FxHashMap<&str, &str> {
        setter_lookup(&self.states)
    }
}

/// Map of setter name to state name for a list of declarations.
pub fn setter_lookup(states: &[StateVar]) -> FxHashMap<&str, &str> {
    states
        .iter()
        .map(|s| (s.setter.as_str(), s.name.as_str()))
        .collect()
}

/// The markup returned by the component.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkupFragment {
    /// The fragment text, verbatim.
    pub source: String,
    pub span: Span,
    /// The parsed root node.
    pub root: MarkupNode,
}

/// A component together with the markup it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedComponent {
    pub model: ComponentModel,
    pub fragment: MarkupFragment,
}

/// A node in a JSX markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkupNode {
    /// `<tag ...>...</tag>` or `<tag ... />`.
    Element(Element),
    /// `<>...</>`.
    Fragment(FragmentNode),
    /// Literal text between tags.
    Text(TextNode),
    /// An expression container `{...}`.
    Expression(ExpressionNode),
    /// A comment container `{/* ... */}`.
    Comment(CommentNode),
}

impl MarkupNode {
    pub fn span(&self) -> Span {
        match self {
            Self::Element(n) => n.span,
            Self::Fragment(n) => n.span,
            Self::Text(n) => n.span,
            Self::Expression(n) => n.span,
            Self::Comment(n) => n.span,
        }
    }

    /// Return the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// A JSX element.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub tag: SmolStr,
    pub attrs: Vec<Attribute>,
    pub children: Vec<MarkupNode>,
    /// Written as `<tag />`.
    pub self_closing: bool,
    pub span: Span,
}

impl Element {
    /// Get an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Get the expression of an attribute written as `name={...}`.
    pub fn attr_expr(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(|a| match &a.value {
            AttrValue::Expr(code) => Some(code.as_str()),
            _ => None,
        })
    }

    /// Depth-first search for the first element with the given tag.
    pub fn find_element(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| find_element(child, tag))
    }
}

/// Depth-first search for the first element with the given tag, starting at
/// (and including) `node`.
pub fn find_element<'a>(node: &'a MarkupNode, tag: &str) -> Option<&'a Element> {
    match node {
        MarkupNode::Element(el) if el.tag == tag => Some(el),
        MarkupNode::Element(el) => el.find_element(tag),
        MarkupNode::Fragment(f) => f.children.iter().find_map(|c| find_element(c, tag)),
        _ => None,
    }
}

/// A JSX attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    /// Attribute name; `...` for spread attributes.
    pub name: SmolStr,
    pub value: AttrValue,
    pub span: Span,
}

/// The value of a JSX attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttrValue {
    /// Boolean attribute: `disabled`.
    None,
    /// String literal: `type="text"`.
    Str { value: String, quote: char },
    /// Expression container: `value={text}`. Holds the code between the braces, verbatim.
    Expr(String),
    /// Spread: `{...props}`. Holds the code after the `...`, verbatim.
    Spread(String),
}

/// `<>...</>`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FragmentNode {
    pub children: Vec<MarkupNode>,
    pub span: Span,
}

/// Literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextNode {
    pub content: String,
    pub span: Span,
}

/// An expression container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExpressionNode {
    /// Code between the braces, verbatim.
    pub code: String,
    pub span: Span,
}

/// A comment container.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommentNode {
    /// Comment text without `/*` and `*/`.
    pub content: String,
    pub span: Span,
}
