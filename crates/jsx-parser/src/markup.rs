//! Recursive-descent parser for JSX markup.
//!
//! The parser is tolerant: once a `<` has opened an element it always
//! produces a tree. Unclosed elements end where their parent ends, and a
//! closing tag that does not match is left for an enclosing element.

use crate::ast::*;
use smol_str::SmolStr;
use source_map::Span;

/// Parse one JSX element (or `<>` fragment) starting at byte offset `start`.
///
/// Returns the node and the offset just past it, or `None` when `start`
/// does not begin an element.
pub fn parse_markup(source: &str, start: usize) -> Option<(MarkupNode, usize)> {
    let mut parser = MarkupParser::new(source, start);
    if !parser.at_element_start() {
        return None;
    }
    let node = parser.parse_element();
    Some((node, parser.pos))
}

/// Parser for JSX markup.
struct MarkupParser<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> MarkupParser<'a> {
    fn new(source: &'a str, pos: usize) -> Self {
        Self { source, pos }
    }

    fn remaining(&self) -> &'a str {
        self.source.get(self.pos..).unwrap_or("")
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining().chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_while<F: Fn(char) -> bool>(&mut self, pred: F) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }

    /// `<` followed by a tag name or `>`.
    fn at_element_start(&self) -> bool {
        self.starts_with("<")
            && matches!(self.peek_nth(1), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '>')
    }

    /// Parse an element or fragment. The cursor is on `<`.
    fn parse_element(&mut self) -> MarkupNode {
        let start = self.pos;
        self.consume("<");

        if self.consume(">") {
            let children = self.parse_children();
            self.consume_closing_tag("");
            return MarkupNode::Fragment(FragmentNode {
                children,
                span: self.span_from(start),
            });
        }

        let tag = self.read_while(is_tag_char).to_string();
        let attrs = self.parse_attributes();
        self.skip_whitespace();

        let self_closing = self.consume("/>");
        if !self_closing {
            self.consume(">");
        }

        let children = if self_closing {
            Vec::new()
        } else {
            let children = self.parse_children();
            self.consume_closing_tag(&tag);
            children
        };

        MarkupNode::Element(Element {
            tag: tag.into(),
            attrs,
            children,
            self_closing,
            span: self.span_from(start),
        })
    }

    /// Consume `</tag>` if it closes `tag`; otherwise leave the input alone.
    fn consume_closing_tag(&mut self, tag: &str) -> bool {
        let saved = self.pos;
        if self.consume("</") {
            self.skip_whitespace();
            let name = self.read_while(is_tag_char);
            self.skip_whitespace();
            if name == tag && self.consume(">") {
                return true;
            }
        }
        self.pos = saved;
        false
    }

    /// Parse children until a closing tag or EOF.
    fn parse_children(&mut self) -> Vec<MarkupNode> {
        let mut children = Vec::new();

        loop {
            if self.is_eof() || self.starts_with("</") {
                break;
            }

            if self.at_element_start() {
                children.push(self.parse_element());
            } else if self.starts_with("{") {
                children.push(self.parse_container());
            } else {
                children.push(self.parse_text());
            }
        }

        children
    }

    /// Parse a `{...}` child: an expression or a comment.
    fn parse_container(&mut self) -> MarkupNode {
        let start = self.pos;
        self.consume("{");
        let code = self.read_expression();
        let span = self.span_from(start);

        let trimmed = code.trim();
        if trimmed.starts_with("/*") && trimmed.ends_with("*/") && trimmed.len() >= 4 {
            return MarkupNode::Comment(CommentNode {
                content: trimmed[2..trimmed.len() - 2].to_string(),
                span,
            });
        }

        MarkupNode::Expression(ExpressionNode {
            code: code.to_string(),
            span,
        })
    }

    /// Parse literal text up to the next tag or expression container.
    fn parse_text(&mut self) -> MarkupNode {
        let start = self.pos;
        while !self.is_eof() {
            if self.starts_with("{") || self.starts_with("</") || self.at_element_start() {
                break;
            }
            self.advance();
        }
        MarkupNode::Text(TextNode {
            content: self.source[start..self.pos].to_string(),
            span: self.span_from(start),
        })
    }

    /// Parse attributes up to `>` or `/>`.
    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attrs = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }

            let attr_start = self.pos;

            if self.consume("{") {
                self.skip_whitespace();
                self.consume("...");
                let code = self.read_expression();
                attrs.push(Attribute {
                    name: SmolStr::new_static("..."),
                    value: AttrValue::Spread(code.trim().to_string()),
                    span: self.span_from(attr_start),
                });
                continue;
            }

            let name = self.read_while(is_attr_name_char);
            if name.is_empty() {
                // Stray character inside a tag.
                self.advance();
                continue;
            }

            self.skip_whitespace();
            let value = if self.consume("=") {
                self.skip_whitespace();
                self.parse_attribute_value()
            } else {
                AttrValue::None
            };

            attrs.push(Attribute {
                name: name.into(),
                value,
                span: self.span_from(attr_start),
            });
        }

        attrs
    }

    fn parse_attribute_value(&mut self) -> AttrValue {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let value = self.read_while(|c| c != quote).to_string();
                self.advance();
                AttrValue::Str { value, quote }
            }
            Some('{') => {
                self.advance();
                AttrValue::Expr(self.read_expression().to_string())
            }
            Some('<') if self.at_element_start() => {
                let start = self.pos;
                self.parse_element();
                AttrValue::Expr(self.source[start..self.pos].to_string())
            }
            _ => {
                let value = self
                    .read_while(|c| !c.is_whitespace() && c != '>' && c != '/')
                    .to_string();
                AttrValue::Str { value, quote: '"' }
            }
        }
    }

    /// Read expression code up to the `}` that closes the current container.
    ///
    /// The opening `{` has already been consumed; the closing one is consumed
    /// but not included. Strings, template literals, comments and nested JSX
    /// elements are skipped as units so braces inside them do not count.
    fn read_expression(&mut self) -> &'a str {
        let start = self.pos;
        let mut depth = 0usize;
        // Last non-whitespace character; `{` stands for the container start.
        let mut prev = '{';

        while let Some(c) = self.peek() {
            match c {
                '\'' | '"' => self.skip_string(c),
                '`' => self.skip_template(),
                '/' if self.starts_with("//") => {
                    self.read_while(|c| c != '\n');
                    continue;
                }
                '/' if self.starts_with("/*") => {
                    self.skip_block_comment();
                }
                '{' | '(' | '[' => {
                    depth += 1;
                    self.advance();
                }
                '}' if depth == 0 => {
                    let code = &self.source[start..self.pos];
                    self.advance();
                    return code;
                }
                '}' | ')' | ']' => {
                    depth = depth.saturating_sub(1);
                    self.advance();
                }
                '<' if can_precede_markup(prev) && self.at_element_start() => {
                    self.parse_element();
                    prev = '>';
                    continue;
                }
                _ => {
                    self.advance();
                }
            }
            if !c.is_whitespace() {
                prev = c;
            }
        }

        &self.source[start..self.pos]
    }

    /// Skip a quoted string. JS strings cannot span lines, so an unterminated
    /// one (an apostrophe in text, say) stops at the end of the line.
    fn skip_string(&mut self, quote: char) {
        self.advance();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '\n' => break,
                c if c == quote => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_template(&mut self) {
        self.advance();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.advance();
                    self.advance();
                }
                '`' => {
                    self.advance();
                    break;
                }
                '$' if self.starts_with("${") => {
                    self.pos += 2;
                    self.read_expression();
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    fn skip_block_comment(&mut self) {
        self.consume("/*");
        while !self.is_eof() && !self.consume("*/") {
            self.advance();
        }
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')
}

fn is_attr_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '$')
}

/// Whether a `<` after this character starts markup rather than a comparison.
fn can_precede_markup(prev: char) -> bool {
    matches!(prev, '{' | '(' | '[' | ',' | ':' | '?' | '=' | '>' | '&' | '|')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> MarkupNode {
        let (node, end) = parse_markup(source, 0).unwrap();
        assert_eq!(end, source.len(), "parser stopped early");
        node
    }

    fn element(node: &MarkupNode) -> &Element {
        node.as_element().expect("expected element")
    }

    #[test]
    fn test_parse_simple_element() {
        let node = parse(r#"<div className="app">Hello</div>"#);
        let el = element(&node);
        assert_eq!(el.tag.as_str(), "div");
        assert_eq!(
            el.attr("className").unwrap().value,
            AttrValue::Str {
                value: "app".into(),
                quote: '"'
            }
        );
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_parse_self_closing_input() {
        let node = parse(r#"<input value={text} onChange={(e) => setText(e.target.value)} />"#);
        let el = element(&node);
        assert!(el.self_closing);
        assert_eq!(el.attr_expr("value"), Some("text"));
        assert_eq!(el.attr_expr("onChange"), Some("(e) => setText(e.target.value)"));
    }

    #[test]
    fn test_parse_expression_with_nested_markup() {
        let source = r#"<ul>{todos.map((todo, index) => (<li key={index}>{todo}</li>))}</ul>"#;
        let node = parse(source);
        let el = element(&node);
        match &el.children[0] {
            MarkupNode::Expression(expr) => {
                assert_eq!(
                    expr.code,
                    "todos.map((todo, index) => (<li key={index}>{todo}</li>))"
                );
            }
            other => panic!("expected expression, got {:?}", other),
        }
    }

    #[test]
    fn test_apostrophe_in_nested_markup_text() {
        let source = "<ul>{items.map(i => <li>Don't {i}</li>)}</ul>";
        let node = parse(source);
        let el = element(&node);
        assert_eq!(el.children.len(), 1);
    }

    #[test]
    fn test_parse_fragment_and_comment() {
        let node = parse("<>{/* note */}<span>a</span></>");
        match node {
            MarkupNode::Fragment(f) => {
                assert_eq!(f.children.len(), 2);
                assert!(matches!(&f.children[0], MarkupNode::Comment(c) if c.content == " note "));
            }
            other => panic!("expected fragment, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_spread_and_boolean_attributes() {
        let node = parse("<button {...props} disabled>Go</button>");
        let el = element(&node);
        assert_eq!(el.attrs[0].value, AttrValue::Spread("props".into()));
        assert_eq!(el.attrs[1].name.as_str(), "disabled");
        assert_eq!(el.attrs[1].value, AttrValue::None);
    }

    #[test]
    fn test_unclosed_child_is_closed_by_parent() {
        let node = parse("<div><p>text</div>");
        let el = element(&node);
        let p = el.children[0].as_element().unwrap();
        assert_eq!(p.tag.as_str(), "p");
        assert_eq!(p.children.len(), 1);
    }

    #[test]
    fn test_not_markup() {
        assert!(parse_markup("a < b", 2).is_none());
        assert!(parse_markup("(x)", 0).is_none());
    }

    #[test]
    fn test_spans_are_absolute() {
        let source = "return (<b>x</b>);";
        let (node, end) = parse_markup(source, 8).unwrap();
        assert_eq!(node.span(), Span::new(8, 16));
        assert_eq!(end, 16);
    }
}
