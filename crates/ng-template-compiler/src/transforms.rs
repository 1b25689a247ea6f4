//! Recognisers for the JSX shapes that have an Angular equivalent.
//!
//! Each function looks at one node or attribute and reports whether it
//! matches; building the template tree is left to [`crate::translate`].

use jsx_parser::lexer::{tokenize, is_dotted_identifier, is_identifier, SpannedToken, Token};
use jsx_parser::{parse_markup, Element, MarkupNode};

/// `collection.map((item, index) => (<li>...</li>))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapExpression<'a> {
    /// The mapped collection, e.g. `todos` or `state.items`.
    pub collection: &'a str,
    pub item: &'a str,
    pub index: Option<&'a str>,
    /// The first element of the mapped body. Spans are relative to the
    /// expression code.
    pub element: Element,
}

/// Recognise a list-rendering expression.
///
/// Accepts `(item, index) =>`, `(item) =>` and `item =>` callbacks whose
/// body is markup, with or without wrapping parentheses. Block bodies are
/// not recognised.
pub fn parse_map_expression(code: &str) -> Option<MapExpression<'_>> {
    let tokens = tokenize(code);
    let mut pos = 0usize;

    // collection path
    let first = tokens.first().filter(|t| t.token == Token::Ident)?;
    let mut map_at = None;
    while let (Some(dot), Some(ident)) = (tokens.get(pos + 1), tokens.get(pos + 2)) {
        if dot.token != Token::Dot || ident.token != Token::Ident {
            break;
        }
        pos += 2;
        if ident.span.slice(code) == "map" {
            map_at = Some(pos);
            break;
        }
    }
    let map_at = map_at?;
    let collection = &code[first.span.start as usize..tokens[map_at - 1].span.start as usize];

    pos = map_at + 1;
    expect(&tokens, pos, Token::LParen)?;
    pos += 1;

    // callback parameters
    let (item, index) = if tokens.get(pos)?.token == Token::LParen {
        let item = ident_at(&tokens, pos + 1, code)?;
        pos += 2;
        let index = if tokens.get(pos)?.token == Token::Comma {
            let index = ident_at(&tokens, pos + 1, code)?;
            pos += 2;
            Some(index)
        } else {
            None
        };
        expect(&tokens, pos, Token::RParen)?;
        pos += 1;
        (item, index)
    } else {
        let item = ident_at(&tokens, pos, code)?;
        pos += 1;
        (item, None)
    };

    expect(&tokens, pos, Token::Arrow)?;
    pos += 1;

    while tokens.get(pos)?.token == Token::LParen {
        pos += 1;
    }
    let lt = expect(&tokens, pos, Token::Lt)?;

    let (body, _) = parse_markup(code, lt.span.start as usize)?;
    let element = match body {
        MarkupNode::Element(el) => el,
        MarkupNode::Fragment(fragment) => fragment.children.into_iter().find_map(|c| match c {
            MarkupNode::Element(el) => Some(el),
            _ => None,
        })?,
        _ => return None,
    };

    Some(MapExpression {
        collection,
        item,
        index,
        element,
    })
}

fn expect(tokens: &[SpannedToken], pos: usize, token: Token) -> Option<SpannedToken> {
    tokens.get(pos).copied().filter(|t| t.token == token)
}

fn ident_at<'a>(tokens: &[SpannedToken], pos: usize, code: &'a str) -> Option<&'a str> {
    expect(tokens, pos, Token::Ident).map(|t| t.span.slice(code))
}

/// A controlled `<input value={x} onChange={(e) => setX(...)} />`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlledInput<'a> {
    /// The value binding expression.
    pub value: &'a str,
    /// The setter called by the change handler.
    pub setter: &'a str,
}

/// Recognise a controlled input element.
///
/// `is_setter` decides whether a called function is a setter; the first
/// call after the arrow must be one.
pub fn controlled_input<'a>(
    el: &'a Element,
    is_setter: impl Fn(&str) -> bool,
) -> Option<ControlledInput<'a>> {
    if el.tag != "input" || !el.self_closing {
        return None;
    }

    let value = el.attr_expr("value")?.trim();
    if !is_dotted_identifier(value) {
        return None;
    }

    let on_change = el.attr_expr("onChange")?;
    let tokens = tokenize(on_change);
    let arrow = tokens.iter().position(|t| t.token == Token::Arrow)?;

    let mut rest = tokens[arrow + 1..].iter().skip_while(|t| t.token == Token::LBrace);
    let callee = rest.next().filter(|t| t.token == Token::Ident)?;
    rest.next().filter(|t| t.token == Token::LParen)?;

    let setter = callee.span.slice(on_change);
    if !is_setter(setter) {
        return None;
    }

    Some(ControlledInput { value, setter })
}

/// Guess the state name of a setter: `setNewTodo` gives `newTodo`.
pub fn heuristic_state_name(setter: &str) -> Option<String> {
    let suffix = setter.strip_prefix("set")?;
    let mut chars = suffix.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

/// Whether a called name looks like a `useState` setter.
pub fn looks_like_setter(name: &str) -> bool {
    name.strip_prefix("set")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// `onClick={handler}` becomes `(click)="handler()"`.
pub fn click_binding(name: &str, code: &str) -> Option<String> {
    let handler = code.trim();
    (name == "onClick" && is_identifier(handler)).then(|| format!("{handler}()"))
}

/// Rename a JSX attribute to its template spelling.
pub fn rename_attribute(name: &str) -> &str {
    match name {
        "className" => "class",
        other => other,
    }
}

/// The interpolated form of an expression, if it is a plain (dotted)
/// identifier.
pub fn interpolation(code: &str) -> Option<String> {
    let expr = code.trim();
    is_dotted_identifier(expr).then(|| expr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_map_expression() {
        let map = parse_map_expression("todos.map((todo, index) => (\n  <li key={index}>{todo}</li>\n))").unwrap();
        assert_eq!(map.collection, "todos");
        assert_eq!(map.item, "todo");
        assert_eq!(map.index, Some("index"));
        assert_eq!(map.element.tag, "li");
    }

    #[test]
    fn test_parse_map_expression_variants() {
        let map = parse_map_expression("state.items.map(item => <li>{item}</li>)").unwrap();
        assert_eq!(map.collection, "state.items");
        assert_eq!(map.item, "item");
        assert_eq!(map.index, None);

        let map = parse_map_expression("rows.map((row) => (<><tr/><tr/></>))").unwrap();
        assert_eq!(map.element.tag, "tr");

        assert!(parse_map_expression("rows.map((row) => { return <tr/>; })").is_none());
        assert!(parse_map_expression("rows.filter((row) => <tr/>)").is_none());
        assert!(parse_map_expression("count").is_none());
    }

    #[test]
    fn test_heuristic_state_name() {
        assert_eq!(heuristic_state_name("setNewTodo").as_deref(), Some("newTodo"));
        assert_eq!(heuristic_state_name("setX").as_deref(), Some("x"));
        assert_eq!(heuristic_state_name("set"), None);
        assert_eq!(heuristic_state_name("update"), None);
        assert!(looks_like_setter("setName"));
        assert!(!looks_like_setter("settle"));
    }

    #[test]
    fn test_click_binding() {
        assert_eq!(click_binding("onClick", "addTodo").as_deref(), Some("addTodo()"));
        assert_eq!(click_binding("onClick", "() => go()"), None);
        assert_eq!(click_binding("onHover", "addTodo"), None);
    }

    #[test]
    fn test_rename_is_idempotent() {
        assert_eq!(rename_attribute("className"), "class");
        assert_eq!(rename_attribute(rename_attribute("className")), "class");
        assert_eq!(rename_attribute("id"), "id");
    }

    #[test]
    fn test_interpolation() {
        assert_eq!(interpolation(" todo.title ").as_deref(), Some("todo.title"));
        assert_eq!(interpolation("a + b"), None);
    }
}
