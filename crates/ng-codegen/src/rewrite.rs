//! Handler body rewriting.
//!
//! React handlers mutate state through setter calls and read state through
//! bare bindings. Angular methods assign and read class fields, so
//! `setTodos([...todos, x])` becomes `this.todos = [...this.todos, x]`.
//!
//! The rewrite works on tokens: string literals and comments are never
//! touched, and only whole identifiers match a state name.

use jsx_parser::lexer::{tokenize, SpannedToken, Token};
use jsx_parser::StateVar;
use rustc_hash::{FxHashMap, FxHashSet};

/// Rewrite a handler body for use as a class method body.
///
/// Source text between rewritten tokens is copied verbatim.
pub fn rewrite_handler_body(body: &str, states: &[StateVar]) -> String {
    let rewriter = Rewriter::new(states);
    rewriter.rewrite(body)
}

/// Re-indent a block of code with two spaces per level.
///
/// Lines are trimmed and empty lines dropped. The level drops before a line
/// starting with `}` and rises after a line ending with `{`; nothing else
/// (strings, comments, parentheses) is considered.
pub fn reindent(text: &str) -> String {
    let mut level = 0usize;
    let mut lines = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('}') {
            level = level.saturating_sub(1);
        }
        lines.push(format!("{}{}", "  ".repeat(level), line));
        if line.ends_with('{') {
            level += 1;
        }
    }

    lines.join("\n")
}

/// How a setter argument is turned into an assignment.
///
/// The array-literal shape is checked first so its brackets are kept intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetterArgument {
    /// `setList([ ... ])`
    ArrayLiteral,
    /// `setValue(expr)`
    Expression,
}

impl SetterArgument {
    fn classify(tokens: &[SpannedToken]) -> Self {
        match tokens.first() {
            Some(first)
                if first.token == Token::LBracket
                    && matching_close(tokens, 0) == Some(tokens.len() - 1) =>
            {
                SetterArgument::ArrayLiteral
            }
            _ => SetterArgument::Expression,
        }
    }
}

struct Rewriter<'s> {
    /// setter name -> state name
    setters: FxHashMap<&'s str, &'s str>,
    names: FxHashSet<&'s str>,
}

impl<'s> Rewriter<'s> {
    fn new(states: &'s [StateVar]) -> Self {
        Self {
            setters: jsx_parser::setter_lookup(states),
            names: states.iter().map(|s| s.name.as_str()).collect(),
        }
    }

    fn rewrite(&self, text: &str) -> String {
        let tokens = tokenize(text);
        let mut out = String::with_capacity(text.len() + 32);
        let mut copied = 0usize;
        let mut i = 0usize;

        while i < tokens.len() {
            let tok = tokens[i];
            let start = tok.span.start as usize;

            match tok.token {
                Token::Template => {
                    let rewritten = self.rewrite_template(tok.span.slice(text));
                    out.push_str(&text[copied..start]);
                    out.push_str(&rewritten);
                    copied = tok.span.end as usize;
                }
                Token::Ident if !is_member_access(&tokens, i, text) => {
                    let word = tok.span.slice(text);

                    if let Some((state, close)) = self.setter_call(&tokens, i, word) {
                        let open = tokens[i + 1].span.end as usize;
                        let arg_end = tokens[close].span.start as usize;
                        let argument = &text[open..arg_end];

                        out.push_str(&text[copied..start]);
                        out.push_str("this.");
                        out.push_str(state);
                        out.push_str(" = ");
                        out.push_str(&self.rewrite_argument(text, argument, &tokens[i + 2..close]));

                        copied = tokens[close].span.end as usize;
                        i = close + 1;
                        continue;
                    }

                    if self.names.contains(word) && !is_object_key(&tokens, i) {
                        out.push_str(&text[copied..start]);
                        out.push_str("this.");
                        out.push_str(word);
                        copied = tok.span.end as usize;
                    }
                }
                _ => {}
            }

            i += 1;
        }

        out.push_str(&text[copied..]);
        out
    }

    /// A known setter called with exactly one argument. Returns the state
    /// name and the index of the closing paren.
    fn setter_call(&self, tokens: &[SpannedToken], i: usize, word: &str) -> Option<(&'s str, usize)> {
        let state = *self.setters.get(word)?;
        if tokens.get(i + 1)?.token != Token::LParen {
            return None;
        }
        let close = matching_close(tokens, i + 1)?;
        let inner = &tokens[i + 2..close];
        if inner.is_empty() || has_top_level_comma(inner) {
            tracing::debug!(setter = word, "leaving setter call without a single argument");
            return None;
        }
        Some((state, close))
    }

    /// `tokens` are the argument's tokens with spans into `text`. Comments
    /// around an array literal are dropped with the surrounding whitespace.
    fn rewrite_argument(&self, text: &str, argument: &str, tokens: &[SpannedToken]) -> String {
        match (SetterArgument::classify(tokens), tokens.first(), tokens.last()) {
            (SetterArgument::ArrayLiteral, Some(open), Some(close)) => {
                let inner = &text[open.span.end as usize..close.span.start as usize];
                format!("[{}]", self.rewrite(inner))
            }
            _ => self.rewrite(argument.trim()),
        }
    }

    /// Rewrite the `${...}` placeholders of a template literal.
    fn rewrite_template(&self, literal: &str) -> String {
        let mut out = String::with_capacity(literal.len() + 16);
        let mut rest = literal;

        while let Some(pos) = rest.find("${") {
            let (head, tail) = rest.split_at(pos + 2);
            out.push_str(head);

            let mut depth = 1usize;
            let mut end = tail.len();
            for (offset, c) in tail.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            end = offset;
                            break;
                        }
                    }
                    _ => {}
                }
            }

            out.push_str(&self.rewrite(&tail[..end]));
            rest = &tail[end..];
        }

        out.push_str(rest);
        out
    }
}

/// Index of the token closing the bracket at `open`.
fn matching_close(tokens: &[SpannedToken], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, tok) in tokens[open..].iter().enumerate() {
        if tok.token.is_open() {
            depth += 1;
        } else if tok.token.is_close() {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(open + offset);
            }
        }
    }
    None
}

fn has_top_level_comma(tokens: &[SpannedToken]) -> bool {
    let mut depth = 0usize;
    for tok in tokens {
        match tok.token {
            t if t.is_open() => depth += 1,
            t if t.is_close() => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => return true,
            _ => {}
        }
    }
    false
}

/// `obj.name` or `obj?.name`.
fn is_member_access(tokens: &[SpannedToken], i: usize, text: &str) -> bool {
    match i.checked_sub(1).map(|p| tokens[p]) {
        Some(prev) if prev.token == Token::Dot => true,
        Some(prev) if prev.token == Token::Operator => prev.span.slice(text) == "?.",
        _ => false,
    }
}

/// `{ name: ... }` or `, name: ...` inside an object literal.
fn is_object_key(tokens: &[SpannedToken], i: usize) -> bool {
    let next_is_colon = tokens.get(i + 1).is_some_and(|t| t.token == Token::Colon);
    let prev_opens = i
        .checked_sub(1)
        .is_some_and(|p| matches!(tokens[p].token, Token::LBrace | Token::Comma));
    next_is_colon && prev_opens
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use source_map::Span;

    fn state(name: &str, setter: &str) -> StateVar {
        StateVar {
            name: name.into(),
            setter: setter.into(),
            initializer: "[]".into(),
            span: Span::default(),
        }
    }

    fn states() -> Vec<StateVar> {
        vec![state("todos", "setTodos"), state("newTodo", "setNewTodo"), state("list", "setList")]
    }

    #[test]
    fn test_array_literal_keeps_brackets() {
        assert_eq!(
            rewrite_handler_body(r#"setList(["a","b"]);"#, &states()),
            r#"this.list = ["a","b"];"#
        );
    }

    #[test]
    fn test_array_literal_with_surrounding_comments() {
        assert_eq!(
            rewrite_handler_body("setList(/* x */ [a]);", &states()),
            "this.list = [a];"
        );
        assert_eq!(
            rewrite_handler_body("setList([a] // café\n);", &states()),
            "this.list = [a];"
        );
        assert_eq!(
            rewrite_handler_body("setList([ /* é */ ...list, 'ü' ]);", &states()),
            "this.list = [ /* é */ ...this.list, 'ü' ];"
        );
    }

    #[test]
    fn test_spread_assignment() {
        assert_eq!(
            rewrite_handler_body("setTodos([...todos, newTodo]);", &states()),
            "this.todos = [...this.todos, this.newTodo];"
        );
    }

    #[test]
    fn test_expression_argument() {
        assert_eq!(
            rewrite_handler_body("setNewTodo( '' );", &states()),
            "this.newTodo = '';"
        );
        assert_eq!(
            rewrite_handler_body("setTodos(todos.filter((t) => t !== newTodo));", &states()),
            "this.todos = this.todos.filter((t) => t !== this.newTodo);"
        );
    }

    #[test]
    fn test_nested_blocks() {
        let body = "if (newTodo.trim()) {\n  if (todos.length) { setTodos([]); }\n}";
        assert_eq!(
            rewrite_handler_body(body, &states()),
            "if (this.newTodo.trim()) {\n  if (this.todos.length) { this.todos = []; }\n}"
        );
    }

    #[test]
    fn test_qualified_and_similar_names_untouched() {
        let body = "const todosCount = obj.todos + this.todos + a?.todos; log('todos');";
        assert_eq!(
            rewrite_handler_body(body, &states()),
            "const todosCount = obj.todos + this.todos + a?.todos; log('todos');"
        );
    }

    #[test]
    fn test_object_keys_untouched() {
        assert_eq!(
            rewrite_handler_body("save({ todos: todos, count: 1 });", &states()),
            "save({ todos: this.todos, count: 1 });"
        );
        assert_eq!(
            rewrite_handler_body("const x = ok ? todos : [];", &states()),
            "const x = ok ? this.todos : [];"
        );
    }

    #[test]
    fn test_template_placeholders() {
        assert_eq!(
            rewrite_handler_body("alert(`${newTodo} added`);", &states()),
            "alert(`${this.newTodo} added`);"
        );
    }

    #[test]
    fn test_setter_without_single_argument_is_left_alone() {
        assert_eq!(
            rewrite_handler_body("setTodos(); setTodos(a, todos);", &states()),
            "setTodos(); setTodos(a, this.todos);"
        );
    }

    #[test]
    fn test_reindent() {
        let text = "if (a) {\n        b();\n     if (c) {\n d();\n  }\n\n}\n}";
        assert_eq!(
            reindent(text),
            "if (a) {\n  b();\n  if (c) {\n    d();\n  }\n}\n}"
        );
    }
}
