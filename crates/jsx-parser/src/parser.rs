//! Scanner for React function components.
//!
//! The scanner walks the token stream once and recognises only the narrow
//! grammar a component file needs: the component declaration, `useState`
//! destructures, zero-argument arrow handlers and the returned markup.
//! Everything else is stepped over. Nested function bodies are skipped as
//! balanced units so declarations inside them are never lifted into the
//! component.

use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Lexer, SpannedToken, Token};
use crate::markup::parse_markup;
use indexmap::IndexMap;
use smol_str::SmolStr;
use source_map::Span;

/// Parse a component file into its model and returned markup.
///
/// Fails when no component declaration exists (checked first) or when the
/// component returns no markup.
pub fn parse_component(source: &str) -> ParseResult<ParsedComponent> {
    let scan = scan(source);

    let (identifier, identifier_span) = scan
        .component
        .ok_or_else(|| ParseError::no_component(whole_file(source)))?;

    let fragment = scan
        .fragment
        .ok_or_else(|| ParseError::no_markup_fragment(&identifier, identifier_span))?;

    Ok(ParsedComponent {
        model: ComponentModel {
            identifier,
            identifier_span,
            states: scan.states,
            handlers: scan.handlers,
        },
        fragment,
    })
}

/// Find the component name.
pub fn extract_component_name(source: &str) -> ParseResult<SmolStr> {
    scan(source)
        .component
        .map(|(name, _)| name)
        .ok_or_else(|| ParseError::no_component(whole_file(source)))
}

/// Collect the component's `useState` destructures, in source order.
pub fn extract_state_declarations(source: &str) -> Vec<StateVar> {
    scan(source).states
}

/// Collect the component's zero-argument arrow handlers, in source order.
pub fn extract_handlers(source: &str) -> IndexMap<SmolStr, HandlerDef> {
    scan(source).handlers
}

/// Find the markup fragment returned at component scope.
///
/// The first `return (<...>)` wins; a bare `return <...>` is used only when
/// the component has no parenthesized one.
pub fn extract_return_fragment(source: &str) -> ParseResult<MarkupFragment> {
    let scan = scan(source);
    match scan.fragment {
        Some(fragment) => Ok(fragment),
        None => {
            let (name, span) = scan
                .component
                .unwrap_or_else(|| (SmolStr::new_static("component"), whole_file(source)));
            Err(ParseError::no_markup_fragment(&name, span))
        }
    }
}

fn whole_file(source: &str) -> Span {
    Span::from_range(0..source.len())
}

fn scan(source: &str) -> ComponentScan {
    let mut scanner = ComponentScanner::new(source);
    scanner.scan();
    scanner.finish()
}

/// Everything one pass over a file recognised.
struct ComponentScan {
    component: Option<(SmolStr, Span)>,
    states: Vec<StateVar>,
    handlers: IndexMap<SmolStr, HandlerDef>,
    fragment: Option<MarkupFragment>,
}

/// Which body the scanner is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Module,
    Function,
    Arrow,
}

/// What was found inside one scope.
#[derive(Default)]
struct ComponentBody {
    states: Vec<StateVar>,
    handlers: IndexMap<SmolStr, HandlerDef>,
    /// First `return (<...>)`.
    fragment: Option<MarkupFragment>,
    /// First bare `return <...>`; used only without a parenthesized one.
    bare_fragment: Option<MarkupFragment>,
}

struct ComponentScanner<'a> {
    lexer: Lexer<'a>,
    source: &'a str,
    /// Brace depth of the scanned (not skipped) code.
    depth: usize,
    scope: Scope,
    /// Brace depth just inside the current component body.
    scope_depth: usize,
    function_component: Option<(SmolStr, Span)>,
    arrow_component: Option<(SmolStr, Span)>,
    function_body: ComponentBody,
    arrow_body: ComponentBody,
    module_body: ComponentBody,
}

impl<'a> ComponentScanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            source,
            depth: 0,
            scope: Scope::Module,
            scope_depth: 0,
            function_component: None,
            arrow_component: None,
            function_body: ComponentBody::default(),
            arrow_body: ComponentBody::default(),
            module_body: ComponentBody::default(),
        }
    }

    /// The function component wins over an arrow component; only the chosen
    /// component's body contributes states, handlers and markup.
    fn finish(self) -> ComponentScan {
        let (component, body) = match (self.function_component, self.arrow_component) {
            (Some(component), _) => (Some(component), self.function_body),
            (None, Some(component)) => (Some(component), self.arrow_body),
            (None, None) => (None, self.module_body),
        };
        ComponentScan {
            component,
            states: body.states,
            handlers: body.handlers,
            fragment: body.fragment.or(body.bare_fragment),
        }
    }

    fn body(&mut self) -> &mut ComponentBody {
        match self.scope {
            Scope::Function => &mut self.function_body,
            Scope::Arrow => &mut self.arrow_body,
            Scope::Module => &mut self.module_body,
        }
    }

    /// Called with the body's `{` already consumed.
    fn enter_component(&mut self, scope: Scope) {
        self.depth += 1;
        self.scope = scope;
        self.scope_depth = self.depth;
    }

    fn scan(&mut self) {
        while let Some(tok) = self.lexer.next_token() {
            match tok.token {
                Token::LBrace => self.depth += 1,
                Token::RBrace => {
                    self.depth = self.depth.saturating_sub(1);
                    if self.scope != Scope::Module && self.depth < self.scope_depth {
                        self.scope = Scope::Module;
                    }
                }
                Token::Function => self.scan_function(),
                Token::Const | Token::Let | Token::Var => self.scan_binding(tok),
                Token::Return => self.scan_return(),
                Token::Arrow => {
                    // Inline callbacks (`useEffect(() => {...})`, `xs.map(x => {...})`)
                    // are not component scope.
                    if self.lexer.eat(Token::LBrace).is_some() {
                        self.lexer.skip_balanced();
                    }
                }
                _ => {}
            }
        }
    }

    fn text(&self, tok: SpannedToken) -> &'a str {
        self.lexer.slice(tok.span)
    }

    /// `function Name(...) {`: the first top-level declaration is the
    /// component and is scanned into; any other function body is skipped.
    fn scan_function(&mut self) {
        let Some(name) = self.lexer.eat(Token::Ident) else {
            self.skip_function_body();
            return;
        };

        if self.depth > 0 || self.function_component.is_some() {
            self.skip_function_body();
            return;
        }

        // Parameters and return type
        self.skip_until(|t| matches!(t, Token::LBrace | Token::Semi));
        if self.lexer.eat(Token::LBrace).is_none() {
            return;
        }

        let text = self.text(name);
        tracing::debug!(component = text, "found function component");
        self.function_component = Some((text.into(), name.span));
        self.enter_component(Scope::Function);
    }

    fn skip_function_body(&mut self) {
        while let Some(tok) = self.lexer.next_token() {
            match tok.token {
                Token::LBrace => {
                    self.lexer.skip_balanced();
                    return;
                }
                Token::LParen | Token::LBracket => {
                    self.lexer.skip_balanced();
                }
                Token::Semi => return,
                _ => {}
            }
        }
    }

    fn scan_binding(&mut self, decl: SpannedToken) {
        match self.lexer.peek().map(|t| t.token) {
            Some(Token::LBracket) => self.scan_state_declaration(decl),
            Some(Token::Ident) => self.scan_arrow_binding(),
            _ => {}
        }
    }

    /// `const [name, setter] = useState(init);`
    fn scan_state_declaration(&mut self, decl: SpannedToken) {
        let Some(open) = self.lexer.next_token() else {
            return;
        };

        let Some((name, setter)) = self.destructure_pair() else {
            tracing::debug!(
                at = open.span.start,
                "skipping destructure that is not a [value, setter] pair"
            );
            return;
        };

        if self.lexer.eat(Token::Eq).is_none() || !self.eat_use_state_callee() {
            tracing::debug!(state = name, "skipping destructure not bound to useState");
            return;
        }

        self.skip_type_arguments();

        let Some(lparen) = self.lexer.eat(Token::LParen) else {
            tracing::debug!(state = name, "skipping useState reference without a call");
            return;
        };
        let Some(rparen) = self.lexer.skip_balanced() else {
            return;
        };

        let initializer = self.source[lparen.span.end as usize..rparen.span.start as usize].trim();
        let initializer = if initializer.is_empty() {
            "undefined"
        } else {
            initializer
        };

        let end = self
            .lexer
            .eat(Token::Semi)
            .map_or(rparen.span.end, |semi| semi.span.end);

        self.body().states.push(StateVar {
            name: name.into(),
            setter: setter.into(),
            initializer: initializer.to_string(),
            span: Span::new(decl.span.start, end),
        });
    }

    /// `name, setter]` after the opening bracket.
    fn destructure_pair(&mut self) -> Option<(&'a str, &'a str)> {
        let name = self.lexer.eat(Token::Ident)?;
        self.lexer.eat(Token::Comma)?;
        let setter = self.lexer.eat(Token::Ident)?;
        self.lexer.eat(Token::RBracket)?;
        Some((self.text(name), self.text(setter)))
    }

    /// `useState` or `React.useState`.
    fn eat_use_state_callee(&mut self) -> bool {
        if self.lexer.eat_ident("React").is_some() && self.lexer.eat(Token::Dot).is_none() {
            return false;
        }
        self.lexer.eat_ident("useState").is_some()
    }

    /// `<T>` on a generic call.
    fn skip_type_arguments(&mut self) {
        if self.lexer.eat(Token::Lt).is_none() {
            return;
        }
        let mut depth = 1usize;
        while let Some(tok) = self.lexer.peek() {
            match tok.token {
                Token::Lt => depth += 1,
                Token::Gt => {
                    depth -= 1;
                    if depth == 0 {
                        self.lexer.next_token();
                        return;
                    }
                }
                Token::LParen | Token::Semi => return,
                _ => {}
            }
            self.lexer.next_token();
        }
    }

    /// `const name = [async] (...) => {`.
    fn scan_arrow_binding(&mut self) {
        let Some(name_tok) = self.lexer.next_token() else {
            return;
        };
        let name = self.text(name_tok);

        // `const App: React.FC<Props> = ...`
        if self.lexer.eat(Token::Colon).is_some() {
            self.skip_until(|t| matches!(t, Token::Eq | Token::Semi));
        }

        if self.lexer.eat(Token::Eq).is_none() {
            return;
        }
        self.lexer.eat(Token::Async);

        let Some(lparen) = self.lexer.eat(Token::LParen) else {
            return;
        };
        let Some(rparen) = self.lexer.skip_balanced() else {
            return;
        };
        let params = self.source[lparen.span.end as usize..rparen.span.start as usize].trim();

        // Return type annotation: `(): void => {`
        if self.lexer.eat(Token::Colon).is_some() {
            self.skip_until(|t| matches!(t, Token::Arrow | Token::Semi | Token::LBrace));
        }

        if self.lexer.eat(Token::Arrow).is_none() {
            return;
        }

        // Expression bodies are left to the main loop.
        if self.lexer.peek().map(|t| t.token) != Some(Token::LBrace) {
            return;
        }

        if self.depth == 0 && name.starts_with(|c: char| c.is_ascii_uppercase()) {
            self.lexer.next_token();
            if self.function_component.is_none() && self.arrow_component.is_none() {
                tracing::debug!(component = name, "found arrow component");
                self.arrow_component = Some((name.into(), name_tok.span));
                self.enter_component(Scope::Arrow);
            } else {
                tracing::debug!(binding = name, "skipping another component body");
                self.lexer.skip_balanced();
            }
            return;
        }

        let Some(lbrace) = self.lexer.next_token() else {
            return;
        };
        let Some(rbrace) = self.lexer.skip_balanced() else {
            return;
        };

        if !params.is_empty() {
            tracing::debug!(binding = name, "skipping arrow function with parameters");
            return;
        }

        let raw_body = &self.source[lbrace.span.end as usize..rbrace.span.start as usize];
        let leading = raw_body.len() - raw_body.trim_start().len();
        let body = raw_body.trim();
        let body_start = lbrace.span.end + leading as u32;

        let end = self
            .lexer
            .eat(Token::Semi)
            .map_or(rbrace.span.end, |semi| semi.span.end);

        let handler = HandlerDef {
            name: name.into(),
            body: body.to_string(),
            span: Span::new(name_tok.span.start, end),
            body_span: Span::new(body_start, body_start + body.len() as u32),
        };

        let handlers = &mut self.body().handlers;
        if handlers.contains_key(name) {
            tracing::debug!(handler = name, "handler redefined; keeping the last body");
        }
        handlers.insert(handler.name.clone(), handler);
    }

    fn skip_until(&mut self, stop: impl Fn(Token) -> bool) {
        while let Some(tok) = self.lexer.peek() {
            if stop(tok.token) {
                return;
            }
            self.lexer.next_token();
            if tok.token.is_open() {
                self.lexer.skip_balanced();
            }
        }
    }

    /// `return (<...>)` or `return <...>`. Markup is always parsed so its text
    /// never reaches the tokenizer. The first parenthesized fragment of a
    /// scope is kept; a bare one only fills in when no parenthesized one
    /// exists, so an early `return <p>Loading</p>;` guard does not win.
    fn scan_return(&mut self) {
        let (start, parenthesized) = match self.lexer.peek() {
            Some(tok) if tok.token == Token::Lt => (tok.span.start, false),
            Some(tok) if tok.token == Token::LParen => {
                self.lexer.next_token();
                match self.lexer.peek() {
                    Some(inner) if inner.token == Token::Lt => (inner.span.start, true),
                    _ => return,
                }
            }
            _ => return,
        };
        let start = start as usize;

        let Some((root, end)) = parse_markup(self.source, start) else {
            return;
        };

        let fragment = MarkupFragment {
            source: self.source[start..end].to_string(),
            span: Span::from_range(start..end),
            root,
        };
        let body = self.body();
        let slot = if parenthesized {
            &mut body.fragment
        } else {
            &mut body.bare_fragment
        };
        if slot.is_none() {
            *slot = Some(fragment);
        }

        self.lexer.seek(end);
    }
}
