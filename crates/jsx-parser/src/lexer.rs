//! Tokenizer for the script part of a component file.
//!
//! Only the shapes the scanner and the handler rewriter care about get their
//! own token kinds; everything else collapses into [`Token::Operator`] or
//! [`Token::Unknown`]. Markup is never tokenized here: the scanner hands
//! `<...>` regions to [`crate::markup`] and re-seeks past them.

use logos::Logos;
use source_map::Span;

/// A script token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip(r"//[^\n]*", allow_greedy = true))]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token {
    #[token("function")]
    Function,
    #[token("const")]
    Const,
    #[token("let")]
    Let,
    #[token("var")]
    Var,
    #[token("return")]
    Return,
    #[token("async")]
    Async,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"'([^'\\\n]|\\.)*'")]
    Str,
    #[regex(r"`([^`\\]|\\.)*`")]
    Template,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("=>")]
    Arrow,
    #[token("=")]
    Eq,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("/")]
    Slash,

    #[token("==")]
    #[token("===")]
    #[token("!=")]
    #[token("!==")]
    #[token("<=")]
    #[token(">=")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("**")]
    #[token("%")]
    #[token("!")]
    #[token("~")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("?.")]
    #[token("++")]
    #[token("--")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&&=")]
    #[token("||=")]
    #[token("??=")]
    Operator,

    /// A character the tokenizer does not recognise (stray quote, `#`, `@`, ...).
    Unknown,
}

impl Token {
    /// Whether this token opens a bracket pair.
    pub fn is_open(self) -> bool {
        matches!(self, Token::LParen | Token::LBracket | Token::LBrace)
    }

    /// Whether this token closes a bracket pair.
    pub fn is_close(self) -> bool {
        matches!(self, Token::RParen | Token::RBracket | Token::RBrace)
    }
}

/// A token together with its byte span in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// A seekable token cursor over a source text.
///
/// Spans are always absolute offsets into `source`, also after [`Lexer::seek`].
pub struct Lexer<'a> {
    source: &'a str,
    inner: logos::Lexer<'a, Token>,
    base: usize,
    peeked: Option<Option<SpannedToken>>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: Token::lexer(source),
            base: 0,
            peeked: None,
        }
    }

    /// Restart tokenizing at `offset`, discarding any peeked token.
    pub fn seek(&mut self, offset: usize) {
        let offset = offset.min(self.source.len());
        self.inner = Token::lexer(&self.source[offset..]);
        self.base = offset;
        self.peeked = None;
    }

    fn lex(&mut self) -> Option<SpannedToken> {
        let result = self.inner.next()?;
        let range = self.inner.span();
        let span = Span::from_range(self.base + range.start..self.base + range.end);
        let token = result.unwrap_or(Token::Unknown);
        Some(SpannedToken { token, span })
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<SpannedToken> {
        if self.peeked.is_none() {
            let next = self.lex();
            self.peeked = Some(next);
        }
        self.peeked.flatten()
    }

    /// Consume the next token.
    pub fn next_token(&mut self) -> Option<SpannedToken> {
        match self.peeked.take() {
            Some(peeked) => peeked,
            None => self.lex(),
        }
    }

    /// Consume the next token if it is `token`.
    pub fn eat(&mut self, token: Token) -> Option<SpannedToken> {
        match self.peek() {
            Some(tok) if tok.token == token => self.next_token(),
            _ => None,
        }
    }

    /// Consume an identifier token with exactly this text.
    pub fn eat_ident(&mut self, text: &str) -> Option<SpannedToken> {
        match self.peek() {
            Some(tok) if tok.token == Token::Ident && self.slice(tok.span) == text => {
                self.next_token()
            }
            _ => None,
        }
    }

    /// Given that the opening bracket was just consumed, consume tokens up to
    /// and including the matching close and return the close token.
    ///
    /// All three bracket kinds share one depth counter. Returns `None` when the
    /// input ends first.
    pub fn skip_balanced(&mut self) -> Option<SpannedToken> {
        let mut depth = 1usize;
        while let Some(tok) = self.next_token() {
            if tok.token.is_open() {
                depth += 1;
            } else if tok.token.is_close() {
                depth -= 1;
                if depth == 0 {
                    return Some(tok);
                }
            }
        }
        None
    }

    /// Text covered by a span.
    pub fn slice(&self, span: Span) -> &'a str {
        span.slice(self.source)
    }
}

impl Iterator for Lexer<'_> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Tokenize a whole text.
pub fn tokenize(source: &str) -> Vec<SpannedToken> {
    Lexer::new(source).collect()
}

/// Whether `text` is a plain identifier.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Whether `text` is an identifier path such as `todo` or `todo.title`.
pub fn is_dotted_identifier(text: &str) -> bool {
    !text.is_empty() && text.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_state_declaration_tokens() {
        assert_eq!(
            kinds("const [todos, setTodos] = useState([]);"),
            vec![
                Token::Const,
                Token::LBracket,
                Token::Ident,
                Token::Comma,
                Token::Ident,
                Token::RBracket,
                Token::Eq,
                Token::Ident,
                Token::LParen,
                Token::LBracket,
                Token::RBracket,
                Token::RParen,
                Token::Semi,
            ]
        );
    }

    #[test]
    fn test_keywords_are_whole_words() {
        assert_eq!(kinds("constant returnValue"), vec![Token::Ident, Token::Ident]);
        assert_eq!(kinds("async () =>"), vec![
            Token::Async,
            Token::LParen,
            Token::RParen,
            Token::Arrow,
        ]);
    }

    #[test]
    fn test_comments_and_strings() {
        let source = "a // }\n/* { */ 'x}' \"y{\" `z${1}`";
        assert_eq!(
            kinds(source),
            vec![Token::Ident, Token::Str, Token::Str, Token::Template]
        );
    }

    #[test]
    fn test_unknown_characters_do_not_stop_the_lexer() {
        assert_eq!(kinds("a # b"), vec![Token::Ident, Token::Unknown, Token::Ident]);
    }

    #[test]
    fn test_spread_and_operators() {
        assert_eq!(
            kinds("[...xs, a === b]"),
            vec![
                Token::LBracket,
                Token::Ellipsis,
                Token::Ident,
                Token::Comma,
                Token::Ident,
                Token::Operator,
                Token::Ident,
                Token::RBracket,
            ]
        );
    }

    #[test]
    fn test_seek_keeps_absolute_spans() {
        let source = "skip this; keep";
        let mut lexer = Lexer::new(source);
        lexer.seek(11);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.token, Token::Ident);
        assert_eq!(tok.span, Span::new(11, 15));
        assert_eq!(lexer.slice(tok.span), "keep");
    }

    #[test]
    fn test_skip_balanced() {
        let source = "{ if (a) { b(); } } tail";
        let mut lexer = Lexer::new(source);
        lexer.next_token();
        let close = lexer.skip_balanced().unwrap();
        assert_eq!(close.span, Span::new(18, 19));
        let tail = lexer.peek().unwrap();
        assert_eq!(lexer.slice(tail.span), "tail");
    }

    #[test]
    fn test_identifier_helpers() {
        assert!(is_identifier("setTodos"));
        assert!(!is_identifier("1abc"));
        assert!(is_dotted_identifier("todo.title"));
        assert!(!is_dotted_identifier("todo.title()"));
        assert!(!is_dotted_identifier("a..b"));
    }
}
