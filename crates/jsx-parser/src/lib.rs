//! React function component parser.
//!
//! This crate extracts the parts of a JSX component file that can be carried
//! over to an Angular component: the component name, its `useState`
//! declarations, its zero-argument event handlers and the markup it returns.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod markup;
pub mod parser;

pub use ast::*;
pub use error::{ErrorCode, ParseError, ParseResult};
pub use markup::parse_markup;
pub use parser::{
    extract_component_name, extract_handlers, extract_return_fragment,
    extract_state_declarations, parse_component,
};

/// Parse a component file and return the parsed result.
pub fn parse(source: &str) -> ParseResult<ParsedComponent> {
    parse_component(source)
}
