//! Parses single-variable polynomial expressions such as `2x^2 - (x + 1)(x - 1)`
//! into an exact [`Polynomial`] and prints them back in canonical form.

use miette::Error;

pub mod eval;
pub mod lex;
pub mod parse;
pub mod poly;
pub mod resolve;

#[cfg(test)]
mod proptests;

pub use eval::{Interpreter, evaluate};
pub use lex::{Lexer, MalformedExpression};
pub use parse::{Parser, TokenTree, tokenize};
pub use poly::{Monomial, Polynomial};
pub use resolve::resolve;

/// Tokenizes, resolves and evaluates `text`.
pub fn parse(text: &str) -> Result<Polynomial, Error> {
    Interpreter::new(None, text).eval()
}
