use miette::Error;
use num_traits::One;
use tracing::debug;

use crate::{
    Parser,
    parse::TokenTree,
    poly::{Monomial, Polynomial},
};

/// Runs one complete input through tokenize, resolve and evaluate.
pub struct Interpreter<'de> {
    parser: Parser<'de>,
}

impl<'de> Interpreter<'de> {
    pub fn new(filename: Option<&'de str>, whole: &'de str) -> Self {
        Self {
            parser: Parser::new(filename, whole),
        }
    }

    pub fn tokenize(self) -> Result<TokenTree, Error> {
        self.parser.parse()
    }

    pub fn resolve(self) -> Result<TokenTree, Error> {
        Ok(self.tokenize()?.resolve())
    }

    pub fn eval(self) -> Result<Polynomial, Error> {
        let polynomial = evaluate(self.resolve()?);
        debug!(%polynomial, "evaluated");
        Ok(polynomial)
    }
}

/// Folds a token tree into a polynomial, resolving it first if needed.
/// Recurses once per tree level.
///
/// # Panics
///
/// On a bare operator marker, which resolution never leaves behind.
pub fn evaluate(token: TokenTree) -> Polynomial {
    match token {
        TokenTree::List(children) => evaluate(crate::resolve(children)),
        TokenTree::Sum(children) => children
            .into_iter()
            .fold(Polynomial::zero(), |acc, child| acc.add(&evaluate(child))),
        TokenTree::Product(children) => children
            .into_iter()
            .fold(Polynomial::one(), |acc, child| acc.multiply(&evaluate(child))),
        TokenTree::Number(value) => Monomial::constant(value).polynomial(),
        TokenTree::Variable(exponent) => Monomial::new(One::one(), exponent).polynomial(),
        op @ (TokenTree::Plus | TokenTree::Minus | TokenTree::Mult) => {
            unreachable!("operator `{op}` survived resolution")
        }
    }
}
