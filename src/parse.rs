use std::fmt::Display;

use miette::{Error, SourceSpan};
use num_rational::BigRational;
use tracing::debug;

use crate::{
    Lexer,
    lex::{MalformedExpression, TokenKind},
};

/// Builds the nested token tree, one `List` per parenthesis pair.
pub struct Parser<'de> {
    lexer: Lexer<'de>,
}

/// A lexical or structural unit of an expression.
///
/// `List` only comes out of the tokenizer; `Sum` and `Product` only come out
/// of the resolver and never hold operator markers.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Plus,
    Minus,
    Mult,
    Number(BigRational),
    Variable(usize),
    List(Vec<TokenTree>),
    Sum(Vec<TokenTree>),
    Product(Vec<TokenTree>),
}

impl TokenTree {
    pub fn number(n: i64) -> Self {
        TokenTree::Number(BigRational::from_integer(n.into()))
    }

    pub fn is_operator(&self) -> bool {
        matches!(self, TokenTree::Plus | TokenTree::Minus | TokenTree::Mult)
    }
}

impl<'de> Parser<'de> {
    pub fn new(filename: Option<&'de str>, whole: &'de str) -> Self {
        Parser {
            lexer: Lexer::new(filename, whole),
        }
    }

    /// Scans the whole input into a top-level `List`.
    pub fn parse(mut self) -> Result<TokenTree, Error> {
        self.parse_within(None).map(TokenTree::List)
    }

    /// Collects tokens up to the `)` matching the `(` at byte `open`, or up to the end of
    /// input at top level. Recursion depth is the nesting counter.
    fn parse_within(&mut self, open: Option<usize>) -> Result<Vec<TokenTree>, Error> {
        let mut children = Vec::new();
        loop {
            let token = match self.lexer.next() {
                Some(Ok(token)) => token,
                Some(Err(e)) => return Err(e),
                None => {
                    return match open {
                        None => Ok(children),
                        Some(open) => Err(MalformedExpression::UnclosedOpen {
                            src: self.lexer.source(),
                            bad_bit: SourceSpan::from(open..open + 1),
                        }
                        .into()),
                    };
                }
            };

            let child = match token.kind {
                TokenKind::LeftParen => {
                    debug!(offset = token.offset, "open group");
                    TokenTree::List(self.parse_within(Some(token.offset))?)
                }
                TokenKind::RightParen => {
                    return match open {
                        Some(_) => {
                            debug!(offset = token.offset, len = children.len(), "close group");
                            Ok(children)
                        }
                        None => Err(MalformedExpression::UnmatchedClose {
                            src: self.lexer.source(),
                            bad_bit: SourceSpan::from(token.offset..token.offset + 1),
                        }
                        .into()),
                    };
                }
                TokenKind::Plus => TokenTree::Plus,
                TokenKind::Minus => TokenTree::Minus,
                TokenKind::Star => TokenTree::Mult,
                TokenKind::Number(n) => TokenTree::Number(n),
                TokenKind::Variable(exponent) => TokenTree::Variable(exponent),
            };
            children.push(child);
        }
    }
}

/// Tokenizes `text` into a top-level `TokenTree::List`.
///
/// Tokenizing, resolving and evaluating each recurse once per parenthesis
/// level, so nesting depth is bounded by the thread's stack. Inputs nested
/// tens of thousands of levels deep can overflow it.
pub fn tokenize(text: &str) -> Result<TokenTree, Error> {
    Parser::new(None, text).parse()
}

struct Children<'a>(&'a [TokenTree]);

impl Display for Children<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, child) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{child}")?;
        }
        Ok(())
    }
}

impl Display for TokenTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenTree::Plus => write!(f, "+"),
            TokenTree::Minus => write!(f, "-"),
            TokenTree::Mult => write!(f, "*"),
            TokenTree::Number(n) => write!(f, "{n}"),
            TokenTree::Variable(1) => write!(f, "x"),
            TokenTree::Variable(e) => write!(f, "x^{e}"),
            TokenTree::List(children) => write!(f, "[{}]", Children(children)),
            TokenTree::Sum(children) => write!(f, "(+ {})", Children(children)),
            TokenTree::Product(children) => write!(f, "(* {})", Children(children)),
        }
    }
}
