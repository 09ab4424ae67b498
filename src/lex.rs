use std::fmt::Display;

use miette::{Diagnostic, Error, NamedSource, SourceSpan};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use thiserror::Error;
use tracing::trace;

/// The one error kind of the expression grammar. Every variant points at the
/// offending bytes of the input.
#[derive(Error, Debug, Diagnostic)]
pub enum MalformedExpression {
    #[error("Unexpected character '{token}'")]
    #[diagnostic(
        code(polypen::unexpected_character),
        help("remove or correct the character: `{token}`")
    )]
    UnexpectedCharacter {
        #[source_code]
        src: NamedSource<String>,

        #[label("this character")]
        bad_bit: SourceSpan,

        token: char,
    },

    #[error("Unmatched closing parenthesis")]
    #[diagnostic(
        code(polypen::unmatched_close),
        help("remove the `)` or open a group before it")
    )]
    UnmatchedClose {
        #[source_code]
        src: NamedSource<String>,

        #[label("no `(` to close here")]
        bad_bit: SourceSpan,
    },

    #[error("Unclosed parenthesis")]
    #[diagnostic(
        code(polypen::unclosed_open),
        help("the input ended before this group was closed, add a `)`")
    )]
    UnclosedOpen {
        #[source_code]
        src: NamedSource<String>,

        #[label("this `(` is never closed")]
        bad_bit: SourceSpan,
    },

    #[error("Invalid numeric literal: {reason}")]
    #[diagnostic(code(polypen::invalid_number))]
    InvalidNumber {
        #[source_code]
        src: NamedSource<String>,

        #[label("this numeric literal")]
        bad_bit: SourceSpan,

        reason: String,
    },
}

impl MalformedExpression {
    pub fn span(&self) -> SourceSpan {
        match self {
            MalformedExpression::UnexpectedCharacter { bad_bit, .. }
            | MalformedExpression::UnmatchedClose { bad_bit, .. }
            | MalformedExpression::UnclosedOpen { bad_bit, .. }
            | MalformedExpression::InvalidNumber { bad_bit, .. } => *bad_bit,
        }
    }
}

/// Largest exponent a variable may carry. Polynomials are dense, so the
/// exponent is also a vector length.
pub const MAX_EXPONENT: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq)]
pub struct Token<'de> {
    pub kind: TokenKind,
    pub literal: &'de str,
    /// Byte offset of the first character of `literal`.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Number(BigRational),
    /// The indeterminate raised to a power. The name is not kept.
    Variable(usize),
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lit = self.literal;
        match &self.kind {
            TokenKind::LeftParen => write!(f, "LEFT_PAREN {lit} null"),
            TokenKind::RightParen => write!(f, "RIGHT_PAREN {lit} null"),
            TokenKind::Plus => write!(f, "PLUS {lit} null"),
            TokenKind::Minus => write!(f, "MINUS {lit} null"),
            TokenKind::Star => write!(f, "STAR {lit} null"),
            TokenKind::Number(n) => write!(f, "NUMBER {lit} {n}"),
            TokenKind::Variable(e) => write!(f, "VARIABLE {lit} {e}"),
        }
    }
}

pub struct Lexer<'de> {
    filename: Option<&'de str>,
    whole: &'de str,
    rest: &'de str,
    pub byte: usize,
}

impl<'de> Lexer<'de> {
    pub fn new(filename: Option<&'de str>, input: &'de str) -> Self {
        Lexer {
            filename,
            whole: input,
            rest: input,
            byte: 0,
        }
    }

    pub(crate) fn source(&self) -> NamedSource<String> {
        NamedSource::new(self.filename.unwrap_or("<input>"), self.whole.to_string())
    }

    fn take_digits(&mut self) -> &'de str {
        let rest = self.rest;
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        self.byte += end;
        self.rest = &rest[end..];
        &rest[..end]
    }

    fn invalid_number(&self, at: std::ops::Range<usize>, reason: impl Into<String>) -> Error {
        MalformedExpression::InvalidNumber {
            src: self.source(),
            bad_bit: SourceSpan::from(at),
            reason: reason.into(),
        }
        .into()
    }

    /// Reads the digits after a `^` that has already been consumed.
    fn exponent(&mut self) -> Result<usize, Error> {
        let caret = self.byte - 1;
        let digits = self.take_digits();
        if digits.is_empty() {
            return Err(self.invalid_number(caret..self.byte, "expected exponent digits after `^`"));
        }
        let at = self.byte - digits.len()..self.byte;
        let exponent: usize = digits
            .parse()
            .map_err(|e| self.invalid_number(at.clone(), format!("{e}")))?;
        if exponent > MAX_EXPONENT {
            return Err(self.invalid_number(
                at,
                format!("exponent {exponent} exceeds the maximum of {MAX_EXPONENT}"),
            ));
        }
        Ok(exponent)
    }

    fn number(
        &self,
        numerator: &str,
        denominator: Option<&str>,
        start: usize,
    ) -> Result<BigRational, Error> {
        let parse = |digits: &str| {
            digits
                .parse::<BigInt>()
                .map_err(|e| self.invalid_number(start..self.byte, format!("{e}")))
        };
        let numerator = parse(numerator)?;
        let denominator = match denominator {
            Some(digits) => parse(digits)?,
            None => return Ok(BigRational::from_integer(numerator)),
        };
        if denominator.is_zero() {
            return Err(self.invalid_number(start..self.byte, "denominator must not be zero"));
        }
        Ok(BigRational::new(numerator, denominator))
    }
}

impl<'de> Iterator for Lexer<'de> {
    type Item = Result<Token<'de>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut chars = self.rest.chars();
            let c = chars.next()?;
            let literal = &self.rest[..c.len_utf8()];
            let cur = self.rest;
            let start = self.byte;
            self.rest = chars.as_str();
            self.byte += c.len_utf8();

            enum Start {
                Ident,
                Number,
            }

            let process = |kind: TokenKind| {
                trace!(?kind, offset = start, "lexed");
                Some(Ok(Token {
                    kind,
                    literal,
                    offset: start,
                }))
            };

            let started = match c {
                '(' => return process(TokenKind::LeftParen),
                ')' => return process(TokenKind::RightParen),
                '+' => return process(TokenKind::Plus),
                '-' => return process(TokenKind::Minus),
                '*' => return process(TokenKind::Star),
                'a'..='z' | 'A'..='Z' => Start::Ident,
                '0'..='9' => Start::Number,
                ' ' | '\r' | '\t' | '\n' => continue, // Skip whitespace
                c => {
                    return Some(Err(MalformedExpression::UnexpectedCharacter {
                        src: self.source(),
                        bad_bit: SourceSpan::from(start..self.byte),
                        token: c,
                    }
                    .into()));
                }
            };

            let kind = match started {
                Start::Ident => {
                    let first_non_ident = cur
                        .find(|c| !matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_'))
                        .unwrap_or(cur.len());

                    let extra_bytes = first_non_ident - c.len_utf8();
                    self.byte += extra_bytes;
                    self.rest = &self.rest[extra_bytes..];

                    let exponent = match self.rest.strip_prefix('^') {
                        Some(after_caret) => {
                            self.byte += 1;
                            self.rest = after_caret;
                            match self.exponent() {
                                Ok(exponent) => exponent,
                                Err(e) => return Some(Err(e)),
                            }
                        }
                        None => 1,
                    };
                    TokenKind::Variable(exponent)
                }
                Start::Number => {
                    let first_non_digit = cur
                        .find(|c: char| !c.is_ascii_digit())
                        .unwrap_or(cur.len());
                    let numerator = &cur[..first_non_digit];

                    let extra_bytes = numerator.len() - c.len_utf8();
                    self.byte += extra_bytes;
                    self.rest = &self.rest[extra_bytes..];

                    // `3/4` is one literal, `3/` is not.
                    let denominator = match self.rest.strip_prefix('/') {
                        Some(after_slash) if after_slash.starts_with(|c: char| c.is_ascii_digit()) => {
                            self.byte += 1;
                            self.rest = after_slash;
                            Some(self.take_digits())
                        }
                        _ => None,
                    };

                    match self.number(numerator, denominator, start) {
                        Ok(n) => TokenKind::Number(n),
                        Err(e) => return Some(Err(e)),
                    }
                }
            };

            let literal = &cur[..self.byte - start];
            trace!(?kind, offset = start, "lexed");
            return Some(Ok(Token {
                kind,
                literal,
                offset: start,
            }));
        }
    }
}
