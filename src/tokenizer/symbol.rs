//! # Symbol Token Handling
//!
//! Operators, comparisons and delimiters of the expression language.
//!
//! Symbols are matched longest-first so that `**`, `<=`, `>=` and `!=` are never
//! split into two single-character tokens.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
    #[strum(serialize = "*")]
    Multiply,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "%")]
    Modulo,
    /// Exponentiation, written `^` or `**`
    #[strum(to_string = "^", serialize = "**")]
    Power,
    /// Postfix factorial (`!`)
    #[strum(serialize = "!")]
    Factorial,
}

impl Operator {
    pub fn is_binary(&self) -> bool {
        !matches!(self, Operator::Factorial)
    }
}

/// Relational operators producing an inequality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Comparison {
    #[strum(serialize = "<")]
    Less,
    #[strum(serialize = ">")]
    Greater,
    #[strum(serialize = "<=")]
    LessEqual,
    #[strum(serialize = ">=")]
    GreaterEqual,
    #[strum(serialize = "!=")]
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    #[strum(serialize = "(")]
    OpenParen,
    #[strum(serialize = ")")]
    CloseParen,
    #[strum(serialize = "[")]
    OpenBracket,
    #[strum(serialize = "]")]
    CloseBracket,
    #[strum(serialize = ",")]
    Comma,
}

impl Delimiter {
    pub fn is_opening(&self) -> bool {
        matches!(self, Delimiter::OpenParen | Delimiter::OpenBracket)
    }

    pub fn is_closing(&self) -> bool {
        matches!(self, Delimiter::CloseParen | Delimiter::CloseBracket)
    }

    /// The delimiter closing `self`, if `self` opens a group.
    pub fn closing(&self) -> Option<Delimiter> {
        match self {
            Delimiter::OpenParen => Some(Delimiter::CloseParen),
            Delimiter::OpenBracket => Some(Delimiter::CloseBracket),
            _ => None,
        }
    }
}

/// Parses an operator, comparison or `=` token.
///
/// ```
/// # use eqsolve::tokenizer::symbol::{parse_operator, Operator};
/// # use eqsolve::tokenizer::token::Token;
/// let (rest, token) = parse_operator("** 2").unwrap();
/// assert_eq!(token, Token::Operator(Operator::Power));
/// assert_eq!(rest, " 2");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        alt((
            // Multi-character symbols first
            value(Token::Operator(Operator::Power), tag("**")),
            value(Token::Comparison(Comparison::LessEqual), tag("<=")),
            value(Token::Comparison(Comparison::GreaterEqual), tag(">=")),
            value(Token::Comparison(Comparison::NotEqual), tag("!=")),
            value(Token::Comparison(Comparison::Less), tag("<")),
            value(Token::Comparison(Comparison::Greater), tag(">")),
            value(Token::Equals, tag("=")),
            map(
                alt((
                    value(Operator::Plus, tag("+")),
                    value(Operator::Minus, tag("-")),
                    value(Operator::Multiply, tag("*")),
                    value(Operator::Divide, tag("/")),
                    value(Operator::Modulo, tag("%")),
                    value(Operator::Power, tag("^")),
                    value(Operator::Factorial, tag("!")),
                )),
                Token::Operator,
            ),
        )),
    )(input)
}

#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
                value(Delimiter::OpenBracket, tag("[")),
                value(Delimiter::CloseBracket, tag("]")),
                value(Delimiter::Comma, tag(",")),
            )),
            Token::Delimiter,
        ),
    )(input)
}
