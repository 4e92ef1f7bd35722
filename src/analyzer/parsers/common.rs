use super::super::{core::*, prelude::*};
use crate::ast::{self, BinaryOp, InequalityOp, UnaryOp};
use crate::tokenizer::{BuiltinFunction, Delimiter, Operator, Span, Token, TokenSpan};

/// Matches one token equal to `expected` and yields its span.
pub fn parse_token(expected: Token) -> impl Parser<TokenSpan, Span> {
    satisfy(move |t: &TokenSpan| (t.token == expected).then_some(t.span))
}

// Literals and names
pub fn parse_number() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        satisfy(|t: &TokenSpan| match t.token {
            Token::Number(value) => Some(ast::Node::number(value).with_span(t.span)),
            _ => None,
        }),
        "number",
    )
}

pub fn parse_variable() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        satisfy(|t: &TokenSpan| match &t.token {
            Token::Variable(name) => Some(ast::Node::variable(name.clone()).with_span(t.span)),
            _ => None,
        }),
        "variable",
    )
}

pub fn parse_function_name() -> impl Parser<TokenSpan, (BuiltinFunction, Span)> {
    with_context(
        satisfy(|t: &TokenSpan| match t.token {
            Token::Function(function) => Some((function, t.span)),
            _ => None,
        }),
        "function name",
    )
}

// Delimiters
pub fn parse_open_paren() -> impl Parser<TokenSpan, Span> {
    parse_token(Token::Delimiter(Delimiter::OpenParen))
}

pub fn parse_close_paren() -> impl Parser<TokenSpan, Span> {
    parse_token(Token::Delimiter(Delimiter::CloseParen))
}

pub fn parse_open_bracket() -> impl Parser<TokenSpan, Span> {
    parse_token(Token::Delimiter(Delimiter::OpenBracket))
}

pub fn parse_close_bracket() -> impl Parser<TokenSpan, Span> {
    parse_token(Token::Delimiter(Delimiter::CloseBracket))
}

pub fn parse_comma() -> impl Parser<TokenSpan, Span> {
    with_context(parse_token(Token::Delimiter(Delimiter::Comma)), "comma")
}

pub fn parse_equals() -> impl Parser<TokenSpan, Span> {
    with_context(parse_token(Token::Equals), "equals")
}

// Operators
pub fn parse_comparison_operator() -> impl Parser<TokenSpan, InequalityOp> {
    with_context(
        satisfy(|t: &TokenSpan| match t.token {
            Token::Comparison(cmp) => Some(InequalityOp::from(cmp)),
            _ => None,
        }),
        "comparison operator",
    )
}

pub fn parse_additive_operator() -> impl Parser<TokenSpan, BinaryOp> {
    satisfy(|t: &TokenSpan| match t.token {
        Token::Operator(Operator::Plus) => Some(BinaryOp::Add),
        Token::Operator(Operator::Minus) => Some(BinaryOp::Subtract),
        _ => None,
    })
}

pub fn parse_multiplicative_operator() -> impl Parser<TokenSpan, BinaryOp> {
    satisfy(|t: &TokenSpan| match t.token {
        Token::Operator(Operator::Multiply) => Some(BinaryOp::Multiply),
        Token::Operator(Operator::Divide) => Some(BinaryOp::Divide),
        Token::Operator(Operator::Modulo) => Some(BinaryOp::Modulo),
        _ => None,
    })
}

pub fn parse_power_operator() -> impl Parser<TokenSpan, Span> {
    parse_token(Token::Operator(Operator::Power))
}

pub fn parse_sign() -> impl Parser<TokenSpan, (UnaryOp, Span)> {
    with_context(
        satisfy(|t: &TokenSpan| match t.token {
            Token::Operator(Operator::Plus) => Some((UnaryOp::Plus, t.span)),
            Token::Operator(Operator::Minus) => Some((UnaryOp::Minus, t.span)),
            _ => None,
        }),
        "sign",
    )
}

pub fn parse_factorial() -> impl Parser<TokenSpan, Span> {
    parse_token(Token::Operator(Operator::Factorial))
}
