//! Precedence-climbing expression grammar, lowest binding power first:
//!
//! ```text
//! expression     := comparison ( '=' comparison )?
//! comparison     := addition ( ('<'|'>'|'<='|'>='|'!=') addition )?
//! addition       := multiplication ( ('+'|'-') multiplication )*
//! multiplication := unary ( ('*'|'/'|'%') unary )*
//! unary          := ('+'|'-') unary | exponentiation
//! exponentiation := postfix ( ('^'|'**') unary )?
//! postfix        := primary '!'*
//! primary        := number | function '(' args ')' | variable
//!                 | '(' expression ')' | '[' expression ']'
//! ```
//!
//! Every operand that follows an operator is parsed under `cut`, so a missing
//! operand is reported where it was expected instead of as a trailing token.

use super::{
    super::{core::*, prelude::*},
    *,
};
use crate::ast::{self, UnaryOp};
use crate::tokenizer::TokenSpan;

pub const OPERAND: &str = "operand";
pub const FUNCTION_PAREN: &str = "'(' after function name";
pub const CLOSE_PAREN: &str = "')'";
pub const CLOSE_BRACKET: &str = "']'";
pub const INNER_EXPRESSION: &str = "expression";

pub fn parse_expression() -> impl Parser<TokenSpan, ast::Node> {
    with_context(lazy(parse_equation), "expression")
}

fn parse_equation() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        map(
            tuple2(
                parse_comparison(),
                optional(preceded(
                    as_unit(parse_equals()),
                    cut(parse_comparison(), OPERAND),
                )),
            ),
            |(left, right)| match right {
                Some(right) => ast::Node::equation(left, right),
                None => left,
            },
        ),
        "equation",
    )
}

fn parse_comparison() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        map(
            tuple2(
                parse_addition(),
                optional(tuple2(
                    parse_comparison_operator(),
                    cut(parse_addition(), OPERAND),
                )),
            ),
            |(left, rest)| match rest {
                Some((op, right)) => ast::Node::inequality(op, left, right),
                None => left,
            },
        ),
        "comparison",
    )
}

fn parse_addition() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        map(
            tuple2(
                parse_multiplication(),
                many(tuple2(
                    parse_additive_operator(),
                    cut(parse_multiplication(), OPERAND),
                )),
            ),
            |(first, rest)| {
                rest.into_iter()
                    .fold(first, |left, (op, right)| ast::Node::binary(op, left, right))
            },
        ),
        "addition",
    )
}

// Multiplicative: *, /, %
fn parse_multiplication() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        map(
            tuple2(
                parse_unary(),
                many(tuple2(
                    parse_multiplicative_operator(),
                    cut(parse_unary(), OPERAND),
                )),
            ),
            |(first, rest)| {
                rest.into_iter()
                    .fold(first, |left, (op, right)| ast::Node::binary(op, left, right))
            },
        ),
        "multiplication",
    )
}

fn parse_unary() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        choice(vec![
            Box::new(parse_signed()),
            Box::new(parse_exponentiation()),
        ]),
        "unary",
    )
}

fn parse_signed() -> impl Parser<TokenSpan, ast::Node> {
    map(
        tuple2(parse_sign(), cut(lazy(parse_unary), OPERAND)),
        |((op, span), operand)| {
            let span = span.merge(&operand.span);
            ast::Node::unary(op, operand).with_span(span)
        },
    )
}

// The exponent re-enters `unary`, which makes `^` right-associative and lets
// the exponent carry its own sign.
fn parse_exponentiation() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        map(
            tuple2(
                parse_postfix(),
                optional(preceded(
                    as_unit(parse_power_operator()),
                    cut(lazy(parse_unary), OPERAND),
                )),
            ),
            |(base, exponent)| match exponent {
                Some(exponent) => ast::Node::binary(ast::BinaryOp::Power, base, exponent),
                None => base,
            },
        ),
        "exponentiation",
    )
}

fn parse_postfix() -> impl Parser<TokenSpan, ast::Node> {
    map(
        tuple2(parse_primary(), many(parse_factorial())),
        |(operand, bangs)| {
            bangs.into_iter().fold(operand, |acc, bang| {
                let span = acc.span.merge(&bang);
                ast::Node::unary(UnaryOp::Factorial, acc).with_span(span)
            })
        },
    )
}

fn parse_primary() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        choice(vec![
            Box::new(parse_number()),
            Box::new(parse_function_call()),
            Box::new(parse_variable()),
            Box::new(parse_paren_group()),
            Box::new(parse_bracket_group()),
        ]),
        "primary",
    )
}

fn parse_function_call() -> impl Parser<TokenSpan, ast::Node> {
    with_context(
        map(
            tuple2(
                parse_function_name(),
                preceded(
                    as_unit(cut(parse_open_paren(), FUNCTION_PAREN)),
                    tuple2(
                        separated_list(lazy(parse_expression), as_unit(parse_comma())),
                        cut(parse_close_paren(), CLOSE_PAREN),
                    ),
                ),
            ),
            |((name, start), (args, end))| {
                ast::Node::function(name, args).with_span(start.merge(&end))
            },
        ),
        "function call",
    )
}

fn parse_paren_group() -> impl Parser<TokenSpan, ast::Node> {
    map(
        tuple3(
            parse_open_paren(),
            cut(lazy(parse_expression), INNER_EXPRESSION),
            cut(parse_close_paren(), CLOSE_PAREN),
        ),
        |(start, inner, end)| inner.with_span(start.merge(&end)),
    )
}

fn parse_bracket_group() -> impl Parser<TokenSpan, ast::Node> {
    map(
        tuple3(
            parse_open_bracket(),
            cut(lazy(parse_expression), INNER_EXPRESSION),
            cut(parse_close_bracket(), CLOSE_BRACKET),
        ),
        |(start, inner, end)| inner.with_span(start.merge(&end)),
    )
}
