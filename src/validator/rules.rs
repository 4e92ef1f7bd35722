use std::collections::HashSet;

use super::{error::ValidationError, Issue, ValidationLimits};
use crate::tokenizer::{Delimiter, Operator, Token, TokenSpan};

pub const RESERVED_WORDS: [&str; 6] = ["undefined", "null", "true", "false", "NaN", "Infinity"];

const PRECISION_UPPER: f64 = 1e15;
const PRECISION_LOWER: f64 = 1e-15;

/// One independent check over the token stream.
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, tokens: &[TokenSpan], limits: &ValidationLimits) -> Vec<Issue>;
}

fn delimiter_of(token: &TokenSpan) -> Option<Delimiter> {
    match token.token {
        Token::Delimiter(d) => Some(d),
        _ => None,
    }
}

/// Stack-based balance check restricted to one opening/closing pair.
fn balance(tokens: &[TokenSpan], open: Delimiter, close: Delimiter) -> Vec<Issue> {
    let mut issues = Vec::new();
    let mut stack: Vec<&TokenSpan> = Vec::new();

    for token in tokens {
        match delimiter_of(token) {
            Some(d) if d == open => stack.push(token),
            Some(d) if d == close => {
                if stack.pop().is_none() {
                    issues.push(Issue::error(ValidationError::UnmatchedClosing {
                        delimiter: close.to_string(),
                        span: token.span,
                    }));
                }
            }
            _ => {}
        }
    }

    issues.extend(stack.into_iter().map(|token| {
        Issue::error(ValidationError::UnmatchedOpening {
            delimiter: open.to_string(),
            span: token.span,
        })
    }));
    issues
}

pub struct ParenthesesBalance;

impl ValidationRule for ParenthesesBalance {
    fn name(&self) -> &'static str {
        "parentheses balance"
    }

    fn check(&self, tokens: &[TokenSpan], _limits: &ValidationLimits) -> Vec<Issue> {
        balance(tokens, Delimiter::OpenParen, Delimiter::CloseParen)
    }
}

/// Bracket balance, plus crossed nesting such as `([)]` once both kinds balance
/// on their own.
pub struct BracketBalance;

impl ValidationRule for BracketBalance {
    fn name(&self) -> &'static str {
        "bracket balance"
    }

    fn check(&self, tokens: &[TokenSpan], _limits: &ValidationLimits) -> Vec<Issue> {
        let issues = balance(tokens, Delimiter::OpenBracket, Delimiter::CloseBracket);
        let parens_balanced = balance(tokens, Delimiter::OpenParen, Delimiter::CloseParen).is_empty();
        if !issues.is_empty() || !parens_balanced {
            return issues;
        }

        let mut stack: Vec<Delimiter> = Vec::new();
        for token in tokens {
            match delimiter_of(token) {
                Some(d) if d.is_opening() => stack.push(d),
                Some(d) if d.is_closing() => {
                    let expected = stack.pop().and_then(|open| open.closing());
                    if let Some(expected) = expected.filter(|e| *e != d) {
                        return vec![Issue::error(ValidationError::MismatchedDelimiter {
                            expected: expected.to_string(),
                            found: d.to_string(),
                            span: token.span,
                        })];
                    }
                }
                _ => {}
            }
        }
        issues
    }
}

pub struct OperatorSequence;

impl ValidationRule for OperatorSequence {
    fn name(&self) -> &'static str {
        "operator sequence"
    }

    fn check(&self, tokens: &[TokenSpan], _limits: &ValidationLimits) -> Vec<Issue> {
        let mut issues = Vec::new();
        let body: Vec<&TokenSpan> = tokens.iter().filter(|t| t.token != Token::Eof).collect();
        let mut previous: Option<&TokenSpan> = None;

        for token in body.iter().copied() {
            if token.token.is_binary_operator() {
                let after_operand = previous.is_some_and(|p| {
                    !p.token.is_binary_operator()
                        && !matches!(
                            p.token,
                            Token::Delimiter(
                                Delimiter::OpenParen | Delimiter::OpenBracket | Delimiter::Comma
                            ) | Token::Function(_)
                        )
                });
                if !after_operand && !token.token.is_sign() {
                    let error = match previous {
                        Some(p) if p.token.is_binary_operator() => {
                            ValidationError::ConsecutiveOperators {
                                first: p.text.clone(),
                                second: token.text.clone(),
                                span: token.span,
                            }
                        }
                        _ => ValidationError::LeadingOperator {
                            operator: token.text.clone(),
                            span: token.span,
                        },
                    };
                    issues.push(Issue::error(error));
                }
            } else if token.token == Token::Operator(Operator::Factorial)
                && !previous.is_some_and(|p| p.token.ends_operand())
            {
                issues.push(Issue::error(ValidationError::MisplacedFactorial {
                    span: token.span,
                }));
            }
            previous = Some(token);
        }

        if let Some(last) = body.last() {
            if last.token.is_binary_operator() {
                issues.push(Issue::error(ValidationError::TrailingOperator {
                    operator: last.text.clone(),
                    span: last.span,
                }));
            }
        }
        issues
    }
}

pub struct FunctionCall;

impl ValidationRule for FunctionCall {
    fn name(&self) -> &'static str {
        "function call"
    }

    fn check(&self, tokens: &[TokenSpan], _limits: &ValidationLimits) -> Vec<Issue> {
        tokens
            .windows(2)
            .filter_map(|pair| {
                let (current, next) = (&pair[0], &pair[1]);
                let followed_by_paren = next.token == Token::Delimiter(Delimiter::OpenParen);
                match &current.token {
                    Token::Function(_) if !followed_by_paren => {
                        Some(Issue::error(ValidationError::MissingFunctionParen {
                            name: current.text.clone(),
                            span: current.span,
                        }))
                    }
                    Token::Variable(name) if followed_by_paren => {
                        Some(Issue::warning(ValidationError::UnknownFunction {
                            name: name.clone(),
                            span: current.span,
                        }))
                    }
                    _ => None,
                }
            })
            .collect()
    }
}

pub struct NumericRange;

impl ValidationRule for NumericRange {
    fn name(&self) -> &'static str {
        "numeric range"
    }

    fn check(&self, tokens: &[TokenSpan], _limits: &ValidationLimits) -> Vec<Issue> {
        tokens
            .iter()
            .filter_map(|token| match token.token {
                Token::Number(value) if !value.is_finite() => {
                    Some(Issue::error(ValidationError::NonFiniteNumber {
                        text: token.text.clone(),
                        span: token.span,
                    }))
                }
                Token::Number(value)
                    if value.abs() > PRECISION_UPPER
                        || (value != 0.0 && value.abs() < PRECISION_LOWER) =>
                {
                    Some(Issue::warning(ValidationError::PrecisionLoss {
                        text: token.text.clone(),
                        span: token.span,
                    }))
                }
                _ => None,
            })
            .collect()
    }
}

pub struct VariableNames;

impl ValidationRule for VariableNames {
    fn name(&self) -> &'static str {
        "variable names"
    }

    fn check(&self, tokens: &[TokenSpan], limits: &ValidationLimits) -> Vec<Issue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for token in tokens {
            let Token::Variable(name) = &token.token else {
                continue;
            };
            if !seen.insert(name.as_str()) {
                continue;
            }
            if name.chars().count() > limits.max_variable_name_length {
                issues.push(limits.limit(ValidationError::VariableNameTooLong {
                    name: name.clone(),
                    max: limits.max_variable_name_length,
                    span: token.span,
                }));
            }
            if RESERVED_WORDS.contains(&name.as_str()) {
                issues.push(Issue::warning(ValidationError::ReservedWord {
                    name: name.clone(),
                    span: token.span,
                }));
            }
        }

        if seen.len() > limits.max_variables {
            issues.push(limits.limit(ValidationError::TooManyVariables {
                count: seen.len(),
                max: limits.max_variables,
            }));
        }
        issues
    }
}

pub struct Complexity;

impl ValidationRule for Complexity {
    fn name(&self) -> &'static str {
        "complexity"
    }

    fn check(&self, tokens: &[TokenSpan], limits: &ValidationLimits) -> Vec<Issue> {
        let mut issues = Vec::new();
        let count = tokens.iter().filter(|t| t.token != Token::Eof).count();
        if count > limits.max_tokens {
            issues.push(limits.limit(ValidationError::TooManyTokens {
                count,
                max: limits.max_tokens,
            }));
        }

        let length = tokens.last().map(|t| t.span.end).unwrap_or(0);
        if length > limits.max_expression_length {
            issues.push(limits.limit(ValidationError::ExpressionTooLong {
                length,
                max: limits.max_expression_length,
            }));
        }
        issues
    }
}

pub fn default_rules() -> Vec<Box<dyn ValidationRule>> {
    vec![
        Box::new(ParenthesesBalance),
        Box::new(BracketBalance),
        Box::new(OperatorSequence),
        Box::new(FunctionCall),
        Box::new(NumericRange),
        Box::new(VariableNames),
        Box::new(Complexity),
    ]
}
