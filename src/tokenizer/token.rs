use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1},
    combinator::recognize,
    error::{context, VerboseError, VerboseErrorKind},
    sequence::pair,
    IResult,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::{
    identifier::{BuiltinFunction, Constant},
    number::{parse_number, MALFORMED_EXPONENT},
    symbol::{parse_delimiter, parse_operator, Comparison, Delimiter, Operator},
    whitespace::parse_whitespace,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals (constants `pi` and `e` included)
    Number(f64),
    // Identifiers
    Variable(String),
    Function(BuiltinFunction),
    // Symbols
    Operator(Operator),
    Comparison(Comparison),
    Delimiter(Delimiter),
    Equals,
    Eof,
}

/// Coarse token classification used by the validator and in diagnostics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum TokenKind {
    Number,
    Variable,
    Function,
    Operator,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Equals,
    Comparison,
    #[strum(serialize = "EOF")]
    Eof,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Number(_) => TokenKind::Number,
            Token::Variable(_) => TokenKind::Variable,
            Token::Function(_) => TokenKind::Function,
            Token::Operator(_) => TokenKind::Operator,
            Token::Comparison(_) => TokenKind::Comparison,
            Token::Delimiter(Delimiter::OpenParen) => TokenKind::LeftParen,
            Token::Delimiter(Delimiter::CloseParen) => TokenKind::RightParen,
            Token::Delimiter(Delimiter::OpenBracket) => TokenKind::LeftBracket,
            Token::Delimiter(Delimiter::CloseBracket) => TokenKind::RightBracket,
            Token::Delimiter(Delimiter::Comma) => TokenKind::Comma,
            Token::Equals => TokenKind::Equals,
            Token::Eof => TokenKind::Eof,
        }
    }

    /// True for tokens that take a left and a right operand.
    pub fn is_binary_operator(&self) -> bool {
        match self {
            Token::Operator(op) => op.is_binary(),
            Token::Comparison(_) | Token::Equals => true,
            _ => false,
        }
    }

    /// True for `+` and `-`, which may also act as prefix signs.
    pub fn is_sign(&self) -> bool {
        matches!(self, Token::Operator(Operator::Plus | Operator::Minus))
    }

    /// True for tokens after which an operand is complete.
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            Token::Number(_)
                | Token::Variable(_)
                | Token::Delimiter(Delimiter::CloseParen | Delimiter::CloseBracket)
                | Token::Operator(Operator::Factorial)
        )
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(value) => write!(f, "{}", value),
            Token::Variable(name) => write!(f, "{}", name),
            Token::Function(function) => write!(f, "{}", function),
            Token::Operator(op) => write!(f, "{}", op),
            Token::Comparison(cmp) => write!(f, "{}", cmp),
            Token::Delimiter(delimiter) => write!(f, "{}", delimiter),
            Token::Equals => write!(f, "="),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    current_position: usize,
    current_line: usize,
    current_column: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            current_position: 0,
            current_line: 1,   // 1-based
            current_column: 1, // 1-based
        }
    }

    /// Scans `input` into tokens. The returned list always ends with [`Token::Eof`].
    #[tracing::instrument(level = "debug", skip(input))]
    pub fn tokenize(&mut self, input: &str) -> TokenizerResult<Vec<TokenSpan>> {
        let mut tokens = Vec::new();
        let mut remaining = input;

        while !remaining.is_empty() {
            if let Ok((new_remaining, consumed)) = parse_whitespace(remaining) {
                self.update_position(consumed);
                remaining = new_remaining;
                continue;
            }

            let start_position = self.current_position;
            let start_line = self.current_line;
            let start_column = self.current_column;

            let result = alt((parse_number, parse_operator, parse_delimiter, parse_identifier))(
                remaining,
            );

            match result {
                Ok((new_remaining, token)) => {
                    let consumed = &remaining[..(remaining.len() - new_remaining.len())];
                    self.update_position(consumed);

                    tokens.push(TokenSpan {
                        token,
                        text: consumed.to_string(),
                        span: Span {
                            start: start_position,
                            end: self.current_position,
                            line: start_line,
                            column: start_column,
                        },
                    });

                    remaining = new_remaining;
                }
                Err(e) => {
                    let error = self.to_error(remaining, e);
                    tracing::error!("{}", error);
                    return Err(error);
                }
            }
        }

        tokens.push(TokenSpan {
            token: Token::Eof,
            text: String::new(),
            span: Span {
                start: self.current_position,
                end: self.current_position,
                line: self.current_line,
                column: self.current_column,
            },
        });

        tracing::debug!(count = tokens.len(), "tokenized expression");
        Ok(tokens)
    }

    fn to_error(&self, remaining: &str, e: nom::Err<VerboseError<&str>>) -> TokenizerError {
        let found = remaining.chars().take(20).collect::<String>();
        let width = remaining.chars().next().map(char::len_utf8).unwrap_or(1);
        let span = Span {
            start: self.current_position,
            end: self.current_position + width,
            line: self.current_line,
            column: self.current_column,
        };
        match e {
            nom::Err::Failure(inner)
                if inner.errors.iter().any(|(_, kind)| {
                    matches!(kind, VerboseErrorKind::Context(c) if *c == MALFORMED_EXPONENT)
                }) =>
            {
                let text = remaining
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'))
                    .collect::<String>();
                TokenizerError::MalformedNumber {
                    found: text,
                    span: Span {
                        end: self.current_position + 1,
                        ..span
                    },
                }
            }
            _ => TokenizerError::UnexpectedCharacter {
                character: remaining.chars().next().unwrap_or_default(),
                found,
                span,
            },
        }
    }

    fn update_position(&mut self, text: &str) {
        for c in text.chars() {
            self.current_position += c.len_utf8();
            if c == '\n' {
                self.current_line += 1;
                self.current_column = 1;
            } else {
                self.current_column += 1;
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenSpan {
    pub token: Token,
    pub text: String,
    pub span: Span,
}

impl TokenSpan {
    pub fn kind(&self) -> TokenKind {
        self.token.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Smallest span covering both `self` and `other`; line and column follow the earlier one.
    pub fn merge(&self, other: &Span) -> Span {
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (other, self)
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line: {}, column: {}, start: {}, end: {}",
            self.line, self.column, self.start, self.end
        )
    }
}

#[tracing::instrument(level = "debug", skip(input))]
fn parse_identifier(input: &str) -> ParserResult<Token> {
    let (input, id) = context(
        "identifier",
        recognize(pair(
            take_while1(|c: char| c.is_alphabetic() || c == '_'),
            take_while(|c: char| c.is_alphanumeric() || c == '_'),
        )),
    )(input)?;

    if let Ok(function) = BuiltinFunction::from_str(id) {
        return Ok((input, Token::Function(function)));
    }
    if let Ok(constant) = Constant::from_str(id) {
        return Ok((input, Token::Number(constant.value())));
    }

    Ok((input, Token::Variable(id.to_string())))
}

pub type ParserResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

pub type TokenizerResult<T> = Result<T, TokenizerError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenizerError {
    #[error("Malformed number '{found}': exponent digits expected at {span}")]
    MalformedNumber { found: String, span: Span },
    #[error("Unexpected character '{character}' at {span}")]
    UnexpectedCharacter {
        character: char,
        found: String,
        span: Span,
    },
}

impl TokenizerError {
    pub fn span(&self) -> Span {
        match self {
            TokenizerError::MalformedNumber { span, .. } => *span,
            TokenizerError::UnexpectedCharacter { span, .. } => *span,
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            TokenizerError::MalformedNumber { found, .. } => format!(
                "Complete the exponent of '{}' with digits, e.g. 1e-3, or insert '*' before the constant e",
                found
            ),
            TokenizerError::UnexpectedCharacter { character, .. } => format!(
                "Remove '{}' or replace it with a supported operator (+ - * / % ^ ! = < > <= >= !=)",
                character
            ),
        }
    }
}
