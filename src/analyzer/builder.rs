use thiserror::Error;

use super::core::Parser;
use super::parsers::expression::{parse_expression, FUNCTION_PAREN};
use crate::ast::Node;
use crate::tokenizer::{Span, Token, TokenSpan};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Empty expression at {span}")]
    EmptyExpression { span: Span },
    #[error("Function '{name}' must be followed by '(' at {span}")]
    MissingFunctionParen { name: String, span: Span },
    #[error("Expected {expected}, found '{found}' at {span}")]
    Expected {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Unexpected token '{found}' at {span}")]
    UnexpectedToken { found: String, span: Span },
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::EmptyExpression { span }
            | SyntaxError::MissingFunctionParen { span, .. }
            | SyntaxError::Expected { span, .. }
            | SyntaxError::UnexpectedToken { span, .. } => *span,
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            SyntaxError::EmptyExpression { .. } => "Enter an expression such as 2*x + 3 = 7".into(),
            SyntaxError::MissingFunctionParen { name, .. } => {
                format!("Wrap the argument in parentheses: {}(...)", name)
            }
            SyntaxError::Expected { expected, found, .. } => {
                format!("Insert {} before '{}'", expected, found)
            }
            SyntaxError::UnexpectedToken { found, .. } => {
                format!("Remove '{}' or join it to the expression with an operator", found)
            }
        }
    }
}

/// Builds an AST from a token stream produced by [`crate::tokenizer::Tokenizer`].
#[derive(Debug, Clone, Default)]
pub struct AstBuilder;

impl AstBuilder {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(level = "debug", skip(self, tokens))]
    pub fn build(&self, tokens: &[TokenSpan]) -> Result<Node, SyntaxError> {
        let end_span = tokens.last().map(|t| t.span).unwrap_or_default();
        let input = match tokens.split_last() {
            Some((last, rest)) if last.token == Token::Eof => rest,
            _ => tokens,
        };

        if input.is_empty() {
            return Err(SyntaxError::EmptyExpression { span: end_span });
        }

        let describe = |position: usize| -> (String, Span) {
            match input.get(position) {
                Some(t) => (t.text.clone(), t.span),
                None => ("end of input".to_string(), end_span),
            }
        };

        match parse_expression().parse(input, 0) {
            Ok((pos, node)) if pos == input.len() => {
                tracing::debug!(complexity = node.complexity(), "built ast");
                Ok(node)
            }
            Ok((pos, _)) => {
                let (found, span) = describe(pos);
                Err(SyntaxError::UnexpectedToken { found, span })
            }
            Err(e) => {
                tracing::debug!("parse failed: {}", e);
                let error = match e.failure() {
                    Some((expected, position)) if expected == FUNCTION_PAREN => {
                        let (name, span) = describe(position.saturating_sub(1));
                        SyntaxError::MissingFunctionParen { name, span }
                    }
                    Some((expected, position)) => {
                        let (found, span) = describe(position);
                        SyntaxError::Expected {
                            expected: expected.to_string(),
                            found,
                            span,
                        }
                    }
                    None => {
                        let (found, span) = describe(0);
                        SyntaxError::Expected {
                            expected: "expression".to_string(),
                            found,
                            span,
                        }
                    }
                };
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn build(source: &str) -> Result<Node, SyntaxError> {
        let tokens = Tokenizer::new().tokenize(source).unwrap();
        AstBuilder::new().build(&tokens)
    }

    #[test]
    fn test_empty_expression() {
        assert!(matches!(
            build("   "),
            Err(SyntaxError::EmptyExpression { .. })
        ));
    }

    #[test]
    fn test_missing_function_paren() {
        match build("sin 30") {
            Err(SyntaxError::MissingFunctionParen { name, span }) => {
                assert_eq!(name, "sin");
                assert_eq!(span.start, 0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_closing_paren() {
        match build("((x+1)") {
            Err(SyntaxError::Expected {
                expected, found, ..
            }) => {
                assert_eq!(expected, "')'");
                assert_eq!(found, "end of input");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_trailing_token() {
        match build("x + 1 )") {
            Err(SyntaxError::UnexpectedToken { found, span }) => {
                assert_eq!(found, ")");
                assert_eq!(span.start, 6);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_leading_operator() {
        match build("* 3") {
            Err(error @ SyntaxError::Expected { .. }) => {
                assert_eq!(error.span().start, 0);
                assert!(error.suggestion().contains("expression"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_signed_operand_after_operator() {
        assert_eq!(build("x + -3").unwrap().to_string(), "x + -3");
    }
}
