use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tokenizer::Span;

#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ValidationError {
    #[error("Unmatched opening '{delimiter}' at {span}")]
    UnmatchedOpening { delimiter: String, span: Span },
    #[error("Unmatched closing '{delimiter}' at {span}")]
    UnmatchedClosing { delimiter: String, span: Span },
    #[error("Expected '{expected}' but found '{found}' at {span}")]
    MismatchedDelimiter {
        expected: String,
        found: String,
        span: Span,
    },
    #[error("Consecutive operators '{first}' and '{second}' at {span}")]
    ConsecutiveOperators {
        first: String,
        second: String,
        span: Span,
    },
    #[error("Expression cannot start with operator '{operator}' at {span}")]
    LeadingOperator { operator: String, span: Span },
    #[error("Expression cannot end with operator '{operator}' at {span}")]
    TrailingOperator { operator: String, span: Span },
    #[error("Factorial '!' must follow an operand at {span}")]
    MisplacedFactorial { span: Span },
    #[error("Function '{name}' must be followed by '(' at {span}")]
    MissingFunctionParen { name: String, span: Span },
    #[error("Unknown function '{name}' at {span}")]
    UnknownFunction { name: String, span: Span },
    #[error("Number '{text}' is not finite at {span}")]
    NonFiniteNumber { text: String, span: Span },
    #[error("Number '{text}' may lose precision at {span}")]
    PrecisionLoss { text: String, span: Span },
    #[error("Variable name '{name}' is longer than {max} characters at {span}")]
    VariableNameTooLong { name: String, max: usize, span: Span },
    #[error("Variable name '{name}' is a reserved word at {span}")]
    ReservedWord { name: String, span: Span },
    #[error("Expression uses {count} distinct variables, more than {max}")]
    TooManyVariables { count: usize, max: usize },
    #[error("Expression has {count} tokens, more than {max}")]
    TooManyTokens { count: usize, max: usize },
    #[error("Expression is {length} characters long, more than {max}")]
    ExpressionTooLong { length: usize, max: usize },
}

impl ValidationError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ValidationError::UnmatchedOpening { span, .. }
            | ValidationError::UnmatchedClosing { span, .. }
            | ValidationError::MismatchedDelimiter { span, .. }
            | ValidationError::ConsecutiveOperators { span, .. }
            | ValidationError::LeadingOperator { span, .. }
            | ValidationError::TrailingOperator { span, .. }
            | ValidationError::MisplacedFactorial { span }
            | ValidationError::MissingFunctionParen { span, .. }
            | ValidationError::UnknownFunction { span, .. }
            | ValidationError::NonFiniteNumber { span, .. }
            | ValidationError::PrecisionLoss { span, .. }
            | ValidationError::VariableNameTooLong { span, .. }
            | ValidationError::ReservedWord { span, .. } => Some(*span),
            ValidationError::TooManyVariables { .. }
            | ValidationError::TooManyTokens { .. }
            | ValidationError::ExpressionTooLong { .. } => None,
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            ValidationError::UnmatchedOpening { delimiter, .. } => {
                let closing = if delimiter == "[" { "]" } else { ")" };
                format!("Add a closing '{}'", closing)
            }
            ValidationError::UnmatchedClosing { delimiter, .. } => {
                format!("Remove the extra '{}'", delimiter)
            }
            ValidationError::MismatchedDelimiter { expected, .. } => {
                format!("Close the inner group with '{}' first", expected)
            }
            ValidationError::ConsecutiveOperators { second, .. } => {
                format!("Insert an operand before '{}' or remove one operator", second)
            }
            ValidationError::LeadingOperator { operator, .. } => {
                format!("Insert an operand before '{}'", operator)
            }
            ValidationError::TrailingOperator { operator, .. } => {
                format!("Complete the expression after '{}'", operator)
            }
            ValidationError::MisplacedFactorial { .. } => {
                "Place '!' directly after a number, variable or closing parenthesis".to_string()
            }
            ValidationError::MissingFunctionParen { name, .. } => {
                format!("Wrap the argument in parentheses: {}(...)", name)
            }
            ValidationError::UnknownFunction { name, .. } => {
                format!("Use a builtin function or insert '*' for multiplication: {}*(...)", name)
            }
            ValidationError::NonFiniteNumber { .. } => {
                "Use a number within the floating point range".to_string()
            }
            ValidationError::PrecisionLoss { .. } => {
                "Rescale the equation to keep numbers between 1e-15 and 1e15".to_string()
            }
            ValidationError::VariableNameTooLong { max, .. } => {
                format!("Shorten the variable name to at most {} characters", max)
            }
            ValidationError::ReservedWord { name, .. } => {
                format!("Rename the variable '{}'", name)
            }
            ValidationError::TooManyVariables { max, .. } => {
                format!("Use at most {} distinct variables", max)
            }
            ValidationError::TooManyTokens { .. } | ValidationError::ExpressionTooLong { .. } => {
                "Split the expression into smaller parts".to_string()
            }
        }
    }
}
