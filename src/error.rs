use thiserror::Error;

use crate::analyzer::SyntaxError;
use crate::eval::EvalError;
use crate::solver::{ComputationError, SolverError};
use crate::tokenizer::{Span, TokenizerError};
use crate::validator::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Lex error: {0}")]
    Lex(#[from] TokenizerError),
    #[error("Syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("Validation failed with {count} error(s): {first}", count = .errors.len(), first = first_message(.errors))]
    Validation {
        errors: Vec<ValidationError>,
        suggestions: Vec<String>,
    },
    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
    #[error("Eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

fn first_message(errors: &[ValidationError]) -> String {
    errors.first().map(|e| e.to_string()).unwrap_or_default()
}

impl From<ComputationError> for Error {
    fn from(error: ComputationError) -> Self {
        Error::Solver(SolverError::Computation(error))
    }
}

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }

    /// Remediation hints for the user, most specific first.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Lex(e) => vec![e.suggestion()],
            Error::Syntax(e) => vec![e.suggestion()],
            Error::Validation { suggestions, .. } => suggestions.clone(),
            Error::Solver(e) => vec![e.suggestion()],
            Error::Eval(_) => vec!["Bind every free variable before evaluating".to_string()],
            Error::Config(_) => vec!["Check the configuration file against the documented fields".to_string()],
            Error::Internal(_) => Vec::new(),
        }
    }

    /// Source location of the failure, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex(e) => Some(e.span()),
            Error::Syntax(e) => Some(e.span()),
            Error::Validation { errors, .. } => errors.iter().find_map(|e| e.span()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computation_error_is_wrapped_as_solver_error() {
        let error: Error = ComputationError::Unsupported("inequalities".into()).into();
        assert!(matches!(
            error,
            Error::Solver(SolverError::Computation(ComputationError::Unsupported(_)))
        ));
        assert_eq!(error.suggestions().len(), 1);
        assert!(error.span().is_none());
    }

    #[test]
    fn test_validation_error_display() {
        let span = Span {
            start: 0,
            end: 1,
            line: 1,
            column: 1,
        };
        let error = Error::Validation {
            errors: vec![ValidationError::UnmatchedOpening {
                delimiter: "(".into(),
                span,
            }],
            suggestions: vec!["Add the missing ')'".into()],
        };
        assert!(error.to_string().starts_with("Validation failed with 1 error(s)"));
        assert_eq!(error.span(), Some(span));
        assert_eq!(error.suggestions(), vec!["Add the missing ')'".to_string()]);
    }
}
