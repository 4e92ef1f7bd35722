use thiserror::Error;

pub trait Parser<I, O> {
    fn parse(&self, input: &[I], pos: usize) -> ParseResult<O>;
}

pub type ParseResult<O> = Result<(usize, O), ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("EOF")]
    EOF,
    #[error("Unexpected input at {position}")]
    Unexpected { position: usize },
    #[error("No alternative at {position}")]
    NoAlternative { position: usize },
    /// Committed error: alternatives are not tried once a `cut` fails.
    #[error("Expected {expected} at {position}")]
    Failure { expected: String, position: usize },
    #[error("WithContext: {message}, {inner}")]
    WithContext {
        message: String,
        inner: Box<ParseError>,
    },
}

impl ParseError {
    pub fn is_failure(&self) -> bool {
        self.failure().is_some()
    }

    /// The innermost committed failure, as `(expected, position)`.
    pub fn failure(&self) -> Option<(&str, usize)> {
        match self {
            ParseError::Failure { expected, position } => Some((expected.as_str(), *position)),
            ParseError::WithContext { inner, .. } => inner.failure(),
            _ => None,
        }
    }

    /// Context labels from outermost to innermost.
    pub fn contexts(&self) -> Vec<&str> {
        match self {
            ParseError::WithContext { message, inner } => {
                let mut out = vec![message.as_str()];
                out.extend(inner.contexts());
                out
            }
            _ => vec![],
        }
    }
}
