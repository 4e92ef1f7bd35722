use thiserror::Error;

use crate::eval::EvalError;

pub type SolverResult<T> = Result<T, SolverError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Polynomial of degree {found} exceeds the supported degree {supported}")]
    DegreeMismatch { found: u32, supported: u32 },
    #[error("Equation is not polynomial in {variable}: {reason}")]
    NonPolynomial { variable: String, reason: String },
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// Failures while computing a solution, after the equation was accepted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvalError),
    #[error("No real solution for {variable} found in [{min}, {max}]")]
    NoSolutionFound { variable: String, min: f64, max: f64 },
    #[error("Backend {backend} failed: {message}")]
    Backend { backend: String, message: String },
    #[error("Unsupported equation: {0}")]
    Unsupported(String),
    #[error("Numeric overflow in {0}")]
    Overflow(String),
    #[error("{variable} = {value} does not satisfy the equation")]
    VerificationFailed { variable: String, value: String },
}

impl SolverError {
    pub fn non_polynomial(variable: &str, reason: impl Into<String>) -> Self {
        SolverError::NonPolynomial {
            variable: variable.to_string(),
            reason: reason.into(),
        }
    }

    pub fn suggestion(&self) -> String {
        match self {
            SolverError::DegreeMismatch { supported, .. } => format!(
                "Rewrite the equation with degree at most {} or let the general solver handle it",
                supported
            ),
            SolverError::NonPolynomial { variable, .. } => format!(
                "Move {} out of functions, divisors and exponents, or use the general solver",
                variable
            ),
            SolverError::Computation(ComputationError::Evaluation(_)) => {
                "Bind every variable other than the one being solved for".to_string()
            }
            SolverError::Computation(ComputationError::NoSolutionFound { .. }) => {
                "Widen numeric.search_min/numeric.search_max or check that a real solution exists"
                    .to_string()
            }
            SolverError::Computation(ComputationError::Backend { .. }) => {
                "Retry without the symbolic backend to use the numeric solver".to_string()
            }
            SolverError::Computation(ComputationError::Unsupported(_)) => {
                "Rewrite the input as a single equation in one unknown".to_string()
            }
            SolverError::Computation(ComputationError::Overflow(_)) => {
                "Scale the coefficients down".to_string()
            }
            SolverError::Computation(ComputationError::VerificationFailed { .. }) => {
                "Rescale the coefficients or let the numeric solver refine the root".to_string()
            }
        }
    }
}

/// Error reported by an external symbolic backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    #[error("operation {0} is not supported")]
    Unsupported(String),
    #[error("backend failure: {0}")]
    Failed(String),
    #[error("backend returned an unreadable result: {0}")]
    InvalidResult(String),
}
