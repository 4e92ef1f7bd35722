//! Numeric evaluation of AST nodes under variable bindings.

pub mod evaluator;
pub mod functions;

pub use evaluator::{EvalError, EvalResult, Evaluator};
