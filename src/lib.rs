pub mod analyzer;
pub mod ast;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rewrite;
pub mod solver;
pub mod tokenizer;
pub mod validator;

// Re-exports
pub use ast::{BinaryOp, InequalityOp, Node, NodeKind, UnaryOp};
pub use cache::{InMemoryCache, ResultCache};
pub use classifier::{Classification, EquationClassifier, EquationType};
pub use config::{EngineConfig, NumericConfig};
pub use engine::{Engine, ParseResult};
pub use error::*;
pub use solver::{
    BackendChain, BackendError, OperationKind, Solution, SolutionStep, SolveResult, SymbolicBackend,
};
pub use tokenizer::{Span, Token, TokenSpan, Tokenizer};
pub use validator::{ValidationError, ValidationResult, Validator};
