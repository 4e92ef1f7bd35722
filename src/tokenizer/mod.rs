//! # Tokenizer
//!
//! Converts expression source text into a flat stream of [`TokenSpan`]s.
//!
//! Built from `nom` parsers, one module per token family:
//!
//! * [`number`]: decimal and scientific-notation literals
//! * [`symbol`]: operators, comparisons and delimiters
//! * [`identifier`]: builtin functions and named constants
//! * [`whitespace`]: skipped input that still advances line and column
//!
//! [`token::Tokenizer`] drives them and records the span of every token.

pub mod identifier;
pub mod number;
pub mod symbol;
pub mod token;
pub mod whitespace;

pub use identifier::{BuiltinFunction, Constant};
pub use symbol::{Comparison, Delimiter, Operator};
pub use token::{Span, Token, TokenKind, TokenSpan, Tokenizer, TokenizerError, TokenizerResult};
