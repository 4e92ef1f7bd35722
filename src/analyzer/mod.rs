//! Token-level parser combinators and the expression grammar built from them.

pub mod builder;
pub mod combinators;
pub mod core;
pub mod parsers;
pub mod prelude;

pub use builder::{AstBuilder, SyntaxError};
pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;
