//! Builtin function names and named constants.
//!
//! Identifiers are resolved in order: builtin function, constant, variable.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BuiltinFunction {
    // Circular
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Acot,
    Asec,
    Acsc,
    // Hyperbolic
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    // Logarithms and exponentials
    Log,
    Ln,
    Log10,
    Log2,
    Exp,
    // Radicals
    Sqrt,
    Cbrt,
    // Rounding and sign
    Abs,
    Floor,
    Ceil,
    Round,
    Sign,
    // Special
    Gamma,
    Beta,
    Erf,
    Factorial,
}

impl BuiltinFunction {
    /// Circular and inverse circular functions.
    pub fn is_trigonometric(&self) -> bool {
        use BuiltinFunction::*;
        matches!(
            self,
            Sin | Cos | Tan | Cot | Sec | Csc | Asin | Acos | Atan | Acot | Asec | Acsc
        )
    }

    pub fn is_hyperbolic(&self) -> bool {
        use BuiltinFunction::*;
        matches!(self, Sinh | Cosh | Tanh | Asinh | Acosh | Atanh)
    }

    pub fn is_logarithmic(&self) -> bool {
        use BuiltinFunction::*;
        matches!(self, Log | Ln | Log10 | Log2)
    }

    pub fn is_radical(&self) -> bool {
        matches!(self, BuiltinFunction::Sqrt | BuiltinFunction::Cbrt)
    }

    /// Accepted argument counts as an inclusive range.
    pub fn arity(&self) -> (usize, usize) {
        match self {
            BuiltinFunction::Log => (1, 2),
            BuiltinFunction::Beta => (2, 2),
            _ => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, EnumString, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Constant {
    Pi,
    E,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
        }
    }
}
