//! The builtin function table.

use std::f64::consts::{FRAC_PI_2, PI};

use super::evaluator::{EvalError, EvalResult};
use crate::tokenizer::BuiltinFunction;

// Lanczos approximation, g = 7
const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Applies `function` to already evaluated arguments.
pub fn apply(function: BuiltinFunction, args: &[f64]) -> EvalResult<f64> {
    let (min, max) = function.arity();
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{} to {}", min, max)
        };
        return Err(EvalError::Arity {
            function: function.to_string(),
            expected,
            found: args.len(),
        });
    }

    let x = args[0];
    let result = match function {
        BuiltinFunction::Sin => x.sin(),
        BuiltinFunction::Cos => x.cos(),
        BuiltinFunction::Tan => x.tan(),
        BuiltinFunction::Cot => 1.0 / x.tan(),
        BuiltinFunction::Sec => 1.0 / x.cos(),
        BuiltinFunction::Csc => 1.0 / x.sin(),
        BuiltinFunction::Asin => x.asin(),
        BuiltinFunction::Acos => x.acos(),
        BuiltinFunction::Atan => x.atan(),
        BuiltinFunction::Acot => {
            if x == 0.0 {
                FRAC_PI_2
            } else {
                (1.0 / x).atan()
            }
        }
        BuiltinFunction::Asec => (1.0 / x).acos(),
        BuiltinFunction::Acsc => (1.0 / x).asin(),
        BuiltinFunction::Sinh => x.sinh(),
        BuiltinFunction::Cosh => x.cosh(),
        BuiltinFunction::Tanh => x.tanh(),
        BuiltinFunction::Asinh => x.asinh(),
        BuiltinFunction::Acosh => x.acosh(),
        BuiltinFunction::Atanh => x.atanh(),
        BuiltinFunction::Log => match args.get(1) {
            Some(base) if *base <= 0.0 || *base == 1.0 => {
                return Err(domain(function, *base));
            }
            Some(base) => x.ln() / base.ln(),
            None => x.ln(),
        },
        BuiltinFunction::Ln => x.ln(),
        BuiltinFunction::Log10 => x.log10(),
        BuiltinFunction::Log2 => x.log2(),
        BuiltinFunction::Exp => x.exp(),
        BuiltinFunction::Sqrt => x.sqrt(),
        BuiltinFunction::Cbrt => x.cbrt(),
        BuiltinFunction::Abs => x.abs(),
        BuiltinFunction::Floor => x.floor(),
        BuiltinFunction::Ceil => x.ceil(),
        BuiltinFunction::Round => x.round(),
        BuiltinFunction::Sign => {
            if x == 0.0 {
                0.0
            } else {
                x.signum()
            }
        }
        BuiltinFunction::Gamma => gamma(x),
        BuiltinFunction::Beta => gamma(x) * gamma(args[1]) / gamma(x + args[1]),
        BuiltinFunction::Erf => erf(x),
        BuiltinFunction::Factorial => return factorial(x),
    };

    if result.is_finite() {
        Ok(result)
    } else {
        Err(domain(function, x))
    }
}

fn domain(function: BuiltinFunction, value: f64) -> EvalError {
    EvalError::Domain {
        function: function.to_string(),
        value,
    }
}

/// `n!` for non-negative integers, `Γ(n + 1)` for other non-negative reals.
pub fn factorial(n: f64) -> EvalResult<f64> {
    if n < 0.0 || n.is_nan() {
        return Err(domain(BuiltinFunction::Factorial, n));
    }
    let result = if n.fract() == 0.0 && n <= 170.0 {
        (1..=n as u64).fold(1.0, |acc, k| acc * k as f64)
    } else {
        gamma(n + 1.0)
    };
    if result.is_finite() {
        Ok(result)
    } else {
        Err(domain(BuiltinFunction::Factorial, n))
    }
}

pub fn gamma(x: f64) -> f64 {
    if x <= 0.0 && x.fract() == 0.0 {
        return f64::NAN;
    }
    if x < 0.5 {
        // reflection formula
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS_COEFFICIENTS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS_COEFFICIENTS[0], |acc, (i, c)| acc + c / (x + i as f64));
    (2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * series
}

// Abramowitz and Stegun 7.1.26, absolute error below 1.5e-7
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * x);
    let y = 1.0
        - (((((1.061_405_429 * t - 1.453_152_027) * t) + 1.421_413_741) * t - 0.284_496_736) * t
            + 0.254_829_592)
            * t
            * (-x * x).exp();
    sign * y
}
