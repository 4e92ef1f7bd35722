use num_rational::Rational64;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use super::step::SolutionStep;
use crate::classifier::EquationType;

/// Largest magnitude at which every integer is representable in an `f64`.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub variable: String,
    pub value: String,
    pub is_exact: bool,
    pub approximation: Option<f64>,
    pub conditions: Vec<String>,
    pub multiplicity: Option<u32>,
}

impl Solution {
    /// An exact rational solution, printed as a reduced fraction.
    pub fn rational(variable: &str, value: Rational64) -> Self {
        let approximation = (!value.is_integer()).then(|| rational_to_f64(&value));
        Self {
            variable: variable.to_string(),
            value: format_fraction(&value),
            is_exact: true,
            approximation,
            conditions: Vec::new(),
            multiplicity: None,
        }
    }

    pub fn approximate(variable: &str, value: f64, precision: usize) -> Self {
        Self {
            variable: variable.to_string(),
            value: format_value(value, precision),
            is_exact: false,
            approximation: Some(value),
            conditions: Vec::new(),
            multiplicity: None,
        }
    }

    /// A solution given symbolically, e.g. by a backend.
    pub fn symbolic(variable: &str, value: impl Into<String>, approximation: Option<f64>) -> Self {
        Self {
            variable: variable.to_string(),
            value: value.into(),
            is_exact: true,
            approximation,
            conditions: Vec::new(),
            multiplicity: None,
        }
    }

    pub fn with_multiplicity(mut self, multiplicity: u32) -> Self {
        self.multiplicity = Some(multiplicity);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Numeric value of the solution, if it has one.
    pub fn numeric_value(&self) -> Option<f64> {
        self.approximation
            .or_else(|| self.value.parse::<f64>().ok())
            .or_else(|| parse_fraction(&self.value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    pub solutions: Vec<Solution>,
    pub steps: Vec<SolutionStep>,
    pub equation_type: EquationType,
    pub variables: Vec<String>,
    pub domain_restrictions: Vec<String>,
}

impl SolveResult {
    pub fn values(&self) -> Vec<&str> {
        self.solutions.iter().map(|s| s.value.as_str()).collect()
    }
}

/// `Some(n)` when `value` is an integer that survives the round trip through `i64`.
pub fn exact_integer(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER)
        .then(|| value as i64)
}

pub fn rational_to_f64(value: &Rational64) -> f64 {
    *value.numer() as f64 / *value.denom() as f64
}

/// `3`, `-3/2`; the sign always sits on the numerator.
pub fn format_fraction(value: &Rational64) -> String {
    if value.is_zero() {
        "0".to_string()
    } else if value.is_integer() {
        value.numer().to_string()
    } else {
        let sign = if value.is_negative() { "-" } else { "" };
        format!("{}{}/{}", sign, value.numer().abs(), value.denom())
    }
}

fn parse_fraction(text: &str) -> Option<f64> {
    let (numer, denom) = text.split_once('/')?;
    let numer: f64 = numer.trim().parse().ok()?;
    let denom: f64 = denom.trim().parse().ok()?;
    (denom != 0.0).then(|| numer / denom)
}

/// Formats `value` with `precision` significant digits, trimming trailing zeros.
pub fn format_value(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i64;
    let decimals = (precision.max(1) as i64 - 1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.0000000000004, 10), "2");
        assert_eq!(format_value(-0.5, 10), "-0.5");
        assert_eq!(format_value(1.0 / 3.0, 4), "0.3333");
        assert_eq!(format_value(123456.789, 4), "123457");
        assert_eq!(format_value(-1e-13, 10), "-0.0000000000001");
        assert_eq!(format_value(-0.0000000000001, 1), "-0.0000000000001");
        assert_eq!(format_value(-0.0, 10), "0");
    }

    #[test]
    fn test_format_fraction() {
        assert_eq!(format_fraction(&Rational64::new(6, 2)), "3");
        assert_eq!(format_fraction(&Rational64::new(3, -2)), "-3/2");
        assert_eq!(format_fraction(&Rational64::new(0, 5)), "0");
    }

    #[test]
    fn test_rational_solution() {
        let whole = Solution::rational("x", Rational64::new(6, 2));
        assert_eq!(whole.value, "3");
        assert!(whole.is_exact);
        assert_eq!(whole.approximation, None);
        assert_eq!(whole.numeric_value(), Some(3.0));

        let half = Solution::rational("x", Rational64::new(-1, 2));
        assert_eq!(half.value, "-1/2");
        assert_eq!(half.approximation, Some(-0.5));
    }

    #[test]
    fn test_exact_integer() {
        assert_eq!(exact_integer(-6.0), Some(-6));
        assert_eq!(exact_integer(0.5), None);
        assert_eq!(exact_integer(f64::INFINITY), None);
        assert_eq!(exact_integer(1e300), None);
    }
}
