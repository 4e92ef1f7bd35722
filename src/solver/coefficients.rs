//! Polynomial coefficient extraction.
//!
//! The equation is normalized to `lhs - rhs` and walked once, combining
//! per-degree coefficients of the target variable. Sub-trees without the
//! target are evaluated numerically, so bound variables and constant
//! function calls become plain coefficients.

use std::collections::BTreeMap;

use super::error::{ComputationError, SolverError, SolverResult};
use super::solution::format_value;
use crate::ast::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::eval::{EvalError, Evaluator};

const MAX_DEGREE: u32 = 64;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polynomial {
    terms: BTreeMap<u32, f64>,
}

impl Polynomial {
    pub fn constant(value: f64) -> Self {
        Self::monomial(value, 0)
    }

    pub fn monomial(coefficient: f64, degree: u32) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(degree, coefficient);
        Self { terms }
    }

    /// Highest degree with a non-zero coefficient.
    pub fn degree(&self) -> u32 {
        self.terms
            .iter()
            .rev()
            .find(|(_, c)| **c != 0.0)
            .map(|(d, _)| *d)
            .unwrap_or(0)
    }

    pub fn coefficient(&self, degree: u32) -> f64 {
        self.terms.get(&degree).copied().unwrap_or(0.0)
    }

    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let mut terms = self.terms.clone();
        for (degree, c) in &other.terms {
            *terms.entry(*degree).or_insert(0.0) += c;
        }
        Polynomial { terms }
    }

    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial {
            terms: self.terms.iter().map(|(d, c)| (*d, c * factor)).collect(),
        }
    }

    pub fn mul(&self, other: &Polynomial) -> Option<Polynomial> {
        let mut terms = BTreeMap::new();
        for (da, ca) in &self.terms {
            for (db, cb) in &other.terms {
                let degree = da.checked_add(*db).filter(|d| *d <= MAX_DEGREE)?;
                *terms.entry(degree).or_insert(0.0) += ca * cb;
            }
        }
        Some(Polynomial { terms })
    }

    pub fn pow(&self, exponent: u32) -> Option<Polynomial> {
        let mut result = Polynomial::constant(1.0);
        for _ in 0..exponent {
            result = result.mul(self)?;
        }
        Some(result)
    }

    /// Canonical `... = 0` form, highest degree first.
    pub fn to_equation(&self, variable: &str, precision: usize) -> String {
        format!("{} = 0", self.to_expression(variable, precision))
    }

    pub fn to_expression(&self, variable: &str, precision: usize) -> String {
        let mut out = String::new();
        for (degree, c) in self.terms.iter().rev().filter(|(_, c)| **c != 0.0) {
            let magnitude = c.abs();
            let sign = if *c < 0.0 { "-" } else { "+" };
            if out.is_empty() {
                if *c < 0.0 {
                    out.push('-');
                }
            } else {
                out.push_str(&format!(" {} ", sign));
            }
            let power = match degree {
                0 => String::new(),
                1 => variable.to_string(),
                d => format!("{}^{}", variable, d),
            };
            if *degree == 0 {
                out.push_str(&format_value(magnitude, precision));
            } else if magnitude == 1.0 {
                out.push_str(&power);
            } else {
                out.push_str(&format!("{}*{}", format_value(magnitude, precision), power));
            }
        }
        if out.is_empty() {
            out.push('0');
        }
        out
    }

    /// Builds the polynomial of `node` in `variable`.
    pub fn from_node(node: &Node, variable: &str, evaluator: &Evaluator) -> SolverResult<Polynomial> {
        if !node.contains_variable(variable) {
            let value = evaluator
                .residual(node)
                .map_err(ComputationError::Evaluation)?;
            return Ok(Polynomial::constant(value));
        }

        match &node.kind {
            NodeKind::Variable { .. } => Ok(Polynomial::monomial(1.0, 1)),
            NodeKind::Number { value } => Ok(Polynomial::constant(*value)),
            NodeKind::Unary { op, operand } => match op {
                UnaryOp::Plus => Polynomial::from_node(operand, variable, evaluator),
                UnaryOp::Minus => Ok(Polynomial::from_node(operand, variable, evaluator)?.scale(-1.0)),
                UnaryOp::Factorial => Err(SolverError::non_polynomial(
                    variable,
                    "variable under a factorial",
                )),
            },
            NodeKind::Binary { op, left, right } => {
                Polynomial::from_binary(*op, left, right, variable, evaluator)
            }
            NodeKind::Function { name, .. } => Err(SolverError::non_polynomial(
                variable,
                format!("variable inside {}()", name),
            )),
            NodeKind::Equation { left, right } => {
                let left = Polynomial::from_node(left, variable, evaluator)?;
                let right = Polynomial::from_node(right, variable, evaluator)?;
                Ok(left.add(&right.scale(-1.0)))
            }
            NodeKind::Inequality { .. } => Err(SolverError::non_polynomial(
                variable,
                "inequalities have no coefficients",
            )),
        }
    }

    fn from_binary(
        op: BinaryOp,
        left: &Node,
        right: &Node,
        variable: &str,
        evaluator: &Evaluator,
    ) -> SolverResult<Polynomial> {
        match op {
            BinaryOp::Add | BinaryOp::Subtract => {
                let l = Polynomial::from_node(left, variable, evaluator)?;
                let r = Polynomial::from_node(right, variable, evaluator)?;
                let sign = if op == BinaryOp::Add { 1.0 } else { -1.0 };
                Ok(l.add(&r.scale(sign)))
            }
            BinaryOp::Multiply => {
                let l = Polynomial::from_node(left, variable, evaluator)?;
                let r = Polynomial::from_node(right, variable, evaluator)?;
                l.mul(&r)
                    .ok_or_else(|| ComputationError::Overflow("polynomial degree".into()).into())
            }
            BinaryOp::Divide => {
                if right.contains_variable(variable) {
                    return Err(SolverError::non_polynomial(variable, "variable in a divisor"));
                }
                let divisor = evaluator
                    .evaluate(right)
                    .map_err(ComputationError::Evaluation)?;
                if divisor == 0.0 {
                    return Err(ComputationError::Evaluation(EvalError::DivisionByZero).into());
                }
                Ok(Polynomial::from_node(left, variable, evaluator)?.scale(1.0 / divisor))
            }
            BinaryOp::Power => {
                if right.contains_variable(variable) {
                    return Err(SolverError::non_polynomial(variable, "variable in an exponent"));
                }
                let exponent = evaluator
                    .evaluate(right)
                    .map_err(ComputationError::Evaluation)?;
                if exponent < 0.0 || exponent.fract() != 0.0 || exponent > MAX_DEGREE as f64 {
                    return Err(SolverError::non_polynomial(
                        variable,
                        format!("exponent {} is not a non-negative integer", exponent),
                    ));
                }
                Polynomial::from_node(left, variable, evaluator)?
                    .pow(exponent as u32)
                    .ok_or_else(|| ComputationError::Overflow("polynomial degree".into()).into())
            }
            BinaryOp::Modulo => Err(SolverError::non_polynomial(variable, "variable under '%'")),
        }
    }
}

/// `lhs - rhs` of an equation; any other node is returned as is.
pub fn normalize(equation: &Node) -> Node {
    match &equation.kind {
        NodeKind::Equation { left, right } => {
            Node::binary(BinaryOp::Subtract, left.as_ref().clone(), right.as_ref().clone())
        }
        _ => equation.clone(),
    }
}

fn extract(equation: &Node, variable: &str, evaluator: &Evaluator, supported: u32) -> SolverResult<Polynomial> {
    let polynomial = Polynomial::from_node(&normalize(equation), variable, evaluator)?;
    let found = polynomial.degree();
    if found > supported {
        return Err(SolverError::DegreeMismatch { found, supported });
    }
    Ok(polynomial)
}

/// `(a, b)` of `a*x + b = 0`.
pub fn extract_linear(equation: &Node, variable: &str, evaluator: &Evaluator) -> SolverResult<(f64, f64)> {
    let p = extract(equation, variable, evaluator, 1)?;
    Ok((p.coefficient(1), p.coefficient(0)))
}

/// `(a, b, c)` of `a*x^2 + b*x + c = 0`.
pub fn extract_quadratic(
    equation: &Node,
    variable: &str,
    evaluator: &Evaluator,
) -> SolverResult<(f64, f64, f64)> {
    let p = extract(equation, variable, evaluator, 2)?;
    Ok((p.coefficient(2), p.coefficient(1), p.coefficient(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AstBuilder;
    use crate::tokenizer::Tokenizer;

    fn parse(source: &str) -> Node {
        let tokens = Tokenizer::new().tokenize(source).unwrap();
        AstBuilder::new().build(&tokens).unwrap()
    }

    #[test]
    fn test_extract_linear() {
        let evaluator = Evaluator::new();
        assert_eq!(extract_linear(&parse("2*x - 6 = 0"), "x", &evaluator), Ok((2.0, -6.0)));
        assert_eq!(extract_linear(&parse("3 = x + 1"), "x", &evaluator), Ok((-1.0, 2.0)));
        assert_eq!(extract_linear(&parse("x/2 + sin(0) = 1"), "x", &evaluator), Ok((0.5, -1.0)));
    }

    #[test]
    fn test_bound_variables_become_coefficients() {
        let evaluator = Evaluator::new().with_binding("a", 4.0).with_binding("b", 8.0);
        assert_eq!(extract_linear(&parse("a*x = b"), "x", &evaluator), Ok((4.0, -8.0)));
    }

    #[test]
    fn test_extract_quadratic_expands_products() {
        let evaluator = Evaluator::new();
        assert_eq!(
            extract_quadratic(&parse("(x - 2)*(x + 2) = 0"), "x", &evaluator),
            Ok((1.0, 0.0, -4.0))
        );
        assert_eq!(extract_quadratic(&parse("x*x = 2*x"), "x", &evaluator), Ok((1.0, -2.0, 0.0)));
    }

    #[test]
    fn test_degree_mismatch() {
        let evaluator = Evaluator::new();
        assert_eq!(
            extract_linear(&parse("x^2 - 4 = 0"), "x", &evaluator),
            Err(SolverError::DegreeMismatch { found: 2, supported: 1 })
        );
        assert_eq!(
            extract_quadratic(&parse("x^3 = 8"), "x", &evaluator),
            Err(SolverError::DegreeMismatch { found: 3, supported: 2 })
        );
    }

    #[test]
    fn test_non_polynomial() {
        let evaluator = Evaluator::new();
        for source in ["sin(x) = 0", "1/x = 2", "2^x = 8", "x^0.5 = 2"] {
            assert!(
                matches!(
                    extract_quadratic(&parse(source), "x", &evaluator),
                    Err(SolverError::NonPolynomial { .. })
                ),
                "{}",
                source
            );
        }
    }

    #[test]
    fn test_cancelled_terms_lower_the_degree() {
        let evaluator = Evaluator::new();
        assert_eq!(extract_linear(&parse("x^2 + x = x^2 + 3"), "x", &evaluator), Ok((1.0, -3.0)));
    }

    #[test]
    fn test_to_equation() {
        let p = Polynomial::monomial(1.0, 2).add(&Polynomial::constant(-4.0));
        assert_eq!(p.to_equation("x", 10), "x^2 - 4 = 0");
        let q = Polynomial::monomial(-2.0, 1).add(&Polynomial::constant(6.0));
        assert_eq!(q.to_equation("x", 10), "-2*x + 6 = 0");
        assert_eq!(Polynomial::default().to_equation("x", 10), "0 = 0");
        assert_eq!(Polynomial::monomial(0.5, 1).to_expression("y", 10), "0.5*y");
    }
}
