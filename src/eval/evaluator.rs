use std::collections::HashMap;

use thiserror::Error;

use super::functions;
use crate::ast::{BinaryOp, Node, NodeKind, UnaryOp};

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("Function {function} expects {expected} argument(s), found {found}")]
    Arity {
        function: String,
        expected: String,
        found: usize,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("{function} is undefined at {value}")]
    Domain { function: String, value: f64 },
    #[error("Not a numeric expression: {0}")]
    NotAnExpression(String),
}

/// Evaluates expressions to `f64` with a fixed set of variable bindings.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    bindings: HashMap<String, f64>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bindings(bindings: HashMap<String, f64>) -> Self {
        Self { bindings }
    }

    pub fn with_binding(mut self, name: &str, value: f64) -> Self {
        self.bindings.insert(name.to_string(), value);
        self
    }

    pub fn bind(&mut self, name: &str, value: f64) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn bindings(&self) -> &HashMap<String, f64> {
        &self.bindings
    }

    pub fn evaluate(&self, node: &Node) -> EvalResult<f64> {
        match &node.kind {
            NodeKind::Number { value } => Ok(*value),
            NodeKind::Variable { name } => self
                .bindings
                .get(name)
                .copied()
                .ok_or_else(|| EvalError::UndefinedVariable(name.clone())),
            NodeKind::Function { name, args } => {
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                functions::apply(*name, &values)
            }
            NodeKind::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match op {
                    UnaryOp::Plus => Ok(value),
                    UnaryOp::Minus => Ok(-value),
                    UnaryOp::Factorial => functions::factorial(value),
                }
            }
            NodeKind::Binary { op, left, right } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.eval_binary_op(*op, left, right)
            }
            NodeKind::Equation { .. } | NodeKind::Inequality { .. } => {
                Err(EvalError::NotAnExpression(node.to_string()))
            }
        }
    }

    /// `lhs - rhs` for an equation, the plain value otherwise.
    pub fn residual(&self, node: &Node) -> EvalResult<f64> {
        match &node.kind {
            NodeKind::Equation { left, right } => {
                Ok(self.evaluate(left)? - self.evaluate(right)?)
            }
            _ => self.evaluate(node),
        }
    }

    fn eval_binary_op(&self, op: BinaryOp, left: f64, right: f64) -> EvalResult<f64> {
        match op {
            BinaryOp::Add => Ok(left + right),
            BinaryOp::Subtract => Ok(left - right),
            BinaryOp::Multiply => Ok(left * right),
            BinaryOp::Divide => {
                if right == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
            BinaryOp::Modulo => {
                if right == 0.0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    Ok(left % right)
                }
            }
            BinaryOp::Power => {
                let result = left.powf(right);
                if result.is_nan() {
                    Err(EvalError::Domain {
                        function: "^".to_string(),
                        value: left,
                    })
                } else {
                    Ok(result)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AstBuilder;
    use crate::tokenizer::Tokenizer;

    fn eval(source: &str) -> EvalResult<f64> {
        let tokens = Tokenizer::new().tokenize(source).unwrap();
        let node = AstBuilder::new().build(&tokens).unwrap();
        Evaluator::new().with_binding("x", 3.0).evaluate(&node)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4"), Ok(14.0));
        assert_eq!(eval("2^3^2"), Ok(512.0));
        assert_eq!(eval("-2^2"), Ok(-4.0));
        assert_eq!(eval("(-2)^2"), Ok(4.0));
        assert_eq!(eval("2^-1"), Ok(0.5));
        assert_eq!(eval("10 - 4 - 3"), Ok(3.0));
        assert_eq!(eval("7 % 4"), Ok(3.0));
    }

    #[test]
    fn test_variables_and_functions() {
        assert_eq!(eval("2*x + 1"), Ok(7.0));
        assert_eq!(eval("x! + sqrt(16)"), Ok(10.0));
        assert!((eval("log(8, 2)").unwrap() - 3.0).abs() < 1e-12);
        assert!(matches!(eval("y + 1"), Err(EvalError::UndefinedVariable(name)) if name == "y"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(eval("1 / (x - 3)"), Err(EvalError::DivisionByZero));
        assert!(matches!(eval("sqrt(-1)"), Err(EvalError::Domain { .. })));
        assert!(matches!(eval("x = 3"), Err(EvalError::NotAnExpression(_))));
    }

    #[test]
    fn test_residual() {
        let tokens = Tokenizer::new().tokenize("2*x = 6").unwrap();
        let node = AstBuilder::new().build(&tokens).unwrap();
        assert_eq!(Evaluator::new().with_binding("x", 3.0).residual(&node), Ok(0.0));
        assert_eq!(Evaluator::new().with_binding("x", 1.0).residual(&node), Ok(-4.0));
    }
}
