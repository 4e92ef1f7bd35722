//! Structural classification of equations.
//!
//! Checks run in a fixed order and the first match wins. Pattern checks only
//! look at sub-trees that contain the target variable, so constant function
//! calls such as `sin(1)` do not change the class of `x + sin(1) = 0`.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::ast::{BinaryOp, Node, NodeKind, UnaryOp};
use crate::eval::Evaluator;
use crate::tokenizer::BuiltinFunction;

lazy_static! {
    static ref DERIVATIVE: Regex =
        Regex::new(r"\bd\d*[A-Za-z]\s*/\s*d[A-Za-z]\d*\b").expect("derivative pattern is valid");
}

/// Variables preferred as the unknown when the caller names none.
const CONVENTIONAL_UNKNOWNS: [&str; 4] = ["x", "y", "z", "t"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, EnumIter, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquationType {
    Linear,
    Quadratic,
    Polynomial,
    Rational,
    Radical,
    Exponential,
    Logarithmic,
    Trigonometric,
    /// Several equations solved together; assigned by callers, never inferred.
    System,
    Differential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub equation_type: EquationType,
    pub variable: Option<String>,
    /// Structural degree in `variable`, when the equation is polynomial.
    pub degree: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct EquationClassifier;

impl EquationClassifier {
    pub fn new() -> Self {
        Self
    }

    #[tracing::instrument(level = "debug", skip(self, ast))]
    pub fn classify(
        &self,
        ast: &Node,
        source: &str,
        requested: &[String],
        bound: &[String],
    ) -> Classification {
        let variable = self.select_variable(ast, requested, bound);
        let target = variable.as_deref().unwrap_or_default();
        let degree = polynomial_degree(ast, target);

        let equation_type = if DERIVATIVE.is_match(source) {
            EquationType::Differential
        } else if has_target_node(ast, target, is_trigonometric) {
            EquationType::Trigonometric
        } else if has_target_node(ast, target, |n| is_exponential(n, target)) {
            EquationType::Exponential
        } else if has_target_node(ast, target, is_logarithmic) {
            EquationType::Logarithmic
        } else if has_target_node(ast, target, |n| is_rational(n, target)) {
            EquationType::Rational
        } else if has_target_node(ast, target, |n| is_radical(n, target)) {
            EquationType::Radical
        } else {
            match degree {
                Some(0) | Some(1) => EquationType::Linear,
                Some(2) => EquationType::Quadratic,
                _ => EquationType::Polynomial,
            }
        };

        tracing::debug!(%equation_type, ?variable, ?degree, "classified");
        Classification {
            equation_type,
            variable,
            degree,
        }
    }

    /// Picks the unknown: the first requested variable that is not bound, else
    /// the first conventional unknown present, else the first variable seen.
    pub fn select_variable(&self, ast: &Node, requested: &[String], bound: &[String]) -> Option<String> {
        if let Some(name) = requested.iter().find(|name| !bound.contains(name)) {
            return Some(name.clone());
        }
        let free: Vec<String> = ast
            .variables()
            .into_iter()
            .filter(|name| !bound.contains(name))
            .collect();
        CONVENTIONAL_UNKNOWNS
            .iter()
            .find(|name| free.iter().any(|v| v == *name))
            .map(|name| name.to_string())
            .or_else(|| free.into_iter().next())
    }
}

/// True if some node containing `target` satisfies `predicate`.
fn has_target_node<F: Fn(&Node) -> bool>(ast: &Node, target: &str, predicate: F) -> bool {
    let mut found = false;
    ast.walk(&mut |node| {
        if !found && node.contains_variable(target) && predicate(node) {
            found = true;
        }
    });
    found
}

fn function_name(node: &Node) -> Option<BuiltinFunction> {
    match &node.kind {
        NodeKind::Function { name, .. } => Some(*name),
        _ => None,
    }
}

fn is_trigonometric(node: &Node) -> bool {
    function_name(node).is_some_and(|f| f.is_trigonometric())
}

fn is_logarithmic(node: &Node) -> bool {
    function_name(node).is_some_and(|f| f.is_logarithmic())
}

fn is_exponential(node: &Node, target: &str) -> bool {
    match &node.kind {
        NodeKind::Function { name, .. } => *name == BuiltinFunction::Exp || name.is_hyperbolic(),
        NodeKind::Binary {
            op: BinaryOp::Power,
            right,
            ..
        } => right.contains_variable(target),
        _ => false,
    }
}

fn is_rational(node: &Node, target: &str) -> bool {
    matches!(
        &node.kind,
        NodeKind::Binary { op: BinaryOp::Divide, right, .. } if right.contains_variable(target)
    )
}

fn is_radical(node: &Node, target: &str) -> bool {
    match &node.kind {
        NodeKind::Function { name, .. } => name.is_radical(),
        NodeKind::Binary {
            op: BinaryOp::Power,
            left,
            right,
        } => {
            left.contains_variable(target)
                && constant_value(right).is_some_and(|e| e.is_finite() && e.fract() != 0.0)
        }
        _ => false,
    }
}

fn constant_value(node: &Node) -> Option<f64> {
    Evaluator::new().evaluate(node).ok()
}

/// Structural degree of `node` in `target`: sums take the maximum, products
/// add, integer powers multiply. `None` when `target` appears anywhere a
/// polynomial does not allow it.
pub fn polynomial_degree(node: &Node, target: &str) -> Option<u32> {
    if !node.contains_variable(target) {
        return Some(0);
    }
    match &node.kind {
        NodeKind::Number { .. } => Some(0),
        NodeKind::Variable { .. } => Some(1),
        NodeKind::Function { .. } => None,
        NodeKind::Unary { op, operand } => match op {
            UnaryOp::Plus | UnaryOp::Minus => polynomial_degree(operand, target),
            UnaryOp::Factorial => None,
        },
        NodeKind::Binary { op, left, right } => match op {
            BinaryOp::Add | BinaryOp::Subtract => {
                Some(polynomial_degree(left, target)?.max(polynomial_degree(right, target)?))
            }
            BinaryOp::Multiply => {
                polynomial_degree(left, target)?.checked_add(polynomial_degree(right, target)?)
            }
            BinaryOp::Divide if !right.contains_variable(target) => polynomial_degree(left, target),
            BinaryOp::Power if !right.contains_variable(target) => {
                let exponent = constant_value(right)?;
                if exponent < 0.0 || exponent.fract() != 0.0 || exponent > u32::MAX as f64 {
                    return None;
                }
                polynomial_degree(left, target)?.checked_mul(exponent as u32)
            }
            _ => None,
        },
        NodeKind::Equation { left, right } | NodeKind::Inequality { left, right, .. } => {
            Some(polynomial_degree(left, target)?.max(polynomial_degree(right, target)?))
        }
    }
}
