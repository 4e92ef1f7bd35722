use crate::ast::{BinaryOp, Node, NodeKind};
use crate::eval::Evaluator;
use crate::tokenizer::BuiltinFunction;

/// Conditions the unknown must satisfy for every term of the equation to be
/// defined, e.g. `x - 1 > 0` for `log(x - 1)`. Each condition appears once.
pub fn restrictions(equation: &Node, variable: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    equation.walk(&mut |node| {
        if !node.contains_variable(variable) {
            return;
        }
        let condition = match &node.kind {
            NodeKind::Function { name, args } if name.is_logarithmic() => {
                args.first().map(|arg| format!("{} > 0", arg))
            }
            NodeKind::Function {
                name: BuiltinFunction::Sqrt,
                args,
            } => args.first().map(|arg| format!("{} ≥ 0", arg)),
            NodeKind::Binary {
                op: BinaryOp::Divide,
                right,
                ..
            } if right.contains_variable(variable) => Some(format!("{} ≠ 0", right)),
            NodeKind::Binary {
                op: BinaryOp::Power,
                left,
                right,
            } if left.contains_variable(variable) && has_fractional_value(right) => {
                Some(format!("{} ≥ 0", left))
            }
            _ => None,
        };
        if let Some(condition) = condition {
            if !out.contains(&condition) {
                out.push(condition);
            }
        }
    });
    out
}

fn has_fractional_value(node: &Node) -> bool {
    Evaluator::new()
        .evaluate(node)
        .is_ok_and(|v| v.is_finite() && v.fract() != 0.0)
}
