//! Structural pattern → rewrite rules over the AST.
//!
//! Rules never mutate their input; each successful match yields a new node.
//! [`Rewriter`] applies a rule set bottom-up until no rule fires.

use crate::ast::{BinaryOp, Node, NodeKind, UnaryOp};

const MAX_PASSES: usize = 16;
const MAX_FOLDED_EXPONENT: f64 = 64.0;

pub trait RewriteRule: Send + Sync {
    fn name(&self) -> &'static str;
    /// Rewrites `node` if its top level matches, leaving children untouched.
    fn apply(&self, node: &Node) -> Option<Node>;
}

fn is_number(node: &Node, expected: f64) -> bool {
    node.as_number() == Some(expected)
}

fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Evaluates operators whose operands are all numeric literals, as long as the
/// result stays exact.
pub struct FoldConstants;

impl RewriteRule for FoldConstants {
    fn name(&self) -> &'static str {
        "fold constants"
    }

    fn apply(&self, node: &Node) -> Option<Node> {
        match &node.kind {
            NodeKind::Unary {
                op: UnaryOp::Minus,
                operand,
            } => operand.as_number().map(|v| Node::number(-v)),
            NodeKind::Unary {
                op: UnaryOp::Plus,
                operand,
            } => Some(operand.as_ref().clone()),
            NodeKind::Binary { op, left, right } => {
                let (a, b) = (left.as_number()?, right.as_number()?);
                let value = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Subtract => a - b,
                    BinaryOp::Multiply => a * b,
                    BinaryOp::Divide if b != 0.0 && is_integer(a / b) && (a / b) * b == a => a / b,
                    BinaryOp::Power
                        if is_integer(a) && is_integer(b) && (0.0..=MAX_FOLDED_EXPONENT).contains(&b) =>
                    {
                        a.powi(b as i32)
                    }
                    _ => return None,
                };
                value.is_finite().then(|| Node::number(value))
            }
            _ => None,
        }
    }
}

/// `x + 0`, `0 + x`, `x - 0` → `x`; `0 - x` → `-x`
pub struct AdditiveIdentity;

impl RewriteRule for AdditiveIdentity {
    fn name(&self) -> &'static str {
        "additive identity"
    }

    fn apply(&self, node: &Node) -> Option<Node> {
        match &node.kind {
            NodeKind::Binary {
                op: BinaryOp::Add,
                left,
                right,
            } => {
                if is_number(right, 0.0) {
                    Some(left.as_ref().clone())
                } else if is_number(left, 0.0) {
                    Some(right.as_ref().clone())
                } else {
                    None
                }
            }
            NodeKind::Binary {
                op: BinaryOp::Subtract,
                left,
                right,
            } => {
                if is_number(right, 0.0) {
                    Some(left.as_ref().clone())
                } else if is_number(left, 0.0) {
                    Some(Node::unary(UnaryOp::Minus, right.as_ref().clone()))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// `x * 1`, `1 * x`, `x / 1` → `x`
pub struct MultiplicativeIdentity;

impl RewriteRule for MultiplicativeIdentity {
    fn name(&self) -> &'static str {
        "multiplicative identity"
    }

    fn apply(&self, node: &Node) -> Option<Node> {
        match &node.kind {
            NodeKind::Binary {
                op: BinaryOp::Multiply,
                left,
                right,
            } => {
                if is_number(right, 1.0) {
                    Some(left.as_ref().clone())
                } else if is_number(left, 1.0) {
                    Some(right.as_ref().clone())
                } else {
                    None
                }
            }
            NodeKind::Binary {
                op: BinaryOp::Divide,
                left,
                right,
            } if is_number(right, 1.0) => Some(left.as_ref().clone()),
            _ => None,
        }
    }
}

/// `x * 0`, `0 * x` → `0`
pub struct MultiplyByZero;

impl RewriteRule for MultiplyByZero {
    fn name(&self) -> &'static str {
        "multiply by zero"
    }

    fn apply(&self, node: &Node) -> Option<Node> {
        match &node.kind {
            NodeKind::Binary {
                op: BinaryOp::Multiply,
                left,
                right,
            } if is_number(left, 0.0) || is_number(right, 0.0) => Some(Node::number(0.0)),
            _ => None,
        }
    }
}

/// `x ^ 1` → `x`; `x ^ 0` → `1`
pub struct PowerIdentity;

impl RewriteRule for PowerIdentity {
    fn name(&self) -> &'static str {
        "power identity"
    }

    fn apply(&self, node: &Node) -> Option<Node> {
        match &node.kind {
            NodeKind::Binary {
                op: BinaryOp::Power,
                left,
                right,
            } => {
                if is_number(right, 1.0) {
                    Some(left.as_ref().clone())
                } else if is_number(right, 0.0) {
                    Some(Node::number(1.0))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/// `-(-x)` → `x`
pub struct DoubleNegation;

impl RewriteRule for DoubleNegation {
    fn name(&self) -> &'static str {
        "double negation"
    }

    fn apply(&self, node: &Node) -> Option<Node> {
        match &node.kind {
            NodeKind::Unary {
                op: UnaryOp::Minus,
                operand,
            } => match &operand.kind {
                NodeKind::Unary {
                    op: UnaryOp::Minus,
                    operand: inner,
                } => Some(inner.as_ref().clone()),
                _ => None,
            },
            _ => None,
        }
    }
}

pub struct Rewriter {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(vec![
            Box::new(FoldConstants),
            Box::new(AdditiveIdentity),
            Box::new(MultiplicativeIdentity),
            Box::new(MultiplyByZero),
            Box::new(PowerIdentity),
            Box::new(DoubleNegation),
        ])
    }
}

impl Rewriter {
    pub fn new(rules: Vec<Box<dyn RewriteRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Rewrites bottom-up until a fixpoint or the pass limit is reached.
    pub fn rewrite(&self, node: &Node) -> Node {
        let mut current = node.clone();
        for _ in 0..MAX_PASSES {
            let next = self.rewrite_once(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn rewrite_once(&self, node: &Node) -> Node {
        let rebuilt = map_children(node, &|child| self.rewrite_once(child));
        self.rules
            .iter()
            .find_map(|rule| {
                rule.apply(&rebuilt).map(|out| {
                    tracing::debug!(rule = rule.name(), "rewrite applied");
                    out.with_span(node.span)
                })
            })
            .unwrap_or(rebuilt)
    }
}

/// Rebuilds `node` with `f` applied to each direct child.
pub fn map_children(node: &Node, f: &dyn Fn(&Node) -> Node) -> Node {
    let kind = match &node.kind {
        NodeKind::Number { .. } | NodeKind::Variable { .. } => return node.clone(),
        NodeKind::Function { name, args } => NodeKind::Function {
            name: *name,
            args: args.iter().map(f).collect(),
        },
        NodeKind::Unary { op, operand } => NodeKind::Unary {
            op: *op,
            operand: Box::new(f(operand)),
        },
        NodeKind::Binary { op, left, right } => NodeKind::Binary {
            op: *op,
            left: Box::new(f(left)),
            right: Box::new(f(right)),
        },
        NodeKind::Equation { left, right } => NodeKind::Equation {
            left: Box::new(f(left)),
            right: Box::new(f(right)),
        },
        NodeKind::Inequality { op, left, right } => NodeKind::Inequality {
            op: *op,
            left: Box::new(f(left)),
            right: Box::new(f(right)),
        },
    };
    Node::new(kind, node.span)
}

/// Replaces every occurrence of `var` in `node` with `replacement`.
pub fn substitute(node: &Node, var: &str, replacement: &Node) -> Node {
    match &node.kind {
        NodeKind::Variable { name } if name == var => replacement.clone().with_span(node.span),
        _ => map_children(node, &|child| substitute(child, var, replacement)),
    }
}

/// Simplifies with the default rule set.
pub fn simplify(node: &Node) -> Node {
    Rewriter::default().rewrite(node)
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
    fn test_identities() {
        assert_eq!(simplify(&parse("x + 0")), parse("x"));
        assert_eq!(simplify(&parse("1 * (x - 0)")), parse("x"));
        assert_eq!(simplify(&parse("y * 0 + x^1")), parse("x"));
        assert_eq!(simplify(&parse("x^0")), parse("1"));
        assert_eq!(simplify(&parse("0 - x")), parse("-x"));
    }

    #[test]
    fn test_constant_folding_stays_exact() {
        assert_eq!(simplify(&parse("2*3 + x")), parse("6 + x"));
        assert_eq!(simplify(&parse("6/3")), parse("2"));
        assert_eq!(simplify(&parse("1/3")).to_string(), "1/3");
        assert_eq!(simplify(&parse("2^10")), parse("1024"));
        assert_eq!(simplify(&parse("--x")), parse("x"));
    }

    #[test]
    fn test_input_untouched() {
        let original = parse("x*1");
        let copy = original.clone();
        let _ = simplify(&original);
        assert_eq!(original, copy);
    }

    #[test]
    fn test_substitute() {
        let node = parse("2*x + x^2 = 8");
        let replaced = substitute(&node, "x", &Node::number(2.0));
        assert_eq!(replaced.to_string(), "2*2 + 2^2 = 8");
        assert!(!replaced.contains_variable("x"));
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(Rewriter::default().rule_names().len(), 6);
    }
}
