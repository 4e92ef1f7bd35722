use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};

use crate::tokenizer::{BuiltinFunction, Comparison, Span};

/// Grouping direction for operators of equal precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

const ADDITIVE: u8 = 10;
const MULTIPLICATIVE: u8 = 20;
const SIGN: u8 = 30;
const POWER: u8 = 40;
const POSTFIX: u8 = 50;
const ATOM: u8 = u8::MAX;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay, AsRefStr, Serialize, Deserialize,
)]
pub enum UnaryOp {
    #[strum(serialize = "u+")]
    #[serde(rename = "u+")]
    Plus,
    #[strum(serialize = "u-")]
    #[serde(rename = "u-")]
    Minus,
    #[strum(serialize = "!")]
    #[serde(rename = "!")]
    Factorial,
}

impl UnaryOp {
    pub fn precedence(&self) -> u8 {
        match self {
            UnaryOp::Plus | UnaryOp::Minus => SIGN,
            UnaryOp::Factorial => POSTFIX,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            UnaryOp::Plus | UnaryOp::Minus => Associativity::Right,
            UnaryOp::Factorial => Associativity::Left,
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::Factorial)
    }

    fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Factorial => "!",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay, AsRefStr, Serialize, Deserialize,
)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Add,
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Subtract,
    #[strum(serialize = "*")]
    #[serde(rename = "*")]
    Multiply,
    #[strum(serialize = "/")]
    #[serde(rename = "/")]
    Divide,
    #[strum(serialize = "%")]
    #[serde(rename = "%")]
    Modulo,
    #[strum(serialize = "^")]
    #[serde(rename = "^")]
    Power,
}

impl BinaryOp {
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Add | BinaryOp::Subtract => ADDITIVE,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo => MULTIPLICATIVE,
            BinaryOp::Power => POWER,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            BinaryOp::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InequalityOp {
    #[serde(rename = "<")]
    Less,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<=")]
    LessEqual,
    #[serde(rename = ">=")]
    GreaterEqual,
    #[serde(rename = "!=")]
    NotEqual,
}

impl From<Comparison> for InequalityOp {
    fn from(value: Comparison) -> Self {
        match value {
            Comparison::Less => InequalityOp::Less,
            Comparison::Greater => InequalityOp::Greater,
            Comparison::LessEqual => InequalityOp::LessEqual,
            Comparison::GreaterEqual => InequalityOp::GreaterEqual,
            Comparison::NotEqual => InequalityOp::NotEqual,
        }
    }
}

impl Display for InequalityOp {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let symbol = match self {
            InequalityOp::Less => "<",
            InequalityOp::Greater => ">",
            InequalityOp::LessEqual => "<=",
            InequalityOp::GreaterEqual => ">=",
            InequalityOp::NotEqual => "!=",
        };
        write!(f, "{}", symbol)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Number {
        value: f64,
    },
    Variable {
        name: String,
    },
    Function {
        name: BuiltinFunction,
        args: Vec<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Equation {
        left: Box<Node>,
        right: Box<Node>,
    },
    Inequality {
        op: InequalityOp,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// An immutable AST node and the source span it was built from.
///
/// Equality is structural: spans are ignored so that rewritten trees compare
/// equal to freshly parsed ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub span: Span,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        use NodeKind::*;
        match (&self.kind, &other.kind) {
            (Number { value: a }, Number { value: b }) => a == b,
            (Variable { name: a }, Variable { name: b }) => a == b,
            (Function { name: a, args: x }, Function { name: b, args: y }) => a == b && x == y,
            (
                Unary {
                    op: a,
                    operand: x,
                },
                Unary {
                    op: b,
                    operand: y,
                },
            ) => a == b && x == y,
            (
                Binary {
                    op: a,
                    left: l1,
                    right: r1,
                },
                Binary {
                    op: b,
                    left: l2,
                    right: r2,
                },
            ) => a == b && l1 == l2 && r1 == r2,
            (Equation { left: l1, right: r1 }, Equation { left: l2, right: r2 }) => {
                l1 == l2 && r1 == r2
            }
            (
                Inequality {
                    op: a,
                    left: l1,
                    right: r1,
                },
                Inequality {
                    op: b,
                    left: l2,
                    right: r2,
                },
            ) => a == b && l1 == l2 && r1 == r2,
            _ => false,
        }
    }
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn number(value: f64) -> Self {
        Self::new(NodeKind::Number { value }, Span::default())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Variable { name: name.into() }, Span::default())
    }

    pub fn function(name: BuiltinFunction, args: Vec<Node>) -> Self {
        let span = args
            .iter()
            .map(|a| a.span)
            .reduce(|a, b| a.merge(&b))
            .unwrap_or_default();
        Self::new(NodeKind::Function { name, args }, span)
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        let span = operand.span;
        Self::new(
            NodeKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        )
    }

    pub fn binary(op: BinaryOp, left: Node, right: Node) -> Self {
        let span = left.span.merge(&right.span);
        Self::new(
            NodeKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn equation(left: Node, right: Node) -> Self {
        let span = left.span.merge(&right.span);
        Self::new(
            NodeKind::Equation {
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn inequality(op: InequalityOp, left: Node, right: Node) -> Self {
        let span = left.span.merge(&right.span);
        Self::new(
            NodeKind::Inequality {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Number { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_equation(&self) -> bool {
        matches!(self.kind, NodeKind::Equation { .. })
    }

    /// Direct children in left-to-right order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Number { .. } | NodeKind::Variable { .. } => vec![],
            NodeKind::Function { args, .. } => args.iter().collect(),
            NodeKind::Unary { operand, .. } => vec![operand.as_ref()],
            NodeKind::Binary { left, right, .. }
            | NodeKind::Equation { left, right }
            | NodeKind::Inequality { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }

    pub fn contains_variable(&self, name: &str) -> bool {
        match &self.kind {
            NodeKind::Variable { name: n } => n == name,
            _ => self.children().iter().any(|c| c.contains_variable(name)),
        }
    }

    /// Distinct variable names in pre-order, first occurrence first.
    pub fn variables(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<String>) {
        if let NodeKind::Variable { name } = &self.kind {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        for child in self.children() {
            child.collect_variables(out);
        }
    }

    /// Distinct builtin functions in pre-order.
    pub fn functions(&self) -> Vec<BuiltinFunction> {
        let mut out = Vec::new();
        self.walk(&mut |node| {
            if let NodeKind::Function { name, .. } = &node.kind {
                if !out.contains(name) {
                    out.push(*name);
                }
            }
        });
        out
    }

    /// Pre-order traversal.
    pub fn walk<F: FnMut(&Node)>(&self, f: &mut F) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Node count, with function applications weighted double.
    pub fn complexity(&self) -> usize {
        let own = match self.kind {
            NodeKind::Function { .. } => 2,
            _ => 1,
        };
        own + self
            .children()
            .iter()
            .map(|c| c.complexity())
            .sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(|c| c.depth())
            .max()
            .unwrap_or(0)
    }

    fn precedence(&self) -> u8 {
        match &self.kind {
            NodeKind::Number { value } if *value < 0.0 => SIGN,
            NodeKind::Number { .. } | NodeKind::Variable { .. } | NodeKind::Function { .. } => {
                ATOM
            }
            NodeKind::Unary { op, .. } => op.precedence(),
            NodeKind::Binary { op, .. } => op.precedence(),
            NodeKind::Equation { .. } | NodeKind::Inequality { .. } => 0,
        }
    }

    fn fmt_operand(&self, f: &mut Formatter, parens: bool) -> fmt::Result {
        if parens {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.kind {
            NodeKind::Number { value } => write!(f, "{}", value),
            NodeKind::Variable { name } => write!(f, "{}", name),
            NodeKind::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            NodeKind::Unary { op, operand } => {
                if op.is_postfix() {
                    operand.fmt_operand(f, operand.precedence() < op.precedence())?;
                    write!(f, "{}", op.symbol())
                } else {
                    write!(f, "{}", op.symbol())?;
                    operand.fmt_operand(f, operand.precedence() < op.precedence())
                }
            }
            NodeKind::Binary { op, left, right } => {
                let prec = op.precedence();
                let (left_parens, right_parens) = match op.associativity() {
                    Associativity::Left => (left.precedence() < prec, right.precedence() <= prec),
                    // a signed exponent needs no parentheses: 2^-1
                    Associativity::Right => (left.precedence() <= prec, right.precedence() < SIGN),
                };
                left.fmt_operand(f, left_parens)?;
                match op {
                    BinaryOp::Add | BinaryOp::Subtract => write!(f, " {} ", op)?,
                    _ => write!(f, "{}", op)?,
                }
                right.fmt_operand(f, right_parens)
            }
            NodeKind::Equation { left, right } => write!(f, "{} = {}", left, right),
            NodeKind::Inequality { op, left, right } => write!(f, "{} {} {}", left, op, right),
        }
    }
}
