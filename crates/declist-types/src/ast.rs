//! Expression and decision-list node types.
//!
//! Expressions form a closed enum; evaluation lives in `declist-eval` and
//! wire encoding in `declist-wire`, both taking the symbol table as an
//! explicit argument.

use crate::error::{EvalError, EvalResult};
use crate::{DataType, SymbolTable, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════════

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Eq,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    And,
    Or,
    NotEq,
}

impl BinOp {
    /// Every operator, in declaration order.
    pub const ALL: [BinOp; 8] = [
        BinOp::Eq,
        BinOp::Greater,
        BinOp::GreaterEq,
        BinOp::Less,
        BinOp::LessEq,
        BinOp::And,
        BinOp::Or,
        BinOp::NotEq,
    ];

    /// Two-character wire symbol. Strict inequalities are doubled (`>>`,
    /// `<<`) so every symbol has the same width.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Greater => ">>",
            Self::GreaterEq => ">=",
            Self::Less => "<<",
            Self::LessEq => "<=",
            Self::And => "&&",
            Self::Or => "||",
            Self::NotEq => "!=",
        }
    }

    /// Inverse of [`BinOp::symbol`].
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// `&&` and `||`, which take Boolean operands only.
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// `==` and `!=`, defined for every type.
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq)
    }

    /// `>`, `>=`, `<` and `<=`.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Self::Greater | Self::GreaterEq | Self::Less | Self::LessEq
        )
    }

    /// Operator-validity table: may this operator be applied to operands
    /// of type `ty`?
    ///
    /// Booleans cannot be ordered; strings only support (in)equality.
    pub fn is_valid_for(self, ty: DataType) -> bool {
        match ty {
            DataType::Boolean => !self.is_ordering(),
            DataType::String => self.is_equality(),
            DataType::Integer | DataType::Float => true,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Greater => ">",
            Self::Less => "<",
            other => other.symbol(),
        };
        write!(f, "{text}")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression over the symbol table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `var1`
    Variable(String),
    /// A fixed value.
    Constant(Value),
    /// `left op right`
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

impl Expr {
    /// A reference to a symbol-table entry.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Self::Constant(value.into())
    }

    /// `left op right`, boxing both operands.
    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// The constant `true` guard used by default nodes.
    pub fn always() -> Self {
        Self::Constant(Value::Boolean(true))
    }

    /// Whether this is the constant `true` guard of a default node.
    pub fn is_always(&self) -> bool {
        matches!(self, Self::Constant(Value::Boolean(true)))
    }

    /// Assignment through an expression.
    ///
    /// Only a variable could be an l-value, and variable mutation has no
    /// defined semantics, so this always fails.
    pub fn assign(&self, _symbols: &mut SymbolTable, _value: Value) -> EvalResult<()> {
        match self {
            Self::Variable(name) => Err(EvalError::Unsupported(format!(
                "assignment to variable '{name}'"
            ))),
            _ => Err(EvalError::Precondition(
                "cannot assign to an expression that is not an l-value".into(),
            )),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(name) => write!(f, "{name}"),
            Self::Constant(value) => write!(f, "{value}"),
            Self::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Decision Lists
// ══════════════════════════════════════════════════════════════════════════════

/// One guard/outcome pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNode {
    /// Must evaluate to a Boolean.
    pub condition: Expr,
    /// Result of the list when `condition` is the first guard to hold.
    pub outcome: bool,
}

impl DecisionNode {
    /// A node yielding `outcome` when `condition` holds.
    pub fn new(condition: Expr, outcome: bool) -> Self {
        Self { condition, outcome }
    }

    /// A default node: constant `true` guard.
    pub fn default_node(outcome: bool) -> Self {
        Self::new(Expr::always(), outcome)
    }
}

/// An ordered chain of nodes, evaluated first-match-wins.
///
/// Stored as an array; node `i`'s successor is node `i + 1`. Construction
/// does not require a default node; a list without one fails with
/// `MissingDefault` only if evaluation runs off its end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionList {
    nodes: Vec<DecisionNode>,
}

impl DecisionList {
    /// A list over `nodes` as given; no default is appended.
    pub fn new(nodes: Vec<DecisionNode>) -> Self {
        Self { nodes }
    }

    /// Guarded nodes followed by a constant-`true` default.
    pub fn with_default(guards: Vec<DecisionNode>, default_outcome: bool) -> Self {
        let mut list = Self::new(guards);
        list.push(DecisionNode::default_node(default_outcome));
        list
    }

    /// Append a node after the current last node.
    pub fn push(&mut self, node: DecisionNode) {
        self.nodes.push(node);
    }

    /// The nodes in evaluation order.
    pub fn nodes(&self) -> &[DecisionNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the last node is a constant-`true` default.
    pub fn has_default(&self) -> bool {
        self.nodes.last().is_some_and(|n| n.condition.is_always())
    }
}
