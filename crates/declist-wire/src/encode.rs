//! Wire encoding.
//!
//! ```text
//! constant  := 'C' tag '{' payload '}'          tag ∈ {B, F, I, S}
//! binary    := "EB{" expr opsym expr '}'        opsym: two chars
//! node      := expr ('T' | 'F')
//! list      := "DL" count '{' node* '}'
//! ```
//!
//! Tokens are split by brace matching, never by separators, so nothing is
//! emitted between the parts of a node. Variables are not sent
//! symbolically: their current value is encoded as a constant.

use declist_types::{DecisionList, DecisionNode, EvalError, EvalResult, Expr, SymbolTable, Value};
use std::fmt;

/// Emit a constant literal: `CI{42}`, `CB{T}`, `CS{str9}`.
pub fn encode_value(value: &Value) -> EvalResult<String> {
    let mut out = String::new();
    emit_value(value, &mut out)?;
    Ok(out)
}

/// Emit an expression, resolving variables through `symbols`.
pub fn encode_expr(expr: &Expr, symbols: &SymbolTable) -> EvalResult<String> {
    let mut out = String::new();
    emit_expr(expr, symbols, &mut out)?;
    Ok(out)
}

/// Emit one node as submitted to batch dispatch: condition, then `T`/`F`.
pub fn encode_node(node: &DecisionNode, symbols: &SymbolTable) -> EvalResult<String> {
    let mut out = String::new();
    emit_node(node, symbols, &mut out)?;
    Ok(out)
}

/// Emit a whole list, `DL<n>{...}`. Diagnostic form; dispatch uses
/// [`flatten_for_dispatch`].
pub fn encode_list(list: &DecisionList, symbols: &SymbolTable) -> EvalResult<String> {
    let mut out = format!("DL{}{{", list.len());
    for (index, node) in list.nodes().iter().enumerate() {
        emit_node(node, symbols, &mut out).map_err(|e| e.at_node(index))?;
    }
    out.push('}');
    Ok(out)
}

/// A node's encoded condition paired with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNode {
    pub condition: String,
    pub outcome: bool,
}

impl EncodedNode {
    /// The dispatch string: condition with the outcome character appended.
    pub fn to_wire(&self) -> String {
        let mut out = String::with_capacity(self.condition.len() + 1);
        out.push_str(&self.condition);
        out.push(outcome_char(self.outcome));
        out
    }
}

impl fmt::Display for EncodedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.condition, outcome_char(self.outcome))
    }
}

/// Encode every node of `list` in traversal order.
///
/// The result depends only on the list and the symbol table, so two calls
/// over the same inputs yield identical sequences. Failures carry the
/// index of the node being encoded.
pub fn flatten_for_dispatch(
    list: &DecisionList,
    symbols: &SymbolTable,
) -> EvalResult<Vec<EncodedNode>> {
    list.nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| {
            encode_expr(&node.condition, symbols)
                .map(|condition| EncodedNode {
                    condition,
                    outcome: node.outcome,
                })
                .map_err(|e| e.at_node(index))
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// Emission
// ══════════════════════════════════════════════════════════════════════════════

fn outcome_char(outcome: bool) -> char {
    if outcome {
        'T'
    } else {
        'F'
    }
}

fn emit_value(value: &Value, out: &mut String) -> EvalResult<()> {
    let payload = value.canonical_text();
    if payload.contains(['{', '}']) {
        return Err(EvalError::Precondition(format!(
            "string constant {payload:?} contains a brace and cannot be delimited"
        )));
    }
    out.push('C');
    out.push(value.data_type().tag());
    out.push('{');
    out.push_str(&payload);
    out.push('}');
    Ok(())
}

fn emit_expr(expr: &Expr, symbols: &SymbolTable, out: &mut String) -> EvalResult<()> {
    match expr {
        Expr::Constant(value) => emit_value(value, out),
        Expr::Variable(name) => emit_value(symbols.lookup(name)?, out),
        Expr::Binary { left, op, right } => {
            out.push_str("EB{");
            emit_expr(left, symbols, out)?;
            out.push_str(op.symbol());
            emit_expr(right, symbols, out)?;
            out.push('}');
            Ok(())
        }
    }
}

fn emit_node(node: &DecisionNode, symbols: &SymbolTable, out: &mut String) -> EvalResult<()> {
    emit_expr(&node.condition, symbols, out)?;
    out.push(outcome_char(node.outcome));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use declist_types::{BinOp, ErrorCategory};

    fn symbols() -> SymbolTable {
        let mut s = SymbolTable::new();
        s.declare("var1", Value::Integer(5)).unwrap();
        s.declare("var2", Value::Boolean(false)).unwrap();
        s
    }

    #[test]
    fn test_constants() {
        assert_eq!(encode_value(&Value::Integer(42)).unwrap(), "CI{42}");
        assert_eq!(encode_value(&Value::Float(0.5)).unwrap(), "CF{0.5}");
        assert_eq!(encode_value(&Value::Boolean(true)).unwrap(), "CB{T}");
        assert_eq!(encode_value(&Value::from("str12")).unwrap(), "CS{str12}");
        assert_eq!(encode_value(&Value::from("")).unwrap(), "CS{}");
    }

    #[test]
    fn test_brace_in_string_rejected() {
        let err = encode_value(&Value::from("a}b")).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Precondition);
    }

    #[test]
    fn test_variable_encodes_bound_value() {
        let s = symbols();
        assert_eq!(encode_expr(&Expr::variable("var1"), &s).unwrap(), "CI{5}");
        assert_eq!(
            encode_expr(&Expr::variable("var9"), &s),
            Err(EvalError::UndeclaredVariable("var9".into()))
        );
    }

    #[test]
    fn test_binary_and_operator_symbols() {
        let s = symbols();
        let expr = Expr::binary(Expr::variable("var1"), BinOp::Greater, Expr::constant(3));
        assert_eq!(encode_expr(&expr, &s).unwrap(), "EB{CI{5}>>CI{3}}");
        let expr = Expr::binary(Expr::variable("var1"), BinOp::Less, Expr::constant(3));
        assert_eq!(encode_expr(&expr, &s).unwrap(), "EB{CI{5}<<CI{3}}");
        let expr = Expr::binary(Expr::variable("var2"), BinOp::Or, Expr::constant(true));
        assert_eq!(encode_expr(&expr, &s).unwrap(), "EB{CB{F}||CB{T}}");
    }

    #[test]
    fn test_node_and_list() {
        let s = symbols();
        let list = DecisionList::with_default(
            vec![DecisionNode::new(
                Expr::binary(Expr::variable("var1"), BinOp::Eq, Expr::constant(5)),
                true,
            )],
            false,
        );
        assert_eq!(
            encode_node(&list.nodes()[0], &s).unwrap(),
            "EB{CI{5}==CI{5}}T"
        );
        assert_eq!(
            encode_list(&list, &s).unwrap(),
            "DL2{EB{CI{5}==CI{5}}TCB{T}F}"
        );
    }

    #[test]
    fn test_flatten_is_stable_and_ordered() {
        let s = symbols();
        let list = DecisionList::with_default(
            vec![
                DecisionNode::new(
                    Expr::binary(Expr::variable("var1"), BinOp::NotEq, Expr::constant(1)),
                    false,
                ),
                DecisionNode::new(
                    Expr::binary(Expr::variable("var2"), BinOp::Eq, Expr::constant(false)),
                    true,
                ),
            ],
            true,
        );
        let first = flatten_for_dispatch(&list, &s).unwrap();
        let second = flatten_for_dispatch(&list, &s).unwrap();
        assert_eq!(first, second);
        let wire: Vec<String> = first.iter().map(EncodedNode::to_wire).collect();
        assert_eq!(
            wire,
            vec!["EB{CI{5}!=CI{1}}F", "EB{CB{F}==CB{F}}T", "CB{T}T"]
        );
        assert_eq!(first[2].to_string(), "CB{T}T");
    }

    #[test]
    fn test_flatten_error_carries_node_index() {
        let s = symbols();
        let list = DecisionList::with_default(
            vec![
                DecisionNode::new(Expr::constant(true), true),
                DecisionNode::new(Expr::variable("missing"), true),
            ],
            false,
        );
        let err = flatten_for_dispatch(&list, &s).unwrap_err();
        assert_eq!(err.node(), Some(1));
        assert_eq!(err.category(), ErrorCategory::Scope);
    }
}
