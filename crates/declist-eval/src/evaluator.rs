//! Expression evaluator and decision-list state machine.

use declist_types::{BinOp, DecisionList, EvalError, EvalResult, Expr, SymbolTable, Value};
use tracing::debug;

/// The sequential evaluator: walks expressions against a borrowed symbol
/// table and produces Values.
pub struct Evaluator<'a> {
    symbols: &'a SymbolTable,
    /// Decision-list nodes visited so far.
    pub node_visits: u64,
}

impl<'a> Evaluator<'a> {
    /// An evaluator reading from `symbols`, with its visit counter at zero.
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            node_visits: 0,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        self.symbols
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Constant(value) => Ok(value.clone()),
            Expr::Variable(name) => self.symbols.lookup(name).cloned(),
            Expr::Binary { left, op, right } => self.eval_binary(left, *op, right),
        }
    }

    // ── Operators ────────────────────────────────────────────────────────

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        // Both sides are always evaluated, the way the batch executor sees them.
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        if op.is_logical() {
            self.eval_logical(&lv, op, &rv)
        } else {
            self.eval_comparison(&lv, op, &rv)
        }
    }

    fn eval_logical(&self, lv: &Value, op: BinOp, rv: &Value) -> EvalResult<Value> {
        match (lv, rv) {
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(match op {
                BinOp::And => *a && *b,
                _ => *a || *b,
            })),
            _ => Err(EvalError::TypeMismatch(format!(
                "'{op}' requires Boolean operands, got {} and {}",
                lv.data_type(),
                rv.data_type()
            ))),
        }
    }

    fn eval_comparison(&self, lv: &Value, op: BinOp, rv: &Value) -> EvalResult<Value> {
        // Integer and Float meet as Float; every other pairing must match.
        let (lv, rv) = match (lv, rv) {
            (Value::Integer(a), Value::Float(b)) => (Value::Float(*a as f32), Value::Float(*b)),
            (Value::Float(a), Value::Integer(b)) => (Value::Float(*a), Value::Float(*b as f32)),
            _ if lv.data_type() != rv.data_type() => {
                return Err(EvalError::TypeMismatch(format!(
                    "cannot compare {} with {} using '{op}'",
                    lv.data_type(),
                    rv.data_type()
                )));
            }
            _ => (lv.clone(), rv.clone()),
        };

        let ty = lv.data_type();
        if !op.is_valid_for(ty) {
            return Err(EvalError::TypeMismatch(format!(
                "'{op}' is not defined for {ty} operands"
            )));
        }

        let result = match op {
            BinOp::Eq => lv.equals(&rv),
            BinOp::NotEq => !lv.equals(&rv),
            BinOp::Greater => lv.compare(&rv)?.is_gt(),
            BinOp::GreaterEq => lv.compare(&rv)?.is_ge(),
            BinOp::Less => lv.compare(&rv)?.is_lt(),
            BinOp::LessEq => lv.compare(&rv)?.is_le(),
            BinOp::And | BinOp::Or => unreachable!("handled by eval_logical"),
        };
        Ok(Value::Boolean(result))
    }

    // ══════════════════════════════════════════════════════════════════════
    // Decision lists
    // ══════════════════════════════════════════════════════════════════════

    /// Walk the chain left to right; the first guard that holds decides.
    ///
    /// Errors raised inside a node carry that node's index. Running off the
    /// end of the chain is `MissingDefault`.
    pub fn evaluate_list(&mut self, list: &DecisionList) -> EvalResult<bool> {
        for (index, node) in list.nodes().iter().enumerate() {
            self.node_visits += 1;
            match self.eval_expr(&node.condition).map_err(|e| e.at_node(index))? {
                Value::Boolean(true) => return Ok(node.outcome),
                Value::Boolean(false) => {}
                other => {
                    return Err(EvalError::TypeMismatch(format!(
                        "condition evaluates to {}, expected Boolean",
                        other.data_type()
                    ))
                    .at_node(index));
                }
            }
        }
        Err(EvalError::MissingDefault {
            visited: list.len(),
        })
    }
}

/// Evaluate one decision list with a fresh evaluator.
pub fn evaluate_sequential(list: &DecisionList, symbols: &SymbolTable) -> EvalResult<bool> {
    Evaluator::new(symbols).evaluate_list(list)
}

/// Evaluate every list independently; one failure does not stop the rest.
pub fn evaluate_all(lists: &[DecisionList], symbols: &SymbolTable) -> Vec<EvalResult<bool>> {
    let mut evaluator = Evaluator::new(symbols);
    let results: Vec<EvalResult<bool>> = lists
        .iter()
        .map(|list| evaluator.evaluate_list(list))
        .collect();
    debug!(
        lists = lists.len(),
        node_visits = evaluator.node_visits,
        failures = results.iter().filter(|r| r.is_err()).count(),
        "sequential evaluation complete"
    );
    results
}
