//! The seam to the external batch evaluator.

use declist_eval::Evaluator;
use declist_types::{SymbolTable, Value};
use declist_wire::decode_node;
use tracing::trace;

use crate::code::ResultCode;
use crate::error::DispatchResult;

/// Consumes a flat array of encoded node strings and returns one raw result
/// code per node, in the same positional order.
///
/// Implementations may evaluate nodes in any order or in parallel; only the
/// output order is constrained. A crash or missing response is reported as
/// [`crate::DispatchError::Executor`] and fails the whole batch.
pub trait Executor {
    fn execute(&self, nodes: &[String]) -> DispatchResult<Vec<i32>>;
}

impl<F> Executor for F
where
    F: Fn(&[String]) -> DispatchResult<Vec<i32>>,
{
    fn execute(&self, nodes: &[String]) -> DispatchResult<Vec<i32>> {
        self(nodes)
    }
}

/// In-process implementation of the executor contract.
///
/// Each node is decoded and its constant-only guard evaluated: a holding
/// guard yields the node's outcome code, a failing guard yields Ignore, and
/// malformed text or an evaluation error yields Error.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostExecutor;

impl HostExecutor {
    /// The executor has no state; this is the same as `HostExecutor`.
    pub fn new() -> Self {
        Self
    }

    /// Result code for a single encoded node.
    pub fn evaluate_node(&self, text: &str) -> ResultCode {
        let node = match decode_node(text) {
            Ok(node) => node,
            Err(err) => {
                trace!(node = text, error = %err, "node failed to decode");
                return ResultCode::Error;
            }
        };
        // Decoded guards carry no variables.
        let symbols = SymbolTable::new();
        match Evaluator::new(&symbols).eval_expr(&node.condition) {
            Ok(Value::Boolean(true)) => ResultCode::from_outcome(node.outcome),
            Ok(Value::Boolean(false)) => ResultCode::Ignore,
            Ok(other) => {
                trace!(node = text, ty = %other.data_type(), "guard is not Boolean");
                ResultCode::Error
            }
            Err(err) => {
                trace!(node = text, error = %err, "guard failed to evaluate");
                ResultCode::Error
            }
        }
    }
}

impl Executor for HostExecutor {
    fn execute(&self, nodes: &[String]) -> DispatchResult<Vec<i32>> {
        Ok(nodes
            .iter()
            .map(|node| self.evaluate_node(node).as_raw())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_executor_codes() {
        let host = HostExecutor::new();
        assert_eq!(host.evaluate_node("EB{CI{5}==CI{5}}T"), ResultCode::True);
        assert_eq!(host.evaluate_node("EB{CI{5}==CI{5}}F"), ResultCode::False);
        assert_eq!(host.evaluate_node("EB{CI{5}>>CI{9}}T"), ResultCode::Ignore);
        assert_eq!(host.evaluate_node("CB{T}F"), ResultCode::False);
    }

    #[test]
    fn test_host_executor_errors() {
        let host = HostExecutor::new();
        assert_eq!(host.evaluate_node("EB{CI{5}>>CS{abc}}T"), ResultCode::Error);
        assert_eq!(host.evaluate_node("CI{1}T"), ResultCode::Error);
        assert_eq!(host.evaluate_node("garbage"), ResultCode::Error);
    }

    #[test]
    fn test_execute_preserves_order() {
        let nodes: Vec<String> = ["CB{F}T", "CB{T}T", "CB{T}F", "CS{x}T"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(HostExecutor.execute(&nodes).unwrap(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_closure_executor() {
        let scripted = |nodes: &[String]| -> DispatchResult<Vec<i32>> { Ok(vec![2; nodes.len()]) };
        assert_eq!(scripted.execute(&["CB{T}T".to_string()]).unwrap(), vec![2]);
    }
}
