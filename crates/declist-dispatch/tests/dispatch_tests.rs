//! Integration tests for batch dispatch.
//!
//! Two harnesses:
//! 1. **Recombination**: scripted executors return fixed code arrays and the
//!    dispatcher's per-list outcomes (or whole-batch failure) are checked.
//! 2. **Cross-evaluator parity**: synthesized programs are evaluated
//!    sequentially and through the in-process executor, and the outcomes
//!    compared list by list.

use declist_dispatch::{
    cross_check, Batch, DispatchConfig, DispatchError, DispatchResult, Dispatcher, Executor,
    HostExecutor, Outcome,
};
use declist_eval::evaluate_all;
use declist_synth::{Program, SynthConfig, Synthesizer};
use declist_types::{BinOp, DecisionList, DecisionNode, ErrorCategory, Expr, SymbolTable, Value};
use proptest::prelude::*;
use std::thread;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn symbols() -> SymbolTable {
    let mut s = SymbolTable::new();
    s.declare("var1", Value::Integer(5)).unwrap();
    s
}

/// A list with `len` nodes: `len - 1` guards and a default.
fn list_of(len: usize) -> DecisionList {
    let guards = (1..len)
        .map(|k| {
            DecisionNode::new(
                Expr::binary(Expr::variable("var1"), BinOp::Eq, Expr::constant(k as i32)),
                true,
            )
        })
        .collect();
    DecisionList::with_default(guards, false)
}

/// Executor that ignores its input and returns `codes`.
fn scripted(codes: Vec<i32>) -> impl Fn(&[String]) -> DispatchResult<Vec<i32>> {
    move |_: &[String]| -> DispatchResult<Vec<i32>> { Ok(codes.clone()) }
}

fn synthesize(seed: u64, lists: usize, allow_numeric_logical: bool) -> Program {
    Synthesizer::new(SynthConfig {
        variables: 20,
        lists,
        seed: Some(seed),
        allow_numeric_logical,
        ..SynthConfig::default()
    })
    .unwrap()
    .program()
}

/// Evaluates chunks of the batch on separate threads; output stays positional.
struct ThreadedExecutor {
    threads: usize,
}

impl Executor for ThreadedExecutor {
    fn execute(&self, nodes: &[String]) -> DispatchResult<Vec<i32>> {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        let chunk = nodes.len().div_ceil(self.threads);
        let codes = thread::scope(|scope| {
            let handles: Vec<_> = nodes
                .chunks(chunk)
                .rev()
                .map(|part| scope.spawn(move || HostExecutor.execute(part)))
                .collect();
            let mut parts: Vec<Vec<i32>> = Vec::new();
            for handle in handles {
                parts.push(handle.join().unwrap()?);
            }
            parts.reverse();
            Ok::<_, DispatchError>(parts.concat())
        })?;
        Ok(codes)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Recombination
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn batch_of_lengths_2_1_3_fails_on_error_at_index_4() {
    let lists = vec![list_of(2), list_of(1), list_of(3)];
    let dispatcher = Dispatcher::new(scripted(vec![2, 1, 3, 2, 0, 1]));
    let err = dispatcher.submit_batch(&lists, &symbols()).unwrap_err();
    assert_eq!(
        err,
        DispatchError::NodeFailed {
            index: 4,
            list: 2,
            node: 1
        }
    );
    assert_eq!(err.category(), ErrorCategory::Protocol);
    assert_eq!(err.list(), Some(2));
}

#[test]
fn batch_of_lengths_2_1_3_recombines_per_list() {
    let lists = vec![list_of(2), list_of(1), list_of(3)];
    let dispatcher = Dispatcher::new(scripted(vec![3, 1, 2, 3, 3, 2]));
    assert_eq!(
        dispatcher.submit_batch(&lists, &symbols()).unwrap(),
        vec![false, true, true]
    );
}

#[test]
fn empty_batch_yields_no_outcomes() {
    let dispatcher = Dispatcher::new(HostExecutor);
    assert_eq!(dispatcher.submit_batch(&[], &symbols()).unwrap(), Vec::<bool>::new());
}

#[test]
fn extra_codes_are_a_protocol_error() {
    let dispatcher = Dispatcher::new(scripted(vec![2, 2, 2]));
    let err = dispatcher.submit_batch(&[list_of(2)], &symbols()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Protocol);
}

#[test]
fn encoding_failure_names_the_list() {
    let broken = DecisionList::with_default(
        vec![DecisionNode::new(
            Expr::binary(Expr::variable("var1"), BinOp::Eq, Expr::constant("a{b")),
            true,
        )],
        false,
    );
    let dispatcher = Dispatcher::new(HostExecutor);
    let err = dispatcher
        .submit_batch(&[list_of(2), list_of(3), broken], &symbols())
        .unwrap_err();
    assert_eq!(err.list(), Some(2));
    assert_eq!(err.category(), ErrorCategory::Precondition);
}

#[test]
fn dispatcher_config_from_json() {
    let config = DispatchConfig::from_json(r#"{ "flatten_workers": 3, "max_batch_nodes": 5 }"#)
        .unwrap();
    let dispatcher = Dispatcher::with_config(HostExecutor, config);
    assert!(dispatcher.submit_batch(&[list_of(2), list_of(3)], &symbols()).is_ok());
    let err = dispatcher
        .submit_batch(&[list_of(3), list_of(3)], &symbols())
        .unwrap_err();
    assert_eq!(err, DispatchError::BatchTooLarge { nodes: 6, limit: 5 });
}

// ══════════════════════════════════════════════════════════════════════════════
// Cross-evaluator parity
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn synthesized_lists_always_terminate() {
    let program = synthesize(11, 500, false);
    for result in evaluate_all(&program.lists, &program.symbols) {
        assert!(result.is_ok(), "unexpected failure: {result:?}");
    }
}

#[test]
fn synthesized_program_is_clean_under_host_executor() {
    let program = synthesize(7, 1000, false);
    let report = cross_check(
        &program.lists,
        &program.symbols,
        &Dispatcher::new(HostExecutor),
    );
    assert!(report.is_clean(), "{}", report.to_json().unwrap());
    assert!(report.single_batch);
    assert_eq!(report.agreed, 1000);
}

#[test]
fn threaded_executor_matches_sequential() {
    let program = synthesize(3, 300, false);
    let expected: Vec<bool> = evaluate_all(&program.lists, &program.symbols)
        .into_iter()
        .map(Result::unwrap)
        .collect();
    let dispatcher = Dispatcher::with_config(
        ThreadedExecutor { threads: 4 },
        DispatchConfig {
            flatten_workers: 4,
            ..DispatchConfig::default()
        },
    );
    assert_eq!(
        dispatcher.submit_batch(&program.lists, &program.symbols).unwrap(),
        expected
    );
}

#[test]
fn numeric_logical_guards_only_diverge_toward_batch_errors() {
    let program = synthesize(5, 400, true);
    let report = cross_check(
        &program.lists,
        &program.symbols,
        &Dispatcher::new(HostExecutor),
    );
    assert!(!report.single_batch);
    for divergence in &report.divergences {
        assert!(matches!(divergence.sequential, Outcome::Value { .. }));
        assert!(divergence.batch.is_error());
    }
}

#[test]
fn parallel_flatten_is_deterministic() {
    let program = synthesize(19, 250, false);
    let reference = Batch::flatten(&program.lists, &program.symbols, 1).unwrap();
    for workers in [2, 5, 16] {
        let batch = Batch::flatten(&program.lists, &program.symbols, workers).unwrap();
        assert_eq!(batch.fingerprint(), reference.fingerprint());
        assert_eq!(batch.nodes(), reference.nodes());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn batch_agrees_with_sequential_for_any_seed(seed in any::<u64>()) {
        let program = synthesize(seed, 50, false);
        let sequential: Vec<bool> = evaluate_all(&program.lists, &program.symbols)
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap();
        let batch = Dispatcher::new(HostExecutor)
            .submit_batch(&program.lists, &program.symbols)
            .unwrap();
        prop_assert_eq!(sequential, batch);
    }
}
