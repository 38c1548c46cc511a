//! Cross-checking the sequential interpreter against batch dispatch.
//!
//! The two evaluators should agree list by list. A list that succeeds on
//! one side and fails on the other, or yields different outcomes, is a
//! divergence and is reported, never reconciled.

use declist_eval::evaluate_all;
use declist_types::{DecisionList, ErrorCategory, EvalResult, SymbolTable};
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatcher::Dispatcher;
use crate::error::DispatchResult;
use crate::executor::Executor;

/// What one evaluator concluded for one list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Outcome {
    Value { value: bool },
    Error { category: ErrorCategory, message: String },
}

impl Outcome {
    fn from_sequential(result: &EvalResult<bool>) -> Self {
        match result {
            Ok(value) => Self::Value { value: *value },
            Err(err) => Self::Error {
                category: err.category(),
                message: err.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Two outcomes agree when they hold the same value, or when both are
    /// failures of the same class.
    ///
    /// A Protocol failure agrees with any failure: the executor reports a
    /// bare Error code, which carries no class to compare.
    pub fn agrees_with(&self, other: &Outcome) -> bool {
        match (self, other) {
            (Self::Value { value: a }, Self::Value { value: b }) => a == b,
            (Self::Error { category: a, .. }, Self::Error { category: b, .. }) => {
                a == b || *a == ErrorCategory::Protocol || *b == ErrorCategory::Protocol
            }
            _ => false,
        }
    }
}

/// One list on which the evaluators disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Divergence {
    pub list: usize,
    pub sequential: Outcome,
    pub batch: Outcome,
}

/// Result of a cross-check run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParityReport {
    pub lists: usize,
    pub agreed: usize,
    /// Whether the lists went through as a single batch. When the batch
    /// failed, every list was resubmitted alone to localize the failure.
    pub single_batch: bool,
    pub divergences: Vec<Divergence>,
}

impl ParityReport {
    /// True when every list agreed.
    pub fn is_clean(&self) -> bool {
        self.divergences.is_empty()
    }

    /// Pretty-printed JSON, for attaching to a failing run.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Evaluate `lists` both sequentially and through `dispatcher`, and compare.
pub fn cross_check<E: Executor>(
    lists: &[DecisionList],
    symbols: &SymbolTable,
    dispatcher: &Dispatcher<E>,
) -> ParityReport {
    let sequential: Vec<Outcome> = evaluate_all(lists, symbols)
        .iter()
        .map(Outcome::from_sequential)
        .collect();

    let (batch, single_batch): (Vec<Outcome>, bool) = match dispatcher.submit_batch(lists, symbols) {
        Ok(values) => (
            values.into_iter().map(|value| Outcome::Value { value }).collect(),
            true,
        ),
        Err(err) => {
            info!(error = %err, "batch failed, resubmitting lists individually");
            let outcomes = lists
                .iter()
                .map(|list| {
                    batch_outcome(dispatcher.submit_batch(std::slice::from_ref(list), symbols))
                })
                .collect();
            (outcomes, false)
        }
    };

    let mut divergences = Vec::new();
    for (list, (seq, bat)) in sequential.into_iter().zip(batch).enumerate() {
        if !seq.agrees_with(&bat) {
            warn!(list, sequential = ?seq, batch = ?bat, "evaluators diverge");
            divergences.push(Divergence {
                list,
                sequential: seq,
                batch: bat,
            });
        }
    }

    ParityReport {
        lists: lists.len(),
        agreed: lists.len() - divergences.len(),
        single_batch,
        divergences,
    }
}

fn batch_outcome(result: DispatchResult<Vec<bool>>) -> Outcome {
    match result {
        Ok(values) => match values.first() {
            Some(value) => Outcome::Value { value: *value },
            None => Outcome::Error {
                category: ErrorCategory::Protocol,
                message: "batch returned no outcome".into(),
            },
        },
        Err(err) => Outcome::Error {
            category: err.category(),
            message: err.to_string(),
        },
    }
}
