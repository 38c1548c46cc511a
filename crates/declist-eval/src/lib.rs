//! declist sequential interpreter: reference implementation.
//!
//! Evaluates expressions and decision lists directly from the AST, one
//! node at a time. Its results are the host-side truth that batch
//! dispatch results are checked against.

pub mod evaluator;

pub use evaluator::{evaluate_all, evaluate_sequential, Evaluator};
