//! Shared types for declist.
//!
//! This crate defines the value model, the expression and decision-list
//! AST, the symbol table, and the error taxonomy used by every other
//! crate in the workspace.

mod error;
mod symbols;
mod value;
pub mod ast;

pub use ast::{BinOp, DecisionList, DecisionNode, Expr};
pub use error::{ErrorCategory, EvalError, EvalResult};
pub use symbols::SymbolTable;
pub use value::{DataType, Value};
