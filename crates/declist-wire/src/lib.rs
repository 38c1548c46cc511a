//! declist wire format.
//!
//! Serializes expressions and decision-list nodes into the bracket-delimited
//! text consumed by the external batch evaluator, and parses that text back.
//!
//! Encoding resolves variables through the symbol table and reports failures
//! with the evaluator's error classes ([`declist_types::EvalError`]), so a
//! list that cannot be encoded fails with the same class as a list that
//! cannot be evaluated. Decoding failures are [`WireError`]s.

pub mod decode;
pub mod encode;
pub mod error;

pub use decode::{decode_expr, decode_list, decode_node};
pub use encode::{
    encode_expr, encode_list, encode_node, encode_value, flatten_for_dispatch, EncodedNode,
};
pub use error::{WireError, WireResult};
