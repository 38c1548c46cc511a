//! declist batch dispatch and recombination.
//!
//! # Protocol
//!
//! 1. Every decision list is flattened to its encoded nodes; all nodes are
//!    concatenated in list order, then node order ([`Batch::flatten`]).
//! 2. The flat array is handed to an [`Executor`], which returns one raw
//!    result code per node, positionally: `0` Error, `1` False, `2` True,
//!    `3` Ignore ([`ResultCode`]).
//! 3. The codes are walked against the recorded list boundaries. Any Error
//!    code fails the batch; otherwise the first True/False code of each
//!    list is that list's outcome ([`Batch::recombine`]).
//!
//! [`parity::cross_check`] runs the sequential interpreter next to the
//! dispatcher and reports any list on which they disagree.

pub mod batch;
pub mod code;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod parity;

pub use batch::Batch;
pub use code::ResultCode;
pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use executor::{Executor, HostExecutor};
pub use parity::{cross_check, Divergence, Outcome, ParityReport};
