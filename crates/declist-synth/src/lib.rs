//! Random program synthesis for declist.
//!
//! Produces a symbol table of typed variables and decision lists whose
//! guards compare a variable against a constant of the same type, using
//! only operators legal for that type. Every list ends in a default node,
//! so sequential evaluation of a synthesized list always terminates with
//! an outcome.

pub mod config;
pub mod generate;

pub use config::{SynthConfig, SynthError};
pub use generate::{legal_operators, random_value, Program, Synthesizer};
