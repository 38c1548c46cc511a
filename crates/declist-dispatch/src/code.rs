//! Per-node result codes returned by the external evaluator.

/// One result code per dispatched node.
///
/// The numeric values are part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ResultCode {
    /// The node failed to evaluate. Fails the whole batch.
    Error = 0,
    /// The guard held and the node's outcome is `false`.
    False = 1,
    /// The guard held and the node's outcome is `true`.
    True = 2,
    /// The node contributes no outcome and is skipped during recombination.
    ///
    /// Provisional: whether external evaluators emit this code in practice,
    /// or reserve it for a later feature, is not settled. The in-process
    /// executor uses it for a guard that does not hold.
    Ignore = 3,
}

impl ResultCode {
    /// Parse a raw code; `None` for anything outside `0..=3`.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Error),
            1 => Some(Self::False),
            2 => Some(Self::True),
            3 => Some(Self::Ignore),
            _ => None,
        }
    }

    /// The wire value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// The code for a node whose guard held.
    pub fn from_outcome(outcome: bool) -> Self {
        if outcome {
            Self::True
        } else {
            Self::False
        }
    }

    /// `Some(outcome)` for True/False, `None` otherwise.
    pub fn decision(self) -> Option<bool> {
        match self {
            Self::True => Some(true),
            Self::False => Some(false),
            Self::Error | Self::Ignore => None,
        }
    }
}
