//! Error types for graph construction and learning configuration.

use thiserror::Error;

use crate::types::{ActionKey, StateKey};

/// Errors raised while building the turn graph or configuring a learning run.
///
/// All of them are configuration or contract violations detected at call time.
/// Once a [`crate::policy::Turn`] exists, sampling and learning cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MdpError {
    /// Policy mode string is neither `uniform` nor `random`.
    #[error("policy mode must be one of (\"random\", \"uniform\"): {0:?} has been given")]
    InvalidPolicyMode(String),

    /// Step outside 0..=4.
    #[error("invalid step {0}: steps range from 0 to 4")]
    InvalidStep(u8),

    /// Die face outside 1..=6.
    #[error("invalid die face {0}: faces range from 1 to 6")]
    InvalidFace(u8),

    /// Dice sequence not in non-decreasing order.
    #[error("dice {0:?} are not in canonical (non-decreasing) order")]
    NonCanonicalDice(Vec<u8>),

    /// Hand holds more than five dice.
    #[error("a hand holds at most 5 dice: {0} given")]
    TooManyDice(usize),

    /// Hand size does not match what its step requires.
    #[error("step {step} requires {expected} dice, {actual} given")]
    WrongHandSize {
        step: u8,
        expected: usize,
        actual: usize,
    },

    /// Two states share an identity key.
    #[error("duplicate state {0}")]
    DuplicateState(StateKey),

    /// Actions requested for the absorbing state.
    #[error("terminal state {0} has no actions")]
    TerminalState(StateKey),

    /// Action collection rejected when attached to a state.
    #[error("malformed actions for state {state}: {reason}")]
    MalformedActions { state: StateKey, reason: String },

    /// Transition target absent from the graph.
    #[error("action {action} leads to unknown state {key}")]
    MissingSuccessor { action: ActionKey, key: StateKey },

    /// Learning hyperparameter out of range.
    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, MdpError>;
