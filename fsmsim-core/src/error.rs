//! Core error types.

use crate::table::StateId;
use thiserror::Error;

/// Why a single definition record could not be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordErrorKind {
    #[error("missing ':' after the source state")]
    MissingSeparator,

    #[error("'{text}' is not a valid state number")]
    InvalidState { text: String },

    #[error("missing input symbol after ':'")]
    MissingSymbol,

    #[error("expected '>' after input symbol '{symbol}'")]
    MissingArrow { symbol: char },

    #[error("missing target state after '>'")]
    MissingTarget,

    #[error("unexpected trailing input '{text}'")]
    TrailingInput { text: String },

    #[error("state {state} already has a transition on '{symbol}' (first defined at line {first_line})")]
    Ambiguous {
        state: StateId,
        symbol: char,
        first_line: usize,
    },
}

/// A definition record that does not describe a well-formed transition.
///
/// Construction stops at the first bad record; no partial table is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid definition at line {line} ('{record}'): {kind}")]
pub struct DefinitionError {
    /// 1-based line (or record number) of the offending record.
    pub line: usize,
    /// The record text as it was read.
    pub record: String,
    pub kind: RecordErrorKind,
}

/// A step the engine refused to take. The engine state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("'{symbol}' is invalid input (step {step})")]
    InvalidSymbol { symbol: char, step: usize },

    #[error("no transition from state {state} on input '{symbol}' (step {step})")]
    NoTransition {
        state: StateId,
        symbol: char,
        step: usize,
    },
}

impl StepError {
    /// Position in the symbol sequence of the symbol that failed.
    pub fn step(&self) -> usize {
        match self {
            StepError::InvalidSymbol { step, .. } | StepError::NoTransition { step, .. } => *step,
        }
    }

    /// The symbol that failed.
    pub fn symbol(&self) -> char {
        match self {
            StepError::InvalidSymbol { symbol, .. } | StepError::NoTransition { symbol, .. } => {
                *symbol
            }
        }
    }
}

/// Errors from the simulator core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Step(#[from] StepError),
}

impl CoreError {
    /// Returns a stable error code for reports.
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::Definition(e) => match e.kind {
                RecordErrorKind::Ambiguous { .. } => "AMBIGUOUS_TRANSITION",
                _ => "BAD_DEFINITION",
            },
            CoreError::Step(StepError::InvalidSymbol { .. }) => "INVALID_SYMBOL",
            CoreError::Step(StepError::NoTransition { .. }) => "NO_TRANSITION",
        }
    }
}
