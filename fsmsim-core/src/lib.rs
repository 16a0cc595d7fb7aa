//! # fsmsim-core
//!
//! Deterministic finite-state machine simulator.
//!
//! This crate provides:
//! - Transition table parsing and validation
//! - Step-by-step execution against a table
//! - An interactive step debugger driven by a command source

pub mod debugger;
pub mod engine;
pub mod error;
pub mod table;

pub use debugger::{Command, CommandSource, Debugger, Outcome, Response, Status};
pub use engine::{Engine, Snapshot, Step, INITIAL_STATE};
pub use error::{CoreError, DefinitionError, RecordErrorKind, StepError};
pub use table::{DuplicatePolicy, StateId, Transition, TransitionTable};
