//! Execution engine - walks a transition table one input symbol at a time.

use crate::error::StepError;
use crate::table::{StateId, TransitionTable};
use serde::{Deserialize, Serialize};

/// State every run starts from.
pub const INITIAL_STATE: StateId = 0;

/// A transition that was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 0-based position of the consumed symbol.
    pub index: usize,
    pub symbol: char,
    pub from: StateId,
    pub to: StateId,
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_state: StateId,
    pub step_count: usize,
}

/// Drives a borrowed transition table from the initial state.
#[derive(Debug)]
pub struct Engine<'t> {
    table: &'t TransitionTable,
    current_state: StateId,
    step_count: usize,
}

impl<'t> Engine<'t> {
    pub fn new(table: &'t TransitionTable) -> Self {
        Self {
            table,
            current_state: INITIAL_STATE,
            step_count: 0,
        }
    }

    /// Consumes one symbol and returns the applied transition.
    ///
    /// The symbol is first checked against the whole alphabet, then looked
    /// up from the current state. On error the engine is left unchanged.
    pub fn step(&mut self, symbol: char) -> Result<Step, StepError> {
        let index = self.step_count;

        if !self.table.has_symbol(symbol) {
            tracing::debug!(step = index, %symbol, "symbol outside alphabet");
            return Err(StepError::InvalidSymbol {
                symbol,
                step: index,
            });
        }

        let transition = self
            .table
            .lookup(self.current_state, symbol)
            .ok_or_else(|| {
                tracing::debug!(step = index, state = self.current_state, %symbol, "dead end");
                StepError::NoTransition {
                    state: self.current_state,
                    symbol,
                    step: index,
                }
            })?;

        let step = Step {
            index,
            symbol,
            from: self.current_state,
            to: transition.to_state,
        };
        self.current_state = step.to;
        self.step_count += 1;

        tracing::debug!(
            step = step.index,
            %symbol,
            from = step.from,
            to = step.to,
            "transition applied"
        );

        Ok(step)
    }

    /// Consumes one symbol and returns the new current state.
    pub fn advance(&mut self, symbol: char) -> Result<StateId, StepError> {
        self.step(symbol).map(|step| step.to)
    }

    /// Consumes every symbol in order, stopping at the first failure.
    pub fn run<I>(&mut self, symbols: I) -> Result<StateId, StepError>
    where
        I: IntoIterator<Item = char>,
    {
        self.run_with(symbols, |_| {})
    }

    /// Like [`Engine::run`], reporting each applied step to `observer`.
    pub fn run_with<I, F>(&mut self, symbols: I, mut observer: F) -> Result<StateId, StepError>
    where
        I: IntoIterator<Item = char>,
        F: FnMut(&Step),
    {
        for symbol in symbols {
            let step = self.step(symbol)?;
            observer(&step);
        }
        Ok(self.current_state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_state: self.current_state,
            step_count: self.step_count,
        }
    }

    pub fn current_state(&self) -> StateId {
        self.current_state
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// The table this engine runs against.
    pub fn table(&self) -> &'t TransitionTable {
        self.table
    }
}
