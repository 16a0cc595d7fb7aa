//! Interactive step debugger.
//!
//! The debugger owns an [`Engine`] and a pre-loaded symbol sequence, and
//! advances one symbol per `n` command. `p` reports the current state and
//! the full transition listing without touching the engine.

use crate::engine::{Engine, Snapshot, Step};
use crate::error::StepError;
use crate::table::{StateId, Transition};

/// A debugger command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `p` - print current state and the transition table.
    Print,
    /// `n` - consume the next input symbol.
    Next,
}

impl Command {
    /// Parses one command line. Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" => Some(Command::Print),
            "n" => Some(Command::Next),
            _ => None,
        }
    }
}

/// Debugger session status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    /// Every input symbol has been consumed.
    Finished,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response<'t> {
    Inspect {
        current_state: StateId,
        step_count: usize,
        transitions: &'t [Transition],
    },
    Stepped(Step),
    /// `n` after the last symbol was consumed.
    Exhausted(Snapshot),
    Rejected {
        input: String,
    },
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// All symbols were consumed.
    Finished(Snapshot),
    /// The command source ran dry first.
    Detached(Snapshot),
}

impl Outcome {
    pub fn snapshot(&self) -> Snapshot {
        match self {
            Outcome::Finished(s) | Outcome::Detached(s) => *s,
        }
    }
}

/// Source of command lines, e.g. a terminal prompt.
pub trait CommandSource {
    /// Returns the next command line, or `None` once input is exhausted.
    fn next_command(&mut self) -> Option<String>;
}

impl<I> CommandSource for I
where
    I: Iterator<Item = String>,
{
    fn next_command(&mut self) -> Option<String> {
        self.next()
    }
}

pub struct Debugger<'t> {
    engine: Engine<'t>,
    symbols: Vec<char>,
    status: Status,
}

impl<'t> Debugger<'t> {
    pub fn new(engine: Engine<'t>, symbols: Vec<char>) -> Self {
        let status = if engine.step_count() >= symbols.len() {
            Status::Finished
        } else {
            Status::Running
        };
        Self {
            engine,
            symbols,
            status,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    /// Symbols not yet consumed.
    pub fn remaining(&self) -> &[char] {
        self.symbols
            .get(self.engine.step_count()..)
            .unwrap_or_default()
    }

    /// Executes a single command line.
    ///
    /// A [`StepError`] is fatal for the session; the caller should stop.
    pub fn execute(&mut self, line: &str) -> Result<Response<'t>, StepError> {
        match Command::parse(line) {
            Some(Command::Print) => {
                let snapshot = self.engine.snapshot();
                Ok(Response::Inspect {
                    current_state: snapshot.current_state,
                    step_count: snapshot.step_count,
                    transitions: self.engine.table().all(),
                })
            }
            Some(Command::Next) => {
                let Some(&symbol) = self.remaining().first() else {
                    self.status = Status::Finished;
                    return Ok(Response::Exhausted(self.engine.snapshot()));
                };
                let step = self.engine.step(symbol)?;
                if self.remaining().is_empty() {
                    self.status = Status::Finished;
                }
                Ok(Response::Stepped(step))
            }
            None => {
                tracing::debug!(input = line, "rejected debugger command");
                Ok(Response::Rejected {
                    input: line.trim().to_string(),
                })
            }
        }
    }

    /// Reads and executes commands until all symbols are consumed or the
    /// source is exhausted, passing every response to `on_response`.
    pub fn run<S, F>(&mut self, source: &mut S, mut on_response: F) -> Result<Outcome, StepError>
    where
        S: CommandSource + ?Sized,
        F: FnMut(&Response<'t>),
    {
        while self.status == Status::Running {
            let Some(line) = source.next_command() else {
                tracing::debug!(step = self.engine.step_count(), "command source closed");
                return Ok(Outcome::Detached(self.snapshot()));
            };
            let response = self.execute(&line)?;
            on_response(&response);
        }
        Ok(Outcome::Finished(self.snapshot()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TransitionTable;

    fn commands(lines: &[&str]) -> impl Iterator<Item = String> {
        lines
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    fn sample_table() -> TransitionTable {
        TransitionTable::build(["0:t>8000", "20:t>20", "4:S>6", "8000:t>4"]).unwrap()
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(Command::parse("p"), Some(Command::Print));
        assert_eq!(Command::parse(" n \n"), Some(Command::Next));
        assert_eq!(Command::parse("x"), None);
        assert_eq!(Command::parse("pn"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn test_print_does_not_mutate() {
        let table = sample_table();
        let mut debugger = Debugger::new(Engine::new(&table), "ttS".chars().collect());

        let response = debugger.execute("p").unwrap();

        assert_eq!(
            response,
            Response::Inspect {
                current_state: 0,
                step_count: 0,
                transitions: table.all(),
            }
        );
        assert_eq!(debugger.snapshot().step_count, 0);
        assert_eq!(debugger.status(), Status::Running);
    }

    #[test]
    fn test_invalid_command_is_rejected() {
        let table = sample_table();
        let mut debugger = Debugger::new(Engine::new(&table), "ttS".chars().collect());

        let response = debugger.execute("q").unwrap();

        assert_eq!(
            response,
            Response::Rejected {
                input: "q".to_string()
            }
        );
        assert_eq!(debugger.snapshot().current_state, 0);
        assert_eq!(debugger.status(), Status::Running);
    }

    #[test]
    fn test_step_through_to_finish() {
        let table = sample_table();
        let mut debugger = Debugger::new(Engine::new(&table), "ttS".chars().collect());
        let mut responses = Vec::new();

        let outcome = debugger
            .run(&mut commands(&["n", "p", "x", "n", "n", "p"]), |r| {
                responses.push(r.clone())
            })
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Finished(Snapshot {
                current_state: 6,
                step_count: 3
            })
        );
        // The trailing "p" is never read
        assert_eq!(responses.len(), 5);
        assert!(matches!(
            responses[1],
            Response::Inspect {
                current_state: 8000,
                step_count: 1,
                ..
            }
        ));
        assert!(matches!(responses[2], Response::Rejected { .. }));
        assert!(matches!(
            responses[4],
            Response::Stepped(Step {
                index: 2,
                from: 4,
                to: 6,
                ..
            })
        ));
        assert_eq!(debugger.status(), Status::Finished);
    }

    #[test]
    fn test_source_exhausted_detaches() {
        let table = sample_table();
        let mut debugger = Debugger::new(Engine::new(&table), "ttS".chars().collect());

        let outcome = debugger.run(&mut commands(&["n"]), |_| {}).unwrap();

        assert_eq!(
            outcome,
            Outcome::Detached(Snapshot {
                current_state: 8000,
                step_count: 1
            })
        );
        assert_eq!(debugger.remaining(), &['t', 'S']);
    }

    #[test]
    fn test_step_error_is_fatal() {
        let table = TransitionTable::build(["0:a>1"]).unwrap();
        let mut debugger = Debugger::new(Engine::new(&table), "aa".chars().collect());

        let result = debugger.run(&mut commands(&["n", "n", "n"]), |_| {});

        assert_eq!(
            result,
            Err(StepError::NoTransition {
                state: 1,
                symbol: 'a',
                step: 1
            })
        );
        assert_eq!(debugger.snapshot().step_count, 1);
    }

    #[test]
    fn test_next_after_finish_is_exhausted() {
        let table = TransitionTable::build(["0:a>1"]).unwrap();
        let mut debugger = Debugger::new(Engine::new(&table), vec!['a']);

        assert!(matches!(
            debugger.execute("n").unwrap(),
            Response::Stepped(_)
        ));
        assert_eq!(debugger.status(), Status::Finished);
        assert_eq!(
            debugger.execute("n").unwrap(),
            Response::Exhausted(Snapshot {
                current_state: 1,
                step_count: 1
            })
        );
    }

    #[test]
    fn test_empty_input_finishes_immediately() {
        let table = sample_table();
        let mut debugger = Debugger::new(Engine::new(&table), Vec::new());
        let mut called = false;

        let outcome = debugger.run(&mut commands(&["p"]), |_| called = true).unwrap();

        assert_eq!(outcome, Outcome::Finished(debugger.snapshot()));
        assert!(!called);
    }
}
