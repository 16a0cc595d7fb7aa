//! Output formatting for batch runs and debugger sessions.

use colored::Colorize;
use fsmsim_core::{Response, Snapshot, Step, Transition, TransitionTable};
use serde::Serialize;
use std::path::Path;

pub const INVALID_COMMAND: &str =
    "invalid input. Enter p to print current state or n to move one step forward.";

pub fn processing_definition(path: &Path) -> String {
    format!("processing FSM definition file {}", path.display())
}

pub fn processing_inputs(path: &Path) -> String {
    format!("processing FSM inputs file {}", path.display())
}

pub fn transition_count(table: &TransitionTable) -> String {
    format!("FSM has {} transitions", table.len())
}

pub fn step(step: &Step) -> String {
    format!(
        "at step {}, input {} transitions FSM from state {} to state {}",
        step.index,
        step.symbol.to_string().cyan(),
        step.from,
        step.to.to_string().yellow()
    )
}

pub fn summary(snapshot: &Snapshot) -> String {
    format!(
        "after {} steps, state machine finished successfully at state {}",
        snapshot.step_count,
        snapshot.current_state.to_string().green()
    )
}

/// Formats a table listing, one line per transition in definition order.
pub fn listing(current_state: i32, transitions: &[Transition]) -> String {
    let mut output = format!(
        "The FSM is currently in state {}\nFSM has {} transitions",
        current_state.to_string().yellow(),
        transitions.len()
    );
    for (i, t) in transitions.iter().enumerate() {
        output.push_str(&format!(
            "\ntransition {}: state {} with input {} goes to state {}",
            i,
            t.from_state,
            t.on_symbol.to_string().cyan(),
            t.to_state
        ));
    }
    output
}

/// Formats a debugger response.
pub fn response(response: &Response<'_>) -> String {
    match response {
        Response::Inspect {
            current_state,
            transitions,
            ..
        } => listing(*current_state, transitions),
        Response::Stepped(s) => step(s),
        Response::Exhausted(snapshot) => format!(
            "{} all inputs consumed at state {}",
            "Done:".dimmed(),
            snapshot.current_state
        ),
        Response::Rejected { .. } => format!("{}: {}", "Error".red(), INVALID_COMMAND),
    }
}

/// Machine-readable batch report.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub definition: &'a Path,
    pub inputs: &'a Path,
    pub checksum: &'a str,
    pub transitions: &'a [Transition],
    pub steps: &'a [Step],
    #[serde(rename = "final")]
    pub final_snapshot: Snapshot,
}

impl Report<'_> {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}
