//! Interactive debugger prompt.

use crate::config::DebuggerConfig;
use crate::output;
use colored::Colorize;
use fsmsim_core::{CommandSource, Debugger, Outcome, StepError};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use std::path::PathBuf;

/// Line-editor backed command source.
struct Prompt {
    editor: Editor<(), DefaultHistory>,
    prompt: String,
    history_path: Option<PathBuf>,
    /// Terminal failure that closed the source.
    failure: Option<ReadlineError>,
}

impl Prompt {
    fn new(config: &DebuggerConfig) -> Result<Self, ReadlineError> {
        let rl_config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();
        let mut editor: Editor<(), DefaultHistory> = Editor::with_config(rl_config)?;

        if let Some(path) = &config.history_file {
            if let Err(e) = editor.load_history(path) {
                tracing::debug!(path = %path.display(), error = %e, "no debugger history loaded");
            }
        }

        Ok(Self {
            editor,
            prompt: format!("{} ", config.prompt.trim_end()),
            history_path: config.history_file.clone(),
            failure: None,
        })
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_path {
            if let Err(e) = self.editor.save_history(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to save debugger history");
            }
        }
    }
}

impl CommandSource for Prompt {
    fn next_command(&mut self) -> Option<String> {
        loop {
            match self.editor.readline(&self.prompt.cyan().to_string()) {
                Ok(line) => return Some(line),
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    return None;
                }
                Err(err) => {
                    self.failure = Some(err);
                    return None;
                }
            }
        }
    }
}

/// Runs a debugger session on the terminal until every symbol is consumed
/// or the user closes input.
pub fn run(
    debugger: &mut Debugger<'_>,
    config: &DebuggerConfig,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let mut prompt = Prompt::new(config)?;

    let result: Result<Outcome, StepError> =
        debugger.run(&mut prompt, |response| println!("{}", output::response(response)));

    prompt.save_history();

    let outcome = conclude(result, prompt.failure.take())?;
    if let Outcome::Detached(snapshot) = outcome {
        println!(
            "{}",
            format!(
                "Session closed after {} steps at state {}",
                snapshot.step_count, snapshot.current_state
            )
            .dimmed()
        );
    }

    Ok(outcome)
}

/// A read failure outranks the detached outcome it caused.
fn conclude(
    result: Result<Outcome, StepError>,
    failure: Option<ReadlineError>,
) -> Result<Outcome, Box<dyn std::error::Error>> {
    let outcome = result?;
    match (outcome, failure) {
        (Outcome::Detached(snapshot), Some(err)) => Err(format!(
            "failed to read debugger command after {} steps: {}",
            snapshot.step_count, err
        )
        .into()),
        (outcome, _) => Ok(outcome),
    }
}
