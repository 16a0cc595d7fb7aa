//! fsmsim - Deterministic finite-state machine simulator
//!
//! Runs a transition table over a file of input symbols, either straight
//! through or one step at a time under the interactive debugger.

mod config;
mod loader;
mod output;
mod repl;
mod selfcheck;

use clap::Parser;
use colored::Colorize;
use config::Config;
use fsmsim_core::{CoreError, Debugger, Engine, Outcome, Step};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fsmsim")]
#[command(about = "Simulate a deterministic finite-state machine")]
#[command(version)]
struct Cli {
    /// Step through the inputs interactively
    #[arg(short, long)]
    debug: bool,

    /// Reject definitions with more than one transition per (state, input)
    #[arg(long)]
    strict: bool,

    /// Print the run as a JSON report instead of narration
    #[arg(long, conflicts_with = "debug")]
    json: bool,

    /// Run the built-in sanity check first
    #[arg(long)]
    self_check: bool,

    /// YAML configuration file
    #[arg(short, long, env = "FSMSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Transition definition file (one `state:input>next` per line)
    definition: PathBuf,

    /// Input file (one symbol per line)
    inputs: PathBuf,
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::FAILURE;
        }
    };

    // Flags override file and environment
    if cli.strict {
        config.definition.reject_duplicates = true;
    }
    if cli.self_check {
        config.self_check = true;
    }
    if !config.output.color {
        colored::control::set_override(false);
    }

    match execute(&cli, &config, &mut std::io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}

/// Runs the built-in check. With `--json` stdout carries only the report,
/// so the banner goes to the log instead.
fn self_check(json: bool, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    selfcheck::run().map_err(|reason| format!("TESTING FAILED ({})", reason))?;
    if json {
        tracing::info!("self check passed");
    } else {
        writeln!(out, "{}", "SUCCESS: TESTING PASSED".green())?;
    }
    Ok(())
}

fn execute(cli: &Cli, config: &Config, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
    let text = !cli.json;

    if config.self_check {
        self_check(cli.json, out)?;
    }

    if text {
        writeln!(out, "{}", output::processing_definition(&cli.definition))?;
    }
    let table = loader::load_table(&cli.definition, config.definition.duplicate_policy())?;
    if text {
        writeln!(out, "{}", output::transition_count(&table))?;
    }
    tracing::info!(
        path = %cli.definition.display(),
        checksum = table.checksum(),
        "definition loaded"
    );

    if text {
        writeln!(out, "{}", output::processing_inputs(&cli.inputs))?;
    }
    let symbols = loader::load_symbols(&cli.inputs)?;
    tracing::info!(path = %cli.inputs.display(), symbols = symbols.len(), "inputs loaded");

    let mut engine = Engine::new(&table);

    if cli.debug {
        let mut debugger = Debugger::new(engine, symbols);
        if let Outcome::Finished(snapshot) = repl::run(&mut debugger, &config.debugger)? {
            writeln!(out, "{}", output::summary(&snapshot))?;
        }
        return Ok(());
    }

    let narrate = text && config.output.narrate;
    let mut steps: Vec<Step> = Vec::new();
    let mut written = Ok(());
    let run = engine.run_with(symbols.iter().copied(), |step| {
        if narrate && written.is_ok() {
            written = writeln!(out, "{}", output::step(step));
        }
        if cli.json {
            steps.push(*step);
        }
    });
    written?;
    run.map_err(|e| {
        let e = CoreError::from(e);
        tracing::debug!(code = e.error_code(), "run aborted");
        e
    })?;

    if cli.json {
        let report = output::Report {
            definition: &cli.definition,
            inputs: &cli.inputs,
            checksum: table.checksum(),
            transitions: table.all(),
            steps: &steps,
            final_snapshot: engine.snapshot(),
        };
        writeln!(out, "{}", report.to_json())?;
    } else {
        writeln!(out, "{}", output::summary(&engine.snapshot()))?;
    }

    Ok(())
}
