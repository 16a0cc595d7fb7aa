//! Built-in sanity check run before simulating when enabled.

use fsmsim_core::{Engine, TransitionTable};

const SAMPLE: [&str; 4] = ["0:t>8000", "20:t>20", "4:S>6", "8000:t>4"];

/// Exercises a single step, a full run and alphabet membership against a
/// known machine. Returns a description of the first failing check.
pub fn run() -> Result<(), String> {
    let table = TransitionTable::build(SAMPLE).map_err(|e| e.to_string())?;

    let mut engine = Engine::new(&table);
    match engine.advance('t') {
        Ok(8000) => {}
        other => return Err(format!("single step: expected Ok(8000), got {:?}", other)),
    }

    let mut engine = Engine::new(&table);
    match engine.run("ttS".chars()) {
        Ok(6) => {}
        other => return Err(format!("full run: expected Ok(6), got {:?}", other)),
    }

    if table.has_symbol('z') {
        return Err("alphabet check: 'z' reported as a valid symbol".to_string());
    }

    tracing::debug!(checksum = table.checksum(), "self check passed");
    Ok(())
}
