//! Reads definition and input files into core types.

use fsmsim_core::{DefinitionError, DuplicatePolicy, TransitionTable};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while loading simulator inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {kind} file '{}': {source}", .path.display())]
    Io {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("in '{}': {source}", .path.display())]
    Definition {
        path: PathBuf,
        #[source]
        source: DefinitionError,
    },

    #[error("in '{}': line {line} ('{text}') must hold exactly one input symbol", .path.display())]
    Symbol {
        path: PathBuf,
        line: usize,
        text: String,
    },
}

/// Reads and validates a definition file.
pub fn load_table(path: &Path, policy: DuplicatePolicy) -> Result<TransitionTable, LoadError> {
    let source = read(path, "definition")?;
    TransitionTable::parse(&source, policy).map_err(|source| LoadError::Definition {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an input file: one symbol per line, blank lines ignored.
pub fn load_symbols(path: &Path) -> Result<Vec<char>, LoadError> {
    let source = read(path, "input")?;
    parse_symbols(&source).map_err(|(line, text)| LoadError::Symbol {
        path: path.to_path_buf(),
        line,
        text,
    })
}

/// Parses symbol lines, returning the offending line number and text on error.
pub fn parse_symbols(source: &str) -> Result<Vec<char>, (usize, String)> {
    let mut symbols = Vec::new();
    for (i, line) in source.lines().enumerate() {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(symbol), None) => symbols.push(symbol),
            _ => return Err((i + 1, text.to_string())),
        }
    }
    Ok(symbols)
}

fn read(path: &Path, kind: &'static str) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols("t\nt\nS\n"), Ok(vec!['t', 't', 'S']));
        assert_eq!(parse_symbols("a\r\n\n  b \n"), Ok(vec!['a', 'b']));
        assert_eq!(parse_symbols(""), Ok(vec![]));
        assert_eq!(parse_symbols("a\nbc\n"), Err((2, "bc".to_string())));
    }

    #[test]
    fn test_load_table() {
        let file = file_with("0:t>8000\n20:t>20\n4:S>6\n8000:t>4\n");

        let table = load_table(file.path(), DuplicatePolicy::FirstWins).unwrap();
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_load_table_reports_line() {
        let file = file_with("0:a>1\n0:a\n");

        let err = load_table(file.path(), DuplicatePolicy::FirstWins).unwrap_err();
        match err {
            LoadError::Definition { source, .. } => assert_eq!(source.line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_symbols() {
        let file = file_with("t\nt\nS\n");
        assert_eq!(load_symbols(file.path()).unwrap(), vec!['t', 't', 'S']);

        let bad = file_with("t\ntt\n");
        assert!(matches!(
            load_symbols(bad.path()),
            Err(LoadError::Symbol { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_symbols(Path::new("/nonexistent/inputs.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Io { kind: "input", .. }));
        assert!(err.to_string().starts_with("failed to read input file"));
    }
}
