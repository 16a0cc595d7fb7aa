//! Transition table types.
//!
//! A definition is a list of records, one per line:
//!
//! ```text
//! 0:t>8000
//! 20:t>20
//! 4:S>6
//! 8000:t>4
//! ```
//!
//! Each record reads "in state `0`, input `t` moves to state `8000`". The
//! symbol is a single character and may itself be `:` or `>`.

use crate::error::{DefinitionError, RecordErrorKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// State identifier.
pub type StateId = i32;

/// A single `(from_state, on_symbol, to_state)` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transition {
    pub from_state: StateId,
    pub on_symbol: char,
    pub to_state: StateId,
}

impl Transition {
    pub fn new(from_state: StateId, on_symbol: char, to_state: StateId) -> Self {
        Self {
            from_state,
            on_symbol,
            to_state,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}>{}", self.from_state, self.on_symbol, self.to_state)
    }
}

impl FromStr for Transition {
    type Err = RecordErrorKind;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let (from, rest) = record
            .split_once(':')
            .ok_or(RecordErrorKind::MissingSeparator)?;
        let from_state = parse_state(from)?;

        let mut chars = rest.chars();
        let on_symbol = match chars.next() {
            Some(c) if !c.is_whitespace() => c,
            _ => return Err(RecordErrorKind::MissingSymbol),
        };
        if chars.next() != Some('>') {
            return Err(RecordErrorKind::MissingArrow { symbol: on_symbol });
        }

        let target = chars.as_str();
        if target.is_empty() {
            return Err(RecordErrorKind::MissingTarget);
        }
        let (digits, trailing) = split_number(target);
        if digits.is_empty() {
            return Err(RecordErrorKind::InvalidState {
                text: target.to_string(),
            });
        }
        if !trailing.is_empty() {
            return Err(RecordErrorKind::TrailingInput {
                text: trailing.to_string(),
            });
        }
        let to_state = parse_state(digits)?;

        Ok(Self::new(from_state, on_symbol, to_state))
    }
}

/// Splits an optionally signed run of ASCII digits off the front of `s`.
fn split_number(s: &str) -> (&str, &str) {
    let sign = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return ("", s);
    }
    s.split_at(sign + digits)
}

fn parse_state(text: &str) -> Result<StateId, RecordErrorKind> {
    text.parse().map_err(|_| RecordErrorKind::InvalidState {
        text: text.to_string(),
    })
}

/// How to treat two records that share `(from_state, on_symbol)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep every record; lookups resolve to the earliest one.
    #[default]
    FirstWins,
    /// Refuse the definition.
    Reject,
}

/// Validated, immutable transition table.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    /// Transitions in definition order.
    transitions: Vec<Transition>,

    /// (from_state, symbol) -> position of the first matching transition.
    index: HashMap<(StateId, char), usize>,

    /// Distinct symbols in first-seen order.
    alphabet: Vec<char>,
    symbols: HashSet<char>,

    /// CRC32C of the normalised records.
    checksum: String,
}

impl TransitionTable {
    /// Builds a table from raw records, keeping the first of any duplicates.
    pub fn build<I, S>(records: I) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build_with(records, DuplicatePolicy::FirstWins)
    }

    /// Builds a table from raw records. Records are numbered from 1.
    pub fn build_with<I, S>(records: I, policy: DuplicatePolicy) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let numbered = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| (i + 1, record));
        Self::from_numbered(numbered, policy)
    }

    /// Parses a whole definition source, one record per line.
    ///
    /// Blank lines are skipped; error positions are source line numbers.
    pub fn parse(source: &str, policy: DuplicatePolicy) -> Result<Self, DefinitionError> {
        let numbered = source
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());
        Self::from_numbered(numbered, policy)
    }

    fn from_numbered<I, S>(records: I, policy: DuplicatePolicy) -> Result<Self, DefinitionError>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut transitions = Vec::new();
        let mut index = HashMap::new();
        let mut lines = HashMap::new();
        let mut alphabet = Vec::new();
        let mut symbols = HashSet::new();

        for (line, record) in records {
            let record = record.as_ref();
            let transition: Transition = record.parse().map_err(|kind| DefinitionError {
                line,
                record: record.to_string(),
                kind,
            })?;

            let key = (transition.from_state, transition.on_symbol);
            if let Some(&first_line) = lines.get(&key) {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(DefinitionError {
                            line,
                            record: record.to_string(),
                            kind: RecordErrorKind::Ambiguous {
                                state: transition.from_state,
                                symbol: transition.on_symbol,
                                first_line,
                            },
                        });
                    }
                    DuplicatePolicy::FirstWins => {
                        tracing::warn!(
                            line,
                            first_line,
                            "transition '{}' is shadowed by an earlier definition",
                            transition
                        );
                    }
                }
            } else {
                lines.insert(key, line);
                index.insert(key, transitions.len());
            }

            if symbols.insert(transition.on_symbol) {
                alphabet.push(transition.on_symbol);
            }
            transitions.push(transition);
        }

        let normalised: String = transitions.iter().map(|t| format!("{}\n", t)).collect();
        let checksum = format!("{:08x}", crc32c::crc32c(normalised.as_bytes()));

        tracing::info!(
            transitions = transitions.len(),
            alphabet = alphabet.len(),
            %checksum,
            "transition table built"
        );

        Ok(Self {
            transitions,
            index,
            alphabet,
            symbols,
            checksum,
        })
    }

    /// Returns the first transition defined for `state` on `symbol`.
    pub fn lookup(&self, state: StateId, symbol: char) -> Option<&Transition> {
        self.index
            .get(&(state, symbol))
            .map(|&position| &self.transitions[position])
    }

    /// Returns true if any transition, from any state, consumes `symbol`.
    pub fn has_symbol(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    /// All transitions in definition order.
    pub fn all(&self) -> &[Transition] {
        &self.transitions
    }

    /// Distinct input symbols in the order they were first defined.
    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Hex CRC32C of the definition, for correlating logs and reports.
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> TransitionTable {
        TransitionTable::build(["0:t>8000", "20:t>20", "4:S>6", "8000:t>4"]).unwrap()
    }

    #[test]
    fn test_parse_record() {
        let t: Transition = "0:a>1".parse().unwrap();
        assert_eq!(t, Transition::new(0, 'a', 1));

        let t: Transition = "-3:Z>+12".parse().unwrap();
        assert_eq!(t, Transition::new(-3, 'Z', 12));

        // The symbol slot takes any character, separators included.
        let t: Transition = "1:>>2".parse().unwrap();
        assert_eq!(t, Transition::new(1, '>', 2));
        let t: Transition = "1::>2".parse().unwrap();
        assert_eq!(t, Transition::new(1, ':', 2));
    }

    #[test]
    fn test_malformed_records() {
        let cases = [
            ("0a>1", RecordErrorKind::MissingSeparator),
            (
                "x:a>1",
                RecordErrorKind::InvalidState {
                    text: "x".to_string(),
                },
            ),
            ("0:", RecordErrorKind::MissingSymbol),
            ("0:a", RecordErrorKind::MissingArrow { symbol: 'a' }),
            ("0:ab>1", RecordErrorKind::MissingArrow { symbol: 'a' }),
            ("0:a>", RecordErrorKind::MissingTarget),
            (
                "0:a>b",
                RecordErrorKind::InvalidState {
                    text: "b".to_string(),
                },
            ),
            (
                "0:a>1x",
                RecordErrorKind::TrailingInput {
                    text: "x".to_string(),
                },
            ),
            (
                "0:a>99999999999",
                RecordErrorKind::InvalidState {
                    text: "99999999999".to_string(),
                },
            ),
        ];

        for (record, expected) in cases {
            assert_eq!(record.parse::<Transition>(), Err(expected), "{}", record);
        }
    }

    #[test]
    fn test_transition_lookup() {
        let table = sample_table();

        assert_eq!(table.len(), 4);
        assert_eq!(table.lookup(0, 't').map(|t| t.to_state), Some(8000));
        assert_eq!(table.lookup(8000, 't').map(|t| t.to_state), Some(4));
        assert_eq!(table.lookup(4, 'S').map(|t| t.to_state), Some(6));

        // Valid symbol, but no move from this state
        assert!(table.lookup(6, 't').is_none());
        assert!(table.lookup(0, 'S').is_none());
    }

    #[test]
    fn test_has_symbol_is_alphabet_wide() {
        let table = sample_table();

        assert!(table.has_symbol('t'));
        assert!(table.has_symbol('S'));
        assert!(!table.has_symbol('z'));
        assert!(!table.has_symbol('s'));
        assert_eq!(table.alphabet(), &['t', 'S']);
    }

    #[test]
    fn test_first_defined_wins() {
        let table = TransitionTable::build(["0:a>1", "0:a>2", "1:a>0"]).unwrap();

        assert_eq!(table.lookup(0, 'a').map(|t| t.to_state), Some(1));
        // The shadowed record is still listed
        assert_eq!(table.len(), 3);
        assert_eq!(table.all()[1], Transition::new(0, 'a', 2));
    }

    #[test]
    fn test_reject_duplicates() {
        let result =
            TransitionTable::build_with(["0:a>1", "1:b>0", "0:a>2"], DuplicatePolicy::Reject);

        let err = result.unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(
            err.kind,
            RecordErrorKind::Ambiguous {
                state: 0,
                symbol: 'a',
                first_line: 1
            }
        );
    }

    #[test]
    fn test_build_stops_at_first_bad_record() {
        let err = TransitionTable::build(["0:a>1", "0:a", "garbage"]).unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.record, "0:a");
    }

    #[test]
    fn test_parse_source_skips_blank_lines() {
        let source = "0:a>1\n\n  1:b>2  \r\n\n2:c>0\n";
        let table = TransitionTable::parse(source, DuplicatePolicy::FirstWins).unwrap();

        assert_eq!(
            table.all(),
            &[
                Transition::new(0, 'a', 1),
                Transition::new(1, 'b', 2),
                Transition::new(2, 'c', 0),
            ]
        );

        let err = TransitionTable::parse("0:a>1\n\n1:b\n", DuplicatePolicy::FirstWins).unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let table = sample_table();
        let listed: Vec<String> = table.all().iter().map(|t| t.to_string()).collect();

        assert_eq!(listed, ["0:t>8000", "20:t>20", "4:S>6", "8000:t>4"]);
    }

    #[test]
    fn test_checksum_tracks_definition() {
        let a = sample_table();
        let source = "0:t>8000\n20:t>20\n4:S>6\n8000:t>4\n";
        let b = TransitionTable::parse(source, DuplicatePolicy::FirstWins).unwrap();
        let c = TransitionTable::build(["0:t>8001"]).unwrap();

        assert_eq!(a.checksum().len(), 8);
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.checksum(), c.checksum());
    }

    #[test]
    fn test_empty_table() {
        let table = TransitionTable::build(Vec::<String>::new()).unwrap();

        assert!(table.is_empty());
        assert!(!table.has_symbol('a'));
        assert!(table.lookup(0, 'a').is_none());
    }
}
