//! Simulator configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via --config; clap reads FSMSIM_CONFIG)
//! 3. Environment variables
//! 4. Command-line flags (applied by `main`)

use fsmsim_core::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Simulator configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Definition file handling.
    pub definition: DefinitionConfig,
    /// Output configuration.
    pub output: OutputConfig,
    /// Interactive debugger configuration.
    pub debugger: DebuggerConfig,
    /// Run the built-in sanity check before simulating.
    pub self_check: bool,
}

impl Config {
    /// Loads configuration from `path` if given, then applies environment
    /// variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Self::from_yaml(&content).map_err(|e| match e {
            ConfigError::ParseError(_, msg) => ConfigError::ParseError(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::new(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.definition.apply_env_overrides();
        self.output.apply_env_overrides();
        self.debugger.apply_env_overrides();

        if let Some(enabled) = env_flag("FSMSIM_SELF_CHECK") {
            self.self_check = enabled;
        }
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debugger.prompt.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "debugger.prompt must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads a boolean environment variable ("1"/"true" or "0"/"false").
fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

/// Definition file handling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionConfig {
    /// Refuse definitions with more than one transition per (state, symbol).
    pub reject_duplicates: bool,
}

impl DefinitionConfig {
    fn apply_env_overrides(&mut self) {
        if let Some(strict) = env_flag("FSMSIM_STRICT") {
            self.reject_duplicates = strict;
        }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::FirstWins
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Colorize terminal output.
    pub color: bool,
    /// Print one line per applied transition.
    pub narrate: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            narrate: true,
        }
    }
}

impl OutputConfig {
    fn apply_env_overrides(&mut self) {
        if let Some(color) = env_flag("FSMSIM_COLOR") {
            self.color = color;
        }
        if let Some(narrate) = env_flag("FSMSIM_NARRATE") {
            self.narrate = narrate;
        }
    }
}

/// Interactive debugger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerConfig {
    /// Prompt shown before each command.
    pub prompt: String,
    /// Command history file. History is not persisted when unset.
    pub history_file: Option<PathBuf>,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            prompt: "FSM debugger>".to_string(),
            history_file: None,
        }
    }
}

impl DebuggerConfig {
    fn apply_env_overrides(&mut self) {
        if let Ok(prompt) = std::env::var("FSMSIM_PROMPT") {
            if !prompt.trim().is_empty() {
                self.prompt = prompt;
            }
        }

        if let Ok(path) = std::env::var("FSMSIM_HISTORY") {
            self.history_file = Some(PathBuf::from(path));
        }
    }
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
