//! Shell configuration
//!
//! Built with chained setters or parsed from command-line arguments of the
//! form `--name value` or `--name=value`.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Default log filter when neither `--log` nor `RUST_LOG` is given
pub const DEFAULT_LOG_FILTER: &str = "error";

/// Interactive shell configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    /// Snapshot file loaded at start-up and saved on exit
    pub data_file: Option<PathBuf>,
    /// Line editor history file
    pub history_file: Option<PathBuf>,
    /// Prompt shown before each statement
    pub prompt: String,
    /// Field separator for result rows
    pub delimiter: String,
    /// tracing-subscriber filter directive
    pub log_filter: Option<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            history_file: None,
            prompt: "snapdb> ".to_string(),
            delimiter: "\t".to_string(),
            log_filter: None,
        }
    }
}

impl ShellConfig {
    /// Create a new shell config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = Some(path.into());
        self
    }

    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// Parse arguments (without the program name)
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::new();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => {
                    (flag.to_string(), Some(value.to_string()))
                }
                _ => (arg.clone(), None),
            };

            let value = match inline {
                Some(value) => value,
                None => args
                    .next()
                    .ok_or_else(|| Error::Config(format!("missing value for '{}'", flag)))?,
            };

            config = match flag.as_str() {
                "--data" => config.data_file(value),
                "--history" => config.history_file(value),
                "--prompt" => config.prompt(value),
                "--delimiter" => config.delimiter(unescape(&value)),
                "--log" => config.log_filter(value),
                other => return Err(Error::Config(format!("unknown argument '{}'", other))),
            };
        }

        Ok(config)
    }
}

/// Allow `\t` and `\n` to be typed literally on the command line
fn unescape(value: &str) -> String {
    value.replace("\\t", "\t").replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ShellConfig::default();
        assert_eq!(config.delimiter, "\t");
        assert_eq!(config.prompt, "snapdb> ");
        assert!(config.data_file.is_none());
        assert!(config.log_filter.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ShellConfig::new()
            .data_file("db.json")
            .delimiter("|")
            .log_filter("debug");

        assert_eq!(config.data_file, Some(PathBuf::from("db.json")));
        assert_eq!(config.delimiter, "|");
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_from_args() {
        let config = ShellConfig::from_args([
            "--data",
            "db.json",
            "--delimiter=\\t",
            "--log=snapdb=debug",
            "--history",
            ".snapdb_history",
        ])
        .unwrap();

        assert_eq!(config.data_file, Some(PathBuf::from("db.json")));
        assert_eq!(config.delimiter, "\t");
        assert_eq!(config.log_filter.as_deref(), Some("snapdb=debug"));
        assert_eq!(config.history_file, Some(PathBuf::from(".snapdb_history")));
    }

    #[test]
    fn test_from_args_errors() {
        assert!(matches!(
            ShellConfig::from_args(["--data"]),
            Err(Error::Config(msg)) if msg.contains("missing value")
        ));
        assert!(matches!(
            ShellConfig::from_args(["--port", "1"]),
            Err(Error::Config(msg)) if msg.contains("unknown argument")
        ));
    }
}
