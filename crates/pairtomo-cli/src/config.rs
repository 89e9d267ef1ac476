//! Configuration for the pairtomo CLI.
//!
//! Supports loading configuration from:
//! 1. A YAML file (`--config <path>` or `~/.pairtomo/config.yaml`)
//! 2. Environment variables (with `PAIRTOMO_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line flags
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use pairtomo_tomography::DEFAULT_REGISTER_NAME;
use serde::{Deserialize, Serialize};

/// File name looked up in the state directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Text format written for each variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// OpenQASM 3.0
    #[default]
    Qasm3,
    /// OpenQASM 2.0
    Qasm2,
    /// Circuit JSON
    Json,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Qasm3 | OutputFormat::Qasm2 => "qasm",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Qasm3 => "qasm3",
            OutputFormat::Qasm2 => "qasm2",
            OutputFormat::Json => "json",
        };
        write!(f, "{name}")
    }
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "qasm3" | "qasm" => Ok(OutputFormat::Qasm3),
            "qasm2" => Ok(OutputFormat::Qasm2),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown output format: '{other}'. Available: qasm3, qasm2, json"
            ))),
        }
    }
}

/// CLI defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output format for generated variants
    pub format: OutputFormat,

    /// Name of the classical register added to every variant
    pub creg: String,

    /// Directory variants are written to when `--output` is omitted
    pub output_dir: Option<PathBuf>,

    /// Log level used when no `-v` flag is given
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            creg: DEFAULT_REGISTER_NAME.to_string(),
            output_dir: None,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;

        let config: Config = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Environment variable overrides
    /// 2. The file at `config_file`, or the default file if it exists
    /// 3. Defaults
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Config::default(),
            },
        };

        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PAIRTOMO_*` overrides. Variables that `lookup` does not report
    /// leave the corresponding fields unchanged.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PAIRTOMO_FORMAT") {
            self.format = v.parse()?;
        }
        if let Some(v) = lookup("PAIRTOMO_CREG") {
            self.creg = v;
        }
        if let Some(v) = lookup("PAIRTOMO_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("PAIRTOMO_LOG") {
            self.log_level = Some(v);
        }
        Ok(self)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.creg.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Classical register name must not be empty".into(),
            ));
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{level}'. Must be one of: {}",
                    LOG_LEVELS.join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// `~/.pairtomo/config.yaml`, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pairtomo").join(CONFIG_FILE_NAME))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.format, OutputFormat::Qasm3);
        assert_eq!(config.creg, "meas");
        assert!(config.output_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "format: qasm2\ncreg: tomo\nlog_level: debug\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.format, OutputFormat::Qasm2);
        assert_eq!(config.creg, "tomo");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_from_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("missing.yaml")),
            Err(ConfigError::IoError(_))
        ));

        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "format: [qasm3\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));

        std::fs::write(&path, "format: qasm4\n").unwrap();
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let config = Config {
            format: OutputFormat::Qasm2,
            creg: "tomo".into(),
            ..Config::default()
        };
        let merged = config
            .merge_env(env(&[
                ("PAIRTOMO_FORMAT", "json"),
                ("PAIRTOMO_OUTPUT_DIR", "/tmp/variants"),
            ]))
            .unwrap();

        assert_eq!(merged.format, OutputFormat::Json);
        assert_eq!(merged.creg, "tomo");
        assert_eq!(merged.output_dir, Some(PathBuf::from("/tmp/variants")));
    }

    #[test]
    fn test_env_rejects_unknown_format() {
        let err = Config::default()
            .merge_env(env(&[("PAIRTOMO_FORMAT", "qasm4")]))
            .unwrap_err();
        assert!(err.to_string().contains("qasm4"));
    }

    #[test]
    fn test_validate_rejects_empty_creg() {
        let config = Config {
            creg: "  ".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let config = Config {
            log_level: Some("loud".into()),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            log_level: Some("DEBUG".into()),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("QASM3".parse::<OutputFormat>().unwrap(), OutputFormat::Qasm3);
        assert_eq!("qasm".parse::<OutputFormat>().unwrap(), OutputFormat::Qasm3);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::Qasm2.extension(), "qasm");
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
