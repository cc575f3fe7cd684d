//! Configuration module
//!
//! Layers checker parameters from defaults, a config file, `PROP_BRIDGE_*`
//! environment variables and host-forwarded arguments, in that order.

mod env;
mod file;
mod params;

pub use env::{print_env_help, EnvConfig};
pub use file::{expand_path, find_config_file, is_yaml_file};
pub use params::{CheckParams, CheckerArgs, ConfigError};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Application configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Checker tunables
    pub checker: CheckParams,

    /// Log level for the `prop_bridge` target; empty follows the checker
    /// verbosity
    pub log_level: String,

    /// Output format for report lines and summaries
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            checker: CheckParams::default(),
            log_level: "info".to_string(),
            format: "summary".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject unknown log levels and formats along with invalid checker values
    pub fn validate(&self) -> Result<()> {
        self.checker.validate()?;
        if !self.log_level.trim().is_empty() {
            if let Err(e) = self.log_level.parse::<LogLevel>() {
                bail!("Invalid log_level: {e}");
            }
        }
        if OutputFormat::from_str(&self.format).is_none() {
            bail!("Invalid format '{}' (expected summary, table or json)", self.format);
        }
        Ok(())
    }

    /// Effective log level
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .parse()
            .unwrap_or_else(|_| LogLevel::from_verbosity(self.checker.verbosity))
    }

    /// Effective output format, with `requested` taking precedence
    pub fn output_format(&self, requested: Option<&str>) -> Result<OutputFormat> {
        let name = requested.unwrap_or(&self.format);
        OutputFormat::from_str(name)
            .with_context(|| format!("Unknown output format '{name}'"))
    }

    /// Load from the first standard location, or fall back to defaults
    pub fn load_default() -> Result<Self> {
        match find_config_file() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Resolve the effective configuration: args > env > file > defaults
    pub fn resolve<S: AsRef<str>>(args: &[S], env: &EnvConfig) -> Result<Self> {
        let mut config = match &env.config_file {
            Some(path) => Self::load(expand_path(path))?,
            None => Self::load_default()?,
        };

        env.apply(&mut config);

        let parsed = CheckerArgs::parse_args(args)?;
        config.checker = config.checker.with_args(&parsed);
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.checker.min_successful_tests, 100);
    }

    #[test]
    fn test_load_yaml_with_partial_checker() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "checker:\n  verbosity: 2\n  workers: 3\nformat: json").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.checker.verbosity, 2);
        assert_eq!(config.checker.workers, 3);
        assert_eq!(config.checker.min_successful_tests, 100);
        assert_eq!(config.format, "json");
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop-bridge.json");

        let mut config = AppConfig::default();
        config.checker.seed = Some(99);
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_checker() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "checker:\n  min_size: 0\n  workers: 0").unwrap();

        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_unknown_format_and_level() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "format: xml").unwrap();
        assert!(AppConfig::load(file.path()).is_err());

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "log_level: loud").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_log_level_follows_verbosity_when_unset() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level(), LogLevel::Info);

        config.log_level = "error".to_string();
        assert_eq!(config.log_level(), LogLevel::Error);

        config.log_level.clear();
        config.checker.verbosity = 1;
        assert_eq!(config.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_file_and_env_pick_output_format() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "format: json\nlog_level: warn").unwrap();
        let from_file = EnvConfig {
            config_file: Some(file.path().display().to_string()),
            ..Default::default()
        };

        let config = AppConfig::resolve::<&str>(&[], &from_file).unwrap();
        assert_eq!(config.output_format(None).unwrap(), OutputFormat::Json);
        assert_eq!(config.output_format(Some("table")).unwrap(), OutputFormat::Table);
        assert_eq!(config.log_level(), LogLevel::Warn);

        let from_env = EnvConfig {
            format: Some("table".to_string()),
            ..from_file
        };
        let config = AppConfig::resolve::<&str>(&[], &from_env).unwrap();
        assert_eq!(config.output_format(None).unwrap(), OutputFormat::Table);

        let bad = EnvConfig {
            format: Some("xml".to_string()),
            ..Default::default()
        };
        assert!(AppConfig::resolve::<&str>(&[], &bad).is_err());
    }

    #[test]
    fn test_args_override_env_and_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "checker:\n  verbosity: 1\n  workers: 2").unwrap();

        let env = EnvConfig {
            config_file: Some(file.path().display().to_string()),
            workers: Some(6),
            ..Default::default()
        };

        let config = AppConfig::resolve(&["-verbosity", "3"], &env).unwrap();
        assert_eq!(config.checker.verbosity, 3);
        assert_eq!(config.checker.workers, 6);
    }
}
