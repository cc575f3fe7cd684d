//! Environment variable configuration
//!
//! Provides `PROP_BRIDGE_*` overrides for configuration.

use std::env;

use super::AppConfig;

/// Environment variable prefix
const ENV_PREFIX: &str = "PROP_BRIDGE";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Verbosity from PROP_BRIDGE_VERBOSITY
    pub verbosity: Option<u8>,
    /// Workers from PROP_BRIDGE_WORKERS
    pub workers: Option<usize>,
    /// Successful trials from PROP_BRIDGE_MIN_SUCCESSFUL
    pub min_successful_tests: Option<u32>,
    /// Seed from PROP_BRIDGE_SEED
    pub seed: Option<u64>,
    /// Config file from PROP_BRIDGE_CONFIG
    pub config_file: Option<String>,
    /// Log level from PROP_BRIDGE_LOG
    pub log_level: Option<String>,
    /// Output format from PROP_BRIDGE_FORMAT
    pub format: Option<String>,
}

impl EnvConfig {
    /// Load configuration from the process environment
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which receives full variable names
    ///
    /// Values that fail to parse are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));
        Self {
            verbosity: parse(get("VERBOSITY")),
            workers: parse(get("WORKERS")),
            min_successful_tests: parse(get("MIN_SUCCESSFUL")),
            seed: parse(get("SEED")),
            config_file: get("CONFIG"),
            log_level: get("LOG"),
            format: get("FORMAT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.verbosity.is_some()
            || self.workers.is_some()
            || self.min_successful_tests.is_some()
            || self.seed.is_some()
            || self.config_file.is_some()
            || self.log_level.is_some()
            || self.format.is_some()
    }

    /// Overlay the variables that are set onto a loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(verbosity) = self.verbosity {
            config.checker.verbosity = verbosity;
        }
        if let Some(workers) = self.workers {
            config.checker.workers = workers;
        }
        if let Some(n) = self.min_successful_tests {
            config.checker.min_successful_tests = n;
        }
        if self.seed.is_some() {
            config.checker.seed = self.seed;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
    }
}

fn parse<T: std::str::FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Print all PROP_BRIDGE environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_VERBOSITY       Report detail level (0-2)");
    println!("  {ENV_PREFIX}_WORKERS         Units checked concurrently");
    println!("  {ENV_PREFIX}_MIN_SUCCESSFUL  Successful trials per property");
    println!("  {ENV_PREFIX}_SEED            Fixed seed for reproducible runs");
    println!("  {ENV_PREFIX}_CONFIG          Path to configuration file");
    println!("  {ENV_PREFIX}_LOG             Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_FORMAT          Output format (summary, table, json)");
}
