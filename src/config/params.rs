//! Checker parameters
//!
//! Parses the single-dash arguments forwarded by the host into the tunables
//! handed to the checking engine.

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors, fatal to session construction
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid checker arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Tunables for one checking session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckParams {
    /// Successful trials required before a property passes
    pub min_successful_tests: u32,

    /// Discarded trials allowed per required success
    pub max_discard_ratio: f32,

    /// Size of the first trial
    pub min_size: u32,

    /// Size reached by the last trial
    pub max_size: u32,

    /// Units checked concurrently
    pub workers: usize,

    /// Detail level of rendered report lines
    pub verbosity: u8,

    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            min_successful_tests: 100,
            max_discard_ratio: 5.0,
            min_size: 0,
            max_size: 100,
            workers: 1,
            verbosity: 0,
            seed: None,
        }
    }
}

impl CheckParams {
    /// Build parameters from host-forwarded arguments on top of the defaults
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let parsed = CheckerArgs::parse_args(args)?;
        let params = Self::default().with_args(&parsed);
        params.validate()?;
        Ok(params)
    }

    /// Overlay explicitly given arguments
    pub fn with_args(mut self, args: &CheckerArgs) -> Self {
        if let Some(n) = args.min_successful_tests {
            self.min_successful_tests = n;
        }
        if let Some(ratio) = args.max_discard_ratio {
            self.max_discard_ratio = ratio;
        }
        if let Some(size) = args.min_size {
            self.min_size = size;
        }
        if let Some(size) = args.max_size {
            self.max_size = size;
        }
        if let Some(workers) = args.workers {
            self.workers = workers;
        }
        if let Some(verbosity) = args.verbosity {
            self.verbosity = verbosity;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_size < self.min_size {
            return Err(ConfigError::InvalidValue {
                field: "maxSize",
                reason: format!("{} is below minSize {}", self.max_size, self.min_size),
            });
        }
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if !self.max_discard_ratio.is_finite() || self.max_discard_ratio < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "maxDiscardRatio",
                reason: format!("{} is not a non-negative number", self.max_discard_ratio),
            });
        }
        Ok(())
    }

    /// Trial size after `completed` trials, ramping from min to max size
    pub fn size_for(&self, completed: u32) -> u32 {
        if self.min_successful_tests == 0 {
            return self.min_size;
        }
        let span = u64::from(self.max_size.saturating_sub(self.min_size));
        let step = span * u64::from(completed.min(self.min_successful_tests))
            / u64::from(self.min_successful_tests);
        self.min_size + step as u32
    }

    /// Discards tolerated before a run is declared exhausted
    pub fn max_discarded(&self) -> u32 {
        (self.min_successful_tests as f32 * self.max_discard_ratio) as u32
    }
}

/// Arguments recognised on the host's framework argument list
#[derive(Parser, Debug, Default, Clone, PartialEq)]
#[command(
    name = "checker",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct CheckerArgs {
    #[arg(long = "minSuccessfulTests", short = 's')]
    pub min_successful_tests: Option<u32>,

    #[arg(long = "maxDiscardRatio")]
    pub max_discard_ratio: Option<f32>,

    #[arg(long = "minSize")]
    pub min_size: Option<u32>,

    #[arg(long = "maxSize")]
    pub max_size: Option<u32>,

    #[arg(long = "workers", short = 'w')]
    pub workers: Option<usize>,

    #[arg(long = "verbosity", short = 'v')]
    pub verbosity: Option<u8>,

    #[arg(long = "seed")]
    pub seed: Option<u64>,
}

impl CheckerArgs {
    /// Parse single-dash style arguments such as `-minSuccessfulTests 50`
    pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Self, ConfigError> {
        let normalized = args.iter().map(|a| normalize_flag(a.as_ref()));
        Self::try_parse_from(normalized).map_err(|e| {
            ConfigError::InvalidArguments(e.render().to_string().trim().to_string())
        })
    }
}

/// `-name` becomes `--name`; short flags, values and `--name` pass through
fn normalize_flag(arg: &str) -> String {
    let is_long_single_dash = arg.len() > 2
        && arg.starts_with('-')
        && !arg.starts_with("--")
        && arg[1..].chars().next().is_some_and(|c| c.is_ascii_alphabetic());

    if is_long_single_dash {
        format!("-{arg}")
    } else {
        arg.to_string()
    }
}
