//! Checking engine verdicts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw outcome of one property run under one configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    /// Property held for every trial
    Passed { succeeded: u32 },
    /// Property was proved outright
    Proved,
    /// A trial falsified the property
    Failed { succeeded: u32, message: String },
    /// Too many trials were discarded before enough succeeded
    Exhausted { succeeded: u32, discarded: u32 },
    /// Evaluating the property raised an error
    PropException { cause: String },
}

impl Verdict {
    pub fn passed(succeeded: u32) -> Self {
        Verdict::Passed { succeeded }
    }

    pub fn failed(succeeded: u32, message: impl Into<String>) -> Self {
        Verdict::Failed {
            succeeded,
            message: message.into(),
        }
    }

    pub fn exception(cause: impl Into<String>) -> Self {
        Verdict::PropException {
            cause: cause.into(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed { succeeded } => write!(f, "OK, passed {succeeded} tests."),
            Verdict::Proved => write!(f, "OK, proved property."),
            Verdict::Failed { succeeded, message } if message.is_empty() => {
                write!(f, "Falsified after {succeeded} passed tests.")
            }
            Verdict::Failed { succeeded, message } => {
                write!(f, "Falsified after {succeeded} passed tests: {message}")
            }
            Verdict::Exhausted {
                succeeded,
                discarded,
            } => write!(
                f,
                "Gave up after only {succeeded} passed tests. {discarded} tests were discarded."
            ),
            Verdict::PropException { cause } => {
                write!(f, "Exception raised on property evaluation: {cause}")
            }
        }
    }
}
