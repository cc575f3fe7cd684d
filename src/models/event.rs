//! Events reported to the host

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The host's finite status vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Success,
    Failure,
    Error,
    Skipped,
}

impl HostStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            HostStatus::Success => "+",
            HostStatus::Failure => "!",
            HostStatus::Error => "x",
            HostStatus::Skipped => "-",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HostStatus::Success)
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostStatus::Success => write!(f, "SUCCESS"),
            HostStatus::Failure => write!(f, "FAILURE"),
            HostStatus::Error => write!(f, "ERROR"),
            HostStatus::Skipped => write!(f, "SKIPPED"),
        }
    }
}

/// Outcome of one property check, as delivered to the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostEvent {
    pub subject_name: String,
    pub selector_name: String,
    pub status: HostStatus,
    pub cause: Option<String>,
    /// Checks are not timed; always `None`
    pub duration: Option<Duration>,
}

impl HostEvent {
    pub fn new(
        subject_name: impl Into<String>,
        selector_name: impl Into<String>,
        status: HostStatus,
    ) -> Self {
        Self {
            subject_name: subject_name.into(),
            selector_name: selector_name.into(),
            status,
            cause: None,
            duration: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Name shown to users: the selector if present, otherwise the subject
    pub fn display_name(&self) -> &str {
        if self.selector_name.is_empty() {
            &self.subject_name
        } else {
            &self.selector_name
        }
    }
}

impl fmt::Display for HostEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.symbol(), self.display_name())?;
        if let Some(cause) = &self.cause {
            write!(f, " - {cause}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_subject() {
        let lone = HostEvent::new("demo.Lone", "", HostStatus::Success);
        assert_eq!(lone.display_name(), "demo.Lone");

        let named = HostEvent::new("demo.Props", "reverse", HostStatus::Failure);
        assert_eq!(named.display_name(), "reverse");
    }

    #[test]
    fn test_event_display() {
        let event = HostEvent::new("demo.Props", "a", HostStatus::Error).with_cause("boom");
        assert_eq!(event.to_string(), "x a - boom");
        assert!(event.duration.is_none());
    }
}
