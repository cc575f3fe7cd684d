//! Verdict to host event translation

use crate::models::{HostEvent, HostStatus, Verdict};
use crate::output::ReportLine;

/// Host status for a verdict
pub fn status_for(verdict: &Verdict) -> HostStatus {
    match verdict {
        Verdict::Passed { .. } | Verdict::Proved => HostStatus::Success,
        Verdict::Failed { .. } | Verdict::Exhausted { .. } => HostStatus::Failure,
        Verdict::PropException { .. } => HostStatus::Error,
    }
}

/// Failure cause attached to the event, if any
pub fn cause_for(verdict: &Verdict) -> Option<String> {
    match verdict {
        Verdict::Failed { .. } => Some(verdict.to_string()),
        Verdict::PropException { cause } => Some(cause.clone()),
        Verdict::Passed { .. } | Verdict::Proved | Verdict::Exhausted { .. } => None,
    }
}

/// Event and report line produced for one verdict
#[derive(Clone, Debug, PartialEq)]
pub struct Translation {
    pub event: HostEvent,
    pub report: ReportLine,
}

/// Maps verdicts to host events; holds nothing but the report verbosity
#[derive(Clone, Copy, Debug, Default)]
pub struct EventTranslator {
    verbosity: u8,
}

impl EventTranslator {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    pub fn translate(&self, subject_name: &str, selector_name: &str, verdict: Verdict) -> Translation {
        let status = status_for(&verdict);
        let mut event = HostEvent::new(subject_name, selector_name, status);
        event.cause = cause_for(&verdict);

        let report = ReportLine {
            status,
            name: event.display_name().to_string(),
            verdict,
            verbosity: self.verbosity,
        };

        Translation { event, report }
    }
}
