//! Check timing for diagnostics
//!
//! Host events carry no duration; elapsed time only shows up in debug logs.

use std::time::{Duration, Instant};
use tracing::debug;

/// Measures one property check
#[derive(Debug)]
pub struct Timer {
    started: Instant,
    subject: String,
    selector: String,
}

impl Timer {
    pub fn start(subject: &str, selector: &str) -> Self {
        Self {
            started: Instant::now(),
            subject: subject.to_string(),
            selector: selector.to_string(),
        }
    }

    /// Log and return the time since `start`
    pub fn stop(self) -> Duration {
        let elapsed = self.started.elapsed();
        debug!(
            subject = %self.subject,
            selector = %self.selector,
            elapsed_ms = elapsed.as_millis() as u64,
            "check finished"
        );
        elapsed
    }
}
