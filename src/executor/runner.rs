//! Property execution runner
//!
//! Checks the property a bound unit selects and reports the outcome.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::translate::EventTranslator;
use crate::config::CheckParams;
use crate::discovery::Discovery;
use crate::engine::{CheckEngine, Property};
use crate::models::{HostEvent, HostStatus, TestSubjectRef, Verdict};
use crate::output::ResultFormatter;
use crate::results::Counters;
use crate::session::EventSink;
use crate::utils::Timer;

/// Runs bound units through the checking engine
pub struct PropertyExecutor {
    discovery: Arc<Discovery>,
    engine: Arc<dyn CheckEngine>,
    params: CheckParams,
    counters: Arc<Counters>,
    translator: EventTranslator,
    formatter: ResultFormatter,
}

impl PropertyExecutor {
    pub fn new(
        discovery: Arc<Discovery>,
        engine: Arc<dyn CheckEngine>,
        params: CheckParams,
        counters: Arc<Counters>,
    ) -> Self {
        let translator = EventTranslator::new(params.verbosity);
        Self {
            discovery,
            engine,
            params,
            counters,
            translator,
            formatter: ResultFormatter::default(),
        }
    }

    pub fn with_formatter(mut self, formatter: ResultFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn params(&self) -> &CheckParams {
        &self.params
    }

    /// Check every property of `subject` named `selector_name`
    ///
    /// The subject is instantiated afresh. A name with no matching property
    /// is reported as skipped; a subject that cannot be loaded is reported as
    /// an error.
    pub fn check(&self, subject: &TestSubjectRef, selector_name: &str, sink: &dyn EventSink) {
        let entries = match self.discovery.entries(subject) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot load {}: {}", subject.name, e);
                let event = HostEvent::new(&subject.name, selector_name, HostStatus::Error)
                    .with_cause(e.to_string());
                self.emit(event, sink);
                return;
            }
        };

        let mut matched = false;
        for entry in entries.iter().filter(|e| e.name == selector_name) {
            matched = true;

            debug!("Checking {} [{}]", subject.name, entry.name);
            let timer = Timer::start(&subject.name, &entry.name);
            let verdict = self.run_engine(entry.property.as_ref());
            timer.stop();

            let translation = self.translator.translate(&subject.name, selector_name, verdict);
            let line = self.formatter.format_report(&translation.report);
            match translation.event.status {
                HostStatus::Success => info!("{}", line),
                HostStatus::Error => error!("{}", line),
                HostStatus::Failure | HostStatus::Skipped => warn!("{}", line),
            }
            sink.log(&line);
            self.emit(translation.event, sink);
        }

        if !matched {
            warn!("{} has no property named '{}'", subject.name, selector_name);
            let event = HostEvent::new(&subject.name, selector_name, HostStatus::Skipped)
                .with_cause(format!("no property named '{selector_name}'"));
            self.emit(event, sink);
        }
    }

    fn run_engine(&self, property: &dyn Property) -> Verdict {
        let result =
            panic::catch_unwind(AssertUnwindSafe(|| self.engine.check(property, &self.params)));
        result.unwrap_or_else(|_| Verdict::exception("checking engine panicked"))
    }

    fn emit(&self, event: HostEvent, sink: &dyn EventSink) {
        self.counters.record(event.status);
        sink.handle(event);
    }
}
