//! Session runner

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{EventSink, MessageChannel};
use crate::config::{CheckParams, ConfigError};
use crate::discovery::{Discovery, MarkerRegistry, PropertyLoader, SubjectClassifier, TaskPlanner};
use crate::engine::{CheckEngine, TrialEngine};
use crate::executor::{ParallelExecutor, PropertyExecutor};
use crate::models::{ExecutionUnit, TestSubjectRef, TypeMarker};
use crate::output::ResultFormatter;
use crate::protocol::{ProtocolError, RunnerMessage};
use crate::results::{CounterSnapshot, Counters};

/// Role of this process in a distributed run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Owns the counters presented to the user
    Coordinator,
    /// Reports its counters to the coordinator when done
    Worker,
}

/// Builder for [`Runner`]
pub struct RunnerBuilder {
    role: Role,
    args: Vec<String>,
    loader: PropertyLoader,
    classifier: Option<Arc<dyn SubjectClassifier>>,
    engine: Option<Arc<dyn CheckEngine>>,
    channel: Option<Arc<dyn MessageChannel>>,
    formatter: Option<ResultFormatter>,
}

impl RunnerBuilder {
    /// Host-forwarded checker arguments, e.g. `-minSuccessfulTests 50`
    pub fn args<S: AsRef<str>>(mut self, args: &[S]) -> Self {
        self.args = args.iter().map(|a| a.as_ref().to_string()).collect();
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn SubjectClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn engine(mut self, engine: Arc<dyn CheckEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Channel a worker uses to reach the coordinator
    pub fn channel(mut self, channel: Arc<dyn MessageChannel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn formatter(mut self, formatter: ResultFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Parse the arguments and assemble the session
    ///
    /// Fails before any subject is touched if the arguments are invalid.
    pub fn build(self) -> Result<Runner, ConfigError> {
        let params = CheckParams::from_args(&self.args)?;
        Ok(self.build_with_params(params))
    }

    /// Assemble the session from already resolved parameters
    pub fn build_with_params(self, params: CheckParams) -> Runner {
        let classifier = self
            .classifier
            .unwrap_or_else(|| Arc::new(MarkerRegistry::default()));
        let engine = self.engine.unwrap_or_else(|| Arc::new(TrialEngine));

        let discovery = Arc::new(Discovery::new(classifier, self.loader));
        let counters = Arc::new(Counters::new());

        let mut executor =
            PropertyExecutor::new(discovery.clone(), engine, params.clone(), counters.clone());
        if let Some(formatter) = self.formatter {
            executor = executor.with_formatter(formatter);
        }

        info!(
            "Starting {:?} session ({} successful trials, {} workers)",
            self.role, params.min_successful_tests, params.workers
        );

        Runner {
            role: self.role,
            params,
            planner: TaskPlanner::new(discovery),
            executor: Arc::new(executor),
            counters,
            channel: self.channel,
            reported: AtomicBool::new(false),
        }
    }
}

/// One runner instance: plans, executes and aggregates for a session
pub struct Runner {
    role: Role,
    params: CheckParams,
    planner: TaskPlanner,
    executor: Arc<PropertyExecutor>,
    counters: Arc<Counters>,
    channel: Option<Arc<dyn MessageChannel>>,
    reported: AtomicBool,
}

impl Runner {
    pub fn builder(role: Role, loader: PropertyLoader) -> RunnerBuilder {
        RunnerBuilder {
            role,
            args: Vec::new(),
            loader,
            classifier: None,
            engine: None,
            channel: None,
            formatter: None,
        }
    }

    /// Markers the host should match during discovery
    pub fn fingerprints() -> Vec<TypeMarker> {
        MarkerRegistry::default().fingerprints()
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Expand a subject request into bound units
    pub fn plan(&self, subject: &TestSubjectRef) -> Vec<ExecutionUnit> {
        self.planner.plan(subject)
    }

    /// Execute one unit, returning the units it spawns
    ///
    /// Root units spawn their bound units and report nothing. Bound units
    /// report their events to `sink` and spawn nothing.
    pub fn run(&self, unit: &ExecutionUnit, sink: &dyn EventSink) -> Vec<ExecutionUnit> {
        match unit {
            ExecutionUnit::Root(subject) => self.plan(subject),
            ExecutionUnit::Bound {
                subject,
                selector_name,
            } => {
                self.executor.check(subject, selector_name, sink);
                Vec::new()
            }
        }
    }

    /// Plan every subject and check the resulting units concurrently
    pub async fn run_all(&self, subjects: &[TestSubjectRef], sink: Arc<dyn EventSink>) -> usize {
        let units: Vec<ExecutionUnit> = subjects
            .iter()
            .flat_map(|subject| self.plan(subject))
            .collect();

        ParallelExecutor::new(self.params.workers)
            .run_units(self.executor.clone(), units, sink)
            .await
    }

    /// Handle a message from another runner
    ///
    /// The coordinator adds counter deltas to its own counters. Malformed
    /// messages are rejected without touching the counters. Never produces a
    /// reply.
    pub fn receive_message(&self, line: &str) -> Result<Option<String>, ProtocolError> {
        match RunnerMessage::decode(line)? {
            Some(RunnerMessage::CounterDelta(delta)) => match self.role {
                Role::Coordinator => {
                    debug!("Merging worker counters {:?}", delta);
                    self.counters
                        .merge(&delta)
                        .map_err(|source| ProtocolError::Overflow {
                            line: line.to_string(),
                            source,
                        })?;
                }
                Role::Worker => warn!("Worker ignoring counter delta {}", line),
            },
            None => debug!("Ignoring message '{}'", line),
        }
        Ok(None)
    }

    /// Finish the session
    ///
    /// A worker hands its counters to the coordinator and returns an empty
    /// report. The coordinator returns the summary line. A worker sends its
    /// counters at most once, however often this is called.
    pub fn done(&self) -> String {
        let snapshot = self.counters.snapshot();
        match self.role {
            Role::Worker if self.reported.swap(true, Ordering::SeqCst) => {
                debug!("Counters already reported");
                String::new()
            }
            Role::Worker => {
                let message = RunnerMessage::CounterDelta(snapshot).encode();
                match &self.channel {
                    Some(channel) => channel.send(message),
                    None => warn!("No coordinator channel; dropping {}", message),
                }
                String::new()
            }
            Role::Coordinator => {
                let summary = snapshot.to_string();
                info!("{}", summary);
                summary
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{PropertySet, PROPERTIES_MARKER, PROP_MARKER};
    use crate::engine::{Trial, TrialOutcome};
    use crate::models::HostStatus;
    use crate::session::CollectingSink;
    use std::sync::atomic::AtomicU32;
    use std::sync::Mutex;

    fn pass(_: &mut Trial) -> TrialOutcome {
        TrialOutcome::Pass
    }

    fn loader() -> PropertyLoader {
        PropertyLoader::new()
            .singleton(
                "demo.Props",
                PropertySet::collection()
                    .property("a", pass)
                    .property("b", |_: &mut Trial| TrialOutcome::Fail("b".into())),
            )
            .singleton("demo.Lone", PropertySet::single(pass))
    }

    fn props() -> TestSubjectRef {
        TestSubjectRef::new("demo.Props", TypeMarker::new(PROPERTIES_MARKER, true))
    }

    fn runner(role: Role) -> Runner {
        Runner::builder(role, loader())
            .args(&["-s", "10", "-seed", "5"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_invalid_args_abort_construction() {
        let result = Runner::builder(Role::Coordinator, loader())
            .args(&["-minSuccessfulTests", "many"])
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidArguments(_))));
    }

    #[test]
    fn test_root_run_returns_bound_units() {
        let runner = runner(Role::Coordinator);
        let sink = CollectingSink::new();

        let spawned = runner.run(&ExecutionUnit::Root(props()), &sink);
        assert_eq!(spawned.len(), 2);
        assert!(sink.events().is_empty());

        for unit in &spawned {
            assert!(runner.run(unit, &sink).is_empty());
        }
        assert_eq!(sink.events().len(), 2);
        assert_eq!(runner.counters(), CounterSnapshot::new(2, 1, 1, 0));
    }

    #[test]
    fn test_lone_property_session() {
        let runner = runner(Role::Coordinator);
        let sink = CollectingSink::new();
        let lone = TestSubjectRef::new("demo.Lone", TypeMarker::new(PROP_MARKER, true));

        let units = runner.plan(&lone);
        assert_eq!(units.len(), 1);
        runner.run(&units[0], &sink);

        assert_eq!(sink.events()[0].status, HostStatus::Success);
        assert_eq!(sink.events()[0].selector_name, "");
        assert_eq!(runner.done(), "Passed: Total 1, Failed 0, Errors 0, Passed 1");
    }

    #[test]
    fn test_coordinator_merges_deltas() {
        let runner = runner(Role::Coordinator);
        assert_eq!(runner.receive_message("d7,5,1,1").unwrap(), None);
        assert_eq!(runner.counters(), CounterSnapshot::new(7, 5, 1, 1));
    }

    #[test]
    fn test_malformed_delta_leaves_counters() {
        let runner = runner(Role::Coordinator);
        runner.receive_message("d1,1,0,0").unwrap();

        assert!(runner.receive_message("dx,1,1,1").is_err());
        assert!(runner.receive_message("d1,1,1").is_err());
        assert_eq!(runner.counters(), CounterSnapshot::new(1, 1, 0, 0));
    }

    #[test]
    fn test_overflowing_delta_leaves_counters() {
        let runner = runner(Role::Coordinator);
        runner.receive_message("d1,1,0,0").unwrap();

        let err = runner
            .receive_message("d18446744073709551615,18446744073709551615,0,0")
            .unwrap_err();
        assert!(matches!(err, ProtocolError::Overflow { .. }));
        assert_eq!(runner.counters(), CounterSnapshot::new(1, 1, 0, 0));

        runner.receive_message("d2,1,1,0").unwrap();
        assert_eq!(runner.counters(), CounterSnapshot::new(3, 2, 1, 0));
    }

    #[test]
    fn test_unknown_tag_is_no_op() {
        let runner = runner(Role::Coordinator);
        assert_eq!(runner.receive_message("q1,2,3,4").unwrap(), None);
        assert_eq!(runner.counters(), CounterSnapshot::default());
    }

    #[test]
    fn test_coordinator_without_messages() {
        let runner = runner(Role::Coordinator);
        assert_eq!(runner.done(), "Passed: Total 0, Failed 0, Errors 0, Passed 0");
    }

    #[test]
    fn test_worker_reports_through_channel() {
        let channel = Arc::new(Mutex::new(Vec::<String>::new()));
        let runner = Runner::builder(Role::Worker, loader())
            .args(&["-s", "10"])
            .channel(channel.clone())
            .build()
            .unwrap();
        let sink = CollectingSink::new();

        for unit in runner.plan(&props()) {
            runner.run(&unit, &sink);
        }

        assert_eq!(runner.done(), "");
        assert_eq!(runner.done(), "");
        assert_eq!(*channel.lock().unwrap(), vec!["d2,1,1,0".to_string()]);
    }

    #[test]
    fn test_subject_is_instantiated_per_check() {
        let built = Arc::new(AtomicU32::new(0));
        let counter = built.clone();
        let loader = PropertyLoader::new().constructor("demo.Fresh", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            PropertySet::collection().property("x", pass)
        });
        let runner = Runner::builder(Role::Coordinator, loader)
            .args(&["-s", "1"])
            .build()
            .unwrap();
        let sink = CollectingSink::new();
        let fresh = TestSubjectRef::new("demo.Fresh", TypeMarker::new(PROPERTIES_MARKER, false));

        for unit in runner.plan(&fresh) {
            runner.run(&unit, &sink);
        }

        assert_eq!(built.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_all() {
        let runner = Runner::builder(Role::Coordinator, loader())
            .args(&["-s", "10", "-workers", "2"])
            .build()
            .unwrap();
        let sink = Arc::new(CollectingSink::new());
        let lone = TestSubjectRef::new("demo.Lone", TypeMarker::new(PROP_MARKER, true));

        let completed = runner.run_all(&[props(), lone], sink.clone()).await;

        assert_eq!(completed, 3);
        assert_eq!(runner.counters(), CounterSnapshot::new(3, 2, 1, 0));
        assert!(runner.done().starts_with("Failed:"));
    }
}
