//! Parallel unit execution
//!
//! Runs independent bound units concurrently on the blocking thread pool.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use super::PropertyExecutor;
use crate::models::ExecutionUnit;
use crate::session::EventSink;

/// Parallel unit executor
pub struct ParallelExecutor {
    max_concurrent: usize,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Check bound units concurrently, at most `max_concurrent` at a time
    ///
    /// Root units are not expanded here and are skipped. Returns the number
    /// of units that ran to completion.
    pub async fn run_units(
        &self,
        executor: Arc<PropertyExecutor>,
        units: Vec<ExecutionUnit>,
        sink: Arc<dyn EventSink>,
    ) -> usize {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let start = Instant::now();
        let mut handles = Vec::new();

        for unit in units {
            let (subject, selector_name) = match unit {
                ExecutionUnit::Bound {
                    subject,
                    selector_name,
                } => (subject, selector_name),
                root => {
                    debug!("Ignoring unexpanded unit {}", root);
                    continue;
                }
            };

            let semaphore = semaphore.clone();
            let executor = executor.clone();
            let sink = sink.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return false;
                };

                debug!("Starting parallel check of {}.{}", subject.name, selector_name);
                tokio::task::spawn_blocking(move || {
                    executor.check(&subject, &selector_name, sink.as_ref());
                })
                .await
                .is_ok()
            });

            handles.push(handle);
        }

        let completed = join_all(handles)
            .await
            .into_iter()
            .filter(|r| match r {
                Ok(done) => *done,
                Err(e) => {
                    error!("Unit task failed: {}", e);
                    false
                }
            })
            .count();

        info!(
            "Parallel execution of {} units completed in {}ms (max {} concurrent)",
            completed,
            start.elapsed().as_millis(),
            self.max_concurrent
        );

        completed
    }
}

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckParams;
    use crate::discovery::{Discovery, PropertyLoader, PropertySet, PROPERTIES_MARKER};
    use crate::engine::{Trial, TrialEngine, TrialOutcome};
    use crate::models::{HostStatus, TestSubjectRef, TypeMarker};
    use crate::results::{CounterSnapshot, Counters};
    use crate::session::CollectingSink;

    fn pass(_: &mut Trial) -> TrialOutcome {
        TrialOutcome::Pass
    }

    fn fail(_: &mut Trial) -> TrialOutcome {
        TrialOutcome::Fail("counterexample".to_string())
    }

    #[test]
    fn test_parallel_executor_creation() {
        assert_eq!(ParallelExecutor::new(8).max_concurrent, 8);
        assert_eq!(ParallelExecutor::new(0).max_concurrent, 1);
    }

    #[tokio::test]
    async fn test_run_units_concurrently() {
        let mut set = PropertySet::collection();
        for i in 0..20 {
            set = if i % 4 == 0 {
                set.property(format!("p{i}"), fail)
            } else {
                set.property(format!("p{i}"), pass)
            };
        }

        let counters = Arc::new(Counters::new());
        let executor = Arc::new(PropertyExecutor::new(
            Arc::new(Discovery::with_loader(
                PropertyLoader::new().singleton("demo.Props", set),
            )),
            Arc::new(TrialEngine),
            CheckParams {
                min_successful_tests: 5,
                ..Default::default()
            },
            counters.clone(),
        ));

        let subject = TestSubjectRef::new("demo.Props", TypeMarker::new(PROPERTIES_MARKER, true));
        let mut units: Vec<ExecutionUnit> = (0..20)
            .map(|i| ExecutionUnit::bound(subject.clone(), format!("p{i}")))
            .collect();
        units.push(ExecutionUnit::Root(subject));

        let sink = Arc::new(CollectingSink::new());
        let completed = ParallelExecutor::new(4)
            .run_units(executor, units, sink.clone())
            .await;

        assert_eq!(completed, 20);
        assert_eq!(sink.events().len(), 20);
        assert_eq!(
            sink.events()
                .iter()
                .filter(|e| e.status == HostStatus::Failure)
                .count(),
            5
        );
        assert_eq!(counters.snapshot(), CounterSnapshot::new(20, 15, 5, 0));
    }
}
