//! Root-to-bound task expansion

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::Discovery;
use crate::models::{ExecutionUnit, Selector, TestSubjectRef};

/// Expands subject requests into one bound unit per property name
pub struct TaskPlanner {
    discovery: Arc<Discovery>,
}

impl TaskPlanner {
    pub fn new(discovery: Arc<Discovery>) -> Self {
        Self { discovery }
    }

    /// Plan the bound units for a subject request
    ///
    /// Requests that already name their properties are bound as given.
    /// Anything else is a root request and is expanded from the subject's
    /// own property list. Names are deduplicated, keeping first-seen order.
    /// A subject that cannot be classified or loaded plans to nothing.
    pub fn plan(&self, subject: &TestSubjectRef) -> Vec<ExecutionUnit> {
        let names: Vec<String> = if subject.is_bound() {
            subject
                .selectors
                .iter()
                .filter_map(Selector::test_name)
                .map(str::to_string)
                .collect()
        } else {
            match self.discovery.entries(subject) {
                Ok(entries) => entries.into_iter().map(|e| e.name).collect(),
                Err(e) => {
                    warn!("Skipping {}: {}", subject.name, e);
                    return Vec::new();
                }
            }
        };

        let mut seen = HashSet::new();
        let units: Vec<ExecutionUnit> = names
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .map(|name| {
                let narrowed = TestSubjectRef {
                    selectors: vec![Selector::Test(name.clone())],
                    ..subject.clone()
                };
                ExecutionUnit::bound(narrowed, name)
            })
            .collect();

        info!("Planned {} units for {}", units.len(), subject.name);
        units
    }
}
