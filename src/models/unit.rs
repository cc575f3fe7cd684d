//! Execution units planned from subject requests

use std::fmt;

use super::TestSubjectRef;

/// A single planned piece of work
///
/// `Root` units are expanded into one `Bound` unit per property name. `Bound`
/// units are terminal: running them produces events and no further units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExecutionUnit {
    Root(TestSubjectRef),
    Bound {
        subject: TestSubjectRef,
        selector_name: String,
    },
}

impl ExecutionUnit {
    pub fn bound(subject: TestSubjectRef, selector_name: impl Into<String>) -> Self {
        ExecutionUnit::Bound {
            subject,
            selector_name: selector_name.into(),
        }
    }

    pub fn subject(&self) -> &TestSubjectRef {
        match self {
            ExecutionUnit::Root(subject) => subject,
            ExecutionUnit::Bound { subject, .. } => subject,
        }
    }

    pub fn selector_name(&self) -> Option<&str> {
        match self {
            ExecutionUnit::Root(_) => None,
            ExecutionUnit::Bound { selector_name, .. } => Some(selector_name),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ExecutionUnit::Bound { .. })
    }
}

impl fmt::Display for ExecutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionUnit::Root(subject) => write!(f, "{subject} (root)"),
            ExecutionUnit::Bound {
                subject,
                selector_name,
            } if selector_name.is_empty() => write!(f, "{subject}"),
            ExecutionUnit::Bound {
                subject,
                selector_name,
            } => write!(f, "{subject}.{selector_name}"),
        }
    }
}
