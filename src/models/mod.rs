//! Data models for the property bridge
//!
//! Subjects handed over by the host, the units planned from them, engine
//! verdicts and the events reported back.

mod event;
mod subject;
mod unit;
mod verdict;

pub use event::{HostEvent, HostStatus};
pub use subject::{Instantiation, Selector, Shape, SubjectKind, TestSubjectRef, TypeMarker};
pub use unit::ExecutionUnit;
pub use verdict::Verdict;
