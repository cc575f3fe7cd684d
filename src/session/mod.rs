//! Runner sessions
//!
//! A session owns the counters for one runner instance and drives the
//! plan/run protocol the host expects, in either the coordinator or the
//! worker role.

mod runner;
mod sink;

pub use runner::{Role, Runner, RunnerBuilder};
pub use sink::{CollectingSink, EventSink, MessageChannel};
