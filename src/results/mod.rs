//! Session result aggregation
//!
//! Process-wide pass/fail/error counters shared by every execution unit.

mod counters;

pub use counters::{CounterOverflow, CounterSnapshot, Counters};
