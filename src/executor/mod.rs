//! Property execution
//!
//! Checks bound units through the engine, sequentially or in parallel, and
//! turns verdicts into host events.

mod parallel;
mod runner;
mod translate;

pub use parallel::ParallelExecutor;
pub use runner::PropertyExecutor;
pub use translate::{cause_for, status_for, EventTranslator, Translation};
