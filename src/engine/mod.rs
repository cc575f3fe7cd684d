//! Checking engine seam
//!
//! The bridge only needs a verdict for a property under a set of parameters.
//! [`CheckEngine`] is that seam; [`TrialEngine`] is the built-in engine that
//! drives a [`Property`] through repeated trials.

mod property;
mod trial;

pub use property::{Property, Trial, TrialOutcome};
pub use trial::TrialEngine;

use crate::config::CheckParams;
use crate::models::Verdict;

/// Produces a verdict for one property run
///
/// Implementations may block for as long as their own limits allow; callers
/// impose no timeout.
pub trait CheckEngine: Send + Sync {
    fn check(&self, property: &dyn Property, params: &CheckParams) -> Verdict;
}
