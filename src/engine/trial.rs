//! Built-in trial engine

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

use super::{CheckEngine, Property, Trial, TrialOutcome};
use crate::config::CheckParams;
use crate::models::Verdict;

/// Runs a property until enough trials succeed, one fails, or too many are
/// discarded
#[derive(Clone, Copy, Debug, Default)]
pub struct TrialEngine;

impl TrialEngine {
    pub fn new() -> Self {
        Self
    }
}

impl CheckEngine for TrialEngine {
    fn check(&self, property: &dyn Property, params: &CheckParams) -> Verdict {
        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let max_discarded = params.max_discarded();

        let mut succeeded = 0u32;
        let mut discarded = 0u32;

        while succeeded < params.min_successful_tests {
            let mut trial = Trial::new(params.size_for(succeeded), rng.random());

            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| property.check_trial(&mut trial)));

            match outcome {
                Ok(TrialOutcome::Pass) => succeeded += 1,
                Ok(TrialOutcome::Proof) => return Verdict::Proved,
                Ok(TrialOutcome::Discard) => {
                    discarded += 1;
                    if discarded > max_discarded {
                        return Verdict::Exhausted {
                            succeeded,
                            discarded,
                        };
                    }
                }
                Ok(TrialOutcome::Fail(message)) => {
                    debug!(seed = trial.seed(), size = trial.size(), "trial falsified");
                    return Verdict::Failed { succeeded, message };
                }
                Ok(TrialOutcome::Error(cause)) => return Verdict::PropException { cause },
                Err(payload) => {
                    return Verdict::PropException {
                        cause: panic_message(payload.as_ref()),
                    }
                }
            }
        }

        Verdict::Passed { succeeded }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "property panicked".to_string()
    }
}
