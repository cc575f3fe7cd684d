//! Checkable properties

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Result of evaluating a property once
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrialOutcome {
    Pass,
    /// Property holds for all inputs; no further trials needed
    Proof,
    /// Input did not meet the property's precondition
    Discard,
    Fail(String),
    Error(String),
}

impl From<bool> for TrialOutcome {
    fn from(holds: bool) -> Self {
        if holds {
            TrialOutcome::Pass
        } else {
            TrialOutcome::Fail(String::new())
        }
    }
}

/// Inputs for a single trial
#[derive(Debug)]
pub struct Trial {
    size: u32,
    seed: u64,
    rng: StdRng,
}

impl Trial {
    pub fn new(size: u32, seed: u64) -> Self {
        Self {
            size,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random source seeded for this trial
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

/// Something the checking engine can evaluate
pub trait Property: Send + Sync {
    fn check_trial(&self, trial: &mut Trial) -> TrialOutcome;
}

impl<F> Property for F
where
    F: Fn(&mut Trial) -> TrialOutcome + Send + Sync,
{
    fn check_trial(&self, trial: &mut Trial) -> TrialOutcome {
        self(trial)
    }
}
