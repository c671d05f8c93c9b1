//! Remediation executors
//!
//! The loop never decides on its own whether an action worked; it asks a
//! [`RemediationExecutor`]. The bundled implementation simulates execution
//! with a Bernoulli draw per action.

use crate::errors::Result;
use crate::planning::RepairAction;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Result of executing one action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Succeeded,
    Failed,
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded)
    }
}

/// Something that can carry out repair actions
///
/// `Ok(ActionOutcome::Failed)` is an ordinary unsuccessful repair. `Err` means
/// the executor itself broke down, which stops the loop.
pub trait RemediationExecutor {
    fn execute(&mut self, action: &RepairAction) -> Result<ActionOutcome>;
}

impl<F> RemediationExecutor for F
where
    F: FnMut(&RepairAction) -> Result<ActionOutcome>,
{
    fn execute(&mut self, action: &RepairAction) -> Result<ActionOutcome> {
        self(action)
    }
}

/// Executor that succeeds with the action priority's success probability
#[derive(Debug, Clone)]
pub struct SimulatedExecutor<R = StdRng> {
    rng: R,
}

impl SimulatedExecutor<StdRng> {
    /// Reproducible executor
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when a seed is given, otherwise from entropy
    pub fn with_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> SimulatedExecutor<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RemediationExecutor for SimulatedExecutor<R> {
    fn execute(&mut self, action: &RepairAction) -> Result<ActionOutcome> {
        let probability = action.priority.success_probability();
        if self.rng.gen_bool(probability) {
            Ok(ActionOutcome::Succeeded)
        } else {
            Ok(ActionOutcome::Failed)
        }
    }
}
