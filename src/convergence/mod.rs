//! Staged convergence loop
//! Repeatedly plans, executes and re-scores until the report converges

pub mod engine;
pub mod executor;
pub mod learning;
pub mod stages;
pub mod types;

pub use engine::{ConvergenceConfig, ConvergenceLoop, DEFAULT_MAX_ITERATIONS};
pub use executor::{ActionOutcome, RemediationExecutor, SimulatedExecutor};
pub use stages::{Stage, StageFilter, FINAL_STAGE, STAGES};
pub use types::{LearningRecord, LoopResult, LoopState, LoopStatus, RepairResult};
