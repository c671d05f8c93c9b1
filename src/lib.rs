//! eightfold - Eight-dimension problem diagnosis and staged remediation
//!
//! Scores a structured problem report along eight fixed dimensions, turns
//! weak dimensions into a prioritized repair plan, and drives an iterative
//! staged loop that executes the plan until the report converges.
//!
//! # Architecture
//!
//! - **analysis**: rule-based dimensional analyzer
//! - **planning**: template-driven repair planner
//! - **convergence**: staged loop over an injectable executor
//! - **service**: owner-scoped history, loop registry and temporal log

pub mod errors;
pub mod types;

pub mod analysis;
pub mod convergence;
pub mod planning;
pub mod service;

pub mod cli;

// Re-export commonly used types
pub use analysis::{AnalysisResult, DimensionalAnalyzer};
pub use convergence::{ConvergenceLoop, LoopResult, LoopState, RemediationExecutor, SimulatedExecutor};
pub use errors::{HealError, Result};
pub use planning::{RepairPlan, RepairPlanner};
pub use service::{HealingService, OwnerId};
pub use types::{Dimension, ProblemContext, ProblemType};
