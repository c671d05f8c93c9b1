//! Error types for eightfold
//!
//! Provides the crate-wide error enum and result alias. Core scoring,
//! planning and loop operations are total; errors surface only at the
//! parsing, lookup, execution and configuration boundaries.

use thiserror::Error;
use uuid::Uuid;

/// Main error type for diagnosis and remediation operations
#[derive(Error, Debug)]
pub enum HealError {
    /// Problem context rejected before analysis
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Analysis id unknown for this owner
    #[error("Analysis {analysis_id} not found for owner '{owner}'")]
    AnalysisNotFound { owner: String, analysis_id: Uuid },

    /// Loop id unknown for this owner
    #[error("Convergence loop {loop_id} not found for owner '{owner}'")]
    LoopNotFound { owner: String, loop_id: Uuid },

    /// Remediation executor could not run an action
    #[error("Remediation of action {action_id} failed: {reason}")]
    ExecutionFailed { action_id: Uuid, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic errors with context
    #[error("Error: {0}")]
    Generic(String),
}

/// Result type alias for eightfold operations
pub type Result<T> = std::result::Result<T, HealError>;

/// Convert anyhow errors to HealError
impl From<anyhow::Error> for HealError {
    fn from(err: anyhow::Error) -> Self {
        HealError::Generic(err.to_string())
    }
}
