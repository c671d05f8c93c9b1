//! Dimensional analysis system
//! Scores problem reports along eight fixed dimensions

pub mod analyzer;
pub mod reasons;
pub mod types;

pub use analyzer::DimensionalAnalyzer;
pub use reasons::ReasonCode;
pub use types::{AnalysisResult, CenterState, DimensionScore};
