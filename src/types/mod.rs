//! Type definitions module
//!
//! Input report and the small closed enums shared by every stage.

pub mod context;
pub mod dimension;

// Re-export commonly used types
pub use context::{ConversationContext, PerformanceMetrics, ProblemContext, ProblemType};
pub use dimension::{Dimension, HealthLevel, Priority};
