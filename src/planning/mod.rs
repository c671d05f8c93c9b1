//! Repair planning
//!
//! Maps low-scoring dimensions to concrete, prioritized repair actions
//! drawn from a fixed remedy table.

pub mod planner;
pub mod templates;
pub mod types;

// Re-export commonly used types
pub use planner::RepairPlanner;
pub use templates::{PolarityShift, RemedyTemplate, TEMPLATES};
pub use types::{
    CenterStateAdjustment, PolarityAdjustment, RepairAction, RepairPlan, RepairType,
};
