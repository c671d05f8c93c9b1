//! Core data structures for remediation planning
//!
//! Plans are immutable values: the planner builds them once from an
//! analysis and nothing mutates them afterwards.

use crate::analysis::{AnalysisResult, ReasonCode};
use crate::types::{Dimension, Priority};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Category of remediation work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairType {
    CodeFix,
    Optimization,
    Refactoring,
    Configuration,
    MemoryAdjustment,
    IntegrationFix,
    TimingAdjustment,
    RelationshipRebuild,
}

impl RepairType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairType::CodeFix => "code_fix",
            RepairType::Optimization => "optimization",
            RepairType::Refactoring => "refactoring",
            RepairType::Configuration => "configuration",
            RepairType::MemoryAdjustment => "memory_adjustment",
            RepairType::IntegrationFix => "integration_fix",
            RepairType::TimingAdjustment => "timing_adjustment",
            RepairType::RelationshipRebuild => "relationship_rebuild",
        }
    }
}

/// Polarity of a dimension before and after an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarityAdjustment {
    pub before: f64,
    pub after: f64,
}

impl PolarityAdjustment {
    /// Absolute size of the nudge
    pub fn magnitude(&self) -> f64 {
        (self.after - self.before).abs()
    }
}

/// One proposed remediation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairAction {
    /// Action identifier
    pub id: Uuid,

    /// Dimension being repaired
    pub dimension: Dimension,

    /// Analyzer finding that triggered the action
    pub reason: ReasonCode,

    /// Category of work
    pub repair_type: RepairType,

    /// Short summary
    pub description: String,

    /// Ordered concrete steps
    pub steps: Vec<String>,

    /// Execution priority
    pub priority: Priority,

    /// Effort estimate in minutes
    pub estimated_time_minutes: u32,

    /// Expected score gain
    pub estimated_impact: u32,

    /// Polarity shift the action aims for
    pub polarity_adjustment: PolarityAdjustment,
}

/// Projected effect of a plan on the center state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CenterStateAdjustment {
    pub stability: f64,
    pub harmony: f64,
    pub energy: f64,
}

/// Prioritized remediation plan for one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairPlan {
    /// Plan identifier
    pub id: Uuid,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Analysis the plan was built from
    pub analysis: AnalysisResult,

    /// Actions in generation order (canonical dimension, then template)
    pub actions: Vec<RepairAction>,

    /// Action ids in execution order
    pub execution_order: Vec<Uuid>,

    /// Sum of effort estimates in minutes
    pub total_estimated_time: u32,

    /// Sum of expected score gains
    pub total_estimated_impact: u32,

    /// Projected center-state effect
    pub center_state_adjustment: CenterStateAdjustment,
}

impl RepairPlan {
    /// Whether the analysis needed no remediation
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions in execution order
    pub fn ordered_actions(&self) -> Vec<&RepairAction> {
        let by_id: HashMap<Uuid, &RepairAction> =
            self.actions.iter().map(|a| (a.id, a)).collect();
        self.execution_order
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect()
    }
}
