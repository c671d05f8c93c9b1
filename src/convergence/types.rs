//! Convergence loop state and results

use crate::analysis::AnalysisResult;
use crate::planning::RepairPlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStatus {
    Running,
    Completed,
    Failed,
    Paused,
}

impl LoopStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopStatus::Running => "running",
            LoopStatus::Completed => "completed",
            LoopStatus::Failed => "failed",
            LoopStatus::Paused => "paused",
        }
    }
}

/// Outcome of one loop iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResult {
    pub result_id: Uuid,
    pub timestamp: DateTime<Utc>,

    /// Stage the iteration ran in
    pub stage: u8,

    /// Ids of the actions handed to the executor
    pub executed_action_ids: Vec<Uuid>,
    pub before_score: u8,
    pub after_score: u8,
    pub improvement: i32,
    pub success_count: u32,
    pub failure_count: u32,
    pub after_analysis: AnalysisResult,
}

/// Snapshot of a loop, threaded through every step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopState {
    pub loop_id: Uuid,
    pub start_time: DateTime<Utc>,

    /// 1-based, never decreases
    pub current_stage: u8,
    pub current_iteration: u32,
    pub max_iterations: u32,
    pub initial_analysis: AnalysisResult,
    pub current_analysis: AnalysisResult,
    pub executed_plans: Vec<RepairPlan>,
    pub repair_results: Vec<RepairResult>,
    pub status: LoopStatus,

    /// Share of the iteration budget used, 0-100
    pub progress: u8,
}

impl LoopState {
    pub fn is_running(&self) -> bool {
        self.status == LoopStatus::Running
    }

    /// Total successful and failed executions across iterations
    pub fn outcome_counts(&self) -> (u32, u32) {
        self.repair_results.iter().fold((0, 0), |(s, f), r| {
            (s + r.success_count, f + r.failure_count)
        })
    }

    pub fn total_actions(&self) -> u32 {
        self.repair_results
            .iter()
            .map(|r| r.executed_action_ids.len() as u32)
            .sum()
    }
}

/// What the loop learned, in human-readable form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningRecord {
    pub learnings: Vec<String>,
    pub improvement_patterns: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Summary of a finished loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoopResult {
    pub loop_id: Uuid,
    pub completion_time: DateTime<Utc>,

    /// Status the loop ended in
    pub status: LoopStatus,
    pub initial_score: u8,
    pub final_score: u8,
    pub total_improvement: i32,
    pub completed_stages: u8,
    pub total_iterations: u32,
    pub total_actions: u32,

    /// Percentage of executed actions that succeeded
    pub success_rate: u8,
    pub learning_record: LearningRecord,
}
