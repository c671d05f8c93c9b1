//! Per-owner records kept by the healing service

use crate::analysis::{AnalysisResult, CenterState};
use crate::convergence::LoopState;
use crate::types::{Dimension, ProblemContext};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity every stored record is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An analysis as remembered in an owner's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub timestamp: DateTime<Utc>,
    pub analysis: AnalysisResult,
}

/// A running loop together with the report it is healing
#[derive(Debug, Clone, PartialEq)]
pub struct LoopSession {
    pub state: LoopState,
    pub context: ProblemContext,
}

/// What happened, for the temporal log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemporalEvent {
    #[serde(rename_all = "camelCase")]
    Analysis { analysis_id: Uuid, overall_score: u8 },

    #[serde(rename_all = "camelCase")]
    RepairPlan { plan_id: Uuid, total_actions: usize },

    #[serde(rename_all = "camelCase")]
    LoopStarted { loop_id: Uuid, initial_score: u8 },

    #[serde(rename_all = "camelCase")]
    LoopStep {
        loop_id: Uuid,
        iteration: u32,
        stage: u8,
        score: u8,
    },

    #[serde(rename_all = "camelCase")]
    LoopComplete {
        loop_id: Uuid,
        initial_score: u8,
        final_score: u8,
        improvement: i32,
    },

    #[serde(rename_all = "camelCase")]
    FullHealing {
        loop_id: Uuid,
        initial_score: u8,
        final_score: u8,
        improvement: i32,
    },
}

/// One temporal log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalEntry {
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub event: TemporalEvent,
}

impl TemporalEntry {
    pub fn now(event: TemporalEvent) -> Self {
        Self {
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Most recent temporal entries plus the full count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalLog {
    pub entries: Vec<TemporalEntry>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

/// Latest overall score against the one before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTrend {
    pub current_score: Option<u8>,
    pub previous_score: Option<u8>,
    pub trend: Trend,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Improvement outline derived from the latest analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementPlan {
    pub critical_dimensions: Vec<Dimension>,
    pub healthy_dimensions: Vec<Dimension>,

    /// Improvements of every dimension below 80
    pub priority_actions: Vec<String>,
    pub estimated_impact: u8,
    pub current_score: u8,
    pub center_state: CenterState,
}
