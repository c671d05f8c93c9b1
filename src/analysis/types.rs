//! Analysis system type definitions

use crate::analysis::reasons::ReasonCode;
use crate::types::{Dimension, HealthLevel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Score and findings for one dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScore {
    /// Scored dimension
    pub dimension: Dimension,

    /// Score (0 to 100)
    pub score: u8,

    /// Tier derived from score
    pub health_level: HealthLevel,

    /// Human-readable findings, one per fired rule
    pub issues: Vec<String>,

    /// Suggested improvements, parallel to `issues`
    pub improvements: Vec<String>,

    /// Structured tags, parallel to `issues`
    pub reasons: Vec<ReasonCode>,

    /// Signed tonal balance (-100 to 100)
    pub polarity_balance: f64,
}

impl DimensionScore {
    /// Whether a given rule fired for this dimension
    pub fn has_reason(&self, code: ReasonCode) -> bool {
        self.reasons.contains(&code)
    }
}

/// Aggregate balance of the eight dimensions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CenterState {
    /// Inverse dispersion of scores (0 to 100)
    pub stability: f64,

    /// Inverse dispersion of polarity balances (0 to 100)
    pub harmony: f64,

    /// Mean score (0 to 100)
    pub energy: f64,
}

/// Complete eight-dimension analysis of one problem report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Analysis identifier
    pub id: Uuid,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Per-dimension scores, keyed in canonical order
    pub scores: BTreeMap<Dimension, DimensionScore>,

    /// Rounded mean of the dimension scores
    pub overall_score: u8,

    /// Tier of `overall_score`
    pub overall_health_level: HealthLevel,

    /// Dimensions below 60, weakest first
    pub critical_dimensions: Vec<Dimension>,

    /// Dimensions at 80 or above, strongest first
    pub healthy_dimensions: Vec<Dimension>,

    /// Aggregate center state
    pub center_state: CenterState,
}

impl AnalysisResult {
    /// Score entry for a dimension
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.scores.get(&dimension)
    }

    /// Score for a dimension, 0 when absent
    pub fn score_of(&self, dimension: Dimension) -> u8 {
        self.scores.get(&dimension).map(|s| s.score).unwrap_or(0)
    }

    /// Dimensions strictly below a score, in canonical order
    pub fn dimensions_below(&self, threshold: u8) -> Vec<Dimension> {
        self.scores
            .values()
            .filter(|s| s.score < threshold)
            .map(|s| s.dimension)
            .collect()
    }

    /// Replace the overall score, keeping its tier in step
    pub fn with_overall_score(mut self, score: u8) -> Self {
        let score = score.min(100);
        self.overall_score = score;
        self.overall_health_level = HealthLevel::from_score(score);
        self
    }
}
