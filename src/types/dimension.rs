//! Dimensions, health tiers and remediation priorities
//!
//! All three are small closed enums with a fixed ordering; every
//! deterministic sort in the crate goes through `index()` / `rank()`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight independent analysis axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    /// Code and dependency structure
    Structure,

    /// Data flow, throughput, resource pressure
    Flow,

    /// Ethical and tonal coherence of responses
    CoreAlignment,

    /// Conversation memory and topic tracking
    Context,

    /// Understanding of what the user wants
    Intent,

    /// External services, network, integrations
    Environment,

    /// Latency, pacing, timing
    Temporal,

    /// Relationship with the user over time
    Relation,
}

impl Dimension {
    /// All dimensions in canonical order
    pub const ALL: [Dimension; 8] = [
        Dimension::Structure,
        Dimension::Flow,
        Dimension::CoreAlignment,
        Dimension::Context,
        Dimension::Intent,
        Dimension::Environment,
        Dimension::Temporal,
        Dimension::Relation,
    ];

    /// Position in the canonical order (0-7)
    pub fn index(&self) -> usize {
        match self {
            Dimension::Structure => 0,
            Dimension::Flow => 1,
            Dimension::CoreAlignment => 2,
            Dimension::Context => 3,
            Dimension::Intent => 4,
            Dimension::Environment => 5,
            Dimension::Temporal => 6,
            Dimension::Relation => 7,
        }
    }

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Structure => "structure",
            Dimension::Flow => "flow",
            Dimension::CoreAlignment => "core-alignment",
            Dimension::Context => "context",
            Dimension::Intent => "intent",
            Dimension::Environment => "environment",
            Dimension::Temporal => "temporal",
            Dimension::Relation => "relation",
        }
    }

    /// Resting polarity of the dimension before score effects
    pub fn base_bias(&self) -> f64 {
        match self {
            Dimension::Structure => 20.0,
            Dimension::Flow => -10.0,
            Dimension::CoreAlignment => 0.0,
            Dimension::Context => -20.0,
            Dimension::Intent => 10.0,
            Dimension::Environment => 0.0,
            Dimension::Temporal => -15.0,
            Dimension::Relation => -25.0,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health tier derived from a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl HealthLevel {
    /// Tier for a score: >=90 excellent, >=75 good, >=60 fair, >=40 poor
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => HealthLevel::Excellent,
            75..=89 => HealthLevel::Good,
            60..=74 => HealthLevel::Fair,
            40..=59 => HealthLevel::Poor,
            _ => HealthLevel::Critical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthLevel::Critical => "critical",
            HealthLevel::Poor => "poor",
            HealthLevel::Fair => "fair",
            HealthLevel::Good => "good",
            HealthLevel::Excellent => "excellent",
        }
    }
}

impl fmt::Display for HealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remediation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Tier for a dimension score: <40 critical, <60 high, <75 medium
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=39 => Priority::Critical,
            40..=59 => Priority::High,
            60..=74 => Priority::Medium,
            _ => Priority::Low,
        }
    }

    /// Sort rank, lower runs first
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    /// Probability that a simulated remediation at this priority succeeds
    pub fn success_probability(&self) -> f64 {
        match self {
            Priority::Critical => 0.95,
            Priority::High => 0.90,
            Priority::Medium => 0.85,
            Priority::Low => 0.80,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_matches_index() {
        for (i, dim) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dim.index(), i);
        }
    }

    #[test]
    fn test_dimension_serializes_kebab_case() {
        let json = serde_json::to_string(&Dimension::CoreAlignment).unwrap();
        assert_eq!(json, "\"core-alignment\"");
        let back: Dimension = serde_json::from_str("\"temporal\"").unwrap();
        assert_eq!(back, Dimension::Temporal);
    }

    #[test]
    fn test_health_level_boundaries() {
        assert_eq!(HealthLevel::from_score(100), HealthLevel::Excellent);
        assert_eq!(HealthLevel::from_score(90), HealthLevel::Excellent);
        assert_eq!(HealthLevel::from_score(89), HealthLevel::Good);
        assert_eq!(HealthLevel::from_score(75), HealthLevel::Good);
        assert_eq!(HealthLevel::from_score(74), HealthLevel::Fair);
        assert_eq!(HealthLevel::from_score(60), HealthLevel::Fair);
        assert_eq!(HealthLevel::from_score(59), HealthLevel::Poor);
        assert_eq!(HealthLevel::from_score(40), HealthLevel::Poor);
        assert_eq!(HealthLevel::from_score(39), HealthLevel::Critical);
        assert_eq!(HealthLevel::from_score(0), HealthLevel::Critical);
    }

    #[test]
    fn test_priority_boundaries() {
        assert_eq!(Priority::from_score(39), Priority::Critical);
        assert_eq!(Priority::from_score(40), Priority::High);
        assert_eq!(Priority::from_score(59), Priority::High);
        assert_eq!(Priority::from_score(60), Priority::Medium);
        assert_eq!(Priority::from_score(74), Priority::Medium);
        assert_eq!(Priority::from_score(75), Priority::Low);
    }

    #[test]
    fn test_priority_rank_and_probability_are_monotonic() {
        let order = [Priority::Critical, Priority::High, Priority::Medium, Priority::Low];
        for pair in order.windows(2) {
            assert!(pair[0].rank() < pair[1].rank());
            assert!(pair[0].success_probability() > pair[1].success_probability());
        }
    }
}
