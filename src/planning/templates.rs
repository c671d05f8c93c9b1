//! Remedy template table
//!
//! Each template belongs to one dimension and fires at most once per plan,
//! when any of its trigger reason codes is present on that dimension.
//! Order within a dimension is the order actions are generated in.

use crate::analysis::ReasonCode;
use crate::planning::types::RepairType;
use crate::types::Dimension;

/// How an action moves the dimension's polarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolarityShift {
    /// Relative nudge
    Delta(f64),

    /// Move to an absolute value
    Reset(f64),
}

impl PolarityShift {
    /// Target polarity, clamped to the valid range
    pub fn apply(&self, before: f64) -> f64 {
        let after = match self {
            PolarityShift::Delta(delta) => before + delta,
            PolarityShift::Reset(value) => *value,
        };
        after.clamp(-100.0, 100.0)
    }
}

/// Canned remediation for a family of findings
#[derive(Debug, Clone, Copy)]
pub struct RemedyTemplate {
    pub dimension: Dimension,
    pub triggers: &'static [ReasonCode],
    pub repair_type: RepairType,
    pub description: &'static str,
    pub steps: &'static [&'static str],
    pub estimated_time_minutes: u32,
    pub estimated_impact: u32,
    pub polarity: PolarityShift,
}

impl RemedyTemplate {
    /// First trigger present in `reasons`, if any
    pub fn matched_reason(&self, reasons: &[ReasonCode]) -> Option<ReasonCode> {
        self.triggers.iter().copied().find(|code| reasons.contains(code))
    }
}

/// Templates for one dimension, in generation order
pub fn templates_for(dimension: Dimension) -> impl Iterator<Item = &'static RemedyTemplate> {
    TEMPLATES.iter().filter(move |t| t.dimension == dimension)
}

pub const TEMPLATES: &[RemedyTemplate] = &[
    // structure
    RemedyTemplate {
        dimension: Dimension::Structure,
        triggers: &[ReasonCode::UnresolvedReference],
        repair_type: RepairType::CodeFix,
        description: "Fix unresolved variable references",
        steps: &[
            "Locate the undefined variables",
            "Add proper initialization",
            "Add type annotations",
            "Run the tests to confirm",
        ],
        estimated_time_minutes: 15,
        estimated_impact: 20,
        polarity: PolarityShift::Delta(10.0),
    },
    RemedyTemplate {
        dimension: Dimension::Structure,
        triggers: &[ReasonCode::TypeMismatch],
        repair_type: RepairType::Refactoring,
        description: "Correct the type definitions",
        steps: &[
            "Locate the type errors",
            "Add the correct type definitions",
            "Review type assertions",
            "Run the type checker",
        ],
        estimated_time_minutes: 20,
        estimated_impact: 15,
        polarity: PolarityShift::Delta(15.0),
    },
    RemedyTemplate {
        dimension: Dimension::Structure,
        triggers: &[ReasonCode::BrokenDependency],
        repair_type: RepairType::Refactoring,
        description: "Untangle module dependencies",
        steps: &[
            "Draw the dependency graph",
            "Identify circular dependencies",
            "Revisit the module structure",
            "Simplify the dependency edges",
        ],
        estimated_time_minutes: 30,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(5.0),
    },
    // flow
    RemedyTemplate {
        dimension: Dimension::Flow,
        triggers: &[ReasonCode::SlowResponse, ReasonCode::SluggishResponse],
        repair_type: RepairType::Optimization,
        description: "Optimize response time",
        steps: &[
            "Identify the bottleneck",
            "Optimize asynchronous work",
            "Introduce caching",
            "Run performance tests",
        ],
        estimated_time_minutes: 40,
        estimated_impact: 30,
        polarity: PolarityShift::Delta(-5.0),
    },
    RemedyTemplate {
        dimension: Dimension::Flow,
        triggers: &[ReasonCode::MemoryPressure],
        repair_type: RepairType::MemoryAdjustment,
        description: "Reduce memory usage",
        steps: &[
            "Detect memory leaks",
            "Drop unneeded data",
            "Tune memory pools",
            "Monitor memory usage",
        ],
        estimated_time_minutes: 35,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(-10.0),
    },
    // core-alignment
    RemedyTemplate {
        dimension: Dimension::CoreAlignment,
        triggers: &[ReasonCode::EthicsConcern],
        repair_type: RepairType::Configuration,
        description: "Strengthen response ethics checks",
        steps: &[
            "Review the ethics rules",
            "Add a filter for inappropriate phrasing",
            "Check responses before they are sent",
            "Monitor the ethics score",
        ],
        estimated_time_minutes: 25,
        estimated_impact: 40,
        polarity: PolarityShift::Reset(0.0),
    },
    RemedyTemplate {
        dimension: Dimension::CoreAlignment,
        triggers: &[ReasonCode::ToneTooAssertive],
        repair_type: RepairType::Configuration,
        description: "Soften an over-assertive tone",
        steps: &[
            "Analyze the current tonal balance",
            "Prefer softer phrasing",
            "Retune the presence settings",
            "Monitor the balance",
        ],
        estimated_time_minutes: 20,
        estimated_impact: 30,
        polarity: PolarityShift::Delta(-30.0),
    },
    RemedyTemplate {
        dimension: Dimension::CoreAlignment,
        triggers: &[ReasonCode::ToneTooPassive, ReasonCode::PolarityImbalance],
        repair_type: RepairType::Configuration,
        description: "Sharpen an over-passive tone",
        steps: &[
            "Analyze the current tonal balance",
            "Prefer clearer phrasing",
            "Retune the presence settings",
            "Monitor the balance",
        ],
        estimated_time_minutes: 20,
        estimated_impact: 30,
        polarity: PolarityShift::Delta(30.0),
    },
    // context
    RemedyTemplate {
        dimension: Dimension::Context,
        triggers: &[ReasonCode::MissingHistory],
        repair_type: RepairType::MemoryAdjustment,
        description: "Strengthen conversation memory persistence",
        steps: &[
            "Check the memory persistence logic",
            "Persist important exchanges first",
            "Tune memory compression",
            "Speed up memory retrieval",
        ],
        estimated_time_minutes: 30,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(-10.0),
    },
    RemedyTemplate {
        dimension: Dimension::Context,
        triggers: &[ReasonCode::AbruptTopicShift],
        repair_type: RepairType::Optimization,
        description: "Bridge topic transitions",
        steps: &[
            "Improve topic shift detection",
            "Add bridging phrases",
            "Keep context continuous across turns",
            "Evaluate how natural transitions feel",
        ],
        estimated_time_minutes: 25,
        estimated_impact: 20,
        polarity: PolarityShift::Delta(-5.0),
    },
    // intent
    RemedyTemplate {
        dimension: Dimension::Intent,
        triggers: &[ReasonCode::IntentNotInferred],
        repair_type: RepairType::Optimization,
        description: "Improve intent inference",
        steps: &[
            "Review the intent inference logic",
            "Collect more context signals",
            "Improve intent classification accuracy",
            "Validate inferred intents",
        ],
        estimated_time_minutes: 35,
        estimated_impact: 35,
        polarity: PolarityShift::Delta(15.0),
    },
    RemedyTemplate {
        dimension: Dimension::Intent,
        triggers: &[ReasonCode::IntentMisread],
        repair_type: RepairType::Configuration,
        description: "Add an intent confirmation step",
        steps: &[
            "Ask a confirming question",
            "Collect user feedback",
            "Re-infer intent on correction",
            "Streamline the confirmation flow",
        ],
        estimated_time_minutes: 20,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(10.0),
    },
    // environment
    RemedyTemplate {
        dimension: Dimension::Environment,
        triggers: &[ReasonCode::NetworkFailure],
        repair_type: RepairType::IntegrationFix,
        description: "Harden network error handling",
        steps: &[
            "Check network connectivity",
            "Add a retry mechanism",
            "Tune timeout settings",
            "Improve error messages",
        ],
        estimated_time_minutes: 25,
        estimated_impact: 30,
        polarity: PolarityShift::Delta(0.0),
    },
    RemedyTemplate {
        dimension: Dimension::Environment,
        triggers: &[ReasonCode::ApiFailure],
        repair_type: RepairType::IntegrationFix,
        description: "Stabilize API calls",
        steps: &[
            "Verify API connectivity",
            "Harden error handling",
            "Add a response cache",
            "Monitor API usage",
        ],
        estimated_time_minutes: 30,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(0.0),
    },
    // temporal
    RemedyTemplate {
        dimension: Dimension::Temporal,
        triggers: &[ReasonCode::LatencySpike, ReasonCode::SlowReply],
        repair_type: RepairType::TimingAdjustment,
        description: "Optimize reply timing",
        steps: &[
            "Measure reply latency",
            "Find the source of the delay",
            "Improve real-time responsiveness",
            "Monitor timing",
        ],
        estimated_time_minutes: 30,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(-10.0),
    },
    RemedyTemplate {
        dimension: Dimension::Temporal,
        triggers: &[ReasonCode::PacingOff],
        repair_type: RepairType::TimingAdjustment,
        description: "Adjust conversational pacing",
        steps: &[
            "Analyze pauses between turns",
            "Derive a natural pause length",
            "Adjust pauses dynamically",
            "Evaluate how natural the pacing feels",
        ],
        estimated_time_minutes: 20,
        estimated_impact: 20,
        polarity: PolarityShift::Delta(-15.0),
    },
    // relation
    RemedyTemplate {
        dimension: Dimension::Relation,
        triggers: &[ReasonCode::TrustDeficit],
        repair_type: RepairType::RelationshipRebuild,
        description: "Rebuild trust with the user",
        steps: &[
            "Keep responses consistent",
            "Track and honor commitments",
            "Increase transparency",
            "Monitor trust signals",
        ],
        estimated_time_minutes: 40,
        estimated_impact: 40,
        polarity: PolarityShift::Delta(-20.0),
    },
    RemedyTemplate {
        dimension: Dimension::Relation,
        triggers: &[ReasonCode::DistanceMisjudged],
        repair_type: RepairType::Configuration,
        description: "Tune conversational distance",
        steps: &[
            "Analyze the current distance",
            "Derive an appropriate distance",
            "Adjust the companion-mode parameters",
            "Monitor perceived distance",
        ],
        estimated_time_minutes: 15,
        estimated_impact: 25,
        polarity: PolarityShift::Delta(-10.0),
    },
    RemedyTemplate {
        dimension: Dimension::Relation,
        triggers: &[ReasonCode::ContinuityLoss],
        repair_type: RepairType::MemoryAdjustment,
        description: "Strengthen learning continuity",
        steps: &[
            "Check learned-memory persistence",
            "Persist important learnings first",
            "Improve recall of past learnings",
            "Monitor continuity",
        ],
        estimated_time_minutes: 25,
        estimated_impact: 30,
        polarity: PolarityShift::Delta(-15.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triggers_belong_to_template_dimension() {
        for template in TEMPLATES {
            assert!(!template.triggers.is_empty());
            for code in template.triggers {
                assert_eq!(code.dimension(), template.dimension, "{}", template.description);
            }
        }
    }

    #[test]
    fn test_every_dimension_has_templates() {
        for dimension in Dimension::ALL {
            assert!(templates_for(dimension).count() >= 2, "{}", dimension);
        }
    }

    #[test]
    fn test_polarity_shift_clamps() {
        assert_eq!(PolarityShift::Delta(30.0).apply(90.0), 100.0);
        assert_eq!(PolarityShift::Delta(-30.0).apply(-80.0), -100.0);
        assert_eq!(PolarityShift::Reset(0.0).apply(-35.0), 0.0);
    }

    #[test]
    fn test_matched_reason_prefers_first_trigger() {
        let template = templates_for(Dimension::Flow).next().unwrap();
        let reasons = [ReasonCode::SluggishResponse, ReasonCode::SlowResponse];
        assert_eq!(template.matched_reason(&reasons), Some(ReasonCode::SlowResponse));
        assert_eq!(template.matched_reason(&[ReasonCode::CpuSaturation]), None);
    }
}
