//! Structured reason codes emitted by the analyzer
//!
//! Every rule that fires records one `ReasonCode` next to its
//! human-readable issue text. Downstream consumers (the planner) switch
//! on these tags and never inspect the text.

use crate::types::Dimension;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag naming the analyzer rule that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCode {
    // structure
    UnresolvedReference,
    TypeMismatch,
    BrokenDependency,
    DeepCallStack,
    ComponentSprawl,

    // flow
    SlowResponse,
    SluggishResponse,
    MemoryPressure,
    CpuSaturation,
    PerformanceReported,

    // core-alignment
    PolarityImbalance,
    EthicsConcern,
    CoherenceBreak,
    ToneTooAssertive,
    ToneTooPassive,

    // context
    MissingHistory,
    UnknownTopic,
    UntrackedIntent,
    AbruptTopicShift,

    // intent
    IntentNotInferred,
    IntentUnclear,
    IntentMisread,
    IntentMisunderstood,

    // environment
    NetworkFailure,
    ApiFailure,
    CorsViolation,
    IntegrationReported,

    // temporal
    LatencySpike,
    SlowReply,
    PacingOff,

    // relation
    TrustDeficit,
    DistanceMisjudged,
    ContinuityLoss,
    ShortConversation,
}

impl ReasonCode {
    /// Dimension this reason is scored against
    pub fn dimension(&self) -> Dimension {
        use ReasonCode::*;
        match self {
            UnresolvedReference | TypeMismatch | BrokenDependency | DeepCallStack
            | ComponentSprawl => Dimension::Structure,
            SlowResponse | SluggishResponse | MemoryPressure | CpuSaturation
            | PerformanceReported => Dimension::Flow,
            PolarityImbalance | EthicsConcern | CoherenceBreak | ToneTooAssertive
            | ToneTooPassive => Dimension::CoreAlignment,
            MissingHistory | UnknownTopic | UntrackedIntent | AbruptTopicShift => {
                Dimension::Context
            }
            IntentNotInferred | IntentUnclear | IntentMisread | IntentMisunderstood => {
                Dimension::Intent
            }
            NetworkFailure | ApiFailure | CorsViolation | IntegrationReported => {
                Dimension::Environment
            }
            LatencySpike | SlowReply | PacingOff => Dimension::Temporal,
            TrustDeficit | DistanceMisjudged | ContinuityLoss | ShortConversation => {
                Dimension::Relation
            }
        }
    }

    /// Points subtracted from the dimension baseline
    pub fn penalty(&self) -> u8 {
        use ReasonCode::*;
        match self {
            UnresolvedReference => 25,
            TypeMismatch => 15,
            BrokenDependency => 25,
            DeepCallStack => 15,
            ComponentSprawl => 10,

            SlowResponse => 30,
            SluggishResponse => 15,
            MemoryPressure => 25,
            CpuSaturation => 20,
            PerformanceReported => 20,

            PolarityImbalance => 25,
            EthicsConcern => 40,
            CoherenceBreak => 30,
            ToneTooAssertive => 20,
            ToneTooPassive => 20,

            MissingHistory => 30,
            UnknownTopic => 20,
            UntrackedIntent => 25,
            AbruptTopicShift => 15,

            IntentNotInferred => 35,
            IntentUnclear => 25,
            IntentMisread => 30,
            IntentMisunderstood => 35,

            NetworkFailure => 30,
            ApiFailure => 25,
            CorsViolation => 20,
            IntegrationReported => 25,

            LatencySpike => 35,
            SlowReply => 25,
            PacingOff => 20,

            TrustDeficit => 35,
            DistanceMisjudged => 25,
            ContinuityLoss => 30,
            ShortConversation => 15,
        }
    }

    /// Suggested improvement recorded with the issue
    pub fn improvement(&self) -> &'static str {
        use ReasonCode::*;
        match self {
            UnresolvedReference => "Strengthen variable initialization and type checks",
            TypeMismatch => "Review the type definitions involved",
            BrokenDependency => "Check module dependencies and imports",
            DeepCallStack => "Review recursion or convert it to iteration",
            ComponentSprawl => "Separate component responsibilities",

            SlowResponse => "Optimize asynchronous work and introduce caching",
            SluggishResponse => "Consider parallelizing the request path",
            MemoryPressure => "Check for leaks and drop unneeded data",
            CpuSaturation => "Review computationally heavy code paths",
            PerformanceReported => "Profile the system to locate the bottleneck",

            PolarityImbalance => "Rebalance assertive and receptive tone",
            EthicsConcern => "Strengthen the ethics checks applied to responses",
            CoherenceBreak => "Verify that responses stay consistent",
            ToneTooAssertive => "Use softer phrasing",
            ToneTooPassive => "Use clearer, more direct phrasing",

            MissingHistory => "Verify that conversation memory is being persisted",
            UnknownTopic => "Strengthen topic tracking",
            UntrackedIntent => "Strengthen intent estimation",
            AbruptTopicShift => "Bridge between topics explicitly",

            IntentNotInferred => "Improve the intent inference model",
            IntentUnclear => "Collect more context before answering",
            IntentMisread => "Add an intent confirmation step",
            IntentMisunderstood => "Perform a more detailed intent analysis",

            NetworkFailure => "Check connectivity and add a retry mechanism",
            ApiFailure => "Verify API connectivity and harden error handling",
            CorsViolation => "Review the CORS policy",
            IntegrationReported => "Check the status of external services",

            LatencySpike => "Improve real-time responsiveness",
            SlowReply => "Improve reply speed",
            PacingOff => "Adjust conversational pacing",

            TrustDeficit => "Keep responses consistent to rebuild trust",
            DistanceMisjudged => "Tune the conversational distance setting",
            ContinuityLoss => "Strengthen persistence of what was learned",
            ShortConversation => "Encourage conversational continuity",
        }
    }

    /// Kebab-case tag
    pub fn as_str(&self) -> &'static str {
        use ReasonCode::*;
        match self {
            UnresolvedReference => "unresolved-reference",
            TypeMismatch => "type-mismatch",
            BrokenDependency => "broken-dependency",
            DeepCallStack => "deep-call-stack",
            ComponentSprawl => "component-sprawl",
            SlowResponse => "slow-response",
            SluggishResponse => "sluggish-response",
            MemoryPressure => "memory-pressure",
            CpuSaturation => "cpu-saturation",
            PerformanceReported => "performance-reported",
            PolarityImbalance => "polarity-imbalance",
            EthicsConcern => "ethics-concern",
            CoherenceBreak => "coherence-break",
            ToneTooAssertive => "tone-too-assertive",
            ToneTooPassive => "tone-too-passive",
            MissingHistory => "missing-history",
            UnknownTopic => "unknown-topic",
            UntrackedIntent => "untracked-intent",
            AbruptTopicShift => "abrupt-topic-shift",
            IntentNotInferred => "intent-not-inferred",
            IntentUnclear => "intent-unclear",
            IntentMisread => "intent-misread",
            IntentMisunderstood => "intent-misunderstood",
            NetworkFailure => "network-failure",
            ApiFailure => "api-failure",
            CorsViolation => "cors-violation",
            IntegrationReported => "integration-reported",
            LatencySpike => "latency-spike",
            SlowReply => "slow-reply",
            PacingOff => "pacing-off",
            TrustDeficit => "trust-deficit",
            DistanceMisjudged => "distance-misjudged",
            ContinuityLoss => "continuity-loss",
            ShortConversation => "short-conversation",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tag_matches_as_str() {
        for code in [
            ReasonCode::UnresolvedReference,
            ReasonCode::EthicsConcern,
            ReasonCode::TrustDeficit,
            ReasonCode::AbruptTopicShift,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{}\"", code.as_str()));
        }
    }

    #[test]
    fn test_override_reasons_belong_to_expected_dimensions() {
        assert_eq!(ReasonCode::EthicsConcern.dimension(), Dimension::CoreAlignment);
        assert_eq!(ReasonCode::TrustDeficit.dimension(), Dimension::Relation);
    }

    #[test]
    fn test_penalties_are_bounded() {
        for code in [ReasonCode::ComponentSprawl, ReasonCode::EthicsConcern] {
            assert!(code.penalty() > 0 && code.penalty() <= 100);
        }
    }
}
