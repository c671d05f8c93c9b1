//! Eight-dimension problem analyzer
//!
//! Each dimension starts from a 100-point baseline and applies a fixed,
//! ordered list of rules over the problem report. A fired rule subtracts
//! its penalty and records one issue, one improvement and one reason code.
//! The analyzer has no hidden inputs: identical reports always produce
//! identical scores.

use crate::analysis::reasons::ReasonCode;
use crate::analysis::types::{AnalysisResult, CenterState, DimensionScore};
use crate::types::{Dimension, HealthLevel, ProblemContext, ProblemType};
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use uuid::Uuid;

/// Dimensions scoring below this are reported as critical
pub const CRITICAL_BELOW: u8 = 60;

/// Dimensions scoring at or above this are reported as healthy
pub const HEALTHY_FROM: u8 = 80;

const DEEP_STACK_LINES: usize = 20;
const COMPONENT_LIMIT: usize = 10;
const SLOW_RESPONSE_MS: f64 = 3000.0;
const SLUGGISH_RESPONSE_MS: f64 = 1000.0;
const LATENCY_SPIKE_MS: f64 = 5000.0;
const RESOURCE_PRESSURE_PCT: f64 = 80.0;
const TOPIC_SHIFT_LIMIT: f64 = 0.7;
const SHORT_CONVERSATION: usize = 3;

/// Accumulates rule hits for one dimension
struct Scorecard {
    dimension: Dimension,
    score: i32,
    issues: Vec<String>,
    improvements: Vec<String>,
    reasons: Vec<ReasonCode>,
}

impl Scorecard {
    fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            score: 100,
            issues: Vec::new(),
            improvements: Vec::new(),
            reasons: Vec::new(),
        }
    }

    fn flag(&mut self, code: ReasonCode, issue: impl Into<String>) {
        debug_assert_eq!(code.dimension(), self.dimension);
        self.score -= i32::from(code.penalty());
        self.issues.push(issue.into());
        self.improvements.push(code.improvement().to_string());
        self.reasons.push(code);
    }

    fn finish(self) -> DimensionScore {
        let score = self.score.clamp(0, 100) as u8;
        DimensionScore {
            dimension: self.dimension,
            score,
            health_level: HealthLevel::from_score(score),
            issues: self.issues,
            improvements: self.improvements,
            reasons: self.reasons,
            polarity_balance: polarity_balance(self.dimension, score),
        }
    }
}

/// Rule-based dimensional analyzer
#[derive(Debug, Clone, Default)]
pub struct DimensionalAnalyzer;

impl DimensionalAnalyzer {
    /// Create new analyzer
    pub fn new() -> Self {
        Self
    }

    /// Score a problem report along all eight dimensions
    pub fn analyze(&self, context: &ProblemContext) -> AnalysisResult {
        let scores: BTreeMap<Dimension, DimensionScore> = Dimension::ALL
            .iter()
            .map(|&dimension| (dimension, self.score_dimension(dimension, context)))
            .collect();

        let values: Vec<f64> = scores.values().map(|s| f64::from(s.score)).collect();
        let overall_score = mean(&values).round() as u8;

        let result = AnalysisResult {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            overall_score,
            overall_health_level: HealthLevel::from_score(overall_score),
            critical_dimensions: critical_dimensions(&scores),
            healthy_dimensions: healthy_dimensions(&scores),
            center_state: center_state(&scores),
            scores,
        };

        debug!(
            analysis_id = %result.id,
            overall = result.overall_score,
            critical = ?result.critical_dimensions,
            "analysis complete"
        );

        result
    }

    /// Score a single dimension
    pub fn score_dimension(&self, dimension: Dimension, context: &ProblemContext) -> DimensionScore {
        let mut card = Scorecard::new(dimension);
        match dimension {
            Dimension::Structure => structure_rules(context, &mut card),
            Dimension::Flow => flow_rules(context, &mut card),
            Dimension::CoreAlignment => core_alignment_rules(context, &mut card),
            Dimension::Context => context_rules(context, &mut card),
            Dimension::Intent => intent_rules(context, &mut card),
            Dimension::Environment => environment_rules(context, &mut card),
            Dimension::Temporal => temporal_rules(context, &mut card),
            Dimension::Relation => relation_rules(context, &mut card),
        }
        card.finish()
    }
}

fn structure_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if let Some(message) = ctx.error_message.as_deref() {
        if message.contains("undefined") || message.contains("null") {
            card.flag(
                ReasonCode::UnresolvedReference,
                "Unresolved reference: a variable is undefined or null",
            );
        }
        if message.contains("TypeError") {
            card.flag(ReasonCode::TypeMismatch, "A type error was raised");
        }
        if message.contains("ReferenceError") {
            card.flag(
                ReasonCode::BrokenDependency,
                "A reference error points at a broken dependency",
            );
        }
    }

    if let Some(trace) = ctx.stack_trace.as_deref().filter(|t| !t.is_empty()) {
        let depth = trace.split('\n').count();
        if depth > DEEP_STACK_LINES {
            card.flag(
                ReasonCode::DeepCallStack,
                format!("Call stack is {} frames deep (possible runaway recursion)", depth),
            );
        }
    }

    if let Some(components) = ctx.components.as_ref() {
        if components.len() > COMPONENT_LIMIT {
            card.flag(
                ReasonCode::ComponentSprawl,
                format!("{} components are involved in the problem", components.len()),
            );
        }
    }
}

fn flow_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if let Some(metrics) = ctx.performance_metrics.as_ref() {
        match metrics.response_time_ms {
            Some(ms) if ms > SLOW_RESPONSE_MS => card.flag(
                ReasonCode::SlowResponse,
                format!("Response time is far too slow ({}ms)", ms),
            ),
            Some(ms) if ms > SLUGGISH_RESPONSE_MS => card.flag(
                ReasonCode::SluggishResponse,
                format!("Response time is somewhat slow ({}ms)", ms),
            ),
            _ => {}
        }

        if let Some(pct) = metrics.memory_usage_pct.filter(|&p| p > RESOURCE_PRESSURE_PCT) {
            card.flag(
                ReasonCode::MemoryPressure,
                format!("Memory usage is too high ({}%)", pct),
            );
        }

        if let Some(pct) = metrics.cpu_usage_pct.filter(|&p| p > RESOURCE_PRESSURE_PCT) {
            card.flag(
                ReasonCode::CpuSaturation,
                format!("CPU usage is too high ({}%)", pct),
            );
        }
    }

    if ctx.problem_type == ProblemType::Performance {
        card.flag(
            ReasonCode::PerformanceReported,
            "A performance problem was reported",
        );
    }
}

fn core_alignment_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if ctx.problem_type == ProblemType::UserExperience
        && ctx.description.to_lowercase().contains("polarity")
    {
        card.flag(
            ReasonCode::PolarityImbalance,
            "A polarity imbalance was described",
        );
    }

    if let Some(feedback) = ctx.feedback_lower() {
        if contains_any(&feedback, &["inappropriate", "rude", "offensive"]) {
            card.flag(
                ReasonCode::EthicsConcern,
                "Feedback raises an ethics concern about responses",
            );
        }
        if contains_any(&feedback, &["contradict", "inconsistent", "doesn't make sense"]) {
            card.flag(
                ReasonCode::CoherenceBreak,
                "Responses contradict each other",
            );
        }
        if contains_any(&feedback, &["cold", "mechanical", "robotic"]) {
            card.flag(
                ReasonCode::ToneTooAssertive,
                "Tone is unbalanced: too assertive",
            );
        }
        if contains_any(&feedback, &["vague", "ambiguous", "unclear"]) {
            card.flag(
                ReasonCode::ToneTooPassive,
                "Tone is unbalanced: too passive",
            );
        }
    }
}

fn context_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    let Some(conversation) = ctx.conversation_context.as_ref() else {
        return;
    };

    if conversation.recent_messages.as_ref().is_some_and(|m| m.is_empty()) {
        card.flag(ReasonCode::MissingHistory, "Conversation history is missing");
    }

    if conversation.topic().is_none() {
        card.flag(ReasonCode::UnknownTopic, "The current topic is unknown");
    }

    if conversation.intent().is_none() {
        card.flag(ReasonCode::UntrackedIntent, "The user's intent is not tracked");
    }

    if let Some(messages) = conversation.recent_messages.as_deref() {
        if messages.len() >= 2 && topic_shift(messages) > TOPIC_SHIFT_LIMIT {
            card.flag(
                ReasonCode::AbruptTopicShift,
                "The topic shifted too abruptly",
            );
        }
    }
}

fn intent_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if let Some(conversation) = ctx.conversation_context.as_ref() {
        match conversation.intent() {
            None => card.flag(
                ReasonCode::IntentNotInferred,
                "The user's intent could not be inferred",
            ),
            Some(intent) if intent.trim().eq_ignore_ascii_case("unknown") => card.flag(
                ReasonCode::IntentUnclear,
                "The user's intent is unclear",
            ),
            Some(_) => {}
        }
    }

    if let Some(feedback) = ctx.feedback_lower() {
        if contains_any(&feedback, &["wrong", "not what i meant", "that's not it"]) {
            card.flag(
                ReasonCode::IntentMisread,
                "The user's intent was misread",
            );
        }
        if contains_any(
            &feedback,
            &["don't understand", "doesn't understand", "do not understand", "not understanding"],
        ) {
            card.flag(
                ReasonCode::IntentMisunderstood,
                "Understanding of the user's intent is poor",
            );
        }
    }
}

fn environment_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if let Some(message) = ctx.error_message.as_deref() {
        let lowered = message.to_lowercase();
        if lowered.contains("network") || lowered.contains("timeout") {
            card.flag(ReasonCode::NetworkFailure, "A network error occurred");
        }
        if message.contains("API") || lowered.contains("fetch") {
            card.flag(ReasonCode::ApiFailure, "An API call failed");
        }
        if message.contains("CORS") {
            card.flag(ReasonCode::CorsViolation, "A CORS error occurred");
        }
    }

    if ctx.problem_type == ProblemType::Integration {
        card.flag(
            ReasonCode::IntegrationReported,
            "An external integration problem was reported",
        );
    }
}

fn temporal_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if let Some(ms) = ctx.response_time_ms().filter(|&ms| ms > LATENCY_SPIKE_MS) {
        card.flag(
            ReasonCode::LatencySpike,
            format!("Response time is very slow ({}ms), a timing problem", ms),
        );
    }

    if let Some(feedback) = ctx.feedback_lower() {
        if contains_any(&feedback, &["slow", "waiting"]) {
            card.flag(ReasonCode::SlowReply, "Replies arrive too late");
        }
        if contains_any(&feedback, &["awkward pause", "timing"]) {
            card.flag(ReasonCode::PacingOff, "Conversational pacing is off");
        }
    }
}

fn relation_rules(ctx: &ProblemContext, card: &mut Scorecard) {
    if let Some(feedback) = ctx.feedback_lower() {
        if contains_any(
            &feedback,
            &["untrustworthy", "can't trust", "cannot trust", "don't trust", "uneasy"],
        ) {
            card.flag(
                ReasonCode::TrustDeficit,
                "Trust between the user and the system is damaged",
            );
        }
        if contains_any(&feedback, &["distance", "too close", "too distant", "too familiar"]) {
            card.flag(
                ReasonCode::DistanceMisjudged,
                "Conversational distance feels wrong to the user",
            );
        }
        if contains_any(&feedback, &["forgot", "doesn't remember", "don't remember"]) {
            card.flag(
                ReasonCode::ContinuityLoss,
                "Learning does not carry over between conversations",
            );
        }
    }

    if let Some(messages) = ctx.recent_messages() {
        if messages.len() < SHORT_CONVERSATION {
            card.flag(
                ReasonCode::ShortConversation,
                "The conversation is too short to build on",
            );
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Polarity balance: base bias nudged by distance from a 70-point midline
pub fn polarity_balance(dimension: Dimension, score: u8) -> f64 {
    (dimension.base_bias() + (f64::from(score) - 70.0) / 2.0).clamp(-100.0, 100.0)
}

/// Topic shift between the last two messages (0.0 = same words, 1.0 = disjoint)
pub fn topic_shift(messages: &[String]) -> f64 {
    if messages.len() < 2 {
        return 0.0;
    }

    let last: HashSet<&str> = messages[messages.len() - 1].split_whitespace().collect();
    let previous: HashSet<&str> = messages[messages.len() - 2].split_whitespace().collect();

    let largest = last.len().max(previous.len());
    if largest == 0 {
        return 0.0;
    }

    let common = last.intersection(&previous).count();
    1.0 - common as f64 / largest as f64
}

fn critical_dimensions(scores: &BTreeMap<Dimension, DimensionScore>) -> Vec<Dimension> {
    let mut critical: Vec<&DimensionScore> =
        scores.values().filter(|s| s.score < CRITICAL_BELOW).collect();
    critical.sort_by_key(|s| s.score);
    critical.into_iter().map(|s| s.dimension).collect()
}

fn healthy_dimensions(scores: &BTreeMap<Dimension, DimensionScore>) -> Vec<Dimension> {
    let mut healthy: Vec<&DimensionScore> =
        scores.values().filter(|s| s.score >= HEALTHY_FROM).collect();
    healthy.sort_by(|a, b| b.score.cmp(&a.score));
    healthy.into_iter().map(|s| s.dimension).collect()
}

fn center_state(scores: &BTreeMap<Dimension, DimensionScore>) -> CenterState {
    let values: Vec<f64> = scores.values().map(|s| f64::from(s.score)).collect();
    let polarities: Vec<f64> = scores.values().map(|s| s.polarity_balance).collect();

    CenterState {
        stability: (100.0 - 2.0 * std_dev(&values)).clamp(0.0, 100.0).round(),
        harmony: (100.0 - std_dev(&polarities)).clamp(0.0, 100.0).round(),
        energy: mean(&values).clamp(0.0, 100.0).round(),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConversationContext, PerformanceMetrics};

    fn analyzer() -> DimensionalAnalyzer {
        DimensionalAnalyzer::new()
    }

    #[test]
    fn test_clean_report_scores_perfect() {
        let result = analyzer().analyze(&ProblemContext::new(ProblemType::Other, "nothing wrong"));

        assert_eq!(result.overall_score, 100);
        assert_eq!(result.overall_health_level, HealthLevel::Excellent);
        assert!(result.critical_dimensions.is_empty());
        assert_eq!(result.healthy_dimensions.len(), 8);
        assert_eq!(result.center_state.stability, 100.0);
        assert_eq!(result.center_state.energy, 100.0);
        for score in result.scores.values() {
            assert!(score.issues.is_empty());
            assert_eq!(score.polarity_balance, score.dimension.base_bias() + 15.0);
        }
    }

    #[test]
    fn test_undefined_variable_flags_structure() {
        let ctx = ProblemContext::new(ProblemType::Error, "x").with_error_message("undefined variable");
        let result = analyzer().analyze(&ctx);
        let structure = result.dimension(Dimension::Structure).unwrap();

        assert!(structure.score < 80);
        assert!(structure.has_reason(ReasonCode::UnresolvedReference));
        assert!(structure.issues.iter().any(|i| i.contains("Unresolved reference")));
    }

    #[test]
    fn test_reference_error_stacks_penalties() {
        let ctx = ProblemContext::new(ProblemType::Error, "x")
            .with_error_message("ReferenceError: undefined variable");
        let structure = analyzer().score_dimension(Dimension::Structure, &ctx);

        assert_eq!(structure.score, 50);
        assert_eq!(
            structure.reasons,
            vec![ReasonCode::UnresolvedReference, ReasonCode::BrokenDependency]
        );
        assert_eq!(structure.issues.len(), structure.improvements.len());
    }

    #[test]
    fn test_slow_performance_hits_flow_and_temporal() {
        let ctx = ProblemContext::new(ProblemType::Performance, "").with_performance(
            PerformanceMetrics {
                response_time_ms: Some(6000.0),
                ..Default::default()
            },
        );
        let result = analyzer().analyze(&ctx);

        assert_eq!(result.score_of(Dimension::Flow), 50);
        assert_eq!(result.score_of(Dimension::Temporal), 65);
        assert!(result.dimension(Dimension::Flow).unwrap().issues[0].contains("6000ms"));
    }

    #[test]
    fn test_sluggish_response_is_milder_than_slow() {
        let ctx = ProblemContext::new(ProblemType::Other, "").with_performance(PerformanceMetrics {
            response_time_ms: Some(1500.0),
            memory_usage_pct: Some(90.0),
            cpu_usage_pct: Some(50.0),
        });
        let flow = analyzer().score_dimension(Dimension::Flow, &ctx);

        assert_eq!(flow.reasons, vec![ReasonCode::SluggishResponse, ReasonCode::MemoryPressure]);
        assert_eq!(flow.score, 60);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let ctx = ProblemContext::new(ProblemType::Other, "")
            .with_user_feedback("rude and inconsistent, cold yet vague")
            .with_conversation(ConversationContext::default());
        let core = analyzer().score_dimension(Dimension::CoreAlignment, &ctx);

        assert_eq!(core.score, 0);
        assert_eq!(core.health_level, HealthLevel::Critical);
        assert_eq!(core.reasons.len(), 4);
        assert_eq!(core.polarity_balance, -35.0);
    }

    #[test]
    fn test_conversation_rules_only_fire_with_conversation() {
        let without = analyzer().score_dimension(
            Dimension::Context,
            &ProblemContext::new(ProblemType::Logic, "history missing"),
        );
        assert_eq!(without.score, 100);

        let with = analyzer().score_dimension(
            Dimension::Context,
            &ProblemContext::new(ProblemType::Logic, "history missing").with_conversation(
                ConversationContext {
                    recent_messages: Some(vec![]),
                    current_topic: None,
                    user_intent: None,
                },
            ),
        );
        assert_eq!(with.score, 25);
        assert!(with.has_reason(ReasonCode::MissingHistory));
    }

    #[test]
    fn test_unknown_intent_is_milder_than_missing() {
        let unknown = ProblemContext::new(ProblemType::Logic, "").with_conversation(
            ConversationContext {
                user_intent: Some("Unknown".to_string()),
                ..Default::default()
            },
        );
        let intent = analyzer().score_dimension(Dimension::Intent, &unknown);
        assert_eq!(intent.reasons, vec![ReasonCode::IntentUnclear]);
        assert_eq!(intent.score, 75);
    }

    #[test]
    fn test_blank_topic_and_intent_count_as_missing() {
        let ctx = ProblemContext::new(ProblemType::Logic, "").with_conversation(
            ConversationContext {
                recent_messages: Some(vec!["retry the upload".to_string(); 3]),
                current_topic: Some(String::new()),
                user_intent: Some("  ".to_string()),
            },
        );

        let context = analyzer().score_dimension(Dimension::Context, &ctx);
        assert_eq!(context.score, 55);
        assert_eq!(
            context.reasons,
            vec![ReasonCode::UnknownTopic, ReasonCode::UntrackedIntent]
        );

        let intent = analyzer().score_dimension(Dimension::Intent, &ctx);
        assert_eq!(intent.score, 65);
        assert_eq!(intent.reasons, vec![ReasonCode::IntentNotInferred]);
    }

    #[test]
    fn test_trailing_newline_counts_toward_stack_depth() {
        let twenty_frames = "at frame\n".repeat(20);
        let deep = ProblemContext::new(ProblemType::Error, "").with_stack_trace(twenty_frames.trim_end());
        assert!(!analyzer()
            .score_dimension(Dimension::Structure, &deep)
            .has_reason(ReasonCode::DeepCallStack));

        let deep = ProblemContext::new(ProblemType::Error, "").with_stack_trace(twenty_frames);
        let structure = analyzer().score_dimension(Dimension::Structure, &deep);
        assert_eq!(structure.reasons, vec![ReasonCode::DeepCallStack]);
        assert_eq!(structure.score, 85);

        let empty = ProblemContext::new(ProblemType::Error, "").with_stack_trace("");
        assert_eq!(analyzer().score_dimension(Dimension::Structure, &empty).score, 100);
    }

    #[test]
    fn test_topic_shift() {
        let same = vec!["deploy the service".to_string(), "deploy the service".to_string()];
        assert_eq!(topic_shift(&same), 0.0);

        let disjoint = vec!["deploy the service".to_string(), "favourite pasta recipes".to_string()];
        assert_eq!(topic_shift(&disjoint), 1.0);

        let empty = vec![String::new(), "   ".to_string()];
        assert_eq!(topic_shift(&empty), 0.0);
    }

    #[test]
    fn test_critical_and_healthy_ordering() {
        let ctx = ProblemContext::new(ProblemType::Integration, "")
            .with_error_message("network timeout while calling API")
            .with_user_feedback("I can't trust it and it forgot me");
        let result = analyzer().analyze(&ctx);

        // environment 100-30-25-25 = 20, relation 100-35-30 = 35
        assert_eq!(
            result.critical_dimensions,
            vec![Dimension::Environment, Dimension::Relation]
        );
        assert!(!result.healthy_dimensions.contains(&Dimension::Environment));
        assert_eq!(result.healthy_dimensions[0], Dimension::Structure);
    }

    #[test]
    fn test_overall_is_rounded_mean() {
        let ctx = ProblemContext::new(ProblemType::Performance, "slow");
        let result = analyzer().analyze(&ctx);
        // flow 80, the rest 100: mean 97.5
        assert_eq!(result.overall_score, 98);
        assert_eq!(result.center_state.energy, 98.0);
    }
}
