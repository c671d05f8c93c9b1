//! Property tests for the analyzer and planner
//!
//! Reports are assembled from keyword pools so that most rules fire in
//! some generated case.

use eightfold::analysis::analyzer::{CRITICAL_BELOW, HEALTHY_FROM};
use eightfold::planning::planner::action_priority;
use eightfold::types::{ConversationContext, HealthLevel, PerformanceMetrics};
use eightfold::{Dimension, DimensionalAnalyzer, ProblemContext, ProblemType, RepairPlanner};
use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use std::collections::HashSet;

const ERRORS: &[&str] = &[
    "undefined variable",
    "TypeError: null is not an object",
    "ReferenceError: x is not defined",
    "network timeout",
    "API fetch failed",
    "CORS policy blocked request",
    "all fine",
];

const FEEDBACK: &[&str] = &[
    "that was rude",
    "answers are inconsistent",
    "feels cold and robotic",
    "too vague",
    "wrong, not what I meant",
    "it doesn't understand me",
    "so slow, always waiting",
    "awkward pause before replies",
    "I can't trust it",
    "it feels too distant",
    "it forgot everything",
    "great job",
];

const TYPES: &[ProblemType] = &[
    ProblemType::Error,
    ProblemType::Performance,
    ProblemType::Logic,
    ProblemType::UserExperience,
    ProblemType::Integration,
    ProblemType::Other,
];

#[derive(Debug, Clone)]
struct Report(ProblemContext);

fn pick<T: Clone>(g: &mut Gen, items: &[T]) -> T {
    g.choose(items).cloned().unwrap_or_else(|| items[0].clone())
}

fn maybe<T>(g: &mut Gen, value: impl FnOnce(&mut Gen) -> T) -> Option<T> {
    if bool::arbitrary(g) {
        Some(value(g))
    } else {
        None
    }
}

impl Arbitrary for Report {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut ctx = ProblemContext::new(pick(g, TYPES), "polarity drifts under load");

        ctx.error_message = maybe(g, |g| pick(g, ERRORS).to_string());
        ctx.user_feedback = maybe(g, |g| {
            let first = pick(g, FEEDBACK);
            let second = pick(g, FEEDBACK);
            format!("{} and {}", first, second)
        });
        ctx.stack_trace = maybe(g, |g| "at frame\n".repeat(usize::from(u8::arbitrary(g) % 40)));
        ctx.components = maybe(g, |g| {
            (0..u8::arbitrary(g) % 16).map(|i| format!("component-{}", i)).collect()
        });
        ctx.performance_metrics = maybe(g, |g| PerformanceMetrics {
            response_time_ms: maybe(g, |g| f64::from(u16::arbitrary(g) % 8000)),
            memory_usage_pct: maybe(g, |g| f64::from(u8::arbitrary(g) % 101)),
            cpu_usage_pct: maybe(g, |g| f64::from(u8::arbitrary(g) % 101)),
        });
        ctx.conversation_context = maybe(g, |g| ConversationContext {
            recent_messages: maybe(g, |g| {
                (0..u8::arbitrary(g) % 5)
                    .map(|i| pick(g, FEEDBACK).to_string() + &i.to_string())
                    .collect()
            }),
            current_topic: maybe(g, |_| "deployment".to_string()),
            user_intent: maybe(g, |g| pick(g, &["unknown", "fix the build"]).to_string()),
        });

        Report(ctx)
    }
}

#[quickcheck]
fn scores_stay_in_range(report: Report) -> bool {
    let result = DimensionalAnalyzer::new().analyze(&report.0);
    result.scores.len() == 8
        && result.overall_score <= 100
        && result.scores.values().all(|s| {
            s.score <= 100
                && (-100.0..=100.0).contains(&s.polarity_balance)
                && s.issues.len() == s.reasons.len()
                && s.improvements.len() == s.reasons.len()
                && s.health_level == HealthLevel::from_score(s.score)
        })
        && [
            result.center_state.stability,
            result.center_state.harmony,
            result.center_state.energy,
        ]
        .iter()
        .all(|v| (0.0..=100.0).contains(v))
}

#[quickcheck]
fn overall_is_rounded_mean(report: Report) -> bool {
    let result = DimensionalAnalyzer::new().analyze(&report.0);
    let sum: u32 = result.scores.values().map(|s| u32::from(s.score)).sum();
    result.overall_score == (f64::from(sum) / 8.0).round() as u8
}

#[quickcheck]
fn analysis_is_deterministic(report: Report) -> bool {
    let analyzer = DimensionalAnalyzer::new();
    let a = analyzer.analyze(&report.0);
    let b = analyzer.analyze(&report.0);
    a.scores == b.scores && a.overall_score == b.overall_score && a.center_state == b.center_state
}

#[quickcheck]
fn critical_and_healthy_lists_are_sorted(report: Report) -> bool {
    let result = DimensionalAnalyzer::new().analyze(&report.0);
    let critical: Vec<u8> = result.critical_dimensions.iter().map(|d| result.score_of(*d)).collect();
    let healthy: Vec<u8> = result.healthy_dimensions.iter().map(|d| result.score_of(*d)).collect();

    critical.iter().all(|&s| s < CRITICAL_BELOW)
        && critical.windows(2).all(|w| w[0] <= w[1])
        && healthy.iter().all(|&s| s >= HEALTHY_FROM)
        && healthy.windows(2).all(|w| w[0] >= w[1])
}

#[quickcheck]
fn execution_order_is_a_total_order_over_actions(report: Report) -> bool {
    let analysis = DimensionalAnalyzer::new().analyze(&report.0);
    let plan = RepairPlanner::new().plan(&analysis);

    let ids: HashSet<_> = plan.actions.iter().map(|a| a.id).collect();
    let ordered: HashSet<_> = plan.execution_order.iter().copied().collect();
    if ids != ordered || plan.execution_order.len() != plan.actions.len() {
        return false;
    }

    plan.ordered_actions().windows(2).all(|w| {
        let key = |a: &eightfold::planning::RepairAction| {
            (a.priority.rank(), a.dimension.index(), std::cmp::Reverse(a.estimated_impact))
        };
        key(w[0]) <= key(w[1])
    })
}

#[quickcheck]
fn actions_only_target_unhealthy_dimensions(report: Report) -> bool {
    let analysis = DimensionalAnalyzer::new().analyze(&report.0);
    let plan = RepairPlanner::new().plan(&analysis);

    plan.actions.iter().all(|a| {
        let score = analysis.score_of(a.dimension);
        score < HEALTHY_FROM
            && a.priority == action_priority(a.dimension, a.reason, score)
            && (-100.0..=100.0).contains(&a.polarity_adjustment.after)
    }) && plan.total_estimated_impact == plan.actions.iter().map(|a| a.estimated_impact).sum::<u32>()
}

#[quickcheck]
fn one_action_per_template(report: Report) -> bool {
    let analysis = DimensionalAnalyzer::new().analyze(&report.0);
    let plan = RepairPlanner::new().plan(&analysis);

    let mut seen = HashSet::new();
    plan.actions
        .iter()
        .all(|a| seen.insert((a.dimension, a.repair_type, a.description.clone())))
}

#[test]
fn worked_example_undefined_variable() {
    let ctx = ProblemContext::from_json(
        r#"{"problemType":"error","description":"page crashes","errorMessage":"undefined variable"}"#,
    )
    .unwrap();
    let result = DimensionalAnalyzer::new().analyze(&ctx);
    let structure = result.dimension(Dimension::Structure).unwrap();

    assert!(structure.score < 80);
    assert!(structure.issues.iter().any(|i| i.contains("Unresolved reference")));
}

#[test]
fn worked_example_slow_performance() {
    let ctx = ProblemContext::from_json(
        r#"{"problemType":"performance","description":"","performanceMetrics":{"responseTimeMs":6000}}"#,
    )
    .unwrap();
    let result = DimensionalAnalyzer::new().analyze(&ctx);

    assert!(result.score_of(Dimension::Flow) < 70);
    assert!(result.score_of(Dimension::Temporal) < 70);
}

#[test]
fn missing_required_fields_are_invalid_input() {
    let err = ProblemContext::from_json(r#"{"problemType":"error"}"#).unwrap_err();
    assert!(matches!(err, eightfold::HealError::InvalidInput(_)));

    let err = ProblemContext::from_json(r#"{"description":"x"}"#).unwrap_err();
    assert!(matches!(err, eightfold::HealError::InvalidInput(_)));
}
