//! Repair planner
//!
//! Turns an analysis into a prioritized, totally ordered set of repair
//! actions. Planning is a pure function of the analysis apart from the
//! generated ids and timestamp.

use crate::analysis::analyzer::HEALTHY_FROM;
use crate::analysis::{AnalysisResult, DimensionScore, ReasonCode};
use crate::planning::templates::{templates_for, RemedyTemplate};
use crate::planning::types::{CenterStateAdjustment, PolarityAdjustment, RepairAction, RepairPlan};
use crate::types::{Dimension, Priority};
use chrono::Utc;
use std::cmp::Reverse;
use tracing::debug;
use uuid::Uuid;

const MAX_STABILITY_GAIN: f64 = 30.0;
const MAX_HARMONY_GAIN: f64 = 30.0;
const MAX_ENERGY_GAIN: f64 = 40.0;

/// Priority for an action on a dimension with the given score
///
/// Tiered by score, except ethics concerns on core alignment and trust
/// deficits on relation, which are always critical.
pub fn action_priority(dimension: Dimension, reason: ReasonCode, score: u8) -> Priority {
    match (dimension, reason) {
        (Dimension::CoreAlignment, ReasonCode::EthicsConcern)
        | (Dimension::Relation, ReasonCode::TrustDeficit) => Priority::Critical,
        _ => Priority::from_score(score),
    }
}

/// Template-driven repair planner
#[derive(Debug, Clone, Default)]
pub struct RepairPlanner;

impl RepairPlanner {
    /// Create new planner
    pub fn new() -> Self {
        Self
    }

    /// Build a repair plan for an analysis
    pub fn plan(&self, analysis: &AnalysisResult) -> RepairPlan {
        let actions: Vec<RepairAction> = analysis
            .scores
            .values()
            .filter(|score| score.score < HEALTHY_FROM)
            .flat_map(|score| self.actions_for(score))
            .collect();

        let execution_order = execution_order(&actions);
        let total_estimated_time = actions.iter().map(|a| a.estimated_time_minutes).sum();
        let total_estimated_impact = actions.iter().map(|a| a.estimated_impact).sum();
        let center_state_adjustment = center_state_adjustment(&actions);

        debug!(
            analysis_id = %analysis.id,
            actions = actions.len(),
            total_estimated_impact,
            "repair plan built"
        );

        RepairPlan {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            analysis: analysis.clone(),
            actions,
            execution_order,
            total_estimated_time,
            total_estimated_impact,
            center_state_adjustment,
        }
    }

    /// Actions for one dimension, in template order
    pub fn actions_for(&self, score: &DimensionScore) -> Vec<RepairAction> {
        templates_for(score.dimension)
            .filter_map(|template| {
                template
                    .matched_reason(&score.reasons)
                    .map(|reason| build_action(template, reason, score))
            })
            .collect()
    }
}

fn build_action(template: &RemedyTemplate, reason: ReasonCode, score: &DimensionScore) -> RepairAction {
    RepairAction {
        id: Uuid::new_v4(),
        dimension: score.dimension,
        reason,
        repair_type: template.repair_type,
        description: template.description.to_string(),
        steps: template.steps.iter().map(|s| s.to_string()).collect(),
        priority: action_priority(score.dimension, reason, score.score),
        estimated_time_minutes: template.estimated_time_minutes,
        estimated_impact: template.estimated_impact,
        polarity_adjustment: PolarityAdjustment {
            before: score.polarity_balance,
            after: template.polarity.apply(score.polarity_balance),
        },
    }
}

/// Stable order by priority, then canonical dimension, then impact descending
pub fn execution_order(actions: &[RepairAction]) -> Vec<Uuid> {
    let mut ordered: Vec<&RepairAction> = actions.iter().collect();
    ordered.sort_by_key(|a| {
        (
            a.priority.rank(),
            a.dimension.index(),
            Reverse(a.estimated_impact),
        )
    });
    ordered.into_iter().map(|a| a.id).collect()
}

fn center_state_adjustment(actions: &[RepairAction]) -> CenterStateAdjustment {
    if actions.is_empty() {
        return CenterStateAdjustment::default();
    }

    let count = actions.len() as f64;
    let mean_shift = actions
        .iter()
        .map(|a| a.polarity_adjustment.magnitude())
        .sum::<f64>()
        / count;
    let total_impact: f64 = actions.iter().map(|a| f64::from(a.estimated_impact)).sum();

    CenterStateAdjustment {
        stability: (count * 3.0).min(MAX_STABILITY_GAIN).round(),
        harmony: (mean_shift / 2.0).min(MAX_HARMONY_GAIN).round(),
        energy: (total_impact / 2.0).min(MAX_ENERGY_GAIN).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DimensionalAnalyzer;
    use crate::planning::types::RepairType;
    use crate::types::{ProblemContext, ProblemType};
    use std::collections::HashSet;

    fn plan_for(ctx: &ProblemContext) -> RepairPlan {
        let analysis = DimensionalAnalyzer::new().analyze(ctx);
        RepairPlanner::new().plan(&analysis)
    }

    #[test]
    fn test_healthy_analysis_yields_empty_plan() {
        let plan = plan_for(&ProblemContext::new(ProblemType::Other, "fine"));

        assert!(plan.is_empty());
        assert!(plan.execution_order.is_empty());
        assert_eq!(plan.total_estimated_time, 0);
        assert_eq!(plan.center_state_adjustment, CenterStateAdjustment::default());
    }

    #[test]
    fn test_structure_actions_follow_reasons() {
        let ctx = ProblemContext::new(ProblemType::Error, "x")
            .with_error_message("TypeError: undefined is not a function");
        let plan = plan_for(&ctx);

        // structure: 100 - 25 - 15 = 60
        let types: Vec<RepairType> = plan.actions.iter().map(|a| a.repair_type).collect();
        assert_eq!(types, vec![RepairType::CodeFix, RepairType::Refactoring]);
        assert!(plan.actions.iter().all(|a| a.priority == Priority::Medium));
        assert_eq!(plan.actions[0].polarity_adjustment.before, 15.0);
        assert_eq!(plan.actions[0].polarity_adjustment.after, 25.0);
    }

    #[test]
    fn test_healthy_dimension_produces_no_actions() {
        // structure: 100 - 15 = 85 with TypeError only
        let ctx = ProblemContext::new(ProblemType::Error, "x").with_error_message("TypeError");
        let plan = plan_for(&ctx);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_ethics_override_forces_critical() {
        // core-alignment: 100 - 40 = 60, tier would be medium
        let ctx = ProblemContext::new(ProblemType::UserExperience, "x")
            .with_user_feedback("that reply was inappropriate");
        let plan = plan_for(&ctx);

        let ethics = plan
            .actions
            .iter()
            .find(|a| a.reason == ReasonCode::EthicsConcern)
            .unwrap();
        assert_eq!(ethics.priority, Priority::Critical);
        assert_eq!(ethics.polarity_adjustment.after, 0.0);
    }

    #[test]
    fn test_trust_override_forces_critical() {
        // relation: 100 - 35 = 65, tier would be medium
        let ctx = ProblemContext::new(ProblemType::UserExperience, "x")
            .with_user_feedback("I feel uneasy with it");
        let plan = plan_for(&ctx);

        let trust = plan
            .actions
            .iter()
            .find(|a| a.reason == ReasonCode::TrustDeficit)
            .unwrap();
        assert_eq!(trust.dimension, Dimension::Relation);
        assert_eq!(trust.priority, Priority::Critical);
    }

    #[test]
    fn test_action_priority_overrides_only_apply_on_their_dimension() {
        assert_eq!(
            action_priority(Dimension::CoreAlignment, ReasonCode::EthicsConcern, 79),
            Priority::Critical
        );
        assert_eq!(
            action_priority(Dimension::CoreAlignment, ReasonCode::ToneTooAssertive, 79),
            Priority::Low
        );
        assert_eq!(
            action_priority(Dimension::Flow, ReasonCode::TrustDeficit, 79),
            Priority::Low
        );
    }

    #[test]
    fn test_execution_order_sorting() {
        let ctx = ProblemContext::new(ProblemType::Performance, "slow")
            .with_error_message("network error during fetch")
            .with_performance(crate::types::PerformanceMetrics {
                response_time_ms: Some(4000.0),
                memory_usage_pct: Some(95.0),
                cpu_usage_pct: None,
            });
        let plan = plan_for(&ctx);

        // flow 100-30-25-20 = 25 (critical), environment 100-30-25 = 45 (high)
        let ordered: Vec<(Dimension, u32)> = plan
            .ordered_actions()
            .iter()
            .map(|a| (a.dimension, a.estimated_impact))
            .collect();
        assert_eq!(
            ordered,
            vec![
                (Dimension::Flow, 30),
                (Dimension::Flow, 25),
                (Dimension::Environment, 30),
                (Dimension::Environment, 25),
            ]
        );

        let unique: HashSet<Uuid> = plan.execution_order.iter().copied().collect();
        assert_eq!(unique.len(), plan.actions.len());
    }

    #[test]
    fn test_totals_and_center_adjustment() {
        let ctx = ProblemContext::new(ProblemType::Performance, "slow")
            .with_error_message("network error during fetch")
            .with_performance(crate::types::PerformanceMetrics {
                response_time_ms: Some(4000.0),
                memory_usage_pct: Some(95.0),
                cpu_usage_pct: None,
            });
        let plan = plan_for(&ctx);

        assert_eq!(plan.total_estimated_time, 40 + 35 + 25 + 30);
        assert_eq!(plan.total_estimated_impact, 30 + 25 + 30 + 25);
        // polarity shifts 5, 10, 0, 0 -> mean 3.75 -> 1.875
        assert_eq!(
            plan.center_state_adjustment,
            CenterStateAdjustment {
                stability: 12.0,
                harmony: 2.0,
                energy: 40.0,
            }
        );
    }
}
