//! The eight ordered remediation stages

use crate::planning::{RepairAction, RepairPlan};
use crate::types::{Dimension, Priority};

/// Which actions of a plan a stage executes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageFilter {
    /// Actions with one of these priorities
    Priorities(&'static [Priority]),

    /// Actions on one of these dimensions
    Dimensions(&'static [Dimension]),

    /// Every action
    All,
}

impl StageFilter {
    pub fn admits(&self, action: &RepairAction) -> bool {
        match self {
            StageFilter::Priorities(priorities) => priorities.contains(&action.priority),
            StageFilter::Dimensions(dimensions) => dimensions.contains(&action.dimension),
            StageFilter::All => true,
        }
    }
}

/// One step of the staged loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    /// 1-based stage number
    pub number: u8,
    pub name: &'static str,

    /// Overall score needed to clear the stage
    pub threshold: u8,
    pub filter: StageFilter,
}

impl Stage {
    /// Stage for a 1-based number, saturating at both ends
    pub fn get(number: u8) -> &'static Stage {
        let index = usize::from(number.clamp(1, FINAL_STAGE)) - 1;
        &STAGES[index]
    }

    pub fn is_final(&self) -> bool {
        self.number == FINAL_STAGE
    }

    /// Whether a score clears this stage
    pub fn is_cleared_by(&self, score: u8) -> bool {
        score >= self.threshold
    }

    /// Plan actions admitted by this stage, in execution order
    pub fn select<'a>(&self, plan: &'a RepairPlan) -> Vec<&'a RepairAction> {
        plan.ordered_actions()
            .into_iter()
            .filter(|action| self.filter.admits(action))
            .collect()
    }
}

pub const FINAL_STAGE: u8 = 8;

pub const STAGES: [Stage; FINAL_STAGE as usize] = [
    Stage {
        number: 1,
        name: "Initial triage",
        threshold: 50,
        filter: StageFilter::Priorities(&[Priority::Critical]),
    },
    Stage {
        number: 2,
        name: "Emergency repair",
        threshold: 60,
        filter: StageFilter::Priorities(&[Priority::Critical, Priority::High]),
    },
    Stage {
        number: 3,
        name: "Structural reinforcement",
        threshold: 70,
        filter: StageFilter::Dimensions(&[
            Dimension::Structure,
            Dimension::Flow,
            Dimension::Environment,
        ]),
    },
    Stage {
        number: 4,
        name: "Context alignment",
        threshold: 75,
        filter: StageFilter::Dimensions(&[Dimension::Context, Dimension::Intent]),
    },
    Stage {
        number: 5,
        name: "Core alignment",
        threshold: 80,
        filter: StageFilter::Dimensions(&[Dimension::CoreAlignment]),
    },
    Stage {
        number: 6,
        name: "Temporal tuning",
        threshold: 85,
        filter: StageFilter::Dimensions(&[Dimension::Temporal]),
    },
    Stage {
        number: 7,
        name: "Relationship rebuild",
        threshold: 90,
        filter: StageFilter::Dimensions(&[Dimension::Relation]),
    },
    Stage {
        number: 8,
        name: "Center integration",
        threshold: 95,
        filter: StageFilter::All,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DimensionalAnalyzer;
    use crate::planning::RepairPlanner;
    use crate::types::{ProblemContext, ProblemType};

    #[test]
    fn test_thresholds_strictly_increase() {
        for pair in STAGES.windows(2) {
            assert!(pair[0].threshold < pair[1].threshold);
            assert_eq!(pair[0].number + 1, pair[1].number);
        }
        assert!(Stage::get(FINAL_STAGE).is_final());
    }

    #[test]
    fn test_get_saturates() {
        assert_eq!(Stage::get(0).number, 1);
        assert_eq!(Stage::get(42).number, FINAL_STAGE);
    }

    #[test]
    fn test_select_filters_in_execution_order() {
        let ctx = ProblemContext::new(ProblemType::Integration, "")
            .with_error_message("network timeout while calling API")
            .with_user_feedback("I can't trust it");
        let analysis = DimensionalAnalyzer::new().analyze(&ctx);
        let plan = RepairPlanner::new().plan(&analysis);

        // environment 20 (critical), relation 65 with a trust override (critical)
        let triage = Stage::get(1).select(&plan);
        let dimensions: Vec<Dimension> = triage.iter().map(|a| a.dimension).collect();
        assert_eq!(
            dimensions,
            vec![Dimension::Environment, Dimension::Environment, Dimension::Relation]
        );

        let relation = Stage::get(7).select(&plan);
        assert_eq!(relation.len(), 1);
        assert_eq!(Stage::get(8).select(&plan).len(), plan.actions.len());
        assert!(Stage::get(6).select(&plan).is_empty());
    }
}
