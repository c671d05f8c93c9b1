//! Learning record extraction from a finished loop

use crate::convergence::types::{LearningRecord, LoopState};
use crate::types::Dimension;

const MEANINGFUL_STEP_GAIN: f64 = 5.0;
const HARMONY_GAIN: f64 = 20.0;
const DIMENSION_SWING: i16 = 15;
const TARGET_OVERALL: u8 = 90;
const TARGET_STABILITY: f64 = 80.0;
const WEAK_DIMENSION: u8 = 70;

/// Summarize what a loop achieved and what to do next
pub fn learning_record(state: &LoopState, completed_stages: u8) -> LearningRecord {
    let initial = &state.initial_analysis;
    let current = &state.current_analysis;
    let mut record = LearningRecord::default();

    if !initial.critical_dimensions.is_empty() {
        record.learnings.push(format!(
            "Most problematic dimensions: {}",
            join(&initial.critical_dimensions)
        ));
    }
    if !current.healthy_dimensions.is_empty() {
        record.learnings.push(format!(
            "Dimensions healthy at the end: {}",
            join(&current.healthy_dimensions)
        ));
    }

    if !state.repair_results.is_empty() {
        let total: i32 = state.repair_results.iter().map(|r| r.improvement).sum();
        let average = f64::from(total) / state.repair_results.len() as f64;
        if average > MEANINGFUL_STEP_GAIN {
            record
                .improvement_patterns
                .push("Staged remediation was effective".to_string());
        }
    }

    if current.center_state.harmony > initial.center_state.harmony + HARMONY_GAIN {
        record
            .improvement_patterns
            .push("Polarity rebalancing raised harmony substantially".to_string());
    }

    for dimension in Dimension::ALL {
        let swing = i16::from(current.score_of(dimension)) - i16::from(initial.score_of(dimension));
        if swing >= DIMENSION_SWING {
            record
                .improvement_patterns
                .push(format!("{} improved by {} points", dimension, swing));
        } else if swing <= -DIMENSION_SWING {
            record
                .improvement_patterns
                .push(format!("{} regressed by {} points", dimension, -swing));
        }
    }

    if completed_stages > 0 {
        record
            .improvement_patterns
            .push(format!("Cleared {} of 8 stages", completed_stages));
    }

    if current.overall_score < TARGET_OVERALL {
        record
            .recommendations
            .push("Keep running regular self-diagnosis to improve further".to_string());
    }
    if current.center_state.stability < TARGET_STABILITY {
        record
            .recommendations
            .push("Keep all dimensions balanced to stabilize the center".to_string());
    }
    for dimension in current.dimensions_below(WEAK_DIMENSION) {
        record
            .recommendations
            .push(format!("Continue focused work on {}", dimension));
    }

    record
}

fn join(dimensions: &[Dimension]) -> String {
    dimensions
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
