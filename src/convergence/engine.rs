//! Staged convergence loop
//!
//! Drives a problem report through eight stages of increasing ambition.
//! Each step plans against the current analysis, executes the actions the
//! current stage admits, and folds the realized impact into the overall
//! score. The loop owns no state: every step takes a [`LoopState`] and
//! returns the next one.

use crate::analysis::DimensionalAnalyzer;
use crate::convergence::executor::{ActionOutcome, RemediationExecutor};
use crate::convergence::learning::learning_record;
use crate::convergence::stages::Stage;
use crate::convergence::types::{LoopResult, LoopState, LoopStatus, RepairResult};
use crate::planning::RepairPlanner;
use crate::types::ProblemContext;
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default iteration budget
pub const DEFAULT_MAX_ITERATIONS: u32 = 64;

/// Convergence loop configuration
#[derive(Debug, Clone)]
pub struct ConvergenceConfig {
    /// Iteration budget; 0 is treated as 1
    pub max_iterations: u32,

    /// Share of an action's estimated impact realized on success
    pub realization_factor: f64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            realization_factor: 0.8,
        }
    }
}

/// Stateless driver for the staged loop
#[derive(Debug, Clone, Default)]
pub struct ConvergenceLoop {
    config: ConvergenceConfig,
    analyzer: DimensionalAnalyzer,
    planner: RepairPlanner,
}

impl ConvergenceLoop {
    /// Create loop with default configuration
    pub fn new() -> Self {
        Self::with_config(ConvergenceConfig::default())
    }

    /// Create loop with custom configuration
    pub fn with_config(config: ConvergenceConfig) -> Self {
        Self {
            config,
            analyzer: DimensionalAnalyzer::new(),
            planner: RepairPlanner::new(),
        }
    }

    /// Create loop with a custom iteration budget
    pub fn with_max_iterations(max_iterations: u32) -> Self {
        Self::with_config(ConvergenceConfig {
            max_iterations,
            ..Default::default()
        })
    }

    /// Analyze the report and open a loop at stage 1
    pub fn start(&self, context: &ProblemContext) -> LoopState {
        let analysis = self.analyzer.analyze(context);
        let state = LoopState {
            loop_id: Uuid::new_v4(),
            start_time: Utc::now(),
            current_stage: 1,
            current_iteration: 0,
            max_iterations: self.config.max_iterations.max(1),
            initial_analysis: analysis.clone(),
            current_analysis: analysis,
            executed_plans: Vec::new(),
            repair_results: Vec::new(),
            status: LoopStatus::Running,
            progress: 0,
        };

        info!(
            loop_id = %state.loop_id,
            initial_score = state.initial_analysis.overall_score,
            max_iterations = state.max_iterations,
            "convergence loop started"
        );

        state
    }

    /// Run one iteration; states that are not running come back unchanged
    pub fn step<E>(&self, state: &LoopState, context: &ProblemContext, executor: &mut E) -> LoopState
    where
        E: RemediationExecutor + ?Sized,
    {
        if !state.is_running() {
            return state.clone();
        }

        let mut next = state.clone();
        let stage = Stage::get(state.current_stage);
        let plan = self.planner.plan(&state.current_analysis);
        let selected = stage.select(&plan);

        let before_score = state.current_analysis.overall_score;
        let mut running = f64::from(before_score);
        let mut executed_action_ids = Vec::with_capacity(selected.len());
        let mut success_count = 0;
        let mut failure_count = 0;

        for action in selected {
            match executor.execute(action) {
                Ok(ActionOutcome::Succeeded) => {
                    running = (running
                        + self.config.realization_factor * f64::from(action.estimated_impact))
                    .min(100.0);
                    success_count += 1;
                }
                Ok(ActionOutcome::Failed) => failure_count += 1,
                Err(e) => {
                    warn!(
                        loop_id = %state.loop_id,
                        action_id = %action.id,
                        error = %e,
                        "executor failed, stopping loop"
                    );
                    next.status = LoopStatus::Failed;
                    return next;
                }
            }
            executed_action_ids.push(action.id);
        }

        let after_score = running.round() as u8;
        let after_analysis = self.analyzer.analyze(context).with_overall_score(after_score);

        next.repair_results.push(RepairResult {
            result_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            stage: stage.number,
            executed_action_ids,
            before_score,
            after_score,
            improvement: i32::from(after_score) - i32::from(before_score),
            success_count,
            failure_count,
            after_analysis: after_analysis.clone(),
        });
        next.executed_plans.push(plan);
        next.current_analysis = after_analysis;
        next.current_iteration += 1;
        next.progress = progress(next.current_iteration, next.max_iterations);

        debug!(
            loop_id = %state.loop_id,
            iteration = next.current_iteration,
            stage = stage.number,
            before_score,
            after_score,
            "convergence step"
        );

        if stage.is_cleared_by(after_score) {
            if stage.is_final() {
                info!(loop_id = %state.loop_id, "final stage cleared");
                next.status = LoopStatus::Completed;
            } else {
                next.current_stage += 1;
                info!(
                    loop_id = %state.loop_id,
                    stage = next.current_stage,
                    name = Stage::get(next.current_stage).name,
                    "advanced to next stage"
                );
            }
        }

        if next.current_iteration >= next.max_iterations {
            next.status = LoopStatus::Completed;
        }

        next
    }

    /// Summarize a loop; a running loop yields a best-effort result
    pub fn complete(&self, state: LoopState) -> LoopResult {
        let initial_score = state.initial_analysis.overall_score;
        let final_score = state.current_analysis.overall_score;
        let completed_stages = completed_stages(&state);

        let (successes, failures) = state.outcome_counts();
        let attempts = successes + failures;
        let success_rate = if attempts > 0 {
            (100.0 * f64::from(successes) / f64::from(attempts)).round() as u8
        } else {
            0
        };

        let result = LoopResult {
            loop_id: state.loop_id,
            completion_time: Utc::now(),
            status: state.status,
            initial_score,
            final_score,
            total_improvement: i32::from(final_score) - i32::from(initial_score),
            completed_stages,
            total_iterations: state.current_iteration,
            total_actions: state.total_actions(),
            success_rate,
            learning_record: learning_record(&state, completed_stages),
        };

        info!(
            loop_id = %result.loop_id,
            initial_score,
            final_score,
            completed_stages,
            success_rate,
            "convergence loop finished"
        );

        result
    }

    /// Start, step until the loop stops, and summarize
    pub fn run<E>(&self, context: &ProblemContext, executor: &mut E) -> LoopResult
    where
        E: RemediationExecutor + ?Sized,
    {
        let mut state = self.start(context);
        while state.is_running() {
            state = self.step(&state, context, executor);
        }
        self.complete(state)
    }
}

fn progress(iteration: u32, max_iterations: u32) -> u8 {
    let ratio = f64::from(iteration) / f64::from(max_iterations.max(1));
    (100.0 * ratio).round().min(100.0) as u8
}

/// Stages behind the current one
fn completed_stages(state: &LoopState) -> u8 {
    state.current_stage.saturating_sub(1)
}
