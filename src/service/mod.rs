//! Per-owner healing service
//!
//! Wraps the analyzer, planner and convergence loop with an owner-scoped
//! history, loop registry and temporal log. The components themselves are
//! stateless; all state lives in the [`SessionStore`].

pub mod store;
pub mod types;

pub use store::{MemoryStore, SessionStore};
pub use types::{
    AnalysisRecord, ImprovementPlan, LoopSession, OwnerId, ScoreTrend, TemporalEntry,
    TemporalEvent, TemporalLog, Trend,
};

use crate::analysis::analyzer::HEALTHY_FROM;
use crate::analysis::{AnalysisResult, DimensionalAnalyzer};
use crate::convergence::{
    ConvergenceConfig, ConvergenceLoop, LoopResult, LoopState, RemediationExecutor,
};
use crate::errors::{HealError, Result};
use crate::planning::{RepairPlan, RepairPlanner};
use crate::types::ProblemContext;
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

/// Default number of temporal log entries returned
pub const DEFAULT_LOG_LIMIT: usize = 50;

const TREND_MARGIN: i16 = 5;
const IMPACT_PER_CRITICAL: usize = 15;

/// Owner-scoped front door to analysis, planning and healing
#[derive(Debug)]
pub struct HealingService<S = MemoryStore> {
    store: S,
    config: ConvergenceConfig,
    analyzer: DimensionalAnalyzer,
    planner: RepairPlanner,
}

impl HealingService<MemoryStore> {
    /// Create service backed by an in-memory store
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new(), ConvergenceConfig::default())
    }
}

impl Default for HealingService<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SessionStore> HealingService<S> {
    /// Create service over a custom store
    pub fn with_store(store: S, config: ConvergenceConfig) -> Self {
        Self {
            store,
            config,
            analyzer: DimensionalAnalyzer::new(),
            planner: RepairPlanner::new(),
        }
    }

    /// Analyze a report and remember it in the owner's history
    pub fn analyze(&mut self, owner: &OwnerId, context: &ProblemContext) -> AnalysisResult {
        let analysis = self.analyzer.analyze(context);
        self.store.push_analysis(
            owner,
            AnalysisRecord {
                timestamp: Utc::now(),
                analysis: analysis.clone(),
            },
        );
        self.log(
            owner,
            TemporalEvent::Analysis {
                analysis_id: analysis.id,
                overall_score: analysis.overall_score,
            },
        );
        debug!(%owner, analysis_id = %analysis.id, "analysis stored");
        analysis
    }

    /// Build a repair plan for a stored analysis
    pub fn plan(&mut self, owner: &OwnerId, analysis_id: Uuid) -> Result<RepairPlan> {
        let record = self.report(owner, analysis_id)?;
        let plan = self.planner.plan(&record.analysis);
        self.log(
            owner,
            TemporalEvent::RepairPlan {
                plan_id: plan.id,
                total_actions: plan.actions.len(),
            },
        );
        Ok(plan)
    }

    /// Fetch a stored analysis with its timestamp
    pub fn report(&self, owner: &OwnerId, analysis_id: Uuid) -> Result<AnalysisRecord> {
        self.store
            .find_analysis(owner, analysis_id)
            .ok_or_else(|| HealError::AnalysisNotFound {
                owner: owner.to_string(),
                analysis_id,
            })
    }

    /// Latest overall score compared with the previous one
    pub fn score_trend(&self, owner: &OwnerId) -> ScoreTrend {
        let recent = self.store.recent_analyses(owner, 2);
        let (previous, current) = match recent.as_slice() {
            [] => (None, None),
            [only] => (None, Some(only)),
            [.., prev, last] => (Some(prev), Some(last)),
        };

        let current_score = current.map(|r| r.analysis.overall_score);
        let previous_score = previous.map(|r| r.analysis.overall_score);
        let trend = match (current_score, previous_score) {
            (Some(now), Some(before)) => {
                let diff = i16::from(now) - i16::from(before);
                if diff > TREND_MARGIN {
                    Trend::Improving
                } else if diff < -TREND_MARGIN {
                    Trend::Declining
                } else {
                    Trend::Stable
                }
            }
            _ => Trend::Stable,
        };

        ScoreTrend {
            current_score,
            previous_score,
            trend,
            timestamp: current.map(|r| r.timestamp),
        }
    }

    /// Improvement outline for the latest analysis, if there is one
    pub fn improvement_plan(&self, owner: &OwnerId) -> Option<ImprovementPlan> {
        let latest = self.store.recent_analyses(owner, 1).pop()?;
        let analysis = latest.analysis;

        let priority_actions = analysis
            .scores
            .values()
            .filter(|s| s.score < HEALTHY_FROM)
            .flat_map(|s| s.improvements.iter().cloned())
            .collect();
        let headroom = 100 - usize::from(analysis.overall_score.min(100));
        let estimated_impact =
            headroom.min(IMPACT_PER_CRITICAL * analysis.critical_dimensions.len()) as u8;

        Some(ImprovementPlan {
            critical_dimensions: analysis.critical_dimensions,
            healthy_dimensions: analysis.healthy_dimensions,
            priority_actions,
            estimated_impact,
            current_score: analysis.overall_score,
            center_state: analysis.center_state,
        })
    }

    /// Open a convergence loop for a report
    pub fn start_loop(
        &mut self,
        owner: &OwnerId,
        context: ProblemContext,
        max_iterations: Option<u32>,
    ) -> Result<LoopState> {
        let engine = self.engine(max_iterations)?;
        let state = engine.start(&context);
        self.log(
            owner,
            TemporalEvent::LoopStarted {
                loop_id: state.loop_id,
                initial_score: state.initial_analysis.overall_score,
            },
        );
        self.store.put_loop(
            owner,
            LoopSession {
                state: state.clone(),
                context,
            },
        );
        Ok(state)
    }

    /// Advance a stored loop by one iteration
    pub fn step_loop<E>(&mut self, owner: &OwnerId, loop_id: Uuid, executor: &mut E) -> Result<LoopState>
    where
        E: RemediationExecutor + ?Sized,
    {
        let mut session = self.loop_session(owner, loop_id)?;
        let engine = ConvergenceLoop::with_config(self.config.clone());
        let next = engine.step(&session.state, &session.context, executor);

        if next.current_iteration != session.state.current_iteration {
            self.log(
                owner,
                TemporalEvent::LoopStep {
                    loop_id,
                    iteration: next.current_iteration,
                    stage: next.current_stage,
                    score: next.current_analysis.overall_score,
                },
            );
        }

        session.state = next.clone();
        self.store.put_loop(owner, session);
        Ok(next)
    }

    /// Summarize a stored loop and forget it
    pub fn complete_loop(&mut self, owner: &OwnerId, loop_id: Uuid) -> Result<LoopResult> {
        let session = self
            .store
            .remove_loop(owner, loop_id)
            .ok_or_else(|| HealError::LoopNotFound {
                owner: owner.to_string(),
                loop_id,
            })?;
        let result = ConvergenceLoop::with_config(self.config.clone()).complete(session.state);
        self.log(
            owner,
            TemporalEvent::LoopComplete {
                loop_id,
                initial_score: result.initial_score,
                final_score: result.final_score,
                improvement: result.total_improvement,
            },
        );
        Ok(result)
    }

    /// Run a whole loop without storing it
    pub fn run_full_healing<E>(
        &mut self,
        owner: &OwnerId,
        context: &ProblemContext,
        max_iterations: Option<u32>,
        executor: &mut E,
    ) -> Result<LoopResult>
    where
        E: RemediationExecutor + ?Sized,
    {
        let result = self.engine(max_iterations)?.run(context, executor);
        self.log(
            owner,
            TemporalEvent::FullHealing {
                loop_id: result.loop_id,
                initial_score: result.initial_score,
                final_score: result.final_score,
                improvement: result.total_improvement,
            },
        );
        info!(%owner, loop_id = %result.loop_id, final_score = result.final_score, "full healing finished");
        Ok(result)
    }

    /// Most recent temporal log entries, 50 by default
    pub fn temporal_log(&self, owner: &OwnerId, limit: Option<usize>) -> TemporalLog {
        let limit = limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LOG_LIMIT);
        let (entries, total_count) = self.store.log_tail(owner, limit);
        TemporalLog {
            entries,
            total_count,
        }
    }

    pub fn get_loop(&self, owner: &OwnerId, loop_id: Uuid) -> Result<LoopState> {
        self.loop_session(owner, loop_id).map(|s| s.state)
    }

    fn loop_session(&self, owner: &OwnerId, loop_id: Uuid) -> Result<LoopSession> {
        self.store
            .get_loop(owner, loop_id)
            .ok_or_else(|| HealError::LoopNotFound {
                owner: owner.to_string(),
                loop_id,
            })
    }

    fn engine(&self, max_iterations: Option<u32>) -> Result<ConvergenceLoop> {
        let max_iterations = match max_iterations {
            Some(0) => {
                return Err(HealError::InvalidInput(
                    "max_iterations must be at least 1".to_string(),
                ))
            }
            Some(n) => n,
            None => self.config.max_iterations,
        };
        Ok(ConvergenceLoop::with_config(ConvergenceConfig {
            max_iterations,
            ..self.config.clone()
        }))
    }

    fn log(&mut self, owner: &OwnerId, event: TemporalEvent) {
        self.store.append_log(owner, TemporalEntry::now(event));
    }
}
