//! Human-readable rendering of analyses, plans and loop results

use crate::analysis::AnalysisResult;
use crate::convergence::{LoopResult, LoopStatus};
use crate::planning::RepairPlan;
use crate::types::{HealthLevel, Priority};
use colored::*;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

fn health(level: HealthLevel) -> ColoredString {
    let label = level.as_str();
    match level {
        HealthLevel::Excellent => label.green().bold(),
        HealthLevel::Good => label.green(),
        HealthLevel::Fair => label.yellow(),
        HealthLevel::Poor => label.red(),
        HealthLevel::Critical => label.red().bold(),
    }
}

fn priority(p: Priority) -> ColoredString {
    let label = format!("{:<8}", p.as_str());
    match p {
        Priority::Critical => label.red().bold(),
        Priority::High => label.red(),
        Priority::Medium => label.yellow(),
        Priority::Low => label.dimmed(),
    }
}

fn bar(score: u8) -> String {
    let filled = usize::from(score.min(100)) * BAR_WIDTH / 100;
    format!("{}{}", "=".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

/// Per-dimension scorecard with the center state
pub fn analysis(result: &AnalysisResult, details: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} ({})",
        "Overall score:".bold(),
        result.overall_score,
        health(result.overall_health_level)
    );
    let _ = writeln!(out);

    for score in result.scores.values() {
        let _ = writeln!(
            out,
            "  {:<15} [{}] {:>3}  {}",
            score.dimension.as_str(),
            bar(score.score).cyan(),
            score.score,
            health(score.health_level)
        );
        if details {
            for (issue, improvement) in score.issues.iter().zip(&score.improvements) {
                let _ = writeln!(out, "      {} {}", "!".yellow(), issue);
                let _ = writeln!(out, "        {} {}", "->".dimmed(), improvement.dimmed());
            }
        }
    }

    let center = &result.center_state;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} stability {:.0}, harmony {:.0}, energy {:.0}",
        "Center:".bold(),
        center.stability,
        center.harmony,
        center.energy
    );
    out
}

/// Actions in execution order
pub fn plan(plan: &RepairPlan, details: bool) -> String {
    let mut out = String::new();
    if plan.is_empty() {
        let _ = writeln!(out, "{} No remediation needed", "✓".green());
        return out;
    }

    let _ = writeln!(
        out,
        "{} {} actions, ~{} min, +{} estimated impact",
        "Repair plan:".bold(),
        plan.actions.len(),
        plan.total_estimated_time,
        plan.total_estimated_impact
    );
    let _ = writeln!(out);

    for (n, action) in plan.ordered_actions().into_iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} {:<15} {}  {}",
            n + 1,
            priority(action.priority),
            action.dimension.as_str(),
            action.description,
            format!("({} min, +{})", action.estimated_time_minutes, action.estimated_impact).dimmed()
        );
        if details {
            let _ = writeln!(out, "        {}", action.repair_type.as_str().dimmed());
            for step in &action.steps {
                let _ = writeln!(out, "        - {}", step);
            }
        }
    }

    let adj = &plan.center_state_adjustment;
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} stability +{:.0}, harmony +{:.0}, energy +{:.0}",
        "Center adjustment:".bold(),
        adj.stability,
        adj.harmony,
        adj.energy
    );
    out
}

/// Loop summary with learning record
pub fn loop_result(result: &LoopResult) -> String {
    let mut out = String::new();
    let status = match result.status {
        LoopStatus::Completed => "completed".green().bold(),
        LoopStatus::Failed => "failed".red().bold(),
        other => other.as_str().yellow(),
    };

    let _ = writeln!(out, "{} {}", "Healing loop".bold(), status);
    let _ = writeln!(
        out,
        "  Score:      {} -> {} ({:+})",
        result.initial_score, result.final_score, result.total_improvement
    );
    let _ = writeln!(out, "  Stages:     {}/8", result.completed_stages);
    let _ = writeln!(out, "  Iterations: {}", result.total_iterations);
    let _ = writeln!(
        out,
        "  Actions:    {} ({}% succeeded)",
        result.total_actions, result.success_rate
    );

    let record = &result.learning_record;
    for (title, lines) in [
        ("Learnings", &record.learnings),
        ("Patterns", &record.improvement_patterns),
        ("Recommendations", &record.recommendations),
    ] {
        if lines.is_empty() {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", title.bold());
        for line in lines {
            let _ = writeln!(out, "  • {}", line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::DimensionalAnalyzer;
    use crate::planning::RepairPlanner;
    use crate::types::{ProblemContext, ProblemType};

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0), "-".repeat(BAR_WIDTH));
        assert_eq!(bar(100), "=".repeat(BAR_WIDTH));
        assert_eq!(bar(50).matches('=').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_analysis_lists_every_dimension() {
        let ctx = ProblemContext::new(ProblemType::Error, "x").with_error_message("undefined variable");
        let result = DimensionalAnalyzer::new().analyze(&ctx);

        let text = analysis(&result, true);
        for dimension in crate::types::Dimension::ALL {
            assert!(text.contains(dimension.as_str()));
        }
        assert!(text.contains("Unresolved reference"));
        assert!(!analysis(&result, false).contains("Unresolved reference"));
    }

    #[test]
    fn test_empty_plan() {
        let result = DimensionalAnalyzer::new().analyze(&ProblemContext::new(ProblemType::Other, "ok"));
        let text = plan(&RepairPlanner::new().plan(&result), false);
        assert!(text.contains("No remediation needed"));
    }

    #[test]
    fn test_plan_details_show_repair_type() {
        let ctx = ProblemContext::new(ProblemType::Error, "x").with_error_message("undefined variable");
        let repair = RepairPlanner::new().plan(&DimensionalAnalyzer::new().analyze(&ctx));
        let kind = repair.ordered_actions()[0].repair_type.as_str();

        assert!(plan(&repair, true).contains(kind));
        assert!(!plan(&repair, false).contains(kind));
    }
}
