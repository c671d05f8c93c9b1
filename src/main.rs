//! eightfold - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use eightfold::{
    analysis::DimensionalAnalyzer,
    cli::{render, Args, Commands, Config, Verbosity},
    convergence::{ConvergenceLoop, SimulatedExecutor},
    planning::RepairPlanner,
    types::ProblemContext,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let verbosity = if args.quiet || args.verbose > 0 {
        args.verbosity()
    } else {
        config.verbosity()
    };
    init_tracing(verbosity);

    if !config.output.color_output {
        colored::control::set_override(false);
    }
    let json = args.json || config.output.json;

    match &args.command {
        Commands::Analyze { file } => {
            let context = read_context(file)?;
            let analysis = DimensionalAnalyzer::new().analyze(&context);
            if json {
                print_json(&analysis)?;
            } else {
                print!("{}", render::analysis(&analysis, verbosity.show_details()));
            }
        }
        Commands::Plan { file } => {
            let context = read_context(file)?;
            let analysis = DimensionalAnalyzer::new().analyze(&context);
            let plan = RepairPlanner::new().plan(&analysis);
            if json {
                print_json(&plan)?;
            } else {
                print!("{}", render::analysis(&analysis, false));
                println!();
                print!("{}", render::plan(&plan, verbosity.show_details()));
            }
        }
        Commands::Heal {
            file,
            max_iterations,
            seed,
        } => {
            let context = read_context(file)?;
            let show_bar = !json && verbosity.show_progress() && config.output.show_progress_bars;
            heal(&context, &config, *max_iterations, *seed, show_bar, json)?;
        }
        Commands::Config => show_config(&args, &config, verbosity),
    }

    Ok(())
}

/// Route tracing output to stderr; RUST_LOG wins over the verbosity flags
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_context(file: &Path) -> Result<ProblemContext> {
    let raw = if file == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read problem context from stdin")?;
        buf
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read problem context from {}", file.display()))?
    };
    Ok(ProblemContext::from_json(&raw)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn heal(
    context: &ProblemContext,
    config: &Config,
    max_iterations: Option<u32>,
    seed: Option<u64>,
    show_bar: bool,
    json: bool,
) -> Result<()> {
    if max_iterations == Some(0) {
        anyhow::bail!("--max-iterations must be at least 1");
    }

    let engine = ConvergenceLoop::with_config(config.convergence_config(max_iterations));
    let mut executor = SimulatedExecutor::with_seed(seed.or(config.convergence.seed));

    let mut state = engine.start(context);
    let pb = if show_bar {
        let pb = ProgressBar::new(u64::from(state.max_iterations));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} Healing [{bar:40.cyan/blue}] {pos}/{len} | {msg}")?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    while state.is_running() {
        state = engine.step(&state, context, &mut executor);
        if let Some(pb) = &pb {
            pb.set_position(u64::from(state.current_iteration));
            pb.set_message(format!(
                "stage {} | score {}",
                state.current_stage, state.current_analysis.overall_score
            ));
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let result = engine.complete(state);
    if json {
        print_json(&result)?;
    } else {
        print!("{}", render::loop_result(&result));
    }
    Ok(())
}

fn show_config(args: &Args, config: &Config, verbosity: Verbosity) {
    println!("{}", "eightfold configuration".bold().cyan());
    println!();

    let source = match (&args.config, Config::default_path()) {
        (Some(path), _) => path.display().to_string(),
        (None, Some(path)) if path.exists() => path.display().to_string(),
        _ => "built-in defaults".to_string(),
    };
    println!("Source: {}", source);
    println!();

    println!("Convergence:");
    println!("  Max iterations: {}", config.convergence.max_iterations);
    match config.convergence.seed {
        Some(seed) => println!("  Seed:           {}", seed),
        None => println!("  Seed:           random"),
    }
    println!();

    println!("Output:");
    println!("  Verbosity:      {}", verbosity.as_str());
    println!(
        "  Progress bars:  {}",
        if config.output.show_progress_bars { "enabled" } else { "disabled" }
    );
    println!(
        "  Color:          {}",
        if config.output.color_output { "enabled" } else { "disabled" }
    );
    println!(
        "  JSON:           {}",
        if config.output.json { "enabled" } else { "disabled" }
    );
    println!();
}
