//! Pulse DST Simulator CLI
//!
//! Run deterministic engagement scenarios, or print a generated reactor
//! page for a content id.

use anyhow::{bail, Context};
use clap::Parser;
use pulse_core::{ContentItem, ReactorGenerator};
use pulse_sim::feed::default_viewer;
use pulse_sim::scenarios::ScenarioId;
use pulse_sim::{ScenarioResult, ScenarioRunner};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Pulse Deterministic Simulation Testing CLI
#[derive(Parser, Debug)]
#[command(name = "pulse-sim")]
#[command(about = "Run deterministic engagement simulations for Pulse", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (steady_state, cool_down, dormant, frenzy, verified_bias, inbox_pressure, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Scheduler ticks per scenario
    #[arg(short, long, default_value = "100")]
    ticks: u64,

    /// Speed multiplier override (frenzy always runs at 5x)
    #[arg(long)]
    speed: Option<f64>,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export per-tick frames of a single scenario to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Print the reactor page for this content id instead of running scenarios
    #[arg(long, value_name = "CONTENT_ID")]
    reactors: Option<String>,

    /// Like count of the content passed to --reactors
    #[arg(long, default_value = "1000")]
    likes: u64,

    /// Treat the viewer as having liked the content (shown first)
    #[arg(long)]
    liked: bool,

    /// First position of the reactor page
    #[arg(long, default_value = "0")]
    offset: u64,

    /// Reactor page size
    #[arg(long, default_value = "20")]
    count: usize,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(content_id) = &args.reactors {
        return print_reactors(&args, content_id);
    }

    if let Some(speed) = args.speed {
        if !(speed.is_finite() && speed > 0.0) {
            bail!("--speed must be a positive number, got {}", speed);
        }
    }

    if !args.json {
        info!("Pulse DST Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(scenario) => vec![scenario],
            Err(e) => {
                let names: Vec<&str> = ScenarioId::all().iter().map(|s| s.name()).collect();
                bail!("{}\nAvailable scenarios: {}, all", e, names.join(", "));
            }
        }
    };

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42)
    } else {
        args.seed
    };

    // Handle --export mode
    if let Some(export_path) = &args.export {
        if scenarios.len() > 1 {
            bail!("--export only supports a single scenario, not 'all'");
        }
        let scenario = scenarios[0];
        info!("Running with export to: {}", export_path.display());

        let (result, export) = runner(&args, base_seed).run_recorded(scenario);
        export
            .write_to_file(export_path)
            .with_context(|| format!("Failed to write export to {}", export_path.display()))?;
        info!("Exported {} frames to {}", export.frames.len(), export_path.display());

        report(&result, args.json);
        if !result.passed {
            std::process::exit(1);
        }
        return Ok(());
    }

    // Run simulations
    let mut all_results: Vec<ScenarioResult> = Vec::new();
    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = runner(&args, seed);

        for scenario in &scenarios {
            let result = runner.run(*scenario);
            if !args.json {
                report(&result, false);
            }
            all_results.push(result);
        }
    }

    // Summary
    let total = all_results.len();
    let failed_count = all_results.iter().filter(|r| !r.passed).count();
    let passed = total - failed_count;

    if args.json {
        // JSON output for CI parsing
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "ticks": r.total_ticks,
                    "time_secs": r.final_time_secs,
                    "failure_reason": r.failure_reason,
                    "metrics": r.metrics,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            // List failed seeds
            for result in all_results.iter().filter(|r| !r.passed) {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario.name(),
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn runner(args: &Args, seed: u64) -> ScenarioRunner {
    let runner = ScenarioRunner::new(seed).with_ticks(args.ticks);
    match args.speed {
        Some(speed) => runner.with_speed(speed),
        None => runner,
    }
}

fn report(result: &ScenarioResult, json: bool) {
    if json {
        return;
    }
    if result.passed {
        info!(
            "✓ {} (seed={}) PASSED | {} likes over {:.1}s",
            result.scenario.name(),
            result.seed,
            result.metrics.likes,
            result.final_time_secs
        );
    } else {
        error!(
            "✗ {} (seed={}) FAILED: {}",
            result.scenario.name(),
            result.seed,
            result.failure_reason.as_deref().unwrap_or("unknown")
        );
    }
}

fn print_reactors(args: &Args, content_id: &str) -> anyhow::Result<()> {
    let viewer = default_viewer();
    let mut content = ContentItem::new(content_id, "u2", false, args.likes);
    content.is_liked = args.liked;

    let page = ReactorGenerator::new().reactors(&content, &viewer, args.offset, args.count);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    for (i, reactor) in page.iter().enumerate() {
        let badge = match reactor.verification_tier {
            Some(tier) => format!(" [{:?}]", tier),
            None => String::new(),
        };
        println!(
            "{:>6}  {} @{}{}  {} followers  ({})",
            args.offset + i as u64,
            reactor.name,
            reactor.username,
            badge,
            reactor.followers,
            reactor.id
        );
    }
    Ok(())
}
