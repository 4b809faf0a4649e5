use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

use wire_router::{Problem, RouteReport, Router, RouterConfig, RoutingGrid, SinkOutcome};

#[derive(Parser)]
#[command(name = "wire-route")]
#[command(about = "Route nets on a grid and print the resulting wire map")]
struct Cmd {
    /// Problem file: dimensions, obstructions, then one net per line
    input: PathBuf,

    /// Give up on a sink after this many frontier expansions
    #[arg(long)]
    max_expansions: Option<u32>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log every committed path
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match (cmd.verbose, cmd.quiet) {
        (true, _) => Level::DEBUG,
        (_, true) => Level::WARN,
        _ => Level::INFO,
    };
    SubscriberBuilder::default()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let problem = Problem::from_file(&cmd.input)
        .with_context(|| format!("loading {}", cmd.input.display()))?;
    tracing::info!(
        width = problem.width,
        height = problem.height,
        obstructions = problem.obstructions.len(),
        nets = problem.nets.len(),
        "problem loaded"
    );

    let router = Router::new(RouterConfig {
        max_expansions: cmd.max_expansions,
    });
    let start = Instant::now();
    let (grid, report) = router.route(&problem);
    let elapsed = start.elapsed();
    tracing::info!(
        elapsed_ms = elapsed.as_millis() as u64,
        complete = report.is_complete(),
        "routing finished"
    );

    match cmd.format {
        Format::Text => print_text(&grid, &report),
        Format::Json => print_json(&grid, &report)?,
    }
    Ok(())
}

fn print_text(grid: &RoutingGrid, report: &RouteReport) {
    print!("{grid}");
    println!();
    for net in &report.nets {
        let connected = net.sinks.iter().filter(|s| s.is_connected()).count();
        println!("net {}: {}/{} sinks connected", net.net, connected, net.sinks.len());
        for sink in net.failed_sinks() {
            let why = match sink.outcome {
                SinkOutcome::Abandoned => "abandoned",
                _ => "unreachable",
            };
            println!("  sink {} {} after {} expansions", sink.sink, why, sink.expansions);
        }
    }
}

fn print_json(grid: &RoutingGrid, report: &RouteReport) -> Result<()> {
    let out = serde_json::json!({
        "width": grid.width(),
        "height": grid.height(),
        "grid": grid.to_legacy(),
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
