//! waymark - headless AR placement and place-label scenario runner
//!
//! Plays a scripted AR session (tracking batches, placements, geocoder
//! answers, long presses) against the scene engine and prints the final
//! scene as JSON.

mod config;
mod headless;
mod scenario;

use anyhow::Result;
use clap::Parser;
use config::WaymarkConfig;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless AR placement and labelling scenario runner", long_about = None)]
struct Args {
    /// Scenario script (JSON)
    #[arg(short, long)]
    scenario: PathBuf,

    /// Session and label configuration (TOML)
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Write every session event to this file as JSON lines
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Write a metrics report (JSON) to this file
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Stop after this many frames even if the scenario has steps left
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Save the effective configuration to this path before running
    #[arg(long)]
    write_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    info!("Starting waymark v{}", env!("CARGO_PKG_VERSION"));

    let config = WaymarkConfig::load_from_path(&args.config);
    if let Some(path) = &args.write_config {
        config.save_to_path(path)?;
        info!(path = %path.display(), "configuration written");
    }

    let outcome = headless::run(
        &config,
        &HeadlessConfig {
            scenario: args.scenario,
            event_log: args.event_log,
            metrics: args.metrics,
            max_ticks: args.max_ticks,
        },
    )?;

    info!(
        events = outcome.events.len(),
        result = ?outcome.report.result,
        "run complete"
    );
    println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    Ok(())
}
