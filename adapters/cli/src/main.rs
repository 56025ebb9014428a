#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Tank Field scenario headlessly.

mod scenario;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::scenario::Scenario;

/// Command-line arguments for the Tank Field session runner.
#[derive(Debug, Parser)]
#[command(name = "tank-field", about = "Plays a Tank Field scenario headlessly.")]
struct Args {
    /// Path to the scenario TOML document.
    #[arg(long, value_name = "PATH")]
    scenario: PathBuf,
    /// Overrides the number of frames declared by the scenario.
    #[arg(long)]
    frames: Option<u32>,
    /// Overrides the per-frame delta declared by the scenario.
    #[arg(long)]
    delta: Option<f32>,
}

/// Entry point for the Tank Field command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let scenario = Scenario::from_path(&args.scenario)?;
    let frames = args.frames.unwrap_or(scenario.frames);
    let delta = args.delta.unwrap_or(scenario.delta);
    info!(
        path = %args.scenario.display(),
        frames,
        delta,
        tanks = scenario.tanks.len(),
        "scenario_loaded"
    );

    let summary = session::run(&scenario, frames, delta)?;
    info!(
        frames = summary.frames,
        hits = summary.hits,
        exits = summary.exits,
        "session_finished"
    );

    for (name, state) in &summary.tanks {
        let status = if state.is_destroyed {
            "destroyed"
        } else {
            "operational"
        };
        println!(
            "{name}: cell ({}, {}) at ({:.1}, {:.1}) {status}",
            state.position_cell.column(),
            state.position_cell.row(),
            state.position.x,
            state.position.y,
        );
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
