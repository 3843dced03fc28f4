//! Headless host for the magneto field and solar-wind simulation.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p magneto-demo` to generate the field and step the wind.
//! Run with `cargo run -p magneto-demo -- --particles 500 --gain surge --export out.json`
//! to write the final state for a renderer.

mod error;
mod host;
mod setup;
mod snapshot;
mod tick_loop;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use magneto_config::{CliArgs, Config, default_config_dir};
use magneto_field::{FieldLineSampler, SolarWindField};
use tracing::{error, info};

use crate::error::DemoError;
use crate::snapshot::Snapshot;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = match args.config.clone().map_or_else(default_config_dir, Ok) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    magneto_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&config, args.export.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, export: Option<&Path>) -> Result<(), DemoError> {
    let layout = setup::field_layout(&config.field);
    let field_lines = FieldLineSampler::generate_layered_field(&layout)?;
    info!(
        "Generated {} field lines with {} control points each",
        field_lines.len(),
        layout.points_per_line + 1
    );

    let seed = config.wind.seed.unwrap_or_else(rand::random);
    let mut wind = SolarWindField::with_seed(setup::wind_config(&config.wind), seed)?;
    info!(
        "Spawned {} solar wind particles (seed {seed}, gain {:?})",
        wind.len(),
        config.wind.gain
    );

    let summary = host::run_wind(&mut wind, &config.simulation, config.debug.report_interval);
    info!(
        "Ran {} ticks over {} frames: {} deflections, {} recycles",
        summary.ticks, summary.frames, summary.deflected, summary.recycled
    );

    if let Some(path) = export {
        Snapshot::capture(&field_lines, &wind)
            .write(path)
            .map_err(|source| DemoError::Export {
                path: PathBuf::from(path),
                source,
            })?;
        info!("Wrote snapshot to {}", path.display());
    }

    Ok(())
}
