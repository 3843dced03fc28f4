//! Command-line argument parsing for the magneto demo host.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{Config, GainConfig};

/// Named gain presets selectable from the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GainArg {
    Steady,
    Surge,
}

/// Magneto command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "magneto", about = "Magnetic field lines and solar wind")]
pub struct CliArgs {
    /// Number of solar-wind particles.
    #[arg(long)]
    pub particles: Option<u32>,

    /// Number of field-line layers.
    #[arg(long)]
    pub layers: Option<u32>,

    /// Field lines per layer.
    #[arg(long)]
    pub lines_per_layer: Option<u32>,

    /// Segments per field line.
    #[arg(long)]
    pub points_per_line: Option<u32>,

    /// Simulation steps to run.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// RNG seed for particle spawning.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Velocity gain preset.
    #[arg(long, value_enum)]
    pub gain: Option<GainArg>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON snapshot of the final state to this file.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl From<GainArg> for GainConfig {
    fn from(arg: GainArg) -> Self {
        match arg {
            GainArg::Steady => GainConfig::Steady,
            GainArg::Surge => GainConfig::Surge,
        }
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(n) = args.particles {
            self.wind.particle_count = n;
        }
        if let Some(n) = args.layers {
            self.field.num_layers = n;
        }
        if let Some(n) = args.lines_per_layer {
            self.field.lines_per_layer = n;
        }
        if let Some(n) = args.points_per_line {
            self.field.points_per_line = n;
        }
        if let Some(n) = args.ticks {
            self.simulation.ticks = n;
        }
        if let Some(seed) = args.seed {
            self.wind.seed = Some(seed);
        }
        if let Some(gain) = args.gain {
            self.wind.gain = gain.into();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
