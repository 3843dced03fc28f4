//! Configuration structs with source-scene defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "magneto";

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Magnetic field-line layout.
    pub field: FieldConfig,
    /// Solar-wind particle tuning.
    pub wind: WindConfig,
    /// Host loop timing.
    pub simulation: SimulationConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Magnetic field-line layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Concentric layers of lines.
    pub num_layers: u32,
    /// Lines per layer, spaced evenly in longitude.
    pub lines_per_layer: u32,
    /// Segments per line.
    pub points_per_line: u32,
    /// Body position the field is centred on.
    pub center: [f32; 3],
}

/// Per-axis velocity gain applied after each deflection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub enum GainConfig {
    /// x 1.0008, y 1.0094.
    #[default]
    Steady,
    /// x 1.00000008, y 1.042.
    Surge,
    /// Explicit gain pair.
    Custom { x: f64, y: f64 },
}

/// Solar-wind particle tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindConfig {
    /// Number of particles.
    pub particle_count: u32,
    /// Left edge of the spawn band.
    pub x_min: f64,
    /// Recycle boundary.
    pub x_max: f64,
    /// Width of the spawn band.
    pub spawn_x_jitter: f64,
    /// Spawn height, centred on zero.
    pub y_spread: f64,
    /// Spawn depth, centred on zero.
    pub z_spread: f64,
    /// Distance from the origin inside which particles are deflected.
    pub magnetosphere_radius: f64,
    /// Tangential push per tick.
    pub deviation_strength: f64,
    /// X velocity of freshly spawned particles.
    pub initial_speed: f64,
    pub gain: GainConfig,
    /// Fixed RNG seed; a random one is drawn when unset.
    pub seed: Option<u64>,
}

/// Host loop timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation steps to run before exiting.
    pub ticks: u64,
    /// Fixed simulation rate (steps per second).
    pub tick_rate_hz: u32,
    /// Display refresh rate the headless host emulates.
    pub refresh_rate_hz: u32,
}

/// Debug/development settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log a wind summary every this many ticks (0 disables).
    pub report_interval: u64,
}

// --- Default implementations ---

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            num_layers: 3,
            lines_per_layer: 7,
            points_per_line: 100,
            center: [0.0, 0.0, 0.0],
        }
    }
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            x_min: -5.0,
            x_max: 5.0,
            spawn_x_jitter: 2.0,
            y_spread: 2.0,
            z_spread: 2.0,
            magnetosphere_radius: 90.0,
            deviation_strength: 0.009,
            initial_speed: 0.05,
            gain: GainConfig::Steady,
            seed: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            tick_rate_hz: 60,
            refresh_rate_hz: 60,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval: 60,
        }
    }
}

/// Platform configuration directory for magneto (`<config_dir>/magneto`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| base.join(APP_NAME))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(config_dir.join(CONFIG_FILE), serialized).map_err(ConfigError::WriteError)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
