//! Configuration for the magneto field and solar-wind simulation.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line.

mod cli;
mod config;
mod error;

pub use cli::{CliArgs, GainArg};
pub use config::{
    Config, DebugConfig, FieldConfig, GainConfig, SimulationConfig, WindConfig, default_config_dir,
};
pub use error::ConfigError;
