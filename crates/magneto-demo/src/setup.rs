//! Translation from persisted settings to simulation parameters.

use glam::Vec3;
use magneto_config::{FieldConfig, GainConfig, WindConfig};
use magneto_field::{FieldLayerConfig, SolarWindConfig, VelocityGain, WindBounds};

pub fn field_layout(config: &FieldConfig) -> FieldLayerConfig {
    FieldLayerConfig {
        num_layers: config.num_layers,
        lines_per_layer: config.lines_per_layer,
        points_per_line: config.points_per_line,
        center: Vec3::from_array(config.center),
    }
}

pub fn velocity_gain(gain: GainConfig) -> VelocityGain {
    match gain {
        GainConfig::Steady => VelocityGain::STEADY,
        GainConfig::Surge => VelocityGain::SURGE,
        GainConfig::Custom { x, y } => VelocityGain::new(x, y),
    }
}

pub fn wind_config(config: &WindConfig) -> SolarWindConfig {
    SolarWindConfig {
        particle_count: config.particle_count,
        bounds: WindBounds {
            x_min: config.x_min,
            x_max: config.x_max,
            spawn_x_jitter: config.spawn_x_jitter,
            y_spread: config.y_spread,
            z_spread: config.z_spread,
        },
        magnetosphere_radius: config.magnetosphere_radius,
        deviation_strength: config.deviation_strength,
        initial_speed: config.initial_speed,
        gain: velocity_gain(config.gain),
    }
}
