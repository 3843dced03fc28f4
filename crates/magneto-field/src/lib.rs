//! Magnetic field-line geometry and solar-wind particle simulation.
//!
//! Both generators are renderer-agnostic: field lines come out as ordered
//! control points, and the wind field exposes its particle positions as a flat
//! `f32` buffer the host uploads after each [`SolarWindField::step`].

mod error;
pub mod field_line;
pub mod random;
pub mod solar_wind;

pub use error::FieldError;
pub use field_line::{
    FieldLayerConfig, FieldLineSampler, FieldLineSpec, cartesian_to_spherical, radius_envelope,
    spherical_to_cartesian, wrap_longitude,
};
pub use random::{RandomSource, seeded};
pub use solar_wind::{
    Particle, SolarWindConfig, SolarWindField, SplitFlag, StepReport, VelocityGain, WindBounds,
    deflect,
};
