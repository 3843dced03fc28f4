//! Magnetic field-line geometry: deterministic control points along curved
//! latitude/longitude paths around a body, arranged in concentric layers.
//!
//! The output is a list of ordered control points per line. Fitting a spline
//! through them and sweeping a tube is left to the renderer.

use std::f64::consts::PI;

use glam::{DVec3, Vec3};

use crate::FieldError;

/// Amplitude of the radial bulge applied along each line.
const BULGE_AMPLITUDE: f64 = 0.5;

/// Radius added per layer, on top of the unit base radius.
const LAYER_RADIUS_STEP: f64 = 0.5;

/// Latitude (degrees) each successive layer pulls in from the poles.
const LAYER_LATITUDE_STEP: f64 = 20.0;

/// One field line: a pair of geographic endpoints and a sampling density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLineSpec {
    /// Starting latitude in degrees (north positive).
    pub start_lat: f64,
    /// Starting longitude in degrees (east positive).
    pub start_lng: f64,
    /// Ending latitude in degrees.
    pub end_lat: f64,
    /// Ending longitude in degrees.
    pub end_lng: f64,
    /// Radius of the line at both endpoints. Must be finite and positive.
    pub base_radius: f64,
    /// Number of segments; the line has `point_count + 1` points.
    pub point_count: u32,
}

impl FieldLineSpec {
    /// Create a line spec from endpoint coordinates, base radius and segment count.
    pub fn new(
        start: (f64, f64),
        end: (f64, f64),
        base_radius: f64,
        point_count: u32,
    ) -> Self {
        Self {
            start_lat: start.0,
            start_lng: start.1,
            end_lat: end.0,
            end_lng: end.1,
            base_radius,
            point_count,
        }
    }

    fn validate(&self) -> Result<(), FieldError> {
        if self.point_count == 0 {
            return Err(FieldError::invalid("point_count", "must be at least 1"));
        }
        if !self.base_radius.is_finite() || self.base_radius <= 0.0 {
            return Err(FieldError::invalid(
                "base_radius",
                "must be finite and greater than zero",
            ));
        }
        let coords = [self.start_lat, self.start_lng, self.end_lat, self.end_lng];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(FieldError::invalid(
                "endpoints",
                "latitudes and longitudes must be finite",
            ));
        }
        Ok(())
    }
}

/// Layout of a full magnetic field: concentric layers of evenly spaced lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLayerConfig {
    /// Number of concentric layers. Outer layers are larger and start further from the poles.
    pub num_layers: u32,
    /// Lines per layer, spaced evenly in longitude.
    pub lines_per_layer: u32,
    /// Segments per line.
    pub points_per_line: u32,
    /// Translation applied to every generated point (the body's position).
    pub center: Vec3,
}

impl Default for FieldLayerConfig {
    fn default() -> Self {
        Self {
            num_layers: 3,
            lines_per_layer: 7,
            points_per_line: 100,
            center: Vec3::ZERO,
        }
    }
}

impl FieldLayerConfig {
    /// Create a layout with the given layer and line counts and default density.
    pub fn new(num_layers: u32, lines_per_layer: u32) -> Self {
        Self {
            num_layers,
            lines_per_layer,
            ..Self::default()
        }
    }

    /// Total number of lines this layout produces.
    pub fn line_count(&self) -> usize {
        self.num_layers as usize * self.lines_per_layer as usize
    }

    /// Derive the per-line specs, layer-major.
    ///
    /// Layer `k` has base radius `1 + 0.5k` and spans latitude `90 - 20k` down to
    /// `-90 + 20k`. Line `i` starts at longitude `i / lines * 360 - 180` and ends at
    /// `(start + 180) % 360 - 180`, using the truncated remainder.
    pub fn line_specs(&self) -> Result<Vec<FieldLineSpec>, FieldError> {
        if self.num_layers == 0 {
            return Err(FieldError::invalid("num_layers", "must be at least 1"));
        }
        if self.lines_per_layer == 0 {
            return Err(FieldError::invalid("lines_per_layer", "must be at least 1"));
        }
        if self.points_per_line == 0 {
            return Err(FieldError::invalid("points_per_line", "must be at least 1"));
        }
        if !self.center.is_finite() {
            return Err(FieldError::invalid("center", "must be finite"));
        }

        let mut specs = Vec::with_capacity(self.line_count());
        for layer in 0..self.num_layers {
            let layer = f64::from(layer);
            let base_radius = 1.0 + layer * LAYER_RADIUS_STEP;
            let start_lat = 90.0 - layer * LAYER_LATITUDE_STEP;
            let end_lat = -90.0 + layer * LAYER_LATITUDE_STEP;

            for i in 0..self.lines_per_layer {
                let start_lng = f64::from(i) / f64::from(self.lines_per_layer) * 360.0 - 180.0;
                let end_lng = (start_lng + 180.0) % 360.0 - 180.0;
                specs.push(FieldLineSpec::new(
                    (start_lat, start_lng),
                    (end_lat, end_lng),
                    base_radius,
                    self.points_per_line,
                ));
            }
        }
        Ok(specs)
    }
}

/// Generates field-line control points. Pure and deterministic.
pub struct FieldLineSampler;

impl FieldLineSampler {
    /// Sample a single field line into `point_count + 1` ordered points.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidArgument`] if `point_count` is zero, the base radius is
    /// not a positive finite number, or any endpoint coordinate is not finite.
    pub fn generate(spec: &FieldLineSpec) -> Result<Vec<Vec3>, FieldError> {
        spec.validate()?;
        Ok(sample_line(spec, DVec3::ZERO))
    }

    /// Sample every line of a layered field, translated by `config.center`.
    ///
    /// Returns `num_layers * lines_per_layer` point sequences, layer-major.
    pub fn generate_layered_field(config: &FieldLayerConfig) -> Result<Vec<Vec<Vec3>>, FieldError> {
        let specs = config.line_specs()?;
        let offset = config.center.as_dvec3();

        let mut lines = Vec::with_capacity(specs.len());
        for spec in &specs {
            spec.validate()?;
            lines.push(sample_line(spec, offset));
        }

        log::debug!(
            "Generated {} field lines ({} layers x {} lines, {} points each)",
            lines.len(),
            config.num_layers,
            config.lines_per_layer,
            config.points_per_line + 1
        );
        Ok(lines)
    }
}

fn sample_line(spec: &FieldLineSpec, offset: DVec3) -> Vec<Vec3> {
    let segments = f64::from(spec.point_count);
    (0..=spec.point_count)
        .map(|i| {
            let t = f64::from(i) / segments;
            let lat = spec.start_lat + t * (spec.end_lat - spec.start_lat);
            let lng = spec.start_lng + t * (spec.end_lng - spec.start_lng);
            let r = spec.base_radius * radius_envelope(t);
            (spherical_to_cartesian(lat, lng, r) + offset).as_vec3()
        })
        .collect()
}

/// Radius multiplier at parameter `t` in `[0, 1]`.
///
/// `1 + 0.5 sin(πt)(1 - t)`: exactly 1 at both ends, with the peak skewed
/// toward the start of the line.
pub fn radius_envelope(t: f64) -> f64 {
    1.0 + BULGE_AMPLITUDE * (PI * t).sin() * (1.0 - t)
}

/// Convert latitude/longitude (degrees) and radius to a Y-up Cartesian point.
///
/// Longitude -180 lies on the -X axis, latitude +90 on +Y.
pub fn spherical_to_cartesian(lat: f64, lng: f64, r: f64) -> DVec3 {
    let phi = (90.0 - lat) * PI / 180.0;
    let theta = (lng + 180.0) * PI / 180.0;
    DVec3::new(
        -r * phi.sin() * theta.cos(),
        r * phi.cos(),
        r * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`spherical_to_cartesian`]: returns `(lat, lng, r)` with longitude
/// wrapped into `[-180, 180)`.
///
/// Longitude is meaningless at the poles and at the origin; zero is returned there.
pub fn cartesian_to_spherical(point: DVec3) -> (f64, f64, f64) {
    let r = point.length();
    if r == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let phi = (point.y / r).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(-point.x);
    let lat = 90.0 - phi.to_degrees();
    let lng = wrap_longitude(theta.to_degrees() - 180.0);
    (lat, lng, r)
}

/// Wrap a longitude in degrees into `[-180, 180)`.
pub fn wrap_longitude(lng: f64) -> f64 {
    (lng + 180.0).rem_euclid(360.0) - 180.0
}
