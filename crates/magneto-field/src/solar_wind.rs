//! Solar-wind particle field: a fixed pool of particles streaming along +X,
//! deflected tangentially while inside the magnetosphere radius and recycled
//! once they pass the far boundary.
//!
//! Positions and velocities are stored as `f32` so the position array can be
//! handed straight to a vertex buffer. Each tick is evaluated in `f64` and
//! rounded back on store.

use glam::{DVec3, Vec3};
use rand_chacha::ChaCha8Rng;

use crate::{FieldError, RandomSource, random};

/// Spawn region and recycle boundary of the simulated domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindBounds {
    /// Left edge of the spawn region.
    pub x_min: f64,
    /// Particles with `x` past this are recycled.
    pub x_max: f64,
    /// Width of the spawn band starting at `x_min`.
    pub spawn_x_jitter: f64,
    /// Spawn height, centred on zero.
    pub y_spread: f64,
    /// Spawn depth, centred on zero.
    pub z_spread: f64,
}

impl Default for WindBounds {
    fn default() -> Self {
        Self {
            x_min: -5.0,
            x_max: 5.0,
            spawn_x_jitter: 2.0,
            y_spread: 2.0,
            z_spread: 2.0,
        }
    }
}

/// Per-axis velocity multiplier applied after each deflection.
///
/// Scene variants disagree on these values and neither is documented as
/// correct, so both are offered as presets.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityGain {
    pub x: f64,
    pub y: f64,
}

impl VelocityGain {
    /// Gentle acceleration, mostly vertical.
    pub const STEADY: Self = Self {
        x: 1.0008,
        y: 1.0094,
    };

    /// Almost no horizontal gain, strong vertical gain.
    pub const SURGE: Self = Self {
        x: 1.000_000_08,
        y: 1.042,
    };

    /// Custom gain pair.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for VelocityGain {
    fn default() -> Self {
        Self::STEADY
    }
}

/// Which way a particle is pushed along Y when deflected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitFlag {
    /// +1: tangential Y push keeps its sign.
    North,
    /// -1: tangential Y push is inverted.
    South,
}

impl SplitFlag {
    /// Choose a flag from a uniform sample: strictly above one half is north.
    pub fn from_sample(sample: f64) -> Self {
        if sample > 0.5 { Self::North } else { Self::South }
    }

    /// Signed factor applied to the Y component of the deflection.
    pub fn factor(self) -> f64 {
        match self {
            Self::North => 1.0,
            Self::South => -1.0,
        }
    }
}

/// Tuning of a [`SolarWindField`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolarWindConfig {
    /// Number of particles, fixed for the lifetime of the field.
    pub particle_count: u32,
    pub bounds: WindBounds,
    /// Particles closer than this to the origin are deflected.
    pub magnetosphere_radius: f64,
    /// Scale of the tangential push per tick.
    pub deviation_strength: f64,
    /// X velocity given to freshly spawned particles.
    pub initial_speed: f64,
    pub gain: VelocityGain,
}

impl Default for SolarWindConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            bounds: WindBounds::default(),
            magnetosphere_radius: 90.0,
            deviation_strength: 0.009,
            initial_speed: 0.05,
            gain: VelocityGain::STEADY,
        }
    }
}

impl SolarWindConfig {
    /// Check every parameter, returning the first violation found.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.particle_count == 0 {
            return Err(FieldError::invalid("particle_count", "must be at least 1"));
        }

        let b = &self.bounds;
        let extents = [b.x_min, b.x_max, b.spawn_x_jitter, b.y_spread, b.z_spread];
        if extents.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::invalid("bounds", "must be finite"));
        }
        if b.x_max <= b.x_min {
            return Err(FieldError::invalid("bounds", "x_max must exceed x_min"));
        }
        if b.spawn_x_jitter < 0.0 || b.y_spread < 0.0 || b.z_spread < 0.0 {
            return Err(FieldError::invalid("bounds", "spreads must not be negative"));
        }
        if b.x_min + b.spawn_x_jitter > b.x_max {
            return Err(FieldError::invalid(
                "bounds",
                "spawn band must end before x_max",
            ));
        }

        for (name, value) in [
            ("magnetosphere_radius", self.magnetosphere_radius),
            ("deviation_strength", self.deviation_strength),
            ("initial_speed", self.initial_speed),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FieldError::invalid(name, "must be finite and not negative"));
            }
        }

        let VelocityGain { x, y } = self.gain;
        if !x.is_finite() || !y.is_finite() || x <= 0.0 || y <= 0.0 {
            return Err(FieldError::invalid("gain", "must be finite and positive"));
        }
        Ok(())
    }
}

/// Snapshot of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub split: SplitFlag,
}

/// What happened during one [`SolarWindField::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Particles inside the magnetosphere radius this tick.
    pub deflected: u32,
    /// Particles that crossed `x_max` and were respawned.
    pub recycled: u32,
}

/// Velocity after one tangential push.
///
/// The tangent is `velocity × normal`. Its X and Z components are added as-is;
/// its Y component is signed by the split flag.
pub fn deflect(velocity: DVec3, normal: DVec3, strength: f64, split: SplitFlag) -> DVec3 {
    let tangent = velocity.cross(normal);
    DVec3::new(
        velocity.x + tangent.x * strength,
        velocity.y + tangent.y * strength * split.factor(),
        velocity.z + tangent.z * strength,
    )
}

/// Fixed pool of solar-wind particles. Sole owner and writer of the particle arrays.
pub struct SolarWindField<R = ChaCha8Rng> {
    config: SolarWindConfig,
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    splits: Vec<SplitFlag>,
    rng: R,
    ticks: u64,
}

impl SolarWindField<ChaCha8Rng> {
    /// Create a field driven by a [`ChaCha8Rng`] seeded with `seed`.
    pub fn with_seed(config: SolarWindConfig, seed: u64) -> Result<Self, FieldError> {
        Self::new(config, random::seeded(seed))
    }
}

impl<R: RandomSource> SolarWindField<R> {
    /// Spawn `config.particle_count` particles using `rng`.
    ///
    /// # Errors
    ///
    /// [`FieldError::InvalidArgument`] if the config fails [`SolarWindConfig::validate`].
    pub fn new(config: SolarWindConfig, mut rng: R) -> Result<Self, FieldError> {
        config.validate()?;

        let count = config.particle_count as usize;
        let mut positions = Vec::with_capacity(count);
        let mut velocities = Vec::with_capacity(count);
        let mut splits = Vec::with_capacity(count);
        for _ in 0..count {
            let particle = spawn(&config, &mut rng);
            positions.push(particle.position);
            velocities.push(particle.velocity);
            splits.push(particle.split);
        }

        log::debug!(
            "Spawned {count} solar wind particles (magnetosphere radius {})",
            config.magnetosphere_radius
        );

        Ok(Self {
            config,
            positions,
            velocities,
            splits,
            rng,
            ticks: 0,
        })
    }

    /// Advance every particle by one unit tick.
    ///
    /// Moves each particle by its velocity, deflects it if the new position lies
    /// inside the magnetosphere radius, then respawns it if it passed `x_max`.
    pub fn step(&mut self) -> StepReport {
        let mut report = StepReport::default();
        let radius = self.config.magnetosphere_radius;
        let strength = self.config.deviation_strength;
        let gain = self.config.gain;

        for i in 0..self.positions.len() {
            let mut velocity = self.velocities[i].as_dvec3();
            let position = self.positions[i].as_dvec3() + velocity;

            let distance = position.length();
            // The origin has no outward normal.
            if distance < radius && distance > 0.0 {
                velocity = deflect(velocity, position / distance, strength, self.splits[i]);
                velocity.x *= gain.x;
                velocity.y *= gain.y;
                report.deflected += 1;
            }

            let position = position.as_vec3();
            if f64::from(position.x) > self.config.bounds.x_max {
                let fresh = spawn(&self.config, &mut self.rng);
                self.positions[i] = fresh.position;
                self.velocities[i] = fresh.velocity;
                self.splits[i] = fresh.split;
                report.recycled += 1;
            } else {
                self.positions[i] = position;
                self.velocities[i] = velocity.as_vec3();
            }
        }

        self.ticks += 1;
        log::trace!(
            "Tick {}: {} deflected, {} recycled",
            self.ticks,
            report.deflected,
            report.recycled
        );
        report
    }

    /// Particle positions, one per particle.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Positions flattened to `[x0, y0, z0, x1, ...]` for vertex upload.
    pub fn position_buffer(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Particle velocities, one per particle.
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Split flags, one per particle.
    pub fn splits(&self) -> &[SplitFlag] {
        &self.splits
    }

    /// Snapshot of the particle at `index`.
    pub fn particle(&self, index: usize) -> Option<Particle> {
        Some(Particle {
            position: *self.positions.get(index)?,
            velocity: self.velocities[index],
            split: self.splits[index],
        })
    }

    /// Iterate over snapshots of every particle.
    pub fn particles(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.positions.len()).filter_map(|i| self.particle(i))
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always false: a field holds at least one particle.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of completed [`step`](Self::step) calls.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &SolarWindConfig {
        &self.config
    }

    /// Mean particle position, for diagnostics.
    pub fn centroid(&self) -> Vec3 {
        let sum: DVec3 = self.positions.iter().map(|p| p.as_dvec3()).sum();
        (sum / self.positions.len() as f64).as_vec3()
    }
}

/// Draw a fresh particle. Samples are consumed in the order x, y, z, flag.
fn spawn<R: RandomSource>(config: &SolarWindConfig, rng: &mut R) -> Particle {
    let b = &config.bounds;
    let x = b.x_min + rng.next_unit() * b.spawn_x_jitter;
    let y = rng.next_unit() * b.y_spread - b.y_spread / 2.0;
    let z = (rng.next_unit() - 0.5) * b.z_spread;
    let split = SplitFlag::from_sample(rng.next_unit());

    Particle {
        position: DVec3::new(x, y, z).as_vec3(),
        velocity: DVec3::new(config.initial_speed, 0.0, 0.0).as_vec3(),
        split,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the same sample forever.
    struct Constant(f64);

    impl RandomSource for Constant {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    /// Replays a fixed list of samples in order.
    struct Sequence {
        samples: Vec<f64>,
        next: usize,
    }

    impl RandomSource for Sequence {
        fn next_unit(&mut self) -> f64 {
            let sample = self.samples[self.next];
            self.next += 1;
            sample
        }
    }

    fn single(config: SolarWindConfig, sample: f64) -> SolarWindField<Constant> {
        SolarWindField::new(
            SolarWindConfig {
                particle_count: 1,
                ..config
            },
            Constant(sample),
        )
        .unwrap()
    }

    #[test]
    fn test_spawn_with_half_samples() {
        let field = single(SolarWindConfig::default(), 0.5);
        let p = field.particle(0).unwrap();
        assert_eq!(p.position, Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(p.velocity, Vec3::new(0.05, 0.0, 0.0));
        assert_eq!(p.split, SplitFlag::South);
    }

    #[test]
    fn test_one_step_from_half_samples() {
        let mut field = single(SolarWindConfig::default(), 0.5);
        let report = field.step();
        let p = field.particle(0).unwrap();

        assert!((p.position - Vec3::new(-3.95, 0.0, 0.0)).length() < 1e-6);
        // Velocity is parallel to the normal, so only the gain applies.
        assert_eq!(report.deflected, 1);
        assert_eq!(report.recycled, 0);
        assert!((f64::from(p.velocity.x) - 0.05 * 1.0008).abs() < 1e-7);
        assert_eq!(p.velocity.y, 0.0);
        assert_eq!(p.velocity.z, 0.0);
        assert_eq!(field.tick_count(), 1);
    }

    #[test]
    fn test_outside_radius_moves_without_deflection() {
        let config = SolarWindConfig {
            magnetosphere_radius: 1.0,
            ..SolarWindConfig::default()
        };
        let mut field = single(config, 0.5);
        let report = field.step();
        assert_eq!(report.deflected, 0);
        assert_eq!(field.velocities()[0], Vec3::new(0.05, 0.0, 0.0));
        assert!((field.positions()[0].x + 3.95).abs() < 1e-6);
    }

    #[test]
    fn test_zero_particles_is_invalid() {
        let config = SolarWindConfig {
            particle_count: 0,
            ..SolarWindConfig::default()
        };
        let err = SolarWindField::with_seed(config, 1).err().unwrap();
        assert_eq!(
            err,
            FieldError::InvalidArgument {
                name: "particle_count",
                reason: "must be at least 1"
            }
        );
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let base = SolarWindConfig::default();
        let cases = [
            SolarWindConfig {
                bounds: WindBounds {
                    x_max: -6.0,
                    ..WindBounds::default()
                },
                ..base
            },
            SolarWindConfig {
                bounds: WindBounds {
                    spawn_x_jitter: 20.0,
                    ..WindBounds::default()
                },
                ..base
            },
            SolarWindConfig {
                bounds: WindBounds {
                    y_spread: -1.0,
                    ..WindBounds::default()
                },
                ..base
            },
            SolarWindConfig {
                magnetosphere_radius: f64::NAN,
                ..base
            },
            SolarWindConfig {
                initial_speed: -0.05,
                ..base
            },
            SolarWindConfig {
                gain: VelocityGain::new(0.0, 1.0),
                ..base
            },
        ];
        for config in cases {
            assert!(
                config.validate().unwrap_err().is_invalid_argument(),
                "{config:?} should be rejected"
            );
        }
        assert!(base.validate().is_ok());
    }

    #[test]
    fn test_split_flag_threshold() {
        assert_eq!(SplitFlag::from_sample(0.5), SplitFlag::South);
        assert_eq!(SplitFlag::from_sample(0.500_001), SplitFlag::North);
        assert_eq!(SplitFlag::from_sample(0.0), SplitFlag::South);
        assert_eq!(SplitFlag::North.factor(), 1.0);
        assert_eq!(SplitFlag::South.factor(), -1.0);
    }

    #[test]
    fn test_deflect_split_only_signs_y() {
        let v = DVec3::new(0.05, 0.0, 0.0);
        let n = DVec3::new(0.0, 0.6, 0.8);
        // v x n = (0, -0.04, 0.03)
        let north = deflect(v, n, 0.5, SplitFlag::North);
        let south = deflect(v, n, 0.5, SplitFlag::South);

        assert!((north.y + 0.02).abs() < 1e-12);
        assert!((south.y - 0.02).abs() < 1e-12);
        assert!((north.x - 0.05).abs() < 1e-12);
        assert_eq!(north.x, south.x);
        assert!((north.z - 0.015).abs() < 1e-12);
        assert_eq!(north.z, south.z);
    }

    #[test]
    fn test_gain_presets() {
        assert_eq!(VelocityGain::default(), VelocityGain::STEADY);
        assert_eq!(VelocityGain::STEADY, VelocityGain::new(1.0008, 1.0094));
        assert!(VelocityGain::SURGE.x > 1.0 && VelocityGain::SURGE.x < 1.000_001);
        assert_eq!(VelocityGain::SURGE.y, 1.042);
    }

    #[test]
    fn test_gain_applies_only_to_x_and_y() {
        let config = SolarWindConfig {
            gain: VelocityGain::new(2.0, 3.0),
            deviation_strength: 0.0,
            ..SolarWindConfig::default()
        };
        let mut field = single(config, 0.5);
        field.step();
        assert!((field.velocities()[0].x - 0.1).abs() < 1e-7);
    }

    #[test]
    fn test_recycle_resets_particle() {
        // Fast particle with no deflection: x goes -4, 0, 4, then past 5.
        let config = SolarWindConfig {
            initial_speed: 4.0,
            magnetosphere_radius: 0.0,
            ..SolarWindConfig::default()
        };
        let mut field = single(config, 0.5);
        assert_eq!(field.step().recycled, 0);
        assert_eq!(field.step().recycled, 0);
        assert_eq!(field.positions()[0].x, 4.0);

        let report = field.step();
        assert_eq!(report.recycled, 1);
        let p = field.particle(0).unwrap();
        assert_eq!(p.position, Vec3::new(-4.0, 0.0, 0.0));
        assert_eq!(p.velocity, Vec3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn test_recycle_draws_fresh_position_and_split_flag() {
        let config = SolarWindConfig {
            particle_count: 1,
            initial_speed: 4.0,
            magnetosphere_radius: 0.0,
            ..SolarWindConfig::default()
        };
        let rng = Sequence {
            // Spawn: x, y, z, flag. Then the recycle draws in the same order.
            samples: vec![0.5, 0.5, 0.5, 0.1, 0.0, 0.75, 0.25, 0.9],
            next: 0,
        };
        let mut field = SolarWindField::new(config, rng).unwrap();
        assert_eq!(field.splits()[0], SplitFlag::South);
        assert_eq!(field.rng.next, 4);

        field.step();
        field.step();
        assert_eq!(field.splits()[0], SplitFlag::South);
        assert_eq!(field.step().recycled, 1);

        let p = field.particle(0).unwrap();
        assert_eq!(p.split, SplitFlag::North);
        assert_eq!(p.position, Vec3::new(-5.0, 0.5, -0.5));
        assert_eq!(p.velocity, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(field.rng.next, 8);
    }

    #[test]
    fn test_positions_stay_in_domain_and_recycle_into_spawn_band() {
        let mut field = SolarWindField::with_seed(SolarWindConfig::default(), 42).unwrap();
        let mut total_recycled = 0;

        for _ in 0..1000 {
            let before: Vec<(Vec3, Vec3)> = field
                .positions()
                .iter()
                .copied()
                .zip(field.velocities().iter().copied())
                .collect();

            let report = field.step();
            total_recycled += report.recycled;

            for (i, (pos, vel)) in before.iter().enumerate() {
                let moved_x = (pos.as_dvec3() + vel.as_dvec3()).as_vec3().x;
                let now = field.particle(i).unwrap();
                assert!(now.position.x <= 5.0, "particle {i} escaped: {now:?}");
                if moved_x > 5.0 {
                    assert!(
                        (-5.0..=-3.0).contains(&now.position.x),
                        "particle {i} respawned outside spawn band: {now:?}"
                    );
                    assert_eq!(now.velocity, Vec3::new(0.05, 0.0, 0.0));
                }
            }
        }
        assert!(total_recycled > 0, "expected some particles to recycle");
    }

    #[test]
    fn test_spawn_distribution_within_bounds() {
        let config = SolarWindConfig {
            particle_count: 2000,
            ..SolarWindConfig::default()
        };
        let field = SolarWindField::with_seed(config, 7).unwrap();
        let mut north = 0;
        for p in field.particles() {
            assert!((-5.0..=-3.0).contains(&p.position.x));
            assert!((-1.0..=1.0).contains(&p.position.y));
            assert!((-1.0..=1.0).contains(&p.position.z));
            if p.split == SplitFlag::North {
                north += 1;
            }
        }
        assert!((800..=1200).contains(&north), "north count {north}");
    }

    #[test]
    fn test_same_seed_same_evolution() {
        let mut a = SolarWindField::with_seed(SolarWindConfig::default(), 9).unwrap();
        let mut b = SolarWindField::with_seed(SolarWindConfig::default(), 9).unwrap();
        for _ in 0..300 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.position_buffer(), b.position_buffer());
        assert_eq!(a.splits(), b.splits());
    }

    #[test]
    fn test_position_buffer_layout() {
        let field = SolarWindField::with_seed(SolarWindConfig::default(), 3).unwrap();
        let buffer = field.position_buffer();
        assert_eq!(buffer.len(), field.len() * 3);
        for (i, p) in field.positions().iter().enumerate() {
            assert_eq!(&buffer[i * 3..i * 3 + 3], &[p.x, p.y, p.z]);
        }
    }

    #[test]
    fn test_particle_at_origin_is_not_deflected() {
        let config = SolarWindConfig {
            bounds: WindBounds {
                x_min: -0.05,
                spawn_x_jitter: 0.0,
                y_spread: 0.0,
                z_spread: 0.0,
                ..WindBounds::default()
            },
            ..SolarWindConfig::default()
        };
        let mut field = single(config, 0.5);
        let report = field.step();
        assert_eq!(report.deflected, 0);
        assert!(field.velocities()[0].is_finite());
        assert!(field.positions()[0].length() < 1e-6);
    }

    #[test]
    fn test_surge_preset_stays_finite() {
        let config = SolarWindConfig {
            gain: VelocityGain::SURGE,
            ..SolarWindConfig::default()
        };
        let mut field = SolarWindField::with_seed(config, 11).unwrap();
        for _ in 0..2000 {
            field.step();
        }
        assert!(field.positions().iter().all(|p| p.is_finite()));
        assert!(field.velocities().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_centroid_of_single_particle() {
        let field = single(SolarWindConfig::default(), 0.5);
        assert_eq!(field.centroid(), Vec3::new(-4.0, 0.0, 0.0));
    }
}
